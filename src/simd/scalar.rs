//! Generic fallbacks for element types and targets without a SIMD kernel.

use crate::traits::Scalar;

/// Dot product with four independent partial sums.
///
/// Splitting the reduction breaks the serial add dependency so LLVM can keep
/// several lanes in flight even without an explicit kernel.
#[inline]
pub fn dot<T: Scalar>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    let mut acc = [T::zero(); 4];
    let mut a_chunks = a.chunks_exact(4);
    let mut b_chunks = b.chunks_exact(4);
    for (ac, bc) in (&mut a_chunks).zip(&mut b_chunks) {
        acc[0] = acc[0] + ac[0] * bc[0];
        acc[1] = acc[1] + ac[1] * bc[1];
        acc[2] = acc[2] + ac[2] * bc[2];
        acc[3] = acc[3] + ac[3] * bc[3];
    }
    let mut sum = (acc[0] + acc[1]) + (acc[2] + acc[3]);
    for (&x, &y) in a_chunks.remainder().iter().zip(b_chunks.remainder()) {
        sum = sum + x * y;
    }
    sum
}

/// AXPY: `y[i] = y[i] - alpha * x[i]`.
#[inline]
pub fn axpy_neg<T: Scalar>(y: &mut [T], alpha: T, x: &[T]) {
    debug_assert_eq!(y.len(), x.len());
    for (yi, &xi) in y.iter_mut().zip(x) {
        *yi = *yi - alpha * xi;
    }
}
