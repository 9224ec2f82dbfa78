//! SIMD-accelerated slice primitives with compile-time architecture dispatch.
//!
//! This module is private. The [`Vectorize`](crate::policy::Vectorize) loop
//! policy routes contiguous row dot products and column AXPY updates here.
//!
//! ## Dispatch strategy
//!
//! TypeId-based dispatch at monomorphization time: for `f32`/`f64` the
//! compiler selects the architecture kernel and dead-code-eliminates the
//! fallback. Every other element type (complex) uses [`scalar`], which is
//! unrolled so LLVM can still auto-vectorize it.
//!
//! | Arch      | ISA  | f64 lanes | f32 lanes |
//! |-----------|------|-----------|-----------|
//! | `aarch64` | NEON | 2         | 4         |
//! | `x86_64`  | SSE2 | 2         | 4         |
//! | `x86_64`  | AVX  | 4         | 8         |
//! | other     | none | unrolled  | unrolled  |
//!
//! AVX is picked when the crate is built with `target_feature = "avx"`
//! (e.g. `-C target-cpu=native`); SSE2 is the x86_64 baseline.

pub(crate) mod scalar;

#[cfg(target_arch = "aarch64")]
pub(crate) mod neon;

#[cfg(target_arch = "x86_64")]
pub(crate) mod x86;

use core::any::TypeId;

use crate::traits::Scalar;

/// Below this length the scalar loop wins over register setup.
const SHORT: usize = 8;

/// Dispatch dot product `Σ a[k] * b[k]` to SIMD or scalar fallback.
#[inline]
pub(crate) fn dot_dispatch<T: Scalar + 'static>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    if a.len() < SHORT {
        return scalar::dot(a, b);
    }
    #[cfg(any(target_arch = "aarch64", target_arch = "x86_64"))]
    {
        if TypeId::of::<T>() == TypeId::of::<f64>() {
            let a = unsafe { &*(a as *const [T] as *const [f64]) };
            let b = unsafe { &*(b as *const [T] as *const [f64]) };
            #[cfg(target_arch = "aarch64")]
            let result = neon::dot_f64(a, b);
            #[cfg(target_arch = "x86_64")]
            let result = x86::dot_f64(a, b);
            return unsafe { *(&result as *const f64 as *const T) };
        }
        if TypeId::of::<T>() == TypeId::of::<f32>() {
            let a = unsafe { &*(a as *const [T] as *const [f32]) };
            let b = unsafe { &*(b as *const [T] as *const [f32]) };
            #[cfg(target_arch = "aarch64")]
            let result = neon::dot_f32(a, b);
            #[cfg(target_arch = "x86_64")]
            let result = x86::dot_f32(a, b);
            return unsafe { *(&result as *const f32 as *const T) };
        }
    }
    scalar::dot(a, b)
}

/// Dispatch AXPY `y[k] -= alpha * x[k]` to SIMD or scalar fallback.
#[inline]
pub(crate) fn axpy_neg_dispatch<T: Scalar + 'static>(y: &mut [T], alpha: T, x: &[T]) {
    debug_assert_eq!(y.len(), x.len());
    if y.len() < SHORT {
        scalar::axpy_neg(y, alpha, x);
        return;
    }
    #[cfg(any(target_arch = "aarch64", target_arch = "x86_64"))]
    {
        if TypeId::of::<T>() == TypeId::of::<f64>() {
            let y = unsafe { &mut *(y as *mut [T] as *mut [f64]) };
            let alpha = unsafe { *(&alpha as *const T as *const f64) };
            let x = unsafe { &*(x as *const [T] as *const [f64]) };
            #[cfg(target_arch = "aarch64")]
            neon::axpy_neg_f64(y, alpha, x);
            #[cfg(target_arch = "x86_64")]
            x86::axpy_neg_f64(y, alpha, x);
            return;
        }
        if TypeId::of::<T>() == TypeId::of::<f32>() {
            let y = unsafe { &mut *(y as *mut [T] as *mut [f32]) };
            let alpha = unsafe { *(&alpha as *const T as *const f32) };
            let x = unsafe { &*(x as *const [T] as *const [f32]) };
            #[cfg(target_arch = "aarch64")]
            neon::axpy_neg_f32(y, alpha, x);
            #[cfg(target_arch = "x86_64")]
            x86::axpy_neg_f32(y, alpha, x);
            return;
        }
    }
    scalar::axpy_neg(y, alpha, x);
}
