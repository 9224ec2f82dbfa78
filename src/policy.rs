//! Loop policies: compile-time selection of how a kernel's inner loops are
//! generated.
//!
//! A policy is a zero-sized marker type. Kernels are generic over
//! [`LoopPolicy`], so each policy monomorphizes into its own code and no
//! branch on the policy survives inside a loop.
//!
//! | Policy | Bounds checks | SIMD |
//! |---|---|---|
//! | [`Debug`] | yes | no |
//! | [`InBounds`] | elided | no |
//! | [`Vectorize`] | elided | contiguous `f32`/`f64` runs go through the SIMD kernels |
//!
//! The policy never changes evaluation order within a kernel, only how each
//! element is fetched and how a contiguous reduction is vectorized, so results
//! agree up to rounding.

use core::any::TypeId;
use core::fmt;

use crate::simd;
use crate::traits::LinalgScalar;

/// Code-generation strategy for the inner loops of a kernel.
///
/// Both operations address a strided run of the raw matrix buffer `a`:
/// element `k` of the run is `op(a[start + k * stride])`, where `op`
/// converts into the accumulator type and conjugates when `conj` is set.
/// Callers guarantee every addressed element is inside `a`.
pub trait LoopPolicy: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Short name used in diagnostics.
    const NAME: &'static str;

    /// `Σ_k op(a[start + k * stride]) * x[k]` over `k in 0..x.len()`.
    fn dot<TA, T>(a: &[TA], start: usize, stride: usize, conj: bool, x: &[T]) -> T
    where
        TA: Copy + 'static,
        T: LinalgScalar + From<TA>;

    /// `y[k] -= alpha * op(a[start + k * stride])` over `k in 0..y.len()`.
    fn axpy_neg<TA, T>(y: &mut [T], alpha: T, a: &[TA], start: usize, stride: usize, conj: bool)
    where
        TA: Copy + 'static,
        T: LinalgScalar + From<TA>;

    /// `op(a[k])`.
    fn read<TA, T>(a: &[TA], k: usize, conj: bool) -> T
    where
        TA: Copy + 'static,
        T: LinalgScalar + From<TA>;
}

/// Bounds-checked loops, no vectorization hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Debug;

/// Bounds checks elided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InBounds;

/// Bounds checks elided, contiguous runs dispatched to SIMD kernels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Vectorize;

// ── Shared loop bodies ──────────────────────────────────────────────
//
// `CHECKED` and `CONJ` are const parameters so the branch on them folds away
// in every instantiation.

#[inline(always)]
fn fetch<TA, T, const CHECKED: bool, const CONJ: bool>(a: &[TA], k: usize) -> T
where
    TA: Copy + 'static,
    T: LinalgScalar + From<TA>,
{
    let raw = if CHECKED {
        a[k]
    } else {
        debug_assert!(k < a.len());
        // SAFETY: callers of `LoopPolicy` guarantee `k < a.len()`.
        unsafe { *a.get_unchecked(k) }
    };
    let v = T::from(raw);
    if CONJ {
        v.conj()
    } else {
        v
    }
}

#[inline(always)]
fn dot_strided<TA, T, const CHECKED: bool, const CONJ: bool>(
    a: &[TA],
    start: usize,
    stride: usize,
    x: &[T],
) -> T
where
    TA: Copy + 'static,
    T: LinalgScalar + From<TA>,
{
    let mut acc = T::zero();
    let mut k = start;
    for &xi in x {
        acc = acc + fetch::<TA, T, CHECKED, CONJ>(a, k) * xi;
        k += stride;
    }
    acc
}

#[inline(always)]
fn axpy_neg_strided<TA, T, const CHECKED: bool, const CONJ: bool>(
    y: &mut [T],
    alpha: T,
    a: &[TA],
    start: usize,
    stride: usize,
) where
    TA: Copy + 'static,
    T: LinalgScalar + From<TA>,
{
    let mut k = start;
    for yi in y.iter_mut() {
        *yi = *yi - alpha * fetch::<TA, T, CHECKED, CONJ>(a, k);
        k += stride;
    }
}

/// Conjugation only matters for complex element types.
#[inline(always)]
fn needs_conj<T: LinalgScalar>(conj: bool) -> bool {
    conj && !T::IS_REAL
}

macro_rules! impl_scalar_policy {
    ($ty:ty, $name:literal, $checked:literal) => {
        impl LoopPolicy for $ty {
            const NAME: &'static str = $name;

            #[inline]
            fn dot<TA, T>(a: &[TA], start: usize, stride: usize, conj: bool, x: &[T]) -> T
            where
                TA: Copy + 'static,
                T: LinalgScalar + From<TA>,
            {
                if needs_conj::<T>(conj) {
                    dot_strided::<TA, T, $checked, true>(a, start, stride, x)
                } else {
                    dot_strided::<TA, T, $checked, false>(a, start, stride, x)
                }
            }

            #[inline]
            fn axpy_neg<TA, T>(
                y: &mut [T],
                alpha: T,
                a: &[TA],
                start: usize,
                stride: usize,
                conj: bool,
            ) where
                TA: Copy + 'static,
                T: LinalgScalar + From<TA>,
            {
                if needs_conj::<T>(conj) {
                    axpy_neg_strided::<TA, T, $checked, true>(y, alpha, a, start, stride)
                } else {
                    axpy_neg_strided::<TA, T, $checked, false>(y, alpha, a, start, stride)
                }
            }

            #[inline]
            fn read<TA, T>(a: &[TA], k: usize, conj: bool) -> T
            where
                TA: Copy + 'static,
                T: LinalgScalar + From<TA>,
            {
                if needs_conj::<T>(conj) {
                    fetch::<TA, T, $checked, true>(a, k)
                } else {
                    fetch::<TA, T, $checked, false>(a, k)
                }
            }
        }
    };
}

impl_scalar_policy!(Debug, "Debug", true);
impl_scalar_policy!(InBounds, "InBounds", false);

/// Reinterpret the contiguous run `a[start..start + len]` as `&[T]` when the
/// storage and accumulator types coincide.
#[inline(always)]
fn contiguous_run<TA: 'static, T: 'static>(a: &[TA], start: usize, len: usize) -> Option<&[T]> {
    if TypeId::of::<TA>() != TypeId::of::<T>() {
        return None;
    }
    debug_assert!(start + len <= a.len());
    // SAFETY: `TA` and `T` are the same type, and callers guarantee the run
    // lies inside `a`.
    unsafe {
        let run = a.get_unchecked(start..start + len);
        Some(&*(run as *const [TA] as *const [T]))
    }
}

impl LoopPolicy for Vectorize {
    const NAME: &'static str = "Vectorize";

    #[inline]
    fn dot<TA, T>(a: &[TA], start: usize, stride: usize, conj: bool, x: &[T]) -> T
    where
        TA: Copy + 'static,
        T: LinalgScalar + From<TA>,
    {
        if x.is_empty() {
            return T::zero();
        }
        if needs_conj::<T>(conj) {
            return dot_strided::<TA, T, false, true>(a, start, stride, x);
        }
        if stride == 1 {
            if let Some(row) = contiguous_run::<TA, T>(a, start, x.len()) {
                return simd::dot_dispatch(row, x);
            }
        }
        dot_strided::<TA, T, false, false>(a, start, stride, x)
    }

    #[inline]
    fn axpy_neg<TA, T>(y: &mut [T], alpha: T, a: &[TA], start: usize, stride: usize, conj: bool)
    where
        TA: Copy + 'static,
        T: LinalgScalar + From<TA>,
    {
        if y.is_empty() {
            return;
        }
        if needs_conj::<T>(conj) {
            axpy_neg_strided::<TA, T, false, true>(y, alpha, a, start, stride);
            return;
        }
        if stride == 1 {
            if let Some(col) = contiguous_run::<TA, T>(a, start, y.len()) {
                simd::axpy_neg_dispatch(y, alpha, col);
                return;
            }
        }
        axpy_neg_strided::<TA, T, false, false>(y, alpha, a, start, stride);
    }

    #[inline]
    fn read<TA, T>(a: &[TA], k: usize, conj: bool) -> T
    where
        TA: Copy + 'static,
        T: LinalgScalar + From<TA>,
    {
        InBounds::read(a, k, conj)
    }
}
