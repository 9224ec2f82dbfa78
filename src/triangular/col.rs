//! Column-wise kernels: rank-1 (AXPY) updates, one column per step.
//!
//! Each kernel mutates `x` directly, using already finalized entries as the
//! scale factor for the column being swept. A column whose scale factor is
//! exactly zero is skipped.

use super::Strided;
use crate::policy::LoopPolicy;
use crate::traits::LinalgScalar;

/// `x ← L·x`, columns descending.
pub(crate) fn lmul_lower<P, TA, T, const UNIT: bool>(a: Strided<'_, TA>, x: &mut [T])
where
    P: LoopPolicy,
    TA: Copy + 'static,
    T: LinalgScalar + From<TA>,
{
    for j in (0..x.len()).rev() {
        let (head, tail) = x.split_at_mut(j + 1);
        let xj = head[j];
        if xj.is_zero() {
            continue;
        }
        if !UNIT {
            head[j] = P::read::<TA, T>(a.data, a.at(j, j), a.conj) * xj;
        }
        P::axpy_neg(tail, T::zero() - xj, a.data, a.at(j + 1, j), a.rs, a.conj);
    }
}

/// `x ← U·x`, columns ascending.
pub(crate) fn lmul_upper<P, TA, T, const UNIT: bool>(a: Strided<'_, TA>, x: &mut [T])
where
    P: LoopPolicy,
    TA: Copy + 'static,
    T: LinalgScalar + From<TA>,
{
    for j in 0..x.len() {
        let (head, tail) = x.split_at_mut(j);
        let xj = tail[0];
        if xj.is_zero() {
            continue;
        }
        P::axpy_neg(head, T::zero() - xj, a.data, a.at(0, j), a.rs, a.conj);
        if !UNIT {
            tail[0] = P::read::<TA, T>(a.data, a.at(j, j), a.conj) * xj;
        }
    }
}

/// Forward substitution `x ← L⁻¹·x`, columns ascending.
pub(crate) fn ldiv_lower<P, TA, T, const UNIT: bool>(a: Strided<'_, TA>, x: &mut [T])
where
    P: LoopPolicy,
    TA: Copy + 'static,
    T: LinalgScalar + From<TA>,
{
    for j in 0..x.len() {
        let (head, tail) = x.split_at_mut(j + 1);
        if !UNIT {
            head[j] = head[j] / P::read::<TA, T>(a.data, a.at(j, j), a.conj);
        }
        let xj = head[j];
        if xj.is_zero() {
            continue;
        }
        P::axpy_neg(tail, xj, a.data, a.at(j + 1, j), a.rs, a.conj);
    }
}

/// Back substitution `x ← U⁻¹·x`, columns descending.
pub(crate) fn ldiv_upper<P, TA, T, const UNIT: bool>(a: Strided<'_, TA>, x: &mut [T])
where
    P: LoopPolicy,
    TA: Copy + 'static,
    T: LinalgScalar + From<TA>,
{
    for j in (0..x.len()).rev() {
        let (head, tail) = x.split_at_mut(j);
        if !UNIT {
            tail[0] = tail[0] / P::read::<TA, T>(a.data, a.at(j, j), a.conj);
        }
        let xj = tail[0];
        if xj.is_zero() {
            continue;
        }
        P::axpy_neg(head, xj, a.data, a.at(0, j), a.rs, a.conj);
    }
}
