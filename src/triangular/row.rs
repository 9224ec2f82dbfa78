//! Row-wise kernels: one output element per step, each a dot product over the
//! row's triangular extent.
//!
//! Every kernel works in place on `x`, which holds `b` on entry. The sweep
//! direction is chosen so that row `i` only reads entries of `x` that still
//! hold the value it needs: original `b` entries for multiplication, already
//! solved entries for division.

use super::Strided;
use crate::policy::LoopPolicy;
use crate::traits::LinalgScalar;

/// `x ← L·x`, rows descending.
pub(crate) fn lmul_lower<P, TA, T, const UNIT: bool>(a: Strided<'_, TA>, x: &mut [T])
where
    P: LoopPolicy,
    TA: Copy + 'static,
    T: LinalgScalar + From<TA>,
{
    for i in (0..x.len()).rev() {
        let (head, tail) = x.split_at_mut(i);
        let s = P::dot(a.data, a.at(i, 0), a.cs, a.conj, head);
        let xi = if UNIT {
            tail[0]
        } else {
            P::read::<TA, T>(a.data, a.at(i, i), a.conj) * tail[0]
        };
        tail[0] = xi + s;
    }
}

/// `x ← U·x`, rows ascending.
pub(crate) fn lmul_upper<P, TA, T, const UNIT: bool>(a: Strided<'_, TA>, x: &mut [T])
where
    P: LoopPolicy,
    TA: Copy + 'static,
    T: LinalgScalar + From<TA>,
{
    for i in 0..x.len() {
        let (head, tail) = x.split_at_mut(i + 1);
        let s = P::dot(a.data, a.at(i, i + 1), a.cs, a.conj, tail);
        let xi = if UNIT {
            head[i]
        } else {
            P::read::<TA, T>(a.data, a.at(i, i), a.conj) * head[i]
        };
        head[i] = xi + s;
    }
}

/// Forward substitution `x ← L⁻¹·x`, rows ascending.
pub(crate) fn ldiv_lower<P, TA, T, const UNIT: bool>(a: Strided<'_, TA>, x: &mut [T])
where
    P: LoopPolicy,
    TA: Copy + 'static,
    T: LinalgScalar + From<TA>,
{
    for i in 0..x.len() {
        let (head, tail) = x.split_at_mut(i);
        let r = tail[0] - P::dot(a.data, a.at(i, 0), a.cs, a.conj, head);
        tail[0] = if UNIT {
            r
        } else {
            r / P::read::<TA, T>(a.data, a.at(i, i), a.conj)
        };
    }
}

/// Back substitution `x ← U⁻¹·x`, rows descending.
pub(crate) fn ldiv_upper<P, TA, T, const UNIT: bool>(a: Strided<'_, TA>, x: &mut [T])
where
    P: LoopPolicy,
    TA: Copy + 'static,
    T: LinalgScalar + From<TA>,
{
    for i in (0..x.len()).rev() {
        let (head, tail) = x.split_at_mut(i + 1);
        let r = head[i] - P::dot(a.data, a.at(i, i + 1), a.cs, a.conj, tail);
        head[i] = if UNIT {
            r
        } else {
            r / P::read::<TA, T>(a.data, a.at(i, i), a.conj)
        };
    }
}
