//! Triangular matrix–vector multiply (`A·b`) and solve (`A⁻¹·b`).
//!
//! Every operation comes in four forms:
//!
//! | Form | Allocates | Writes |
//! |---|---|---|
//! | [`lmul`] / [`ldiv`] | result `Vec` | nothing else |
//! | [`lmul_with`] / [`ldiv_with`] | result `Vec` | nothing else |
//! | [`lmul_into`] / [`ldiv_into`] | no | `dst` |
//! | [`lmul_in_place`] / [`ldiv_in_place`] | no | `b` |
//!
//! The `alg` argument is either a bare [`LoopPolicy`] (`Debug`, `InBounds`,
//! `Vectorize`), which lets the storage order pick the traversal, or a
//! [`RowWise`] / [`ColumnWise`] wrapper that pins it. Both traversals are
//! correct for any storage; row-wise favours row-major storage and
//! column-wise favours column-major storage.
//!
//! All operands are validated before any arithmetic, so a failing call never
//! writes to its destination.
//!
//! ```
//! use trilinalg::{lmul, ldiv, DenseMatrix, TriMatrix};
//!
//! let a = DenseMatrix::from_rows(3, 3, &[
//!     2.0_f64, 0.0, 0.0,
//!     1.0, 3.0, 0.0,
//!     2.0, 1.0, 4.0,
//! ]);
//! let l = TriMatrix::lower(&a);
//! let y = lmul(l, &[1.0_f64, 1.0, 1.0]).unwrap();
//! assert_eq!(y, vec![2.0, 4.0, 7.0]);
//! let x = ldiv(l, &y).unwrap();
//! assert_eq!(x, vec![1.0, 1.0, 1.0]);
//! ```
//!
//! Pinning a traversal and reusing a buffer:
//!
//! ```
//! use trilinalg::{ldiv_into, ColumnWise, DenseMatrix, InBounds, TriMatrix};
//!
//! let a = DenseMatrix::from_slice(2, 2, &[2.0_f64, 0.0, 1.0, 4.0]); // [[2, 1], [0, 4]]
//! let mut x = [0.0; 2];
//! ldiv_into(ColumnWise(InBounds), &mut x, TriMatrix::upper(&a), &[4.0_f64, 8.0]).unwrap();
//! assert_eq!(x, [1.0, 2.0]);
//! ```

mod col;
mod row;
mod validate;

#[cfg(test)]
mod tests;

pub use validate::check_square_and_conformant;

#[cfg(feature = "alloc")]
use alloc::vec::Vec;
use core::fmt;

use crate::policy::{self, LoopPolicy};
use crate::traits::{LinalgScalar, VectorMut, VectorRef};
use crate::view::{Diag, MatView, StorageOrder, StripTriangular, TriMatrix, Uplo};

#[cfg(feature = "alloc")]
use crate::traits::Promote;

/// Errors from triangular multiply / solve.
///
/// ```
/// use trilinalg::{lmul, DenseMatrix, TriMatrix, TriangularError};
///
/// let a = DenseMatrix::zeros(3, 3, 0.0_f64);
/// let err = lmul(TriMatrix::lower(&a), &[1.0_f64, 2.0]).unwrap_err();
/// assert_eq!(err, TriangularError::BadInputSize { expected: 3, got: 2 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangularError {
    /// The matrix has a different number of rows and columns.
    NonSquareMatrix { nrows: usize, ncols: usize },
    /// `b` does not have one entry per matrix row.
    BadInputSize { expected: usize, got: usize },
    /// `dst` does not have one entry per matrix row.
    BadOutputSize { expected: usize, got: usize },
    /// An operand is not zero-based.
    OffsetIndexing,
}

impl fmt::Display for TriangularError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriangularError::NonSquareMatrix { nrows, ncols } => {
                write!(f, "triangular matrix must be square, got {nrows}x{ncols}")
            }
            TriangularError::BadInputSize { expected, got } => {
                write!(f, "input vector has length {got}, expected {expected}")
            }
            TriangularError::BadOutputSize { expected, got } => {
                write!(f, "output vector has length {got}, expected {expected}")
            }
            TriangularError::OffsetIndexing => {
                write!(f, "operands with a non-zero index origin are not supported")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TriangularError {}

// ── Algorithm selection ─────────────────────────────────────────────

/// Order in which a kernel sweeps the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// One dot product per row. Favours row-major storage.
    RowWise,
    /// One AXPY update per column. Favours column-major storage.
    ColumnWise,
}

impl Traversal {
    /// The traversal that reads `m` contiguously.
    #[inline]
    pub fn preferred<M: StorageOrder + ?Sized>(m: &M) -> Self {
        if m.is_column_major() {
            Traversal::ColumnWise
        } else {
            Traversal::RowWise
        }
    }
}

/// Kernel selector: a loop policy plus an optional pinned traversal.
pub trait Algorithm: Copy {
    type Policy: LoopPolicy;

    /// `None` lets the storage order decide.
    fn traversal(&self) -> Option<Traversal>;
}

/// Row-wise kernel with loop policy `P`, regardless of storage order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RowWise<P = policy::Vectorize>(pub P);

/// Column-wise kernel with loop policy `P`, regardless of storage order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ColumnWise<P = policy::Vectorize>(pub P);

impl<P: LoopPolicy> Algorithm for RowWise<P> {
    type Policy = P;

    #[inline]
    fn traversal(&self) -> Option<Traversal> {
        Some(Traversal::RowWise)
    }
}

impl<P: LoopPolicy> Algorithm for ColumnWise<P> {
    type Policy = P;

    #[inline]
    fn traversal(&self) -> Option<Traversal> {
        Some(Traversal::ColumnWise)
    }
}

macro_rules! impl_auto_algorithm {
    ($($p:ty),*) => {
        $(
            impl Algorithm for $p {
                type Policy = $p;

                #[inline]
                fn traversal(&self) -> Option<Traversal> {
                    None
                }
            }
        )*
    };
}

impl_auto_algorithm!(policy::Debug, policy::InBounds, policy::Vectorize);

// ── Kernel dispatch ─────────────────────────────────────────────────

/// Raw strided access to a matrix with every annotation resolved: logical
/// `(i, j)` lives at `data[i * rs + j * cs]`, conjugated when `conj`.
#[derive(Debug)]
pub(crate) struct Strided<'a, TA> {
    data: &'a [TA],
    rs: usize,
    cs: usize,
    conj: bool,
}

impl<TA> Clone for Strided<'_, TA> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<TA> Copy for Strided<'_, TA> {}

impl<'a, TA> Strided<'a, TA> {
    /// Panics if an `n x n` matrix at these strides does not fit the buffer.
    /// The unchecked loop policies rely on this.
    fn new(view: MatView<'a, TA>, n: usize) -> Self {
        let (rs, cs) = view.strides();
        let data = view.raw();
        if n > 0 {
            let last = rs
                .checked_add(cs)
                .and_then(|step| step.checked_mul(n - 1));
            assert!(
                last.is_some_and(|last| last < data.len()),
                "{n}x{n} matrix with strides ({rs}, {cs}) overruns a {}-element buffer",
                data.len(),
            );
        }
        Self {
            data,
            rs,
            cs,
            conj: view.is_conjugated(),
        }
    }

    #[inline(always)]
    fn at(&self, i: usize, j: usize) -> usize {
        i * self.rs + j * self.cs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Mul,
    Div,
}

#[cfg(feature = "perf-warn")]
fn warn_traversal_mismatch<TA>(pinned: Traversal, a: &TriMatrix<'_, TA>) {
    let preferred = Traversal::preferred(a);
    if pinned != preferred && crate::__perf_warn!(TRAVERSAL_WARN) {
        log::warn!(
            target: "trilinalg_perf",
            "{pinned:?} kernel pinned on storage that favours {preferred:?}; matrix is read with a non-unit stride",
        );
    }
}

/// Resolve the traversal and run the matching kernel in place on `x`.
///
/// `x.len()` has already been checked against `a`.
fn apply<A, TA, T>(alg: A, op: Op, a: &TriMatrix<'_, TA>, x: &mut [T])
where
    A: Algorithm,
    TA: Copy + 'static,
    T: LinalgScalar + From<TA>,
{
    let traversal = match alg.traversal() {
        Some(pinned) => {
            #[cfg(feature = "perf-warn")]
            warn_traversal_mismatch(pinned, a);
            pinned
        }
        None => {
            let auto = Traversal::preferred(a);
            #[cfg(feature = "perf-warn")]
            log::trace!(
                target: "trilinalg_perf",
                "{op:?} n={} {:?}/{:?}: {auto:?} with {}",
                x.len(),
                a.uplo(),
                a.diag(),
                <A::Policy as LoopPolicy>::NAME,
            );
            auto
        }
    };
    run::<A::Policy, TA, T>(op, traversal, a, x);
}

fn run<P, TA, T>(op: Op, traversal: Traversal, a: &TriMatrix<'_, TA>, x: &mut [T])
where
    P: LoopPolicy,
    TA: Copy + 'static,
    T: LinalgScalar + From<TA>,
{
    use Diag::{NonUnit, Unit};
    use Uplo::{Lower, Upper};

    let s = Strided::new(a.strip_triangular(), x.len());
    match (op, traversal, a.uplo(), a.diag()) {
        (Op::Mul, Traversal::RowWise, Lower, Unit) => row::lmul_lower::<P, TA, T, true>(s, x),
        (Op::Mul, Traversal::RowWise, Lower, NonUnit) => row::lmul_lower::<P, TA, T, false>(s, x),
        (Op::Mul, Traversal::RowWise, Upper, Unit) => row::lmul_upper::<P, TA, T, true>(s, x),
        (Op::Mul, Traversal::RowWise, Upper, NonUnit) => row::lmul_upper::<P, TA, T, false>(s, x),
        (Op::Div, Traversal::RowWise, Lower, Unit) => row::ldiv_lower::<P, TA, T, true>(s, x),
        (Op::Div, Traversal::RowWise, Lower, NonUnit) => row::ldiv_lower::<P, TA, T, false>(s, x),
        (Op::Div, Traversal::RowWise, Upper, Unit) => row::ldiv_upper::<P, TA, T, true>(s, x),
        (Op::Div, Traversal::RowWise, Upper, NonUnit) => row::ldiv_upper::<P, TA, T, false>(s, x),
        (Op::Mul, Traversal::ColumnWise, Lower, Unit) => col::lmul_lower::<P, TA, T, true>(s, x),
        (Op::Mul, Traversal::ColumnWise, Lower, NonUnit) => col::lmul_lower::<P, TA, T, false>(s, x),
        (Op::Mul, Traversal::ColumnWise, Upper, Unit) => col::lmul_upper::<P, TA, T, true>(s, x),
        (Op::Mul, Traversal::ColumnWise, Upper, NonUnit) => col::lmul_upper::<P, TA, T, false>(s, x),
        (Op::Div, Traversal::ColumnWise, Lower, Unit) => col::ldiv_lower::<P, TA, T, true>(s, x),
        (Op::Div, Traversal::ColumnWise, Lower, NonUnit) => col::ldiv_lower::<P, TA, T, false>(s, x),
        (Op::Div, Traversal::ColumnWise, Upper, Unit) => col::ldiv_upper::<P, TA, T, true>(s, x),
        (Op::Div, Traversal::ColumnWise, Upper, NonUnit) => col::ldiv_upper::<P, TA, T, false>(s, x),
    }
}

fn into_impl<'d, A, TA, TB, T, B, D>(
    alg: A,
    op: Op,
    dst: &'d mut D,
    a: TriMatrix<'_, TA>,
    b: &B,
) -> Result<&'d mut [T], TriangularError>
where
    A: Algorithm,
    TA: Copy + 'static,
    TB: Copy,
    T: LinalgScalar + From<TA> + From<TB>,
    B: VectorRef<TB> + ?Sized,
    D: VectorMut<T> + ?Sized,
{
    check_square_and_conformant::<TA, TB, T, B, D>(&a, b, Some(&*dst))?;
    let x = dst.as_mut_slice();
    for (xi, &bi) in x.iter_mut().zip(b.as_slice()) {
        *xi = T::from(bi);
    }
    apply(alg, op, &a, x);
    Ok(x)
}

fn in_place_impl<'b, A, TA, T, X>(
    alg: A,
    op: Op,
    a: TriMatrix<'_, TA>,
    b: &'b mut X,
) -> Result<&'b mut [T], TriangularError>
where
    A: Algorithm,
    TA: Copy + 'static,
    T: LinalgScalar + From<TA>,
    X: VectorMut<T> + ?Sized,
{
    check_square_and_conformant::<TA, T, T, X, X>(&a, b, None)?;
    let x = b.as_mut_slice();
    apply(alg, op, &a, x);
    Ok(x)
}

#[cfg(feature = "alloc")]
fn alloc_impl<A, TA, TB, B>(
    alg: A,
    op: Op,
    a: TriMatrix<'_, TA>,
    b: &B,
) -> Result<Vec<<TA as Promote<TB>>::Output>, TriangularError>
where
    A: Algorithm,
    TA: Promote<TB> + Copy + 'static,
    TB: Copy,
    B: VectorRef<TB> + ?Sized,
{
    check_square_and_conformant::<TA, TB, TB, B, B>(&a, b, None)?;
    let mut x: Vec<<TA as Promote<TB>>::Output> = b.as_slice().iter().map(|&v| v.into()).collect();
    apply(alg, op, &a, &mut x);
    Ok(x)
}

// ── Public API ──────────────────────────────────────────────────────

/// Length of the vector [`lmul`] returns for `a`.
#[inline]
pub fn lmul_output<TA>(a: &TriMatrix<'_, TA>) -> usize {
    a.nrows()
}

/// Length of the vector [`ldiv`] returns for `a`.
#[inline]
pub fn ldiv_output<TA>(a: &TriMatrix<'_, TA>) -> usize {
    a.nrows()
}

/// `A·b` in a new vector of the promoted element type, using
/// [`Vectorize`](policy::Vectorize) and the traversal the storage favours.
#[cfg(feature = "alloc")]
pub fn lmul<TA, TB, B>(
    a: TriMatrix<'_, TA>,
    b: &B,
) -> Result<Vec<<TA as Promote<TB>>::Output>, TriangularError>
where
    TA: Promote<TB> + Copy + 'static,
    TB: Copy,
    B: VectorRef<TB> + ?Sized,
{
    alloc_impl(policy::Vectorize, Op::Mul, a, b)
}

/// `A·b` in a new vector, with a caller-chosen policy or pinned traversal.
///
/// ```
/// use trilinalg::{lmul_with, DenseMatrix, Debug, RowWise, TriMatrix};
///
/// let a = DenseMatrix::from_rows(2, 2, &[1.0_f32, 2.0, 0.0, 3.0]);
/// let y = lmul_with(RowWise(Debug), TriMatrix::upper(&a), &[1.0_f64, 1.0]).unwrap();
/// assert_eq!(y, vec![3.0_f64, 3.0]);
/// ```
#[cfg(feature = "alloc")]
pub fn lmul_with<A, TA, TB, B>(
    alg: A,
    a: TriMatrix<'_, TA>,
    b: &B,
) -> Result<Vec<<TA as Promote<TB>>::Output>, TriangularError>
where
    A: Algorithm,
    TA: Promote<TB> + Copy + 'static,
    TB: Copy,
    B: VectorRef<TB> + ?Sized,
{
    alloc_impl(alg, Op::Mul, a, b)
}

/// Overwrite `dst` with `A·b` and return it. `b` is left untouched.
pub fn lmul_into<'d, A, TA, TB, T, B, D>(
    alg: A,
    dst: &'d mut D,
    a: TriMatrix<'_, TA>,
    b: &B,
) -> Result<&'d mut [T], TriangularError>
where
    A: Algorithm,
    TA: Copy + 'static,
    TB: Copy,
    T: LinalgScalar + From<TA> + From<TB>,
    B: VectorRef<TB> + ?Sized,
    D: VectorMut<T> + ?Sized,
{
    into_impl(alg, Op::Mul, dst, a, b)
}

/// Overwrite `b` with `A·b` and return it.
pub fn lmul_in_place<'b, A, TA, T, X>(
    alg: A,
    a: TriMatrix<'_, TA>,
    b: &'b mut X,
) -> Result<&'b mut [T], TriangularError>
where
    A: Algorithm,
    TA: Copy + 'static,
    T: LinalgScalar + From<TA>,
    X: VectorMut<T> + ?Sized,
{
    in_place_impl(alg, Op::Mul, a, b)
}

/// `A⁻¹·b` in a new vector of the promoted element type, using
/// [`Vectorize`](policy::Vectorize) and the traversal the storage favours.
///
/// A zero on a non-unit diagonal is not detected; the result then holds
/// IEEE infinities or NaNs.
#[cfg(feature = "alloc")]
pub fn ldiv<TA, TB, B>(
    a: TriMatrix<'_, TA>,
    b: &B,
) -> Result<Vec<<TA as Promote<TB>>::Output>, TriangularError>
where
    TA: Promote<TB> + Copy + 'static,
    TB: Copy,
    B: VectorRef<TB> + ?Sized,
{
    alloc_impl(policy::Vectorize, Op::Div, a, b)
}

/// `A⁻¹·b` in a new vector, with a caller-chosen policy or pinned traversal.
#[cfg(feature = "alloc")]
pub fn ldiv_with<A, TA, TB, B>(
    alg: A,
    a: TriMatrix<'_, TA>,
    b: &B,
) -> Result<Vec<<TA as Promote<TB>>::Output>, TriangularError>
where
    A: Algorithm,
    TA: Promote<TB> + Copy + 'static,
    TB: Copy,
    B: VectorRef<TB> + ?Sized,
{
    alloc_impl(alg, Op::Div, a, b)
}

/// Overwrite `dst` with `A⁻¹·b` and return it. `b` is left untouched.
pub fn ldiv_into<'d, A, TA, TB, T, B, D>(
    alg: A,
    dst: &'d mut D,
    a: TriMatrix<'_, TA>,
    b: &B,
) -> Result<&'d mut [T], TriangularError>
where
    A: Algorithm,
    TA: Copy + 'static,
    TB: Copy,
    T: LinalgScalar + From<TA> + From<TB>,
    B: VectorRef<TB> + ?Sized,
    D: VectorMut<T> + ?Sized,
{
    into_impl(alg, Op::Div, dst, a, b)
}

/// Overwrite `b` with `A⁻¹·b` and return it.
///
/// ```
/// use trilinalg::{ldiv_in_place, DenseMatrix, TriMatrix, Vectorize};
///
/// let a = DenseMatrix::from_rows(2, 2, &[2.0_f64, 0.0, 1.0, 1.0]);
/// let mut b = vec![2.0_f64, 3.0];
/// ldiv_in_place(Vectorize, TriMatrix::lower(&a), &mut b).unwrap();
/// assert_eq!(b, vec![1.0, 2.0]);
/// ```
pub fn ldiv_in_place<'b, A, TA, T, X>(
    alg: A,
    a: TriMatrix<'_, TA>,
    b: &'b mut X,
) -> Result<&'b mut [T], TriangularError>
where
    A: Algorithm,
    TA: Copy + 'static,
    T: LinalgScalar + From<TA>,
    X: VectorMut<T> + ?Sized,
{
    in_place_impl(alg, Op::Div, a, b)
}
