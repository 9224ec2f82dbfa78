//! Zero-copy matrix views: transpose, adjoint, conjugate, and the triangular
//! tag.
//!
//! A [`MatView`] borrows raw strided storage and carries two flags,
//! `transposed` and `conjugated`. A [`TriMatrix`] wraps exactly one
//! `MatView` with a [`Uplo`] / [`Diag`] tag; it is the normalized form with
//! the triangular tag outermost, so transposing it transposes the inner view
//! and flips `Uplo`.
//!
//! ```
//! use trilinalg::{DenseMatrix, StorageOrder, StripTriangular, TriMatrix, Uplo};
//!
//! let a = DenseMatrix::from_slice(2, 2, &[1.0_f64, 2.0, 0.0, 3.0]);
//! let l = TriMatrix::lower(&a);
//! assert!(l.is_column_major());
//!
//! let u = l.transpose();
//! assert_eq!(u.uplo(), Uplo::Upper);
//! assert_eq!(u.read(0, 1), 2.0);
//! assert!(!u.is_column_major());
//!
//! let raw = u.strip_triangular();
//! assert!(raw.is_transposed());
//! assert_eq!(raw.read(1, 0), 0.0); // the ignored upper half of `a`
//! ```

use crate::traits::{LinalgScalar, MatrixRef};

#[cfg(feature = "alloc")]
use crate::dense::DenseMatrix;

/// Which triangle of the matrix is referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uplo {
    /// Entries with `row >= col`.
    Lower,
    /// Entries with `row <= col`.
    Upper,
}

impl Uplo {
    /// The triangle a transpose maps this one onto.
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Uplo::Lower => Uplo::Upper,
            Uplo::Upper => Uplo::Lower,
        }
    }

    /// Whether `(row, col)` lies in this triangle (diagonal included).
    #[inline]
    pub fn contains(self, row: usize, col: usize) -> bool {
        match self {
            Uplo::Lower => row >= col,
            Uplo::Upper => row <= col,
        }
    }
}

/// Whether the diagonal is stored or implicitly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diag {
    /// Diagonal is implicitly 1 and its storage is never read.
    Unit,
    /// Diagonal is read from storage.
    NonUnit,
}

/// Borrowed view of strided storage, possibly transposed and/or conjugated.
#[derive(Debug)]
pub struct MatView<'a, T> {
    data: &'a [T],
    nrows: usize,
    ncols: usize,
    row_stride: usize,
    col_stride: usize,
    origin: (isize, isize),
    transposed: bool,
    conjugated: bool,
}

impl<T> Clone for MatView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MatView<'_, T> {}

impl<'a, T> MatView<'a, T> {
    /// Plain (untransposed, unconjugated) view of `m`.
    pub fn new<M: MatrixRef<T> + ?Sized>(m: &'a M) -> Self {
        Self {
            data: m.as_slice(),
            nrows: m.nrows(),
            ncols: m.ncols(),
            row_stride: m.row_stride(),
            col_stride: m.col_stride(),
            origin: m.origin(),
            transposed: false,
            conjugated: false,
        }
    }

    /// Logical number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        if self.transposed {
            self.ncols
        } else {
            self.nrows
        }
    }

    /// Logical number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        if self.transposed {
            self.nrows
        } else {
            self.ncols
        }
    }

    #[inline]
    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    #[inline]
    pub fn is_conjugated(&self) -> bool {
        self.conjugated
    }

    /// Logical index origin.
    #[inline]
    pub fn origin(&self) -> (isize, isize) {
        if self.transposed {
            (self.origin.1, self.origin.0)
        } else {
            self.origin
        }
    }

    /// Effective `(row, col)` strides: logical `(i, j)` lives at
    /// `raw()[i * rs + j * cs]`.
    #[inline]
    pub fn strides(&self) -> (usize, usize) {
        if self.transposed {
            (self.col_stride, self.row_stride)
        } else {
            (self.row_stride, self.col_stride)
        }
    }

    /// Raw backing storage, annotations ignored.
    #[inline]
    pub fn raw(&self) -> &'a [T] {
        self.data
    }

    #[inline]
    pub(crate) fn offset(&self, row: usize, col: usize) -> usize {
        let (rs, cs) = self.strides();
        row * rs + col * cs
    }

    /// Swap the roles of rows and columns. Transposing twice is the identity.
    #[inline]
    pub fn transpose(self) -> Self {
        Self {
            transposed: !self.transposed,
            ..self
        }
    }

    /// Conjugate every element. Conjugating twice is the identity.
    #[inline]
    pub fn conj(self) -> Self {
        Self {
            conjugated: !self.conjugated,
            ..self
        }
    }

    /// Conjugate transpose. `adjoint` then `transpose` leaves the plain
    /// conjugate view.
    #[inline]
    pub fn adjoint(self) -> Self {
        self.transpose().conj()
    }

    /// Tag this view as triangular.
    #[inline]
    pub fn triangular(self, uplo: Uplo, diag: Diag) -> TriMatrix<'a, T> {
        TriMatrix {
            view: self,
            uplo,
            diag,
        }
    }
}

impl<T: LinalgScalar> MatView<'_, T> {
    /// Read logical element `(row, col)`, conjugated if the view is.
    #[inline]
    pub fn read(&self, row: usize, col: usize) -> T {
        assert!(
            row < self.nrows() && col < self.ncols(),
            "index ({row}, {col}) out of bounds for {}x{} view",
            self.nrows(),
            self.ncols(),
        );
        let v = self.data[self.offset(row, col)];
        if self.conjugated {
            v.conj()
        } else {
            v
        }
    }
}

/// Square triangular matrix over a borrowed view.
///
/// Only the `uplo` triangle is ever read; with [`Diag::Unit`] the diagonal is
/// not read either.
#[derive(Debug)]
pub struct TriMatrix<'a, T> {
    view: MatView<'a, T>,
    uplo: Uplo,
    diag: Diag,
}

impl<T> Clone for TriMatrix<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TriMatrix<'_, T> {}

impl<'a, T> TriMatrix<'a, T> {
    /// Tag `m` with an arbitrary triangle and diagonal kind.
    pub fn new<M: MatrixRef<T> + ?Sized>(m: &'a M, uplo: Uplo, diag: Diag) -> Self {
        MatView::new(m).triangular(uplo, diag)
    }

    /// Lower triangle of `m`, diagonal read from storage.
    pub fn lower<M: MatrixRef<T> + ?Sized>(m: &'a M) -> Self {
        Self::new(m, Uplo::Lower, Diag::NonUnit)
    }

    /// Upper triangle of `m`, diagonal read from storage.
    pub fn upper<M: MatrixRef<T> + ?Sized>(m: &'a M) -> Self {
        Self::new(m, Uplo::Upper, Diag::NonUnit)
    }

    /// Strict lower triangle of `m` with an implicit unit diagonal.
    pub fn unit_lower<M: MatrixRef<T> + ?Sized>(m: &'a M) -> Self {
        Self::new(m, Uplo::Lower, Diag::Unit)
    }

    /// Strict upper triangle of `m` with an implicit unit diagonal.
    pub fn unit_upper<M: MatrixRef<T> + ?Sized>(m: &'a M) -> Self {
        Self::new(m, Uplo::Upper, Diag::Unit)
    }

    #[inline]
    pub fn uplo(&self) -> Uplo {
        self.uplo
    }

    #[inline]
    pub fn diag(&self) -> Diag {
        self.diag
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.view.nrows()
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.view.ncols()
    }

    /// Logical index origin of the underlying storage.
    #[inline]
    pub fn origin(&self) -> (isize, isize) {
        self.view.origin()
    }

    /// Transpose: the lower triangle of `A` is the upper triangle of `Aᵀ`.
    #[inline]
    pub fn transpose(self) -> Self {
        Self {
            view: self.view.transpose(),
            uplo: self.uplo.flip(),
            diag: self.diag,
        }
    }

    /// Conjugate transpose.
    #[inline]
    pub fn adjoint(self) -> Self {
        Self {
            view: self.view.adjoint(),
            uplo: self.uplo.flip(),
            diag: self.diag,
        }
    }

    /// Elementwise conjugate; the triangle is unchanged.
    #[inline]
    pub fn conj(self) -> Self {
        Self {
            view: self.view.conj(),
            ..self
        }
    }
}

impl<T: LinalgScalar> TriMatrix<'_, T> {
    /// Read logical element `(row, col)` of the triangular matrix: zero
    /// outside the triangle, one on a unit diagonal.
    pub fn read(&self, row: usize, col: usize) -> T {
        if row == col && self.diag == Diag::Unit {
            T::one()
        } else if self.uplo.contains(row, col) {
            self.view.read(row, col)
        } else {
            T::zero()
        }
    }

    /// Materialize the logical matrix as column-major storage.
    #[cfg(feature = "alloc")]
    pub fn to_dense(&self) -> DenseMatrix<T> {
        DenseMatrix::from_fn(self.nrows(), self.ncols(), |i, j| self.read(i, j))
    }
}

/// Remove one triangular tag, keeping any transpose/adjoint state.
pub trait StripTriangular<'a, T> {
    fn strip_triangular(self) -> MatView<'a, T>;
}

impl<'a, T> StripTriangular<'a, T> for MatView<'a, T> {
    /// No tag to remove.
    #[inline]
    fn strip_triangular(self) -> MatView<'a, T> {
        self
    }
}

impl<'a, T> StripTriangular<'a, T> for TriMatrix<'a, T> {
    #[inline]
    fn strip_triangular(self) -> MatView<'a, T> {
        self.view
    }
}

/// Free-function form of [`StripTriangular::strip_triangular`].
#[inline]
pub fn strip_triangular<'a, T, M: StripTriangular<'a, T>>(m: M) -> MatView<'a, T> {
    m.strip_triangular()
}

/// Storage orientation of a matrix or view.
pub trait StorageOrder {
    /// `true` when consecutive entries of a column are closer in memory than
    /// consecutive entries of a row.
    fn is_column_major(&self) -> bool;
}

#[cfg(feature = "alloc")]
impl<T> StorageOrder for DenseMatrix<T> {
    #[inline]
    fn is_column_major(&self) -> bool {
        self.row_stride() <= self.col_stride()
    }
}

impl<T> StorageOrder for MatView<'_, T> {
    /// Storage orientation, inverted by a transpose or adjoint.
    #[inline]
    fn is_column_major(&self) -> bool {
        (self.row_stride <= self.col_stride) != self.transposed
    }
}

impl<T> StorageOrder for TriMatrix<'_, T> {
    /// The triangular tag does not change physical layout.
    #[inline]
    fn is_column_major(&self) -> bool {
        self.view.is_column_major()
    }
}

/// Free-function form of [`StorageOrder::is_column_major`].
#[inline]
pub fn is_column_major<M: StorageOrder + ?Sized>(m: &M) -> bool {
    m.is_column_major()
}
