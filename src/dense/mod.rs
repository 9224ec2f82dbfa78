mod vector;

pub use vector::DenseVector;

use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::traits::{MatrixRef, Scalar};

/// Heap-allocated dense matrix with explicit strides.
///
/// Element `(i, j)` is stored at `data[i * row_stride + j * col_stride]`.
/// Column-major constructors (`from_slice`, `from_vec`, `from_fn`) produce
/// `row_stride = 1`; row-major ones (`from_rows`, `from_rows_fn`) produce
/// `col_stride = 1`. Any other layout can be described with [`from_parts`].
///
/// [`from_parts`]: DenseMatrix::from_parts
///
/// # Examples
///
/// ```
/// use trilinalg::DenseMatrix;
///
/// let a = DenseMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
/// assert_eq!(a[(0, 1)], 2.0);
/// assert_eq!(a.row_stride(), 2);
/// assert_eq!(a.col_stride(), 1);
///
/// let b = DenseMatrix::from_slice(2, 2, &[1.0_f64, 3.0, 2.0, 4.0]);
/// assert_eq!(b[(0, 1)], 2.0);
/// assert_eq!(b.row_stride(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
    row_stride: usize,
    col_stride: usize,
    origin: (isize, isize),
}

// ── Constructors ────────────────────────────────────────────────────

impl<T: Scalar> DenseMatrix<T> {
    /// Create an `nrows x ncols` column-major matrix of zeros.
    ///
    /// The `_zero` parameter is only used for type inference.
    pub fn zeros(nrows: usize, ncols: usize, _zero: T) -> Self {
        Self::from_vec(nrows, ncols, vec![T::zero(); nrows * ncols])
    }

    /// Create a column-major matrix from a flat slice.
    ///
    /// Panics if `slice.len() != nrows * ncols`.
    ///
    /// ```
    /// use trilinalg::DenseMatrix;
    /// // Column-major: col0=[1,3], col1=[2,4]
    /// let m = DenseMatrix::from_slice(2, 2, &[1.0, 3.0, 2.0, 4.0]);
    /// assert_eq!(m[(1, 0)], 3.0);
    /// assert_eq!(m[(0, 1)], 2.0);
    /// ```
    pub fn from_slice(nrows: usize, ncols: usize, slice: &[T]) -> Self {
        Self::from_vec(nrows, ncols, slice.to_vec())
    }

    /// Create a row-major matrix from a flat slice, keeping its layout.
    ///
    /// Panics if `row_major.len() != nrows * ncols`.
    ///
    /// ```
    /// use trilinalg::DenseMatrix;
    /// let m = DenseMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// assert_eq!(m[(0, 2)], 3.0);
    /// assert_eq!(m[(1, 0)], 4.0);
    /// ```
    pub fn from_rows(nrows: usize, ncols: usize, row_major: &[T]) -> Self {
        assert_eq!(
            row_major.len(),
            nrows * ncols,
            "slice length {} does not match {}x{} matrix",
            row_major.len(),
            nrows,
            ncols,
        );
        Self::from_parts(row_major.to_vec(), nrows, ncols, ncols, 1)
    }
}

impl<T> DenseMatrix<T> {
    /// Create a column-major matrix from an owned `Vec<T>`.
    ///
    /// Panics if `data.len() != nrows * ncols`.
    pub fn from_vec(nrows: usize, ncols: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            nrows * ncols,
            "vec length {} does not match {}x{} matrix",
            data.len(),
            nrows,
            ncols,
        );
        Self::from_parts(data, nrows, ncols, 1, nrows)
    }

    /// Wrap a buffer with arbitrary strides.
    ///
    /// Panics if the last addressed element `(nrows - 1, ncols - 1)` falls
    /// outside `data`. The kernels' unchecked loop policies rely on this.
    ///
    /// ```
    /// use trilinalg::DenseMatrix;
    /// // 2x2 window into a column-major 3x2 buffer (leading dimension 3)
    /// let m = DenseMatrix::from_parts(vec![1.0, 2.0, 0.0, 3.0, 4.0, 0.0], 2, 2, 1, 3);
    /// assert_eq!(m[(1, 1)], 4.0);
    /// ```
    pub fn from_parts(
        data: Vec<T>,
        nrows: usize,
        ncols: usize,
        row_stride: usize,
        col_stride: usize,
    ) -> Self {
        if nrows > 0 && ncols > 0 {
            let last = (nrows - 1)
                .checked_mul(row_stride)
                .and_then(|r| (ncols - 1).checked_mul(col_stride)?.checked_add(r));
            assert!(
                last.is_some_and(|last| last < data.len()),
                "strides ({row_stride}, {col_stride}) address element {last:?} of a {}-element buffer",
                data.len(),
            );
        }
        Self {
            data,
            nrows,
            ncols,
            row_stride,
            col_stride,
            origin: (0, 0),
        }
    }

    /// Create a column-major matrix by calling `f(row, col)` for each element.
    ///
    /// ```
    /// use trilinalg::DenseMatrix;
    /// let m = DenseMatrix::from_fn(3, 3, |i, j| if i == j { 1.0_f64 } else { 0.0 });
    /// assert_eq!(m[(0, 0)], 1.0);
    /// assert_eq!(m[(0, 1)], 0.0);
    /// ```
    pub fn from_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for j in 0..ncols {
            for i in 0..nrows {
                data.push(f(i, j));
            }
        }
        Self::from_parts(data, nrows, ncols, 1, nrows)
    }

    /// Create a row-major matrix by calling `f(row, col)` for each element.
    pub fn from_rows_fn(nrows: usize, ncols: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(f(i, j));
            }
        }
        Self::from_parts(data, nrows, ncols, ncols, 1)
    }

    /// Re-base the matrix so its first element is addressed as `origin`.
    ///
    /// Offset-indexed operands are representable so they can be rejected:
    /// the kernels only accept zero-based matrices.
    pub fn with_origin(mut self, row: isize, col: isize) -> Self {
        self.origin = (row, col);
        self
    }
}

impl<T> DenseMatrix<T> {
    /// Number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Whether the matrix is square.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Distance between vertically adjacent elements.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Distance between horizontally adjacent elements.
    #[inline]
    pub fn col_stride(&self) -> usize {
        self.col_stride
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.nrows && col < self.ncols);
        row * self.row_stride + col * self.col_stride
    }
}

// ── MatrixRef ───────────────────────────────────────────────────────

impl<T> MatrixRef<T> for DenseMatrix<T> {
    #[inline]
    fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        &self.data[self.offset(row, col)]
    }

    #[inline]
    fn row_stride(&self) -> usize {
        self.row_stride
    }

    #[inline]
    fn col_stride(&self) -> usize {
        self.col_stride
    }

    #[inline]
    fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn origin(&self) -> (isize, isize) {
        self.origin
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<(usize, usize)> for DenseMatrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[self.offset(row, col)]
    }
}

impl<T> IndexMut<(usize, usize)> for DenseMatrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        let k = self.offset(row, col);
        &mut self.data[k]
    }
}
