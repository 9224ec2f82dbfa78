use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::traits::{Scalar, VectorMut, VectorRef};

/// Dynamically-sized dense vector.
///
/// Contiguous `Vec<T>` storage with an index origin, so offset-indexed
/// operands can be represented (and rejected by the kernels).
///
/// ```
/// use trilinalg::DenseVector;
///
/// let v = DenseVector::from_slice(&[1.0_f64, 2.0, 3.0]);
/// assert_eq!(v[0], 1.0);
/// assert_eq!(v.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseVector<T> {
    data: Vec<T>,
    origin: isize,
}

impl<T: Scalar> DenseVector<T> {
    /// Create a vector from a flat slice.
    pub fn from_slice(data: &[T]) -> Self {
        Self::from_vec(data.to_vec())
    }

    /// Create a zero vector of length `n`.
    ///
    /// The `_zero` parameter is only used for type inference.
    pub fn zeros(n: usize, _zero: T) -> Self {
        Self::from_vec(alloc::vec![T::zero(); n])
    }
}

impl<T> DenseVector<T> {
    /// Create a vector from an owned `Vec`.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self { data, origin: 0 }
    }

    /// Re-base the vector so its first element is addressed as `origin`.
    pub fn with_origin(mut self, origin: isize) -> Self {
        self.origin = origin;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Unwrap into the backing `Vec`.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T> VectorRef<T> for DenseVector<T> {
    #[inline]
    fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn origin(&self) -> isize {
        self.origin
    }
}

impl<T> VectorMut<T> for DenseVector<T> {
    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T> From<Vec<T>> for DenseVector<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<T> Index<usize> for DenseVector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexMut<usize> for DenseVector<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}
