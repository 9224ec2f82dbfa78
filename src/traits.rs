use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

#[cfg(feature = "complex")]
use num_complex::Complex;

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for real floating-point elements.
pub trait FloatScalar: Scalar + Float + LinalgScalar<Real = Self> {}

impl<T: Scalar + Float + LinalgScalar<Real = T>> FloatScalar for T {}

/// Trait for elements the triangular kernels accept.
///
/// Covers real floats (`f32`, `f64`) and, with the `complex` feature,
/// `Complex<f32>` / `Complex<f64>`.
pub trait LinalgScalar: Scalar + 'static {
    /// The real component type (`Self` for reals, `T` for `Complex<T>`).
    type Real: FloatScalar;

    /// `true` when `conj` is the identity, letting adjoint views share the
    /// plain (and SIMD) code paths.
    const IS_REAL: bool;

    /// Absolute value / modulus: `|z|` for complex, `.abs()` for real.
    fn modulus(self) -> Self::Real;

    /// Complex conjugate (identity for reals).
    fn conj(self) -> Self;
}

macro_rules! impl_linalg_scalar_real {
    ($($t:ty),*) => {
        $(
            impl LinalgScalar for $t {
                type Real = $t;
                const IS_REAL: bool = true;

                #[inline] fn modulus(self) -> $t { Float::abs(self) }
                #[inline] fn conj(self) -> $t { self }
            }
        )*
    };
}

impl_linalg_scalar_real!(f32, f64);

#[cfg(feature = "complex")]
impl<T: FloatScalar> LinalgScalar for Complex<T> {
    type Real = T;
    const IS_REAL: bool = false;

    #[inline]
    fn modulus(self) -> T {
        self.norm()
    }

    #[inline]
    fn conj(self) -> Self {
        Complex::conj(&self)
    }
}

/// Arithmetic promotion of two element types.
///
/// `Output` is the narrowest type both operands convert into losslessly,
/// e.g. `f32 · f64 → f64`, `f64 · Complex<f64> → Complex<f64>`. Out-of-place
/// `lmul` / `ldiv` allocate their result in this type.
pub trait Promote<Rhs>: Sized {
    type Output: LinalgScalar + From<Self> + From<Rhs>;
}

macro_rules! impl_promote {
    ($($lhs:ty, $rhs:ty => $out:ty;)*) => {
        $(
            impl Promote<$rhs> for $lhs {
                type Output = $out;
            }
        )*
    };
}

impl_promote! {
    f32, f32 => f32;
    f32, f64 => f64;
    f64, f32 => f64;
    f64, f64 => f64;
}

#[cfg(feature = "complex")]
impl_promote! {
    Complex<f32>, Complex<f32> => Complex<f32>;
    Complex<f64>, Complex<f64> => Complex<f64>;
    f32, Complex<f32> => Complex<f32>;
    Complex<f32>, f32 => Complex<f32>;
    f64, Complex<f64> => Complex<f64>;
    Complex<f64>, f64 => Complex<f64>;
}

/// Read-only access to strided dense storage.
///
/// This is the contract the kernels consume from a host matrix type: its
/// shape, its strides, and the raw element buffer. Element `(i, j)` lives at
/// `as_slice()[i * row_stride() + j * col_stride()]`.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;

    /// Distance in elements between `(i, j)` and `(i + 1, j)`.
    fn row_stride(&self) -> usize;

    /// Distance in elements between `(i, j)` and `(i, j + 1)`.
    fn col_stride(&self) -> usize;

    /// Raw backing storage.
    fn as_slice(&self) -> &[T];

    /// First (row, col) index. Zero for every conventional matrix.
    #[inline]
    fn origin(&self) -> (isize, isize) {
        (0, 0)
    }
}

/// Read-only access to a dense vector operand.
pub trait VectorRef<T> {
    fn as_slice(&self) -> &[T];

    /// First index. Zero for every conventional vector.
    #[inline]
    fn origin(&self) -> isize {
        0
    }

    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mutable access to a dense vector operand.
pub trait VectorMut<T>: VectorRef<T> {
    fn as_mut_slice(&mut self) -> &mut [T];
}

impl<T> VectorRef<T> for [T] {
    #[inline]
    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T> VectorMut<T> for [T] {
    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

impl<T, const N: usize> VectorRef<T> for [T; N] {
    #[inline]
    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<T, const N: usize> VectorMut<T> for [T; N] {
    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

#[cfg(feature = "alloc")]
impl<T> VectorRef<T> for alloc::vec::Vec<T> {
    #[inline]
    fn as_slice(&self) -> &[T] {
        self
    }
}

#[cfg(feature = "alloc")]
impl<T> VectorMut<T> for alloc::vec::Vec<T> {
    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}
