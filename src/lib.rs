//! # trilinalg
//!
//! Triangular matrix–vector kernels, no-std compatible: left-multiplication
//! `A·b` and left-division `A⁻¹·b` of a dense vector by a square triangular
//! matrix, read through zero-copy transpose / adjoint views.
//!
//! ## Quick start
//!
//! ```
//! use trilinalg::{ldiv, lmul, DenseMatrix, TriMatrix};
//!
//! // Column-major storage of [[2, 1, 2], [0, 3, 1], [0, 0, 4]]
//! let a = DenseMatrix::from_slice(3, 3, &[
//!     2.0_f64, 0.0, 0.0,
//!     1.0, 3.0, 0.0,
//!     2.0, 1.0, 4.0,
//! ]);
//! let u = TriMatrix::upper(&a);
//! let y = lmul(u, &[1.0_f64, 1.0, 1.0]).unwrap();
//! assert_eq!(y, vec![5.0, 4.0, 4.0]);
//!
//! // The transpose is lower triangular and costs nothing to form.
//! let x = ldiv(u.transpose(), &[2.0_f64, 4.0, 7.0]).unwrap();
//! assert_eq!(x, vec![1.0, 1.0, 1.0]);
//! ```
//!
//! ## Modules
//!
//! - [`view`]: [`MatView`] (borrowed strided storage plus `transposed` /
//!   `conjugated` flags) and [`TriMatrix`] (a view tagged with [`Uplo`] and
//!   [`Diag`]). [`strip_triangular`] removes the tag, [`is_column_major`]
//!   reports storage orientation through any transpose.
//!
//! - [`triangular`]: the operations: [`lmul`], [`ldiv`] and their `_with`,
//!   `_into` and `_in_place` forms, the [`TriangularError`] taxonomy, and the
//!   [`RowWise`] / [`ColumnWise`] traversal selectors.
//!
//! - [`policy`]: loop policies [`Debug`] (bounds-checked), [`InBounds`]
//!   (bounds elided) and [`Vectorize`] (bounds elided, SIMD on contiguous
//!   `f32` / `f64` runs). Policies are types, so each one compiles to its own
//!   loops.
//!
//! - [`dense`]: heap-allocated [`DenseMatrix`] with arbitrary strides and
//!   [`DenseVector`] (requires `alloc`).
//!
//! - [`traits`]: element trait hierarchy:
//!   - [`Scalar`]: all elements (`Copy + PartialEq + Debug + Zero + One + Num`)
//!   - [`LinalgScalar`]: real floats and complex numbers (`conj`, `modulus`)
//!   - [`Promote`]: element type of `A·b` for mixed operands
//!   - [`MatrixRef`] / [`VectorRef`] / [`VectorMut`]: storage access
//!
//! ## Complex matrices
//!
//! Enable the `complex` feature to use `Complex<f32>` / `Complex<f64>`.
//! Adjoint views conjugate at read time; real element types skip the
//! conjugation entirely.
//!
//! ## Cargo features
//!
//! | Feature     | Default  | Description |
//! |-------------|----------|-------------|
//! | `std`       | yes      | Implies `alloc`. Hardware FPU via system libm, `std::error::Error` |
//! | `alloc`     | via std  | `DenseMatrix` / `DenseVector`, out-of-place `lmul` / `ldiv` |
//! | `libm`      | baseline | Pure-Rust software float fallback |
//! | `complex`   | no       | `Complex<f32>` / `Complex<f64>` support via `num-complex` |
//! | `perf-warn` | no       | One-shot `log` warnings when a pinned traversal fights the storage order |
//! | `all`       | no       | All features: `std` + `complex` + `perf-warn` |

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

/// Evaluates to `true` the first time it runs for a given `$name`, `false`
/// afterwards.
#[cfg(feature = "perf-warn")]
#[macro_export]
#[doc(hidden)]
macro_rules! __perf_warn {
    ($name: ident) => {{
        #[inline(always)]
        #[allow(non_snake_case)]
        fn $name() -> &'static ::core::sync::atomic::AtomicBool {
            static $name: ::core::sync::atomic::AtomicBool =
                ::core::sync::atomic::AtomicBool::new(false);
            &$name
        }
        !$name().swap(true, ::core::sync::atomic::Ordering::Relaxed)
    }};
}

#[cfg(feature = "alloc")]
pub mod dense;
pub mod policy;
mod simd;
pub mod traits;
pub mod triangular;
pub mod view;

#[cfg(feature = "alloc")]
pub use dense::{DenseMatrix, DenseVector};
pub use policy::{Debug, InBounds, LoopPolicy, Vectorize};
pub use traits::{
    FloatScalar, LinalgScalar, MatrixRef, Promote, Scalar, VectorMut, VectorRef,
};
#[cfg(feature = "alloc")]
pub use triangular::{ldiv, ldiv_with, lmul, lmul_with};
pub use triangular::{
    check_square_and_conformant, ldiv_in_place, ldiv_into, ldiv_output, lmul_in_place,
    lmul_into, lmul_output, Algorithm, ColumnWise, RowWise, Traversal, TriangularError,
};
pub use view::{
    is_column_major, strip_triangular, Diag, MatView, StorageOrder, StripTriangular, TriMatrix,
    Uplo,
};

#[cfg(feature = "complex")]
pub use num_complex::Complex;
