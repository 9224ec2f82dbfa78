use super::*;
use crate::dense::{DenseMatrix, DenseVector};
use crate::policy::{Debug, InBounds, Vectorize};
use crate::traits::MatrixRef;
use alloc::format;
use alloc::vec;
use alloc::vec::Vec;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOL: f64 = 1e-10;

fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
    assert!(
        (a - b).abs() <= tol * (1.0 + b.abs()),
        "{}: {} vs {} (diff {})",
        msg,
        a,
        b,
        (a - b).abs()
    );
}

fn assert_slice_near(a: &[f64], b: &[f64], tol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length", msg);
    for (i, (&x, &y)) in a.iter().zip(b).enumerate() {
        assert_near(x, y, tol, &format!("{msg} [{i}]"));
    }
}

/// Run `$body` once per algorithm selector, with `$alg` bound to it.
macro_rules! for_each_algorithm {
    (|$alg:ident| $body:block) => {{
        { let $alg = Debug; $body }
        { let $alg = InBounds; $body }
        { let $alg = Vectorize; $body }
        { let $alg = RowWise(Debug); $body }
        { let $alg = RowWise(InBounds); $body }
        { let $alg = RowWise(Vectorize); $body }
        { let $alg = ColumnWise(Debug); $body }
        { let $alg = ColumnWise(InBounds); $body }
        { let $alg = ColumnWise(Vectorize); $body }
    }};
}

/// Random well-conditioned `n x n` matrix with both triangles filled.
/// The diagonal has modulus in `[2, 3)`, the rest is in `[-1, 1)`.
fn random_matrix(rng: &mut StdRng, n: usize, row_major: bool) -> DenseMatrix<f64> {
    let mut vals = vec![0.0; n * n];
    for (k, v) in vals.iter_mut().enumerate() {
        let (i, j) = (k / n, k % n);
        *v = if i == j {
            let d: f64 = rng.gen_range(2.0..3.0);
            if rng.gen_bool(0.5) {
                d
            } else {
                -d
            }
        } else {
            rng.gen_range(-1.0..1.0) / (n as f64).sqrt()
        };
    }
    if row_major {
        DenseMatrix::from_rows(n, n, &vals)
    } else {
        DenseMatrix::from_fn(n, n, |i, j| vals[i * n + j])
    }
}

fn random_vector(rng: &mut StdRng, n: usize) -> Vec<f64> {
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Dense `A·b` through the masked element reader.
fn reference_mul(a: &TriMatrix<'_, f64>, b: &[f64]) -> Vec<f64> {
    (0..a.nrows())
        .map(|i| (0..a.ncols()).map(|j| a.read(i, j) * b[j]).sum())
        .collect()
}

fn shapes() -> [(Uplo, Diag); 4] {
    [
        (Uplo::Lower, Diag::NonUnit),
        (Uplo::Lower, Diag::Unit),
        (Uplo::Upper, Diag::NonUnit),
        (Uplo::Upper, Diag::Unit),
    ]
}

const SIZES: [usize; 7] = [0, 1, 2, 3, 7, 16, 33];

// ═══════════════════════════════════════════════════════════════════
// Worked example
// ═══════════════════════════════════════════════════════════════════

const EXAMPLE: [f64; 9] = [2.0, 0.0, 0.0, 1.0, 3.0, 0.0, 2.0, 1.0, 4.0];

#[test]
fn example_lower_3x3() {
    for a in [
        DenseMatrix::from_rows(3, 3, &EXAMPLE),
        DenseMatrix::from_rows_fn(3, 3, |i, j| EXAMPLE[3 * i + j]),
        DenseMatrix::from_fn(3, 3, |i, j| EXAMPLE[3 * i + j]),
    ] {
        let l = TriMatrix::lower(&a);
        for_each_algorithm!(|alg| {
            let y = lmul_with(alg, l, &[1.0, 1.0, 1.0]).unwrap();
            assert_eq!(y, vec![2.0, 4.0, 7.0], "{:?}", alg);
            let x = ldiv_with(alg, l, &y).unwrap();
            assert_slice_near(&x, &[1.0, 1.0, 1.0], TOL, &format!("{alg:?}"));
        });
    }
}

#[test]
fn output_length() {
    let a = DenseMatrix::zeros(4, 4, 0.0_f64);
    assert_eq!(lmul_output(&TriMatrix::lower(&a)), 4);
    assert_eq!(ldiv_output(&TriMatrix::upper(&a).transpose()), 4);
}

// ═══════════════════════════════════════════════════════════════════
// Properties over random matrices
// ═══════════════════════════════════════════════════════════════════

#[test]
fn multiply_matches_dense_reference() {
    let mut rng = StdRng::seed_from_u64(7);
    for &n in &SIZES {
        for row_major in [false, true] {
            let a = random_matrix(&mut rng, n, row_major);
            let b = random_vector(&mut rng, n);
            for (uplo, diag) in shapes() {
                let t = TriMatrix::new(&a, uplo, diag);
                let expected = reference_mul(&t, &b);
                for_each_algorithm!(|alg| {
                    let y = lmul_with(alg, t, &b).unwrap();
                    let msg = format!("n={n} row_major={row_major} {uplo:?}/{diag:?} {alg:?}");
                    assert_slice_near(&y, &expected, TOL, &msg);
                });
            }
        }
    }
}

#[test]
fn solve_inverts_multiply() {
    let mut rng = StdRng::seed_from_u64(11);
    for &n in &SIZES {
        for row_major in [false, true] {
            let a = random_matrix(&mut rng, n, row_major);
            let b = random_vector(&mut rng, n);
            for (uplo, diag) in shapes() {
                let t = TriMatrix::new(&a, uplo, diag);
                for_each_algorithm!(|alg| {
                    let y = lmul_with(alg, t, &b).unwrap();
                    let x = ldiv_with(alg, t, &y).unwrap();
                    let msg = format!("n={n} row_major={row_major} {uplo:?}/{diag:?} {alg:?}");
                    assert_slice_near(&x, &b, 1e-9, &msg);
                });
            }
        }
    }
}

#[test]
fn default_entry_points_match_vectorize() {
    let mut rng = StdRng::seed_from_u64(3);
    let a = random_matrix(&mut rng, 12, false);
    let b = random_vector(&mut rng, 12);
    let l = TriMatrix::lower(&a);
    assert_eq!(lmul(l, &b).unwrap(), lmul_with(Vectorize, l, &b).unwrap());
    assert_eq!(ldiv(l, &b).unwrap(), ldiv_with(Vectorize, l, &b).unwrap());
}

#[test]
fn out_of_place_leaves_input_untouched() {
    let mut rng = StdRng::seed_from_u64(5);
    let a = random_matrix(&mut rng, 9, true);
    let a_before = a.clone();
    let b = random_vector(&mut rng, 9);
    let b_before = b.clone();
    let u = TriMatrix::upper(&a);
    for_each_algorithm!(|alg| {
        let _ = lmul_with(alg, u, &b).unwrap();
        let _ = ldiv_with(alg, u, &b).unwrap();
        let mut dst = vec![0.0; 9];
        lmul_into(alg, &mut dst, u, &b).unwrap();
        ldiv_into(alg, &mut dst, u, &b).unwrap();
    });
    assert_eq!(b, b_before);
    assert_eq!(a, a_before);
}

#[test]
fn in_place_matches_separate_destination() {
    let mut rng = StdRng::seed_from_u64(13);
    for row_major in [false, true] {
        let a = random_matrix(&mut rng, 10, row_major);
        let b = random_vector(&mut rng, 10);
        for (uplo, diag) in shapes() {
            let t = TriMatrix::new(&a, uplo, diag);
            for_each_algorithm!(|alg| {
                let mut dst = vec![f64::NAN; 10];
                lmul_into(alg, &mut dst, t, &b).unwrap();
                let mut x = b.clone();
                let ret = lmul_in_place(alg, t, &mut x).unwrap();
                assert_eq!(ret, &dst[..], "lmul {uplo:?}/{diag:?} {alg:?}");
                assert_eq!(x, dst);

                ldiv_into(alg, &mut dst, t, &b).unwrap();
                let mut x = b.clone();
                ldiv_in_place(alg, t, &mut x).unwrap();
                assert_eq!(x, dst, "ldiv {uplo:?}/{diag:?} {alg:?}");
            });
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Views
// ═══════════════════════════════════════════════════════════════════

#[test]
fn transpose_view_matches_materialized_transpose() {
    let mut rng = StdRng::seed_from_u64(17);
    for row_major in [false, true] {
        let a = random_matrix(&mut rng, 8, row_major);
        let at = DenseMatrix::from_fn(8, 8, |i, j| a[(j, i)]);
        let b = random_vector(&mut rng, 8);
        for (uplo, diag) in shapes() {
            let view = TriMatrix::new(&a, uplo, diag).transpose();
            let explicit = TriMatrix::new(&at, uplo.flip(), diag);
            assert_eq!(view.uplo(), explicit.uplo());
            for_each_algorithm!(|alg| {
                let msg = format!("{uplo:?}/{diag:?} {alg:?}");
                let y = lmul_with(alg, view, &b).unwrap();
                let y_ref = lmul_with(alg, explicit, &b).unwrap();
                assert_slice_near(&y, &y_ref, TOL, &msg);
                let x = ldiv_with(alg, view, &b).unwrap();
                let x_ref = ldiv_with(alg, explicit, &b).unwrap();
                assert_slice_near(&x, &x_ref, TOL, &msg);
            });
        }
    }
}

#[test]
fn adjoint_of_real_matrix_is_transpose() {
    let mut rng = StdRng::seed_from_u64(19);
    let a = random_matrix(&mut rng, 6, false);
    let b = random_vector(&mut rng, 6);
    let l = TriMatrix::lower(&a);
    for_each_algorithm!(|alg| {
        assert_eq!(
            lmul_with(alg, l.adjoint(), &b).unwrap(),
            lmul_with(alg, l.transpose(), &b).unwrap()
        );
    });
}

#[test]
fn auto_selection_follows_storage_order() {
    let c = DenseMatrix::zeros(3, 3, 0.0_f64);
    let r = DenseMatrix::from_rows(3, 3, &[0.0_f64; 9]);
    assert_eq!(Traversal::preferred(&TriMatrix::lower(&c)), Traversal::ColumnWise);
    assert_eq!(Traversal::preferred(&TriMatrix::lower(&r)), Traversal::RowWise);
    assert_eq!(
        Traversal::preferred(&TriMatrix::lower(&c).transpose()),
        Traversal::RowWise
    );
    assert_eq!(Vectorize.traversal(), None);
    assert_eq!(RowWise(Debug).traversal(), Some(Traversal::RowWise));
    assert_eq!(ColumnWise::<InBounds>::default().traversal(), Some(Traversal::ColumnWise));
}

#[test]
fn strided_window() {
    // 3x3 lower matrix stored with leading dimension 5; the padding is
    // never addressed.
    let mut data = vec![f64::NAN; 15];
    for j in 0..3 {
        for i in 0..3 {
            data[i + 5 * j] = EXAMPLE[3 * i + j];
        }
    }
    let a = DenseMatrix::from_parts(data, 3, 3, 1, 5);
    let l = TriMatrix::lower(&a);
    for_each_algorithm!(|alg| {
        assert_eq!(lmul_with(alg, l, &[1.0, 1.0, 1.0]).unwrap(), vec![2.0, 4.0, 7.0]);
    });
}

// ═══════════════════════════════════════════════════════════════════
// Diagonal handling
// ═══════════════════════════════════════════════════════════════════

#[test]
fn unit_diagonal_is_never_read() {
    let mut rng = StdRng::seed_from_u64(23);
    let a = random_matrix(&mut rng, 7, false);
    let mut poisoned = a.clone();
    for i in 0..7 {
        poisoned[(i, i)] = f64::NAN;
    }
    let b = random_vector(&mut rng, 7);
    for uplo in [Uplo::Lower, Uplo::Upper] {
        let clean = TriMatrix::new(&a, uplo, Diag::Unit);
        let dirty = TriMatrix::new(&poisoned, uplo, Diag::Unit);
        for_each_algorithm!(|alg| {
            let y = lmul_with(alg, dirty, &b).unwrap();
            assert!(y.iter().all(|v| v.is_finite()), "{uplo:?} {alg:?}");
            assert_eq!(y, lmul_with(alg, clean, &b).unwrap());
            let x = ldiv_with(alg, dirty, &b).unwrap();
            assert_eq!(x, ldiv_with(alg, clean, &b).unwrap());
        });
    }
}

#[test]
fn other_triangle_is_never_read() {
    let a = DenseMatrix::from_rows(
        3,
        3,
        &[2.0_f64, f64::NAN, f64::NAN, 1.0, 3.0, f64::NAN, 2.0, 1.0, 4.0],
    );
    let l = TriMatrix::lower(&a);
    for_each_algorithm!(|alg| {
        assert_eq!(lmul_with(alg, l, &[1.0, 1.0, 1.0]).unwrap(), vec![2.0, 4.0, 7.0]);
        assert_eq!(ldiv_with(alg, l, &[2.0, 4.0, 7.0]).unwrap(), vec![1.0, 1.0, 1.0]);
    });
}

#[test]
fn zero_diagonal_solve_is_not_an_error() {
    let a = DenseMatrix::from_rows(2, 2, &[0.0_f64, 0.0, 1.0, 1.0]);
    let x = ldiv(TriMatrix::lower(&a), &[1.0_f64, 1.0]).unwrap();
    assert!(x[0].is_infinite());
}

// The column-wise kernel skips a column whose scale factor is exactly zero.
// With finite data that is invisible; with a non-finite entry in the
// skipped column the two traversals disagree, since the row-wise kernel
// does form `inf * 0 = NaN`.
#[test]
fn zero_skip_with_non_finite_column() {
    let a = DenseMatrix::from_fn(2, 2, |i, j| match (i, j) {
        (0, 0) => 1.0,
        (1, 0) => f64::INFINITY,
        (1, 1) => 1.0,
        _ => 0.0,
    });
    let l = TriMatrix::lower(&a);
    let b = [0.0_f64, 1.0];

    let col = lmul_with(ColumnWise(Debug), l, &b).unwrap();
    assert_eq!(col, vec![0.0, 1.0]);

    let row = lmul_with(RowWise(Debug), l, &b).unwrap();
    assert_eq!(row[0], 0.0);
    assert!(row[1].is_nan());

    let col = ldiv_with(ColumnWise(Debug), l, &b).unwrap();
    assert_eq!(col, vec![0.0, 1.0]);
    let row = ldiv_with(RowWise(Debug), l, &b).unwrap();
    assert!(row[1].is_nan());
}

// ═══════════════════════════════════════════════════════════════════
// Validation
// ═══════════════════════════════════════════════════════════════════

#[test]
fn non_square_matrix() {
    let a = DenseMatrix::zeros(2, 3, 0.0_f64);
    let l = TriMatrix::lower(&a);
    let err = TriangularError::NonSquareMatrix { nrows: 2, ncols: 3 };
    assert_eq!(lmul(l, &[1.0, 1.0]).unwrap_err(), err);
    assert_eq!(ldiv_with(RowWise(Debug), l, &[1.0, 1.0]).unwrap_err(), err);
    let mut b = [1.0, 1.0];
    assert_eq!(lmul_in_place(Debug, l, &mut b).unwrap_err(), err);
}

#[test]
fn bad_sizes_leave_destination_untouched() {
    let a = DenseMatrix::from_rows(3, 3, &EXAMPLE);
    let l = TriMatrix::lower(&a);

    let mut dst = [9.0; 3];
    assert_eq!(
        lmul_into(Vectorize, &mut dst, l, &[1.0, 1.0]).unwrap_err(),
        TriangularError::BadInputSize { expected: 3, got: 2 }
    );
    assert_eq!(dst, [9.0; 3]);

    let mut short = [9.0; 2];
    assert_eq!(
        ldiv_into(Vectorize, &mut short, l, &[1.0, 1.0, 1.0]).unwrap_err(),
        TriangularError::BadOutputSize { expected: 3, got: 2 }
    );
    assert_eq!(short, [9.0; 2]);

    let mut b = vec![1.0; 4];
    assert_eq!(
        ldiv_in_place(InBounds, l, &mut b).unwrap_err(),
        TriangularError::BadInputSize { expected: 3, got: 4 }
    );
    assert_eq!(b, vec![1.0; 4]);
}

#[test]
fn offset_operands_are_rejected() {
    let a = DenseMatrix::from_rows(3, 3, &EXAMPLE);
    let shifted = a.clone().with_origin(1, 1);
    assert_eq!(
        lmul(TriMatrix::lower(&shifted), &[1.0, 1.0, 1.0]).unwrap_err(),
        TriangularError::OffsetIndexing
    );

    let b = DenseVector::from_slice(&[1.0, 1.0, 1.0]).with_origin(1);
    assert_eq!(
        ldiv(TriMatrix::lower(&a), &b).unwrap_err(),
        TriangularError::OffsetIndexing
    );

    let mut dst = DenseVector::zeros(3, 0.0).with_origin(-1);
    assert_eq!(
        lmul_into(Debug, &mut dst, TriMatrix::lower(&a), &[1.0, 1.0, 1.0]).unwrap_err(),
        TriangularError::OffsetIndexing
    );
    assert_eq!(dst.into_vec(), vec![0.0; 3]);
}

#[test]
fn error_display() {
    let e = TriangularError::NonSquareMatrix { nrows: 2, ncols: 3 };
    assert_eq!(format!("{e}"), "triangular matrix must be square, got 2x3");
    let e = TriangularError::BadOutputSize { expected: 3, got: 4 };
    assert_eq!(format!("{e}"), "output vector has length 4, expected 3");
}

/// A host matrix type that misreports its strides.
struct Lying {
    data: [f64; 4],
    strides: (usize, usize),
}

impl MatrixRef<f64> for Lying {
    fn nrows(&self) -> usize {
        2
    }
    fn ncols(&self) -> usize {
        2
    }
    fn get(&self, row: usize, col: usize) -> &f64 {
        &self.data[row + 2 * col]
    }
    fn row_stride(&self) -> usize {
        self.strides.0
    }
    fn col_stride(&self) -> usize {
        self.strides.1
    }
    fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

#[test]
#[should_panic(expected = "overruns")]
fn strides_past_the_buffer_panic() {
    let m = Lying {
        data: [1.0; 4],
        strides: (1, 4),
    };
    let _ = lmul_with(InBounds, TriMatrix::lower(&m), &[1.0, 1.0]);
}

// usize::MAX + 1 wraps to a zero step, which would pass a wrapping check.
#[test]
#[should_panic(expected = "overruns")]
fn wrapping_strides_panic() {
    let m = Lying {
        data: [1.0; 4],
        strides: (usize::MAX, 1),
    };
    let _ = lmul_with(RowWise(InBounds), TriMatrix::lower(&m), &[1.0_f64, 1.0]);
}

// ═══════════════════════════════════════════════════════════════════
// Element types
// ═══════════════════════════════════════════════════════════════════

#[test]
fn mixed_precision_promotes() {
    let a32 = DenseMatrix::from_rows(3, 3, &EXAMPLE.map(|v| v as f32));
    let l = TriMatrix::lower(&a32);
    let b = [1.0_f64 / 3.0; 3];
    for_each_algorithm!(|alg| {
        let y: Vec<f64> = lmul_with(alg, l, &b).unwrap();
        assert_slice_near(&y, &[2.0 / 3.0, 4.0 / 3.0, 7.0 / 3.0], 1e-14, &format!("{alg:?}"));
    });

    // f32 data solved into an f64 buffer
    let mut dst = [0.0_f64; 3];
    ldiv_into(Vectorize, &mut dst, l, &[2.0_f32, 4.0, 7.0]).unwrap();
    assert_eq!(dst, [1.0, 1.0, 1.0]);
}

#[test]
fn single_precision() {
    let a = DenseMatrix::from_fn(20, 20, |i, j| {
        if i == j {
            4.0_f32
        } else {
            ((i * 7 + j * 3) % 5) as f32 * 0.1
        }
    });
    let b: Vec<f32> = (0..20).map(|i| i as f32 * 0.25).collect();
    let u = TriMatrix::upper(&a);
    for_each_algorithm!(|alg| {
        let y = lmul_with(alg, u, &b).unwrap();
        let x = ldiv_with(alg, u, &y).unwrap();
        for (xi, bi) in x.iter().zip(&b) {
            assert!((xi - bi).abs() < 1e-3 * (1.0 + bi.abs()), "{alg:?}: {xi} vs {bi}");
        }
    });
}
