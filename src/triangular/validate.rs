use super::TriangularError;
use crate::traits::VectorRef;
use crate::view::TriMatrix;

/// Check that `a` is square and zero-based, and that `b` (and `dst`, when
/// given) are zero-based with length `a.nrows()`.
///
/// Returns the dimension `n`. Runs before any arithmetic, so a failing call
/// never writes to `dst`.
pub fn check_square_and_conformant<TA, TB, TD, B, D>(
    a: &TriMatrix<'_, TA>,
    b: &B,
    dst: Option<&D>,
) -> Result<usize, TriangularError>
where
    B: VectorRef<TB> + ?Sized,
    D: VectorRef<TD> + ?Sized,
{
    let (nrows, ncols) = (a.nrows(), a.ncols());
    if nrows != ncols {
        return Err(TriangularError::NonSquareMatrix { nrows, ncols });
    }
    let n = nrows;

    let zero_based = a.origin() == (0, 0)
        && b.origin() == 0
        && dst.map_or(true, |d| d.origin() == 0);
    if !zero_based {
        return Err(TriangularError::OffsetIndexing);
    }

    if b.len() != n {
        return Err(TriangularError::BadInputSize {
            expected: n,
            got: b.len(),
        });
    }
    if let Some(d) = dst {
        if d.len() != n {
            return Err(TriangularError::BadOutputSize {
                expected: n,
                got: d.len(),
            });
        }
    }
    Ok(n)
}
