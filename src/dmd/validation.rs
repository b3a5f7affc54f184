//! dmd::validation — argument checks shared by the estimator, the
//! eigen-extractor, and the batch oracle.
//!
//! Purpose
//! -------
//! Centralize the scalar, vector, and batch checks that turn malformed
//! inputs into [`DMDError`] values before any linear algebra runs. Every
//! helper is pure and either returns the validated value or the first
//! violation found.
//!
//! Conventions
//! -----------
//! - Batches are `n × q` with one snapshot per column; non-finite entries
//!   are reported as `(row, column)`.
//! - Scans are row-major and stop at the first offending entry.
//! - Nothing here logs or panics.
use crate::dmd::errors::{DMDError, DMDResult};
use ndarray::{ArrayView1, ArrayView2};

/// Validate the state dimension `n ≥ 1`.
pub fn validate_dimension(n: usize) -> DMDResult<usize> {
    if n == 0 {
        return Err(DMDError::InvalidDimension { n });
    }
    Ok(n)
}

/// Validate a weighting (forgetting) factor.
///
/// Parameters
/// ----------
/// - `weighting`: `f64`
///   Candidate `ρ`. Must be finite with `0 < ρ ≤ 1`.
///
/// Returns
/// -------
/// `DMDResult<f64>`
///   - `Ok(weighting)` when admissible.
///   - `Err(DMDError::InvalidWeighting)` with a reason otherwise.
///
/// Examples
/// --------
/// ```rust
/// # use online_dmd::dmd::validation::validate_weighting;
/// use online_dmd::dmd::errors::DMDError;
///
/// assert!(validate_weighting(0.95).is_ok());
/// assert!(matches!(validate_weighting(0.0), Err(DMDError::InvalidWeighting { .. })));
/// ```
pub fn validate_weighting(weighting: f64) -> DMDResult<f64> {
    if !weighting.is_finite() {
        return Err(DMDError::InvalidWeighting {
            value: weighting,
            reason: "Weighting factor must be finite.",
        });
    }
    if weighting <= 0.0 {
        return Err(DMDError::InvalidWeighting {
            value: weighting,
            reason: "Weighting factor must be strictly positive.",
        });
    }
    if weighting > 1.0 {
        return Err(DMDError::InvalidWeighting {
            value: weighting,
            reason: "Weighting factor cannot exceed 1.",
        });
    }
    Ok(weighting)
}

/// Validate a ridge term (finite, > 0).
pub fn validate_ridge(ridge: f64) -> DMDResult<f64> {
    if !ridge.is_finite() || ridge <= 0.0 {
        return Err(DMDError::InvalidRidge { value: ridge });
    }
    Ok(ridge)
}

/// Validate a prior covariance scale (finite, > 0).
pub fn validate_prior_scale(alpha: f64) -> DMDResult<f64> {
    if !alpha.is_finite() || alpha <= 0.0 {
        return Err(DMDError::InvalidPriorScale { value: alpha });
    }
    Ok(alpha)
}

/// Validate a sampling interval (finite, > 0).
pub fn validate_time_step(dt: f64) -> DMDResult<f64> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(DMDError::InvalidTimeStep { dt });
    }
    Ok(dt)
}

/// Validate one snapshot vector against the state dimension.
///
/// Parameters
/// ----------
/// - `v`: `ArrayView1<f64>`
///   Candidate snapshot; must have length `n` and finite entries.
/// - `n`: `usize`
///   State dimension.
/// - `what`: `&'static str`
///   Name used in error messages (`"x"`, `"y"`, …).
///
/// Errors
/// ------
/// - `DMDError::DimensionMismatch` if `v.len() != n`.
/// - `DMDError::NonFiniteInput` for the first NaN/±inf entry, reported with
///   `column = 0`.
pub fn validate_vector(v: ArrayView1<f64>, n: usize, what: &'static str) -> DMDResult<()> {
    if v.len() != n {
        return Err(DMDError::DimensionMismatch { what, expected: n, found: v.len() });
    }
    if let Some((row, &value)) = v.iter().enumerate().find(|(_, x)| !x.is_finite()) {
        return Err(DMDError::NonFiniteInput { what, row, column: 0, value });
    }
    Ok(())
}

/// Check that every entry of a matrix is finite.
pub fn validate_finite_matrix(m: ArrayView2<f64>, what: &'static str) -> DMDResult<()> {
    for ((row, column), &value) in m.indexed_iter() {
        if !value.is_finite() {
            return Err(DMDError::NonFiniteInput { what, row, column, value });
        }
    }
    Ok(())
}

/// Validate a snapshot batch `(X, Y)` and return its number of columns.
///
/// Parameters
/// ----------
/// - `x`, `y`: `ArrayView2<f64>`
///   `n × q` matrices, one snapshot per column.
/// - `n`: `usize`
///   State dimension both matrices must have as row count.
///
/// Returns
/// -------
/// `DMDResult<usize>`
///   `Ok(q)` with `q ≥ 1` on success.
///
/// Errors
/// ------
/// - `DimensionMismatch` if either row count differs from `n`.
/// - `BatchLengthMismatch` if `x.ncols() != y.ncols()`.
/// - `EmptyBatch` if `q == 0`.
/// - `NonFiniteInput` for the first NaN/±inf entry in `X`, then `Y`.
pub fn validate_batch(x: ArrayView2<f64>, y: ArrayView2<f64>, n: usize) -> DMDResult<usize> {
    if x.nrows() != n {
        return Err(DMDError::DimensionMismatch { what: "X rows", expected: n, found: x.nrows() });
    }
    if y.nrows() != n {
        return Err(DMDError::DimensionMismatch { what: "Y rows", expected: n, found: y.nrows() });
    }
    if x.ncols() != y.ncols() {
        return Err(DMDError::BatchLengthMismatch { x_cols: x.ncols(), y_cols: y.ncols() });
    }
    if x.ncols() == 0 {
        return Err(DMDError::EmptyBatch);
    }
    validate_finite_matrix(x, "X")?;
    validate_finite_matrix(y, "Y")?;
    Ok(x.ncols())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Scalar guards for ρ, ridge, prior scale, and dt.
    // - Vector and batch shape/finiteness checks and the reported positions.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Confirm the closed upper bound and open lower bound of ρ.
    //
    // Given
    // -----
    // - ρ = 1.0, ρ = 1e-12, ρ = 0.0, ρ = 1.0 + 1e-12.
    //
    // Expect
    // ------
    // - The first two pass, the last two fail.
    fn validate_weighting_respects_interval_bounds() {
        assert_eq!(validate_weighting(1.0).unwrap(), 1.0);
        assert!(validate_weighting(1e-12).is_ok());
        assert!(validate_weighting(0.0).is_err());
        assert!(validate_weighting(1.0 + 1e-12).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Check the positive-and-finite scalar guards.
    //
    // Expect
    // ------
    // - Zero, negative, and infinite values fail for ridge, prior, and dt.
    fn positive_scalar_guards_reject_bad_values() {
        for bad in [0.0, -1.0, f64::INFINITY] {
            assert!(matches!(validate_ridge(bad), Err(DMDError::InvalidRidge { .. })));
            assert!(matches!(validate_prior_scale(bad), Err(DMDError::InvalidPriorScale { .. })));
            assert!(matches!(validate_time_step(bad), Err(DMDError::InvalidTimeStep { .. })));
        }
        assert_eq!(validate_time_step(0.1).unwrap(), 0.1);
        assert!(validate_dimension(0).is_err());
        assert_eq!(validate_dimension(4).unwrap(), 4);
    }

    #[test]
    // Purpose
    // -------
    // Verify vector checks report length first, then the first bad entry.
    //
    // Given
    // -----
    // - A length-2 vector against n = 3, and [1, NaN, inf] against n = 3.
    //
    // Expect
    // ------
    // - `DimensionMismatch { expected: 3, found: 2 }`.
    // - `NonFiniteInput` at row 1.
    fn validate_vector_reports_length_then_first_non_finite() {
        let short = array![1.0, 2.0];
        assert_eq!(
            validate_vector(short.view(), 3, "x").unwrap_err(),
            DMDError::DimensionMismatch { what: "x", expected: 3, found: 2 }
        );

        let bad = array![1.0, f64::NAN, f64::INFINITY];
        match validate_vector(bad.view(), 3, "y").unwrap_err() {
            DMDError::NonFiniteInput { what, row, .. } => {
                assert_eq!(what, "y");
                assert_eq!(row, 1);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Exercise every batch failure path and the success value.
    //
    // Given
    // -----
    // - Well-formed 2×3 batches, then row/column/emptiness/finiteness faults.
    //
    // Expect
    // ------
    // - `Ok(3)` for the well-formed batch and the matching error otherwise.
    fn validate_batch_covers_shape_and_finiteness() {
        let x = array![[1.0, 0.0, 1.0], [0.0, 1.0, 1.0]];
        let y = array![[0.0, 1.0, 1.0], [1.0, 0.0, 2.0]];
        assert_eq!(validate_batch(x.view(), y.view(), 2).unwrap(), 3);

        assert!(matches!(
            validate_batch(x.view(), y.view(), 3),
            Err(DMDError::DimensionMismatch { what: "X rows", .. })
        ));

        let y_short = array![[0.0, 1.0], [1.0, 0.0]];
        assert_eq!(
            validate_batch(x.view(), y_short.view(), 2).unwrap_err(),
            DMDError::BatchLengthMismatch { x_cols: 3, y_cols: 2 }
        );

        let empty = Array2::<f64>::zeros((2, 0));
        assert_eq!(
            validate_batch(empty.view(), empty.view(), 2).unwrap_err(),
            DMDError::EmptyBatch
        );

        let mut y_nan = y.clone();
        y_nan[[1, 2]] = f64::NAN;
        match validate_batch(x.view(), y_nan.view(), 2).unwrap_err() {
            DMDError::NonFiniteInput { what, row, column, .. } => {
                assert_eq!((what, row, column), ("Y", 1, 2));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
