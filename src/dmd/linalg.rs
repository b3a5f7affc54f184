//! dmd::linalg — dense linear-algebra helpers bridging `ndarray` and `nalgebra`.
//!
//! Purpose
//! -------
//! Keep the public DMD surface on `ndarray` while delegating decompositions
//! (symmetric eigen, SVD) to `nalgebra`. This module owns the copies between
//! the two representations and the handful of derived quantities the
//! estimator and the oracle need: pseudo-inverses, condition numbers, and
//! exponential column weighting.
//!
//! Key behaviors
//! -------------
//! - Copy `ArrayView2<f64>` into `DMatrix<f64>` and back.
//! - Invert symmetric positive semi-definite matrices through
//!   `symmetric_eigen` with relative eigenvalue truncation, reporting the
//!   retained rank and the condition number.
//! - Form Moore–Penrose pseudo-inverses of rectangular matrices via SVD.
//! - Apply the `√ρ^{q-1-i}` column weights used by weighted least squares.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite; callers validate before getting here.
//! - Eigenvalues at or below `EIGEN_EPS · n · λ_max` count as zero.
//! - No explicit `try_inverse` is used; all inverses go through an
//!   eigen- or singular-value decomposition with truncation.
use crate::dmd::errors::{DMDError, DMDResult};
use nalgebra::DMatrix;
use ndarray::{Array2, ArrayView2};

/// Relative eigenvalue / singular-value floor, scaled by dimension and the
/// largest magnitude before use.
pub const EIGEN_EPS: f64 = f64::EPSILON;

/// Condition numbers above this are flagged as ill-conditioned.
pub const ILL_CONDITIONED_THRESHOLD: f64 = 1e12;

/// Result of inverting a symmetric positive semi-definite matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricInverse {
    /// (Pseudo-)inverse, exactly symmetric.
    pub inverse: Array2<f64>,
    /// Number of eigenvalues above the truncation floor.
    pub rank: usize,
    /// `λ_max / λ_min`; infinite when any eigenvalue was truncated.
    pub condition: f64,
}

/// Copy an `ndarray` matrix into a preallocated `DMatrix` of the same shape.
///
/// The copy walks columns to match `DMatrix`'s column-major storage.
///
/// # Panics
/// - If `dst` does not have the shape of `src`.
pub fn fill_dmatrix(src: ArrayView2<f64>, dst: &mut DMatrix<f64>) {
    let (nrows, ncols) = src.dim();
    for j in 0..ncols {
        for i in 0..nrows {
            dst[(i, j)] = src[[i, j]];
        }
    }
}

/// Owned `DMatrix` copy of an `ndarray` matrix.
pub fn to_dmatrix(src: ArrayView2<f64>) -> DMatrix<f64> {
    let mut dst = DMatrix::<f64>::zeros(src.nrows(), src.ncols());
    fill_dmatrix(src, &mut dst);
    dst
}

/// Owned `ndarray` copy of a `DMatrix`.
pub fn to_array2(src: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((src.nrows(), src.ncols()), |(i, j)| src[(i, j)])
}

/// Replace `m` with `(m + mᵀ) / 2`.
pub fn symmetrize_in_place(m: &mut Array2<f64>) {
    let n = m.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            let avg = 0.5 * (m[[i, j]] + m[[j, i]]);
            m[[i, j]] = avg;
            m[[j, i]] = avg;
        }
    }
}

/// symmetric_pseudo_inverse — eigen-truncated inverse of a symmetric PSD matrix.
///
/// Purpose
/// -------
/// Invert the (weighted) snapshot covariance `C = X̂X̂ᵀ` without forming an
/// explicit inverse. With `C = QΛQᵀ`, returns `Q Λ⁺ Qᵀ` where eigenvalues
/// at or below the truncation floor are dropped.
///
/// Parameters
/// ----------
/// - `m`: `ArrayView2<f64>`
///   Square symmetric matrix, finite entries. Only the symmetric part is
///   meaningful; asymmetry is not repaired.
///
/// Returns
/// -------
/// [`SymmetricInverse`]
///   The inverse (exact for full rank, Moore–Penrose otherwise), the
///   retained rank, and the condition number `λ_max / λ_min`, which is
///   `f64::INFINITY` whenever `rank < n`.
///
/// Notes
/// -----
/// - The floor is `EIGEN_EPS · n · max|λ|`; eigenvalues below it, including
///   small negative round-off, are treated as zero.
/// - The returned inverse is symmetrized so downstream rank-1 updates start
///   from an exactly symmetric matrix.
pub fn symmetric_pseudo_inverse(m: ArrayView2<f64>) -> SymmetricInverse {
    let n = m.nrows();
    let eigen = to_dmatrix(m).symmetric_eigen();
    let q = eigen.eigenvectors;
    let eigenvals = eigen.eigenvalues;

    let lambda_max = eigenvals.iter().fold(0.0_f64, |acc, &l| acc.max(l.abs()));
    let floor = EIGEN_EPS * (n as f64) * lambda_max;

    let mut inverse = Array2::<f64>::zeros((n, n));
    let mut rank = 0;
    let mut lambda_min = f64::INFINITY;
    for (k, &lambda) in eigenvals.iter().enumerate() {
        if lambda <= floor || lambda <= 0.0 {
            continue;
        }
        rank += 1;
        lambda_min = lambda_min.min(lambda);
        let inv_lambda = 1.0 / lambda;
        for i in 0..n {
            let coeff = q[(i, k)] * inv_lambda;
            for j in 0..n {
                inverse[[i, j]] += coeff * q[(j, k)];
            }
        }
    }
    symmetrize_in_place(&mut inverse);

    let condition = if rank == n { lambda_max / lambda_min } else { f64::INFINITY };
    SymmetricInverse { inverse, rank, condition }
}

/// 2-norm condition number of a symmetric matrix, `max|λ| / min|λ|`.
///
/// Returns `f64::INFINITY` for singular input and for the empty matrix.
pub fn symmetric_condition(m: ArrayView2<f64>) -> f64 {
    if m.is_empty() {
        return f64::INFINITY;
    }
    let eigenvals = to_dmatrix(m).symmetric_eigenvalues();
    let (lo, hi) = eigenvals
        .iter()
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), &l| (lo.min(l.abs()), hi.max(l.abs())));
    if lo == 0.0 { f64::INFINITY } else { hi / lo }
}

/// pseudo_inverse — Moore–Penrose pseudo-inverse of a rectangular matrix.
///
/// Parameters
/// ----------
/// - `m`: `ArrayView2<f64>`
///   `r × c` matrix with finite entries.
///
/// Returns
/// -------
/// `DMDResult<Array2<f64>>`
///   The `c × r` pseudo-inverse computed from a full SVD, with singular
///   values at or below `EIGEN_EPS · max(r, c) · σ_max` truncated.
///
/// Errors
/// ------
/// - `DMDError::PseudoInverseFailed` if the SVD backend rejects the
///   truncation threshold.
pub fn pseudo_inverse(m: ArrayView2<f64>) -> DMDResult<Array2<f64>> {
    let (r, c) = m.dim();
    if r == 0 || c == 0 {
        return Ok(Array2::zeros((c, r)));
    }
    let svd = to_dmatrix(m).svd(true, true);
    let sigma_max = svd.singular_values.iter().fold(0.0_f64, |acc, &s| acc.max(s));
    let eps = EIGEN_EPS * (r.max(c) as f64) * sigma_max;
    let pinv = svd.pseudo_inverse(eps).map_err(|reason| DMDError::PseudoInverseFailed { reason })?;
    Ok(to_array2(&pinv))
}

/// Scale column `i` of an `n × q` batch by `√ρ^{q-1-i}`.
///
/// The newest column (last) keeps weight 1, so the squared weights
/// reproduce the `ρ^{k-i}` discount of the incremental recursion.
pub fn weighted_columns(x: ArrayView2<f64>, weighting: f64) -> Array2<f64> {
    let mut out = x.to_owned();
    if weighting >= 1.0 {
        return out;
    }
    let q = x.ncols();
    let root = weighting.sqrt();
    for (i, mut col) in out.columns_mut().into_iter().enumerate() {
        let w = root.powi((q - 1 - i) as i32);
        col.mapv_inplace(|v| v * w);
    }
    out
}
