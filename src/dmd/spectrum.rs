//! dmd::spectrum — continuous-time eigenvalues of a discrete DMD operator.
//!
//! Purpose
//! -------
//! Turn a one-step operator `A` sampled every `dt` into the spectrum of the
//! underlying continuous-time generator, `λ_c = ln(λ_d) / dt`, for
//! diagnostics and reporting.
//!
//! Key behaviors
//! -------------
//! - Compute discrete eigenvalues from a real Schur decomposition
//!   (`nalgebra::Schur`), including complex-conjugate pairs.
//! - Map them through the principal branch of the complex logarithm.
//! - Optionally recover unit-norm eigenvectors from the null space of
//!   `A − λ_d I` (complex SVD, smallest singular values). Repeated
//!   eigenvalues share an orthonormal basis of their eigenspace.
//!
//! Invariants & assumptions
//! ------------------------
//! - `A` is square with finite entries and `dt` is finite and > 0.
//! - Output is sorted by descending imaginary part, ties by descending real
//!   part, so conjugate pairs list the positive frequency first.
//!
//! Conventions
//! -----------
//! - A zero discrete eigenvalue maps to a continuous eigenvalue with real part
//!   `-∞` (principal log of 0); it is returned, not rejected.
//! - Frequencies with `|Im λ_true| · dt > π` alias onto the principal branch.
//!   That is a property of sampling and is left as is.
use crate::dmd::{
    errors::{DMDError, DMDResult},
    linalg::to_dmatrix,
    validation::{validate_finite_matrix, validate_time_step},
};
use nalgebra::{Complex, DMatrix, Schur};
use ndarray::{Array1, ArrayView2};
use std::cmp::Ordering;

/// Upper bound on Schur sweeps before giving up.
pub const SCHUR_MAX_ITER: usize = 10_000;

/// Relative distance under which two eigenvalues count as one repeated value.
pub const EIGEN_CLUSTER_TOL: f64 = 1e-8;

/// Relative singular-value floor for the null space of `A − λI`.
pub const NULL_SPACE_TOL: f64 = 1e-8;

/// One eigenpair of a discrete operator with its continuous-time image.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousMode {
    /// Eigenvalue `λ_d` of the discrete operator.
    pub discrete: Complex<f64>,
    /// `ln(λ_d) / dt` on the principal branch.
    pub continuous: Complex<f64>,
    /// Unit 2-norm eigenvector, phase-normalized so its largest-magnitude
    /// component is real and positive.
    pub vector: Array1<Complex<f64>>,
}

/// Continuous-time eigenvalues `ln(λ_d)/dt` of `a`.
///
/// Parameters
/// ----------
/// - `a`: `ArrayView2<f64>`
///   Square discrete-time operator with finite entries.
/// - `dt`: `f64`
///   Sampling interval, finite and > 0.
///
/// Returns
/// -------
/// `DMDResult<Array1<Complex<f64>>>`
///   One value per eigenvalue (with multiplicity), sorted by descending
///   imaginary part then descending real part.
///
/// Errors
/// ------
/// - `InvalidTimeStep` for a bad `dt`.
/// - `NonSquareOperator` / `NonFiniteInput` for a bad `a`.
/// - `EigenDecompositionFailed` if the Schur iteration does not converge.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use online_dmd::dmd::spectrum::continuous_eigenvalues;
/// let (w, dt) = (1.5_f64, 0.1_f64);
/// let (c, s) = ((w * dt).cos(), (w * dt).sin());
/// let a = array![[c, s], [-s, c]];
/// let lambdas = continuous_eigenvalues(a.view(), dt).unwrap();
/// assert!((lambdas[0].im - 1.5).abs() < 1e-10);
/// assert!((lambdas[1].im + 1.5).abs() < 1e-10);
/// ```
pub fn continuous_eigenvalues(a: ArrayView2<f64>, dt: f64) -> DMDResult<Array1<Complex<f64>>> {
    let dt = validate_time_step(dt)?;
    let discrete = discrete_eigenvalues(a)?;
    let mut continuous: Vec<Complex<f64>> = discrete.iter().map(|l| l.ln() / dt).collect();
    continuous.sort_by(|l, r| spectral_order(l, r));
    Ok(Array1::from(continuous))
}

/// Continuous-time eigenpairs of `a`.
///
/// Same contract as [`continuous_eigenvalues`], additionally returning for
/// each eigenvalue a unit eigenvector `v` with `A·v ≈ λ_d·v`.
///
/// Notes
/// -----
/// - Eigenvalues within `EIGEN_CLUSTER_TOL · max(1, |λ|)` of each other are
///   treated as one eigenvalue of multiplicity `m`. Its copies receive
///   mutually orthonormal vectors spanning the numerical null space of
///   `A − λI`.
/// - A defective eigenvalue has fewer independent eigenvectors than copies;
///   the surplus copies repeat the last vector of the null-space basis.
pub fn continuous_eigen(a: ArrayView2<f64>, dt: f64) -> DMDResult<Vec<ContinuousMode>> {
    let dt = validate_time_step(dt)?;
    let discrete = discrete_eigenvalues(a)?;
    let a_complex = to_dmatrix(a).map(|v| Complex::new(v, 0.0));

    let mut modes = Vec::with_capacity(discrete.len());
    for cluster in cluster_eigenvalues(&discrete) {
        let center = cluster.iter().map(|&i| discrete[i]).sum::<Complex<f64>>()
            / cluster.len() as f64;
        let basis = null_space(&a_complex, center, cluster.len())?;
        for (copy, &i) in cluster.iter().enumerate() {
            let vector = basis
                .get(copy)
                .or_else(|| basis.last())
                .cloned()
                .ok_or(DMDError::EigenDecompositionFailed)?;
            let lambda = discrete[i];
            modes.push(ContinuousMode { discrete: lambda, continuous: lambda.ln() / dt, vector });
        }
    }
    modes.sort_by(|l, r| spectral_order(&l.continuous, &r.continuous));
    Ok(modes)
}

/// Eigenvalues of a real square matrix via real Schur form.
pub fn discrete_eigenvalues(a: ArrayView2<f64>) -> DMDResult<Vec<Complex<f64>>> {
    let (rows, cols) = a.dim();
    if rows != cols {
        return Err(DMDError::NonSquareOperator { rows, cols });
    }
    validate_finite_matrix(a, "operator")?;
    if rows == 0 {
        return Ok(Vec::new());
    }
    let schur = Schur::try_new(to_dmatrix(a), f64::EPSILON, SCHUR_MAX_ITER)
        .ok_or(DMDError::EigenDecompositionFailed)?;
    Ok(schur.complex_eigenvalues().iter().copied().collect())
}

// ---- Helper methods ----

fn spectral_order(l: &Complex<f64>, r: &Complex<f64>) -> Ordering {
    r.im.partial_cmp(&l.im)
        .unwrap_or(Ordering::Equal)
        .then_with(|| r.re.partial_cmp(&l.re).unwrap_or(Ordering::Equal))
}

/// Group indices of eigenvalues that coincide within the cluster tolerance.
fn cluster_eigenvalues(eigenvalues: &[Complex<f64>]) -> Vec<Vec<usize>> {
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    for (i, &lambda) in eigenvalues.iter().enumerate() {
        let tol = EIGEN_CLUSTER_TOL * lambda.norm().max(1.0);
        match clusters.iter_mut().find(|c| (eigenvalues[c[0]] - lambda).norm() <= tol) {
            Some(cluster) => cluster.push(i),
            None => clusters.push(vec![i]),
        }
    }
    clusters
}

/// Orthonormal basis of the numerical null space of `A − λI`, at most
/// `multiplicity` vectors and never fewer than one.
///
/// Right singular vectors are taken in order of increasing singular value;
/// beyond the first, only those at or below
/// `NULL_SPACE_TOL · max(1, σ_max)` are kept.
fn null_space(
    a: &DMatrix<Complex<f64>>, lambda: Complex<f64>, multiplicity: usize,
) -> DMDResult<Vec<Array1<Complex<f64>>>> {
    let n = a.nrows();
    let mut shifted = a.clone();
    for i in 0..n {
        shifted[(i, i)] -= lambda;
    }
    let svd = shifted.svd(false, true);
    let v_t = svd.v_t.ok_or(DMDError::EigenDecompositionFailed)?;
    let sigma = svd.singular_values;

    let mut order: Vec<usize> = (0..sigma.len()).collect();
    order.sort_by(|&l, &r| sigma[l].partial_cmp(&sigma[r]).unwrap_or(Ordering::Equal));
    let sigma_max = sigma.iter().fold(0.0_f64, |acc, &s| acc.max(s));
    let floor = NULL_SPACE_TOL * sigma_max.max(1.0);
    let nullity = sigma.iter().filter(|&&s| s <= floor).count();
    let keep = multiplicity.min(nullity).max(1);

    order
        .into_iter()
        .take(keep)
        .map(|k| {
            // Rows of Vᴴ are conjugated right singular vectors.
            let v: Array1<Complex<f64>> = (0..n).map(|j| v_t[(k, j)].conj()).collect();
            normalize_phase(v)
        })
        .collect()
}

/// Scale `v` to unit norm with its largest-magnitude entry real and positive.
fn normalize_phase(mut v: Array1<Complex<f64>>) -> DMDResult<Array1<Complex<f64>>> {
    let norm = v.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
    if !norm.is_finite() || norm == 0.0 {
        return Err(DMDError::EigenDecompositionFailed);
    }
    let pivot = v
        .iter()
        .copied()
        .max_by(|l, r| l.norm().partial_cmp(&r.norm()).unwrap_or(Ordering::Equal))
        .unwrap_or(Complex::new(1.0, 0.0));
    let phase = pivot.conj() / pivot.norm();
    v.mapv_inplace(|c| c * phase / norm);
    Ok(v)
}
