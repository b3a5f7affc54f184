//! Brute-force batch DMD used as a correctness reference.
//!
//! Every call recomputes `Ŷ·pinv(X̂)` from the full history with an SVD
//! pseudo-inverse, so cost grows with the number of pairs. Nothing here is
//! meant for production streaming; it exists to check [`OnlineDMD`]
//! against an independent computation.
//!
//! [`OnlineDMD`]: crate::dmd::OnlineDMD
use crate::dmd::{
    errors::{DMDError, DMDResult},
    linalg::{pseudo_inverse, weighted_columns},
    validation::{validate_batch, validate_dimension, validate_vector, validate_weighting},
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Weighted least-squares operator over a whole batch.
///
/// Parameters
/// ----------
/// - `x`, `y`: `ArrayView2<f64>`
///   `n × q` snapshot matrices, one pair per column, oldest first.
/// - `weighting`: `f64`
///   Forgetting factor `ρ ∈ (0, 1]`; column `i` of both matrices is scaled
///   by `√ρ^{q-1-i}` before solving.
///
/// Returns
/// -------
/// `DMDResult<Array2<f64>>`
///   `Ŷ·pinv(X̂)`, the minimum-norm minimizer of `Σ ρ^{q-1-i} ‖y_i − A x_i‖²`.
///
/// Errors
/// ------
/// - `InvalidWeighting` for a bad `ρ`; `InvalidDimension` for `n = 0`.
/// - Batch shape and finiteness errors from
///   [`validate_batch`](crate::dmd::validation::validate_batch).
/// - `PseudoInverseFailed` if the SVD cannot be truncated.
///
/// Examples
/// --------
/// ```rust
/// # use ndarray::array;
/// # use online_dmd::oracle::batch_operator;
/// let x = array![[1.0, 0.0], [0.0, 1.0]];
/// let y = array![[0.5, 1.0], [0.0, 2.0]];
/// let a = batch_operator(x.view(), y.view(), 1.0).unwrap();
/// assert!((a[[1, 1]] - 2.0).abs() < 1e-12);
/// ```
pub fn batch_operator(
    x: ArrayView2<f64>, y: ArrayView2<f64>, weighting: f64,
) -> DMDResult<Array2<f64>> {
    let rho = validate_weighting(weighting)?;
    let n = validate_dimension(x.nrows())?;
    validate_batch(x, y, n)?;

    let x_hat = weighted_columns(x, rho);
    let y_hat = weighted_columns(y, rho);
    let pinv = pseudo_inverse(x_hat.view())?;
    Ok(y_hat.dot(&pinv))
}

/// BatchDMD — full-history DMD recomputed from scratch on demand.
///
/// Purpose
/// -------
/// Keep every pair seen so far and produce the weighted least-squares
/// operator over all of them, independently of any recursive state.
///
/// Fields
/// ------
/// - `n`: state dimension.
/// - `weighting`: `ρ ∈ (0, 1]`.
/// - `x`, `y`: stored snapshots, one `Array1` per pair in arrival order.
///
/// Performance
/// -----------
/// - `push` is `O(n)`; `operator` is `O(n²k + n³)` for `k` stored pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchDMD {
    n: usize,
    weighting: f64,
    x: Vec<Array1<f64>>,
    y: Vec<Array1<f64>>,
}

impl BatchDMD {
    /// Construct an empty history.
    ///
    /// # Errors
    /// - [`DMDError::InvalidDimension`] if `n == 0`.
    /// - [`DMDError::InvalidWeighting`] if `ρ` is not in `(0, 1]`.
    pub fn new(n: usize, weighting: f64) -> DMDResult<Self> {
        Ok(BatchDMD {
            n: validate_dimension(n)?,
            weighting: validate_weighting(weighting)?,
            x: Vec::new(),
            y: Vec::new(),
        })
    }

    /// Append one pair after validating its length and entries.
    pub fn push(&mut self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> DMDResult<()> {
        validate_vector(x, self.n, "x")?;
        validate_vector(y, self.n, "y")?;
        self.x.push(x.to_owned());
        self.y.push(y.to_owned());
        Ok(())
    }

    /// Append every column pair of an `n × q` batch, oldest first.
    pub fn extend(&mut self, x: ArrayView2<f64>, y: ArrayView2<f64>) -> DMDResult<()> {
        validate_batch(x, y, self.n)?;
        self.x.extend(x.columns().into_iter().map(|c| c.to_owned()));
        self.y.extend(y.columns().into_iter().map(|c| c.to_owned()));
        Ok(())
    }

    /// Least-squares operator over the full stored history.
    ///
    /// # Errors
    /// - [`DMDError::EmptyBatch`] before the first `push`.
    /// - [`DMDError::PseudoInverseFailed`] from the SVD.
    pub fn operator(&self) -> DMDResult<Array2<f64>> {
        if self.x.is_empty() {
            return Err(DMDError::EmptyBatch);
        }
        let (x, y) = self.snapshot_matrices();
        batch_operator(x.view(), y.view(), self.weighting)
    }

    /// Stored history as `n × k` matrices.
    pub fn snapshot_matrices(&self) -> (Array2<f64>, Array2<f64>) {
        let k = self.x.len();
        let mut x = Array2::zeros((self.n, k));
        let mut y = Array2::zeros((self.n, k));
        for (j, (xj, yj)) in self.x.iter().zip(&self.y).enumerate() {
            x.column_mut(j).assign(xj);
            y.column_mut(j).assign(yj);
        }
        (x, y)
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.n
    }

    pub fn weighting(&self) -> f64 {
        self.weighting
    }
}
