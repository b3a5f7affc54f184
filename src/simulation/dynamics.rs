//! Continuous-time reference systems `dx/dt = f(t, x)`.
//!
//! The [`Dynamics`] trait is the seam between the integrator and concrete
//! systems. Two systems ship here: the slowly spinning-up oscillator used to
//! exercise eigenvalue tracking, and a constant linear system.
use crate::simulation::errors::{SimError, SimResult};
use nalgebra::Complex;
use ndarray::{Array2, ArrayView1, ArrayViewMut1, array, linalg::general_mat_vec_mul};

/// A vector field `f(t, x)` on `ℝⁿ`.
pub trait Dynamics {
    /// State dimension `n`.
    fn dim(&self) -> usize;

    /// Write `f(t, x)` into `dx_out`.
    ///
    /// Both `x` and `dx_out` have length [`Dynamics::dim`]; implementations
    /// may assume it.
    fn derivative(&self, t: f64, x: ArrayView1<f64>, dx_out: ArrayViewMut1<f64>);
}

/// RotatingOscillator — `dx/dt = A(t)x` with `A(t) = [[0, w(t)], [−w(t), 0]]`.
///
/// Purpose
/// -------
/// Provide a two-dimensional system whose instantaneous eigenvalues
/// `±i·w(t)`, `w(t) = 1 + ε·t`, drift slowly in time, so an estimator with
/// forgetting should track them better than one without.
///
/// Fields
/// ------
/// - `epsilon`: `f64`
///   Frequency drift rate `ε`; `0.1` in the reference scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatingOscillator {
    pub epsilon: f64,
}

impl RotatingOscillator {
    pub fn new(epsilon: f64) -> Self {
        RotatingOscillator { epsilon }
    }

    /// Instantaneous angular frequency `w(t) = 1 + ε·t`.
    pub fn frequency(&self, t: f64) -> f64 {
        1.0 + self.epsilon * t
    }

    /// Instantaneous generator `A(t)`.
    pub fn generator(&self, t: f64) -> Array2<f64> {
        let w = self.frequency(t);
        array![[0.0, w], [-w, 0.0]]
    }

    /// Eigenvalues of `A(t)`, positive frequency first: `[+i·w(t), −i·w(t)]`.
    pub fn true_eigenvalues(&self, t: f64) -> [Complex<f64>; 2] {
        let w = self.frequency(t);
        [Complex::new(0.0, w), Complex::new(0.0, -w)]
    }
}

impl Default for RotatingOscillator {
    fn default() -> Self {
        RotatingOscillator { epsilon: 0.1 }
    }
}

impl Dynamics for RotatingOscillator {
    fn dim(&self) -> usize {
        2
    }

    fn derivative(&self, t: f64, x: ArrayView1<f64>, mut dx_out: ArrayViewMut1<f64>) {
        let w = self.frequency(t);
        dx_out[0] = w * x[1];
        dx_out[1] = -w * x[0];
    }
}

/// Time-invariant linear system `dx/dt = M·x`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    m: Array2<f64>,
}

impl LinearSystem {
    /// Wrap a square generator `M`.
    ///
    /// # Errors
    /// - [`SimError::DimensionMismatch`] if `M` is not square or is empty.
    pub fn new(m: Array2<f64>) -> SimResult<Self> {
        let (rows, cols) = m.dim();
        if rows != cols || rows == 0 {
            return Err(SimError::DimensionMismatch {
                what: "generator",
                expected: rows,
                found: cols,
            });
        }
        Ok(LinearSystem { m })
    }

    pub fn generator(&self) -> &Array2<f64> {
        &self.m
    }
}

impl Dynamics for LinearSystem {
    fn dim(&self) -> usize {
        self.m.nrows()
    }

    fn derivative(&self, _t: f64, x: ArrayView1<f64>, mut dx_out: ArrayViewMut1<f64>) {
        general_mat_vec_mul(1.0, &self.m, &x, 0.0, &mut dx_out);
    }
}
