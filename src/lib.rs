//! online_dmd — streaming dynamic mode decomposition with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the online DMD estimator to Python via the `_online_dmd` extension module.
//! When the `python-bindings` feature is enabled, this module defines the
//! Python-facing class used by the `online_dmd` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules: [`dmd`] (estimator, spectrum, errors),
//!   [`oracle`] (batch reference), and [`simulation`] (synthetic feeds).
//! - Define the `OnlineDMD` `#[pyclass]` wrapper and the `#[pymodule]`
//!   initializer for `_online_dmd`.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, input conversion, and error mapping.
//! - The Python-visible class mirrors the invariants and signatures of
//!   [`dmd::OnlineDMD`].
//!
//! Conventions
//! -----------
//! - Snapshot batches passed from Python are `n × q` with one snapshot per
//!   column, exactly as on the Rust side.
//! - Matrices returned to Python are row-major nested lists.
//! - [`dmd::DMDError`] values become `ValueError` (configuration and
//!   precondition failures) or `ArithmeticError` (numerical instability).
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on [`dmd`] directly (or its prelude) and
//!   can ignore the PyO3 items guarded by the `python-bindings` feature.
//! - The Python packaging layer imports `_online_dmd` and may wrap its class
//!   in a thin pure-Python facade.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules and by
//!   `tests/integration_online_dmd.rs`.

pub mod dmd;
pub mod oracle;
pub mod simulation;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    dmd::{Conditioning, DMDOptions, OnlineDMD},
    utils::{extract_f64_matrix, extract_f64_vector, matrix_to_rows},
};

/// OnlineDMD — Python-facing wrapper for the online DMD estimator.
///
/// Purpose
/// -------
/// Expose [`dmd::OnlineDMD`] to Python callers while preserving the core
/// Rust invariants and error handling.
///
/// Parameters
/// ----------
/// Constructed from Python via `OnlineDMD(n, weighting=1.0, ridge=None)`:
/// - `n`: `usize`
///   State dimension, at least 1.
/// - `weighting`: `f64`
///   Forgetting factor in `(0, 1]`.
/// - `ridge`: `Option<f64>`
///   Optional positive ridge term applied only when seeding from a batch.
///
/// Fields
/// ------
/// - `inner`: [`dmd::OnlineDMD`]
///   The Rust estimator that owns all state and scratch buffers.
///
/// Notes
/// -----
/// - Marked `unsendable`: the estimator is single-owner and must stay on the
///   thread that created it.
#[cfg(feature = "python-bindings")]
#[pyclass(name = "OnlineDMD", module = "online_dmd", unsendable)]
pub struct PyOnlineDMD {
    inner: OnlineDMD,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl PyOnlineDMD {
    #[new]
    #[pyo3(
        signature = (n, weighting = 1.0, ridge = None),
        text_signature = "(n, /, weighting=1.0, ridge=None)"
    )]
    pub fn new(n: usize, weighting: f64, ridge: Option<f64>) -> PyResult<Self> {
        let options = DMDOptions::new(weighting, ridge)?;
        Ok(PyOnlineDMD { inner: OnlineDMD::with_options(n, options)? })
    }

    /// Seed the estimator from a warm-up batch `(X, Y)`, each `n × q`.
    ///
    /// Returns the conditioning label: `"well_conditioned"`,
    /// `"ill_conditioned"`, or `"rank_deficient"`.
    #[pyo3(text_signature = "(self, x, y, /)")]
    pub fn initialize<'py>(
        &mut self, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>,
    ) -> PyResult<&'static str> {
        let x = extract_f64_matrix(x, "x")?;
        let y = extract_f64_matrix(y, "y")?;
        let conditioning = self.inner.initialize(x.view(), y.view())?;
        Ok(conditioning_label(&conditioning))
    }

    /// Seed with `A = 0`, `P = alpha·I` and no data.
    #[pyo3(text_signature = "(self, alpha, /)")]
    pub fn initialize_from_prior(&mut self, alpha: f64) -> PyResult<()> {
        self.inner.initialize_from_prior(alpha)?;
        Ok(())
    }

    /// Fold one snapshot pair `(x, y)` into the estimate.
    #[pyo3(text_signature = "(self, x, y, /)")]
    pub fn update<'py>(&mut self, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>) -> PyResult<()> {
        let x = extract_f64_vector(x, "x")?;
        let y = extract_f64_vector(y, "y")?;
        self.inner.update(x.view(), y.view())?;
        Ok(())
    }

    /// One-step prediction `A·x`.
    #[pyo3(text_signature = "(self, x, /)")]
    pub fn predict<'py>(&self, x: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
        let x = extract_f64_vector(x, "x")?;
        Ok(self.inner.predict(x.view())?.to_vec())
    }

    /// Continuous-time eigenvalues `ln(λ)/dt` as `(real, imag)` tuples,
    /// sorted by descending imaginary part.
    #[pyo3(text_signature = "(self, dt, /)")]
    pub fn continuous_eigenvalues(&self, dt: f64) -> PyResult<Vec<(f64, f64)>> {
        let lambdas = self.inner.continuous_eigenvalues(dt)?;
        Ok(lambdas.iter().map(|l| (l.re, l.im)).collect())
    }

    /// Current operator estimate as a row-major nested list.
    #[getter(A)]
    pub fn operator(&self) -> PyResult<Vec<Vec<f64>>> {
        Ok(matrix_to_rows(&self.inner.current_operator()?))
    }

    #[getter]
    pub fn timestep(&self) -> usize {
        self.inner.timestep()
    }

    #[getter]
    pub fn weighting(&self) -> f64 {
        self.inner.weighting()
    }

    #[getter]
    pub fn n(&self) -> usize {
        self.inner.dim()
    }

    #[getter]
    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    fn __repr__(&self) -> String {
        format!(
            "OnlineDMD(n={}, weighting={}, timestep={})",
            self.inner.dim(),
            self.inner.weighting(),
            self.inner.timestep()
        )
    }
}

#[cfg(feature = "python-bindings")]
fn conditioning_label(conditioning: &Conditioning) -> &'static str {
    match conditioning {
        Conditioning::WellConditioned { .. } => "well_conditioned",
        Conditioning::IllConditioned { .. } => "ill_conditioned",
        Conditioning::RankDeficient { .. } => "rank_deficient",
    }
}

/// _online_dmd — PyO3 module initializer for the Python extension.
///
/// Registers the `OnlineDMD` class. Invoked by Python when importing the
/// compiled extension; failures surface as `ImportError`.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _online_dmd<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<PyOnlineDMD>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
