//! Errors for online DMD estimation (configuration checks, call-order and
//! shape preconditions, and numerical-instability conditions).
//!
//! This module defines the crate error type, [`DMDError`], together with the
//! coarse [`ErrorKind`] classification callers use to branch on the three
//! failure families. `DMDError` implements `Display`/`Error` and, when the
//! `python-bindings` feature is enabled, converts to `PyErr` for PyO3.
//!
//! ## Conventions
//! - **Indices are 0-based** (match Rust/NumPy).
//! - Batches are `n × q` matrices with one snapshot per column; `column`
//!   fields refer to that layout.
//! - Numerical-instability variants are *reported*, never repaired: the
//!   estimator does not regularize on its own unless a ridge term was
//!   configured up front.
#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyArithmeticError, PyValueError},
    prelude::*,
};

/// Crate-wide result alias for DMD operations that may produce [`DMDError`].
pub type DMDResult<T> = Result<T, DMDError>;

/// Coarse classification of a [`DMDError`].
///
/// - `Configuration`: invalid construction-time settings (`n`, `ρ`, ridge,
///   prior scale, sampling interval).
/// - `Precondition`: the call itself is invalid (wrong state, wrong shapes,
///   non-finite inputs).
/// - `NumericalInstability`: inputs were well-formed but the linear algebra
///   is ill-posed or produced non-finite values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Precondition,
    NumericalInstability,
}

/// Unified error type for online DMD.
#[derive(Debug, Clone, PartialEq)]
pub enum DMDError {
    // ---- Configuration ----
    /// State dimension must be at least 1.
    InvalidDimension { n: usize },

    /// Weighting (forgetting) factor must lie in (0, 1].
    InvalidWeighting { value: f64, reason: &'static str },

    /// Ridge term must be finite and > 0 when configured.
    InvalidRidge { value: f64 },

    /// Prior covariance scale must be finite and > 0.
    InvalidPriorScale { value: f64 },

    /// Sampling interval must be finite and > 0.
    InvalidTimeStep { dt: f64 },

    // ---- Preconditions ----
    /// Operation requires an initialized estimator.
    NotInitialized,

    /// A vector or matrix does not have the state dimension.
    DimensionMismatch { what: &'static str, expected: usize, found: usize },

    /// X and Y batches must hold the same number of snapshots.
    BatchLengthMismatch { x_cols: usize, y_cols: usize },

    /// A batch must contain at least one snapshot pair.
    EmptyBatch,

    /// An input entry is NaN/±inf.
    NonFiniteInput { what: &'static str, row: usize, column: usize, value: f64 },

    /// Eigen extraction requires a square operator.
    NonSquareOperator { rows: usize, cols: usize },

    // ---- Numerical instability ----
    /// Warm-up batch has fewer snapshots than the state dimension.
    RankDeficientBatch { q0: usize, n: usize, rank: usize },

    /// Warm-up covariance is singular or too ill-conditioned to invert.
    IllConditionedCovariance { condition: f64 },

    /// An update would write non-finite entries into A or P.
    NonFiniteState { which: &'static str, row: usize, col: usize, value: f64 },

    /// The Sherman–Morrison denominator ρ + xᵀPx is zero or non-finite.
    NonFiniteGain { denominator: f64 },

    /// Schur iteration did not converge.
    EigenDecompositionFailed,

    /// SVD-based pseudo-inverse could not be formed.
    PseudoInverseFailed { reason: &'static str },
}

impl DMDError {
    /// Failure family of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DMDError::InvalidDimension { .. }
            | DMDError::InvalidWeighting { .. }
            | DMDError::InvalidRidge { .. }
            | DMDError::InvalidPriorScale { .. }
            | DMDError::InvalidTimeStep { .. } => ErrorKind::Configuration,

            DMDError::NotInitialized
            | DMDError::DimensionMismatch { .. }
            | DMDError::BatchLengthMismatch { .. }
            | DMDError::EmptyBatch
            | DMDError::NonFiniteInput { .. }
            | DMDError::NonSquareOperator { .. } => ErrorKind::Precondition,

            DMDError::RankDeficientBatch { .. }
            | DMDError::IllConditionedCovariance { .. }
            | DMDError::NonFiniteState { .. }
            | DMDError::NonFiniteGain { .. }
            | DMDError::EigenDecompositionFailed
            | DMDError::PseudoInverseFailed { .. } => ErrorKind::NumericalInstability,
        }
    }
}

impl std::error::Error for DMDError {}

impl std::fmt::Display for DMDError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            DMDError::InvalidDimension { n } => {
                write!(f, "State dimension must be at least 1; got: {n}")
            }
            DMDError::InvalidWeighting { value, reason } => {
                write!(f, "Weighting factor must lie in (0, 1]; got: {value}. {reason}")
            }
            DMDError::InvalidRidge { value } => {
                write!(f, "Ridge term must be finite and > 0; got: {value}")
            }
            DMDError::InvalidPriorScale { value } => {
                write!(f, "Prior covariance scale must be finite and > 0; got: {value}")
            }
            DMDError::InvalidTimeStep { dt } => {
                write!(f, "Sampling interval must be finite and > 0; got: {dt}")
            }
            // ---- Preconditions ----
            DMDError::NotInitialized => {
                write!(f, "Estimator has not been initialized yet.")
            }
            DMDError::DimensionMismatch { what, expected, found } => {
                write!(f, "Dimension mismatch for {what}: expected {expected}, got {found}")
            }
            DMDError::BatchLengthMismatch { x_cols, y_cols } => {
                write!(
                    f,
                    "X and Y must hold the same number of snapshots: X has {x_cols}, Y has {y_cols}"
                )
            }
            DMDError::EmptyBatch => {
                write!(f, "Batch must contain at least one snapshot pair.")
            }
            DMDError::NonFiniteInput { what, row, column, value } => {
                write!(f, "Entry ({row}, {column}) of {what} is non-finite: {value}")
            }
            DMDError::NonSquareOperator { rows, cols } => {
                write!(f, "Operator must be square; got {rows}x{cols}")
            }
            // ---- Numerical instability ----
            DMDError::RankDeficientBatch { q0, n, rank } => {
                write!(
                    f,
                    "Warm-up batch is rank deficient: {q0} snapshots for dimension {n} \
                     (rank {rank})"
                )
            }
            DMDError::IllConditionedCovariance { condition } => {
                write!(f, "Warm-up covariance is ill-conditioned (condition number {condition:e})")
            }
            DMDError::NonFiniteState { which, row, col, value } => {
                write!(f, "Update would make {which}[{row}, {col}] non-finite: {value}")
            }
            DMDError::NonFiniteGain { denominator } => {
                write!(f, "Gain denominator rho + x'Px is not usable: {denominator}")
            }
            DMDError::EigenDecompositionFailed => {
                write!(f, "Eigen decomposition of the operator did not converge.")
            }
            DMDError::PseudoInverseFailed { reason } => {
                write!(f, "Pseudo-inverse could not be computed: {reason}")
            }
        }
    }
}

/// Convert a [`DMDError`] into a Python exception.
///
/// Numerical-instability conditions surface as `ArithmeticError`; everything
/// else is a `ValueError`.
#[cfg(feature = "python-bindings")]
impl std::convert::From<DMDError> for PyErr {
    fn from(err: DMDError) -> PyErr {
        match err.kind() {
            ErrorKind::NumericalInstability => PyArithmeticError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}
