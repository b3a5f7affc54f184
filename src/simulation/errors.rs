//! Errors for trajectory generation.
//!
//! `SimError` covers bad integration settings and integrations that blow up.
//! It is kept separate from the estimator's error type; the two never mix in
//! one call.

/// Result alias for simulation routines.
pub type SimResult<T> = Result<T, SimError>;

/// Error type for trajectory generation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    // ---- Settings ----
    /// Sampling interval must be finite and > 0.
    InvalidTimeStep { dt: f64 },

    /// At least one integration substep per sample is required.
    InvalidSubsteps { substeps: usize },

    /// Start time must be finite.
    InvalidStartTime { t_start: f64 },

    /// Initial state or map does not match the system dimension.
    DimensionMismatch { what: &'static str, expected: usize, found: usize },

    // ---- Integration ----
    /// The state became NaN/±inf at sample `step`.
    NonFiniteState { step: usize },
}

impl std::error::Error for SimError {}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Settings ----
            SimError::InvalidTimeStep { dt } => {
                write!(f, "Simulation Error: Sampling interval must be finite and > 0; got: {dt}")
            }
            SimError::InvalidSubsteps { substeps } => {
                write!(f, "Simulation Error: Substeps per sample must be >= 1; got: {substeps}")
            }
            SimError::InvalidStartTime { t_start } => {
                write!(f, "Simulation Error: Start time must be finite; got: {t_start}")
            }
            SimError::DimensionMismatch { what, expected, found } => write!(
                f,
                "Simulation Error: {what} has dimension {found}, expected {expected}"
            ),

            // ---- Integration ----
            SimError::NonFiniteState { step } => {
                write!(f, "Simulation Error: State became non-finite at sample {step}")
            }
        }
    }
}
