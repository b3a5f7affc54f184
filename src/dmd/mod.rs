//! dmd — online dynamic mode decomposition: estimator, spectrum, and errors.
//!
//! Purpose
//! -------
//! Estimate the linear operator `A` with `y ≈ A·x` from a stream of snapshot
//! pairs and expose its continuous-time spectrum. This is the main entry
//! point of the crate and the surface the Python bindings depend on.
//!
//! Key behaviors
//! -------------
//! - [`online`] holds [`OnlineDMD`], a rank-1 recursive least-squares
//!   estimator with an exponential forgetting factor `ρ`.
//! - [`spectrum`] maps a discrete operator to `ln(λ)/dt` eigenvalues and
//!   eigenvectors ([`continuous_eigenvalues`], [`continuous_eigen`]).
//! - [`linalg`] bridges `ndarray` and `nalgebra` and provides the
//!   eigen-truncated inverses used when seeding.
//! - [`validation`] and [`errors`] give a single, typed failure surface
//!   ([`DMDError`] / [`DMDResult`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerics are dense `f64`; snapshot batches are `n × q`, one column
//!   per snapshot, oldest first.
//! - Inputs are validated before any state is touched, and a failed update
//!   leaves the estimator exactly as it was.
//! - Estimators are single-owner; there is no interior mutability.
//!
//! Conventions
//! -----------
//! - `ρ = 1` reproduces growing-window least squares (`A = Y·pinv(X)`);
//!   `ρ < 1` weights the pair seen `j` steps ago by `ρ^j`.
//! - Diagnostics are emitted through `tracing` at `debug`/`warn`; the crate
//!   never installs a subscriber.
//!
//! Downstream usage
//! ----------------
//! 1. Build [`DMDOptions`] (or use the default) and an [`OnlineDMD`].
//! 2. Seed it with [`OnlineDMD::initialize`] on a warm-up batch, or with
//!    [`OnlineDMD::initialize_from_prior`].
//! 3. Stream pairs through [`OnlineDMD::update`] and read
//!    [`OnlineDMD::current_operator`] or the continuous spectrum at any time.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its own contract; batch
//!   equivalence, tracking, and exact-recovery scenarios live in
//!   `tests/integration_online_dmd.rs`.

pub mod errors;
pub mod linalg;
pub mod online;
pub mod options;
pub mod spectrum;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{DMDError, DMDResult, ErrorKind};
pub use self::online::{Conditioning, EstimatorState, OnlineDMD};
pub use self::options::{DEFAULT_WEIGHTING, DMDOptions};
pub use self::spectrum::{ContinuousMode, continuous_eigen, continuous_eigenvalues};

// ---- Optional convenience prelude for downstream crates -------------------
//
//     use online_dmd::dmd::prelude::*;

pub mod prelude {
    pub use super::{
        Conditioning, ContinuousMode, DMDError, DMDOptions, DMDResult, EstimatorState, OnlineDMD,
        continuous_eigen, continuous_eigenvalues,
    };
}
