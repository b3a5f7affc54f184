//! simulation — synthetic snapshot feeds for exercising the estimator.
//!
//! Purpose
//! -------
//! Generate noise-free trajectories of known systems so estimator behavior
//! can be checked against ground truth: exact recovery for constant maps
//! and eigenvalue tracking for slowly varying ones.
//!
//! Key behaviors
//! -------------
//! - [`Dynamics`] abstracts a vector field `dx/dt = f(t, x)`;
//!   [`RotatingOscillator`] and [`LinearSystem`] implement it.
//! - [`integrate_rk4`] samples a continuous system on a uniform grid;
//!   [`iterate_map`] runs a discrete linear map.
//! - [`Trajectory`] exposes the samples as shifted snapshot matrices or as a
//!   streaming iterator of pairs.
//!
//! Invariants & assumptions
//! ------------------------
//! - Integration is deterministic, fixed-step, and allocation-free inside
//!   the step loop.
//! - Errors are reported as [`SimError`]; nothing here panics on bad input.

pub mod dynamics;
pub mod errors;
pub mod trajectory;

pub use self::dynamics::{Dynamics, LinearSystem, RotatingOscillator};
pub use self::errors::{SimError, SimResult};
pub use self::trajectory::{Trajectory, integrate_rk4, iterate_map};
