//! oracle — independent batch recomputation of the DMD operator.
//!
//! Purpose
//! -------
//! Provide a slow, obviously-correct comparator for the online estimator:
//! the weighted least-squares operator `Ŷ·pinv(X̂)` recomputed from the full
//! history with an SVD pseudo-inverse.
//!
//! Key behaviors
//! -------------
//! - [`batch_operator`] solves one batch directly.
//! - [`BatchDMD`] stores pairs as they arrive and re-solves on request.
//!
//! Conventions
//! -----------
//! - Same batch layout and column weights as [`crate::dmd::online`], so
//!   results are directly comparable for any `ρ`.
//! - Shares [`DMDError`](crate::dmd::DMDError) as its error type.

pub mod batch;

pub use self::batch::{BatchDMD, batch_operator};
