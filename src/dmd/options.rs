//! Estimator configuration for online DMD.
//!
//! Holds the two construction-time knobs of an [`OnlineDMD`](super::online::OnlineDMD):
//! the exponential weighting (forgetting) factor `ρ` and an optional ridge
//! term used only when seeding from a warm-up batch. Both are validated once
//! here so the estimator itself can assume well-formed settings.
use crate::dmd::{
    errors::DMDResult,
    validation::{validate_ridge, validate_weighting},
};

/// Default weighting factor: every past pair counts equally.
pub const DEFAULT_WEIGHTING: f64 = 1.0;

/// DMDOptions — validated configuration for an online DMD estimator.
///
/// Purpose
/// -------
/// Bundle the forgetting factor and optional ridge regularization so they can
/// be validated together and passed around as a single value.
///
/// Fields
/// ------
/// - `weighting`: `f64`
///   Forgetting factor `ρ ∈ (0, 1]`. `ρ = 1` is growing-window least squares;
///   `ρ < 1` gives an effective memory of about `1 / (1 − ρ)` pairs.
/// - `ridge`: `Option<f64>`
///   When `Some(λ)`, warm-up initialization inverts `X̂X̂ᵀ + λI` instead of
///   `X̂X̂ᵀ`. Has no effect on incremental updates or on prior seeding.
///
/// Invariants
/// ----------
/// - `0 < weighting ≤ 1` and finite.
/// - `ridge` is `None` or finite and strictly positive.
///
/// Notes
/// -----
/// - Fields are public for inspection; construct through [`DMDOptions::new`]
///   or [`DMDOptions::default`] so the invariants hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DMDOptions {
    pub weighting: f64,
    pub ridge: Option<f64>,
}

impl DMDOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - [`DMDError::InvalidWeighting`](crate::dmd::errors::DMDError::InvalidWeighting)
    ///   if `weighting` is non-finite or outside `(0, 1]`.
    /// - [`DMDError::InvalidRidge`](crate::dmd::errors::DMDError::InvalidRidge)
    ///   if `ridge` is `Some` and not finite and > 0.
    pub fn new(weighting: f64, ridge: Option<f64>) -> DMDResult<Self> {
        let weighting = validate_weighting(weighting)?;
        let ridge = ridge.map(validate_ridge).transpose()?;
        Ok(DMDOptions { weighting, ridge })
    }

    /// Approximate number of pairs that carry most of the weight,
    /// `1 / (1 − ρ)`; infinite for `ρ = 1`.
    pub fn effective_memory(&self) -> f64 {
        if self.weighting >= 1.0 { f64::INFINITY } else { 1.0 / (1.0 - self.weighting) }
    }
}

impl Default for DMDOptions {
    fn default() -> Self {
        DMDOptions { weighting: DEFAULT_WEIGHTING, ridge: None }
    }
}
