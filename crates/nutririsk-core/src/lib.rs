//! nutririsk-core
//!
//! Shared vocabulary of the nutritional-risk engine: the three-level risk
//! label and its cutoffs, questionnaire evaluation results, and the subject
//! record consumed by the clinical scorer and the feature pipeline.
//! Pure data and arithmetic, no I/O.

pub mod error;
pub mod models;
pub mod risk;

pub use risk::{RiskLabel, classify};
