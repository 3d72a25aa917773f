//! nutririsk-clinical
//!
//! Weighted five-domain clinical risk scorer. Turns biometric, laboratory,
//! dietary and habit measurements into a 0–100 score and the same
//! three-level label the questionnaire uses. Used to auto-label survey rows
//! for classifier training.
//!
//! Domains without any measurement are left out of both the earned points
//! and the weight total, so partial records renormalize over what is known.

pub mod domains;
pub mod energy;
pub mod metadata;
pub mod scorer;
pub mod thresholds;

pub use domains::ClinicalDomain;
pub use scorer::{ClinicalAssessment, DomainScore, score_subject, score_subjects};
