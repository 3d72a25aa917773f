//! nutririsk-scorecard
//!
//! The 10-item nutritional questionnaire: item catalog, clamping
//! normalizer, and the evaluator that turns answers into a 0–100 score and
//! a risk label. Pure functions over immutable inputs.

pub mod answers;
pub mod error;
pub mod registry;
pub mod scoring;

pub use answers::{AnswerSet, parse_answers};
pub use registry::{Question, get_question, questions, score_max};
pub use scoring::{evaluate, normalize};
