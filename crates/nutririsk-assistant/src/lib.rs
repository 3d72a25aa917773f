//! nutririsk-assistant
//!
//! Composition root of the nutritional assistant. Evaluates questionnaire
//! answers, asks an injected external classifier for a second opinion, and
//! falls back to the questionnaire label whenever the classifier cannot
//! answer.

pub mod assistant;
pub mod classifier;
pub mod error;

pub use assistant::{AssistantResponse, NutritionAssistant, PredictionSource};
pub use classifier::{ClassifierError, LazyModel, RiskModel};
pub use error::AssistantError;
