use std::collections::BTreeMap;
use std::sync::OnceLock;

use nutririsk_core::RiskLabel;
use nutririsk_features::FeatureVector;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    #[error("model unavailable: {0}")]
    Unavailable(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// An external risk classifier trained on a fixed feature list.
///
/// Implementations receive vectors already aligned to [`feature_list`],
/// with `None` for every feature the request did not carry.
///
/// [`feature_list`]: RiskModel::feature_list
pub trait RiskModel: Send + Sync {
    /// Feature names the model was trained on, in training order.
    fn feature_list(&self) -> &[String];

    fn predict(&self, features: &FeatureVector) -> Result<RiskLabel, ClassifierError>;

    fn predict_probabilities(
        &self,
        features: &FeatureVector,
    ) -> Result<BTreeMap<RiskLabel, f64>, ClassifierError>;
}

type Loader<M> = Box<dyn Fn() -> Result<M, ClassifierError> + Send + Sync>;

/// A model loaded on first use.
///
/// The loader runs at most once. Its outcome is kept either way, so a model
/// that failed to load stays unavailable instead of being retried on every
/// request.
pub struct LazyModel<M> {
    loader: Loader<M>,
    cell: OnceLock<Result<M, ClassifierError>>,
}

impl<M> LazyModel<M> {
    pub fn new(loader: impl Fn() -> Result<M, ClassifierError> + Send + Sync + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            cell: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Result<&M, ClassifierError> {
        let loaded = self.cell.get_or_init(|| {
            let result = (self.loader)();
            match &result {
                Ok(_) => tracing::info!("risk model loaded"),
                Err(e) => tracing::warn!(error = %e, "risk model failed to load"),
            }
            result
        });
        loaded.as_ref().map_err(Clone::clone)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.cell.get(), Some(Ok(_)))
    }
}

impl<M: RiskModel> RiskModel for LazyModel<M> {
    fn feature_list(&self) -> &[String] {
        self.get().map(|m| m.feature_list()).unwrap_or(&[])
    }

    fn predict(&self, features: &FeatureVector) -> Result<RiskLabel, ClassifierError> {
        self.get()?.predict(features)
    }

    fn predict_probabilities(
        &self,
        features: &FeatureVector,
    ) -> Result<BTreeMap<RiskLabel, f64>, ClassifierError> {
        self.get()?.predict_probabilities(features)
    }
}

impl<M> std::fmt::Debug for LazyModel<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyModel")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
