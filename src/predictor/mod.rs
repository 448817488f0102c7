//! Prediction adapter over a fitted scaler and binary classifier.
//!
//! The model is reached through the [`QualityModel`] capability trait so the
//! adapter can run against the real artifacts or against a test double.

pub mod artifacts;

use std::sync::Arc;

use tracing::debug;

use crate::models::{FeatureVector, PredictionResult, QualityLabel, FEATURE_COUNT};

pub use artifacts::{ArtifactModel, Classifier, LoadError, StandardScaler};

/// What the adapter needs from a trained model.
pub trait QualityModel: Send + Sync {
    /// Scales raw measurements the way the training data was scaled.
    fn transform(&self, raw: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT];

    /// Predicts the discrete label for a scaled sample.
    fn predict_label(&self, scaled: &[f64; FEATURE_COUNT]) -> QualityLabel;

    /// Class probabilities `[p(not good), p(good)]` for a scaled sample.
    fn predict_probability(&self, scaled: &[f64; FEATURE_COUNT]) -> [f64; 2];
}

/// Turns raw feature vectors into labelled predictions.
///
/// Cheap to clone; the model is shared and never mutated after load.
#[derive(Clone)]
pub struct Predictor {
    model: Arc<dyn QualityModel>,
}

impl Predictor {
    /// Wraps an already-loaded model.
    pub fn new(model: Arc<dyn QualityModel>) -> Self {
        Self { model }
    }

    /// Loads the scaler and classifier artifacts from disk.
    pub fn load(
        scaler_path: &std::path::Path,
        model_path: &std::path::Path,
    ) -> Result<Self, LoadError> {
        let model = ArtifactModel::load(scaler_path, model_path)?;
        Ok(Self::new(Arc::new(model)))
    }

    /// Predicts the quality label of a sample.
    ///
    /// Values are not validated; whatever the user typed reaches the model.
    pub fn predict(&self, vector: &FeatureVector) -> PredictionResult {
        let scaled = self.model.transform(vector.as_array());
        let label = self.model.predict_label(&scaled);
        let probabilities = self.model.predict_probability(&scaled);
        let result = PredictionResult::from_probabilities(label, probabilities);

        debug!(
            "Predicted {} with {} confidence",
            result.label,
            result.confidence_display()
        );

        result
    }
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor").finish_non_exhaustive()
    }
}
