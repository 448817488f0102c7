//! Classifier output types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Binary quality label produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLabel {
    /// Class 0
    NotGood,
    /// Class 1, quality rated 7 or higher
    Good,
}

impl QualityLabel {
    /// Index of this label in the classifier's probability output.
    pub const fn class_index(self) -> usize {
        match self {
            Self::NotGood => 0,
            Self::Good => 1,
        }
    }

    /// Returns true for [`QualityLabel::Good`].
    pub const fn is_good(self) -> bool {
        matches!(self, Self::Good)
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::NotGood => write!(f, "not good"),
        }
    }
}

/// Label plus how sure the classifier is about it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Predicted label
    pub label: QualityLabel,
    /// Probability of `label` as a percentage in `[0, 100]`
    pub confidence: f64,
}

impl PredictionResult {
    /// Builds a result from the class probabilities `[p(not good), p(good)]`.
    ///
    /// Confidence is the probability of `label`, scaled to a percentage and
    /// clamped so that rounding noise never leaves `[0, 100]`. A NaN
    /// probability counts as zero.
    pub fn from_probabilities(label: QualityLabel, probabilities: [f64; 2]) -> Self {
        let probability = probabilities[label.class_index()];
        let probability = if probability.is_nan() { 0.0 } else { probability };
        let confidence = (probability * 100.0).clamp(0.0, 100.0);
        Self { label, confidence }
    }

    /// Confidence formatted with two decimals, e.g. `"87.31%"`.
    pub fn confidence_display(&self) -> String {
        format!("{:.2}%", self.confidence)
    }
}
