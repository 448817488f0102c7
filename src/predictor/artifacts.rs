//! Fitted scaler and classifier artifacts.
//!
//! Both artifacts are JSON documents produced by an offline training run:
//!
//! - `scaler.json`: `{ "mean": [..11], "scale": [..11] }`
//! - `wine_model.json`: `{ "kind": "logistic_regression", "coefficients": [..11], "intercept": b }`
//!
//! They are loaded once at startup and are read-only afterwards.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use super::QualityModel;
use crate::models::{QualityLabel, FEATURE_COUNT};

/// Failure to load a scaler or classifier artifact.
///
/// Any of these is fatal: no prediction can be made without both artifacts.
#[derive(Debug)]
pub enum LoadError {
    /// Artifact file does not exist
    NotFound(PathBuf),
    /// Artifact file exists but could not be read
    Io {
        /// Artifact path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
    /// Artifact file is not valid JSON for its schema
    Parse {
        /// Artifact path
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },
    /// Artifact parsed but its contents are unusable
    Invalid {
        /// Artifact path
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "Model artifact not found: {}", path.display()),
            Self::Io { path, .. } => {
                write!(f, "Failed to read model artifact: {}", path.display())
            }
            Self::Parse { path, .. } => {
                write!(f, "Failed to parse model artifact: {}", path.display())
            }
            Self::Invalid { path, reason } => {
                write!(f, "Invalid model artifact {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::NotFound(_) | Self::Invalid { .. } => None,
        }
    }
}

/// Per-feature standardization fitted on the training set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Training mean of each feature
    pub mean: Vec<f64>,
    /// Training standard deviation of each feature
    pub scale: Vec<f64>,
}

impl StandardScaler {
    fn validate(&self) -> Result<(), String> {
        if self.mean.len() != FEATURE_COUNT {
            return Err(format!(
                "expected {FEATURE_COUNT} means, found {}",
                self.mean.len()
            ));
        }
        if self.scale.len() != FEATURE_COUNT {
            return Err(format!(
                "expected {FEATURE_COUNT} scales, found {}",
                self.scale.len()
            ));
        }
        if let Some(i) = self.scale.iter().position(|s| !s.is_finite() || *s <= 0.0) {
            return Err(format!("scale at index {i} must be positive"));
        }
        Ok(())
    }

    /// Applies `(x - mean) / scale` to every feature.
    pub fn transform(&self, raw: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut scaled = [0.0; FEATURE_COUNT];
        for (i, out) in scaled.iter_mut().enumerate() {
            *out = (raw[i] - self.mean[i]) / self.scale[i];
        }
        scaled
    }
}

/// Fitted binary classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    /// Logistic regression over the scaled features
    LogisticRegression {
        /// Weight per feature
        coefficients: Vec<f64>,
        /// Bias term
        intercept: f64,
    },
}

impl Classifier {
    fn validate(&self) -> Result<(), String> {
        match self {
            Self::LogisticRegression { coefficients, .. } => {
                if coefficients.len() != FEATURE_COUNT {
                    return Err(format!(
                        "expected {FEATURE_COUNT} coefficients, found {}",
                        coefficients.len()
                    ));
                }
                Ok(())
            }
        }
    }

    /// Raw decision value; positive means class 1.
    pub fn decision_function(&self, scaled: &[f64; FEATURE_COUNT]) -> f64 {
        match self {
            Self::LogisticRegression {
                coefficients,
                intercept,
            } => {
                let dot: f64 = coefficients
                    .iter()
                    .zip(scaled.iter())
                    .map(|(w, x)| w * x)
                    .sum();
                dot + intercept
            }
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Scaler and classifier loaded from disk.
#[derive(Debug, Clone)]
pub struct ArtifactModel {
    scaler: StandardScaler,
    classifier: Classifier,
}

impl ArtifactModel {
    /// Loads the scaler and classifier artifacts.
    ///
    /// The SHA-256 of each file is logged so a deployment can be matched to
    /// the training run that produced it.
    pub fn load(scaler_path: &Path, model_path: &Path) -> Result<Self, LoadError> {
        let scaler: StandardScaler = read_artifact(scaler_path)?;
        let classifier: Classifier = read_artifact(model_path)?;
        Self::from_parts(scaler, scaler_path, classifier, model_path)
    }

    /// Validates parsed artifacts, blaming the file each one came from.
    fn from_parts(
        scaler: StandardScaler,
        scaler_path: &Path,
        classifier: Classifier,
        model_path: &Path,
    ) -> Result<Self, LoadError> {
        scaler.validate().map_err(|reason| LoadError::Invalid {
            path: scaler_path.to_path_buf(),
            reason,
        })?;
        classifier.validate().map_err(|reason| LoadError::Invalid {
            path: model_path.to_path_buf(),
            reason,
        })?;
        Ok(Self { scaler, classifier })
    }

    /// Decision value with NaN folded to the tie point.
    ///
    /// Extreme inputs can overflow opposite terms to `+inf` and `-inf`, whose
    /// sum is NaN. A tie is NotGood at 50%, so label and probability agree.
    fn decision(&self, scaled: &[f64; FEATURE_COUNT]) -> f64 {
        let z = self.classifier.decision_function(scaled);
        if z.is_nan() {
            0.0
        } else {
            z
        }
    }
}

impl QualityModel for ArtifactModel {
    fn transform(&self, raw: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        self.scaler.transform(raw)
    }

    fn predict_label(&self, scaled: &[f64; FEATURE_COUNT]) -> QualityLabel {
        if self.decision(scaled) > 0.0 {
            QualityLabel::Good
        } else {
            QualityLabel::NotGood
        }
    }

    fn predict_probability(&self, scaled: &[f64; FEATURE_COUNT]) -> [f64; 2] {
        let p_good = sigmoid(self.decision(scaled));
        [1.0 - p_good, p_good]
    }
}

/// Reads and deserializes one artifact, logging its fingerprint.
fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "Loaded artifact {} (sha256 {})",
        path.display(),
        fingerprint(&bytes)
    );

    serde_json::from_slice(&bytes).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Hex-encoded SHA-256 of an artifact's bytes.
pub fn fingerprint(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
