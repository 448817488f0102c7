//! Shared test fixtures for integration tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::{Path, PathBuf};

use winecheck::models::{Feature, QualityLabel, FEATURE_COUNT};
use winecheck::predictor::{Classifier, QualityModel, StandardScaler};

/// Probability of "good" the fake model reports for good samples.
pub const FAKE_GOOD_PROBABILITY: f64 = 0.9;

/// Probability of "good" the fake model reports for other samples.
pub const FAKE_NOT_GOOD_PROBABILITY: f64 = 0.3;

/// Deterministic stand-in for a trained model.
///
/// Leaves values unscaled and calls a wine good when alcohol is at least 11%.
pub struct FakeModel;

impl FakeModel {
    fn is_good(scaled: &[f64; FEATURE_COUNT]) -> bool {
        scaled[Feature::Alcohol.index()] >= 11.0
    }
}

impl QualityModel for FakeModel {
    fn transform(&self, raw: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        *raw
    }

    fn predict_label(&self, scaled: &[f64; FEATURE_COUNT]) -> QualityLabel {
        if Self::is_good(scaled) {
            QualityLabel::Good
        } else {
            QualityLabel::NotGood
        }
    }

    fn predict_probability(&self, scaled: &[f64; FEATURE_COUNT]) -> [f64; 2] {
        let p_good = if Self::is_good(scaled) {
            FAKE_GOOD_PROBABILITY
        } else {
            FAKE_NOT_GOOD_PROBABILITY
        };
        [1.0 - p_good, p_good]
    }
}

/// Sample with every measurement inside its ideal range.
pub fn in_range_inputs() -> serde_json::Value {
    serde_json::json!({
        "fixed_acidity": 7.5,
        "volatile_acidity": 0.4,
        "citric_acid": 0.4,
        "residual_sugar": 2.0,
        "chlorides": 0.06,
        "free_sulfur_dioxide": 20.0,
        "total_sulfur_dioxide": 50.0,
        "density": 0.995,
        "ph": 3.3,
        "sulphates": 0.7,
        "alcohol": 11.5
    })
}

/// Writes a scaler/classifier pair that keys only on alcohol.
///
/// Returns `(scaler_path, model_path)`.
pub fn write_artifacts(dir: &Path) -> (PathBuf, PathBuf) {
    let scaler = StandardScaler {
        mean: vec![0.0; FEATURE_COUNT],
        scale: vec![1.0; FEATURE_COUNT],
    };

    let mut coefficients = vec![0.0; FEATURE_COUNT];
    coefficients[Feature::Alcohol.index()] = 2.0;
    let classifier = Classifier::LogisticRegression {
        coefficients,
        intercept: -22.0,
    };

    let scaler_path = dir.join("scaler.json");
    let model_path = dir.join("wine_model.json");
    fs::write(&scaler_path, serde_json::to_string_pretty(&scaler).unwrap())
        .expect("Failed to write scaler");
    fs::write(&model_path, serde_json::to_string_pretty(&classifier).unwrap())
        .expect("Failed to write model");

    (scaler_path, model_path)
}
