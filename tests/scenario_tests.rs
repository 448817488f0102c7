//! End-to-end checks of the decision logic without the web layer.

use std::sync::Arc;

use winecheck::advisory::explain;
use winecheck::models::{Feature, FeatureVector, QualityLabel, RANGE_TABLE};
use winecheck::predictor::Predictor;
use winecheck::session::SessionWineList;

mod fixtures;
use fixtures::{write_artifacts, FakeModel, FAKE_GOOD_PROBABILITY};

fn in_range_sample() -> FeatureVector {
    FeatureVector::new([
        7.5, 0.4, 0.4, 2.0, 0.06, 20.0, 50.0, 0.995, 3.3, 0.7, 11.5,
    ])
}

#[test]
fn test_default_inputs_flag_volatile_acidity() {
    let advice = explain(&FeatureVector::defaults(), &RANGE_TABLE);
    assert!(advice
        .iter()
        .any(|line| line.starts_with("Volatile Acidity is 0.7")));
}

#[test]
fn test_in_range_inputs_have_no_advice_whatever_the_label() {
    let advice = explain(&in_range_sample(), &RANGE_TABLE);
    assert!(advice.is_empty());

    let result = Predictor::new(Arc::new(FakeModel)).predict(&in_range_sample());
    assert_eq!(result.label, QualityLabel::Good);
    assert!((result.confidence - FAKE_GOOD_PROBABILITY * 100.0).abs() < 1e-9);
}

#[test]
fn test_duplicate_names_are_kept_once() {
    let mut list = SessionWineList::new();
    list.append("A");
    list.append("A");
    list.append("B");
    assert_eq!(list.list(), vec!["A", "B"]);
}

#[test]
fn test_clear_empties_the_list() {
    let mut list = SessionWineList::new();
    list.append("X");
    list.clear();
    assert!(list.list().is_empty());
}

#[test]
fn test_logistic_artifacts_from_disk() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let (scaler, model) = write_artifacts(temp_dir.path());
    let predictor = Predictor::load(&scaler, &model).unwrap();

    // Decision value is 2 * alcohol - 22: positive above 11%
    let good = predictor.predict(&in_range_sample());
    assert_eq!(good.label, QualityLabel::Good);
    let expected = 100.0 / (1.0 + (-1.0_f64).exp());
    assert!((good.confidence - expected).abs() < 1e-9);

    let mut values = *in_range_sample().as_array();
    values[Feature::Alcohol.index()] = 9.0;
    let bad = predictor.predict(&FeatureVector::new(values));
    assert_eq!(bad.label, QualityLabel::NotGood);
    assert!(bad.confidence > 50.0 && bad.confidence <= 100.0);
}

fn shipped_predictor() -> Predictor {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    Predictor::load(
        &root.join("artifacts/scaler.json"),
        &root.join("artifacts/wine_model.json"),
    )
    .unwrap()
}

#[test]
fn test_shipped_artifacts_load() {
    let predictor = shipped_predictor();

    let result = predictor.predict(&FeatureVector::defaults());
    assert_eq!(result.label, QualityLabel::NotGood);
    assert!((0.0..=100.0).contains(&result.confidence));
}

#[test]
fn test_extreme_inputs_keep_confidence_in_bounds() {
    let predictor = shipped_predictor();

    // Opposite-signed weights overflow to +inf and -inf
    let mut values = *FeatureVector::defaults().as_array();
    values[Feature::VolatileAcidity.index()] = 1e308;
    values[Feature::Sulphates.index()] = 1e308;
    let result = predictor.predict(&FeatureVector::new(values));

    assert_eq!(result.label, QualityLabel::NotGood);
    assert!((0.0..=100.0).contains(&result.confidence));
    let json = serde_json::to_value(result).unwrap();
    assert!(json["confidence"].is_number());

    for value in [1e308, -1e308] {
        let result = predictor.predict(&FeatureVector::new([value; 11]));
        assert!((0.0..=100.0).contains(&result.confidence));
    }
}
