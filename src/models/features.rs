//! Wine chemistry features and the vector fed to the classifier.

use std::collections::HashMap;
use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Number of measurements the classifier was trained on.
pub const FEATURE_COUNT: usize = 11;

/// One chemical measurement of a wine sample.
///
/// Variants are declared in the order the classifier was trained on;
/// [`Feature::ALL`] and [`FeatureVector`] rely on that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Tartaric acid content (g/L)
    FixedAcidity,
    /// Acetic acid content (g/L)
    VolatileAcidity,
    /// Citric acid content (g/L)
    CitricAcid,
    /// Sugar left after fermentation (g/L)
    ResidualSugar,
    /// Sodium chloride content (g/L)
    Chlorides,
    /// Unbound SO2 (mg/L)
    FreeSulfurDioxide,
    /// Free plus bound SO2 (mg/L)
    TotalSulfurDioxide,
    /// Density (g/cm³)
    Density,
    /// Acidity on the pH scale
    Ph,
    /// Potassium sulphate content (g/L)
    Sulphates,
    /// Alcohol by volume (%)
    Alcohol,
}

impl Feature {
    /// All features in trained order.
    pub const ALL: [Self; FEATURE_COUNT] = [
        Self::FixedAcidity,
        Self::VolatileAcidity,
        Self::CitricAcid,
        Self::ResidualSugar,
        Self::Chlorides,
        Self::FreeSulfurDioxide,
        Self::TotalSulfurDioxide,
        Self::Density,
        Self::Ph,
        Self::Sulphates,
        Self::Alcohol,
    ];

    /// Position of this feature in the trained order.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable name used in tables and advice messages.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::FixedAcidity => "Fixed Acidity",
            Self::VolatileAcidity => "Volatile Acidity",
            Self::CitricAcid => "Citric Acid",
            Self::ResidualSugar => "Residual Sugar",
            Self::Chlorides => "Chlorides",
            Self::FreeSulfurDioxide => "Free Sulfur Dioxide",
            Self::TotalSulfurDioxide => "Total Sulfur Dioxide",
            Self::Density => "Density",
            Self::Ph => "pH",
            Self::Sulphates => "Sulphates",
            Self::Alcohol => "Alcohol",
        }
    }

    /// Label shown next to the form input.
    pub const fn input_label(self) -> &'static str {
        match self {
            Self::Alcohol => "Alcohol (%)",
            other => other.display_name(),
        }
    }

    /// Stable key used in JSON payloads and on the command line.
    pub const fn key(self) -> &'static str {
        match self {
            Self::FixedAcidity => "fixed_acidity",
            Self::VolatileAcidity => "volatile_acidity",
            Self::CitricAcid => "citric_acid",
            Self::ResidualSugar => "residual_sugar",
            Self::Chlorides => "chlorides",
            Self::FreeSulfurDioxide => "free_sulfur_dioxide",
            Self::TotalSulfurDioxide => "total_sulfur_dioxide",
            Self::Density => "density",
            Self::Ph => "ph",
            Self::Sulphates => "sulphates",
            Self::Alcohol => "alcohol",
        }
    }

    /// Value pre-filled in the form.
    pub const fn default_value(self) -> f64 {
        match self {
            Self::FixedAcidity => 7.4,
            Self::VolatileAcidity => 0.7,
            Self::CitricAcid => 0.0,
            Self::ResidualSugar => 1.9,
            Self::Chlorides => 0.076,
            Self::FreeSulfurDioxide => 11.0,
            Self::TotalSulfurDioxide => 34.0,
            Self::Density => 0.9978,
            Self::Ph => 3.51,
            Self::Sulphates => 0.56,
            Self::Alcohol => 9.4,
        }
    }

    /// Number of decimals the form displays.
    pub const fn display_precision(self) -> u8 {
        match self {
            Self::Density => 5,
            _ => 2,
        }
    }

    /// Looks a feature up by its JSON key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The eleven raw measurements of one sample, in trained order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Builds a vector from values already in trained order.
    pub const fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// The form defaults.
    pub fn defaults() -> Self {
        Self::new(Feature::ALL.map(Feature::default_value))
    }

    /// Builds a vector from keyed inputs.
    ///
    /// Missing keys fall back to the feature default. Values are not range
    /// checked; out-of-domain numbers reach the model unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if a key does not name a known feature.
    pub fn from_inputs(inputs: &HashMap<String, f64>) -> Result<Self> {
        let mut vector = Self::defaults();

        for (key, value) in inputs {
            let Some(feature) = Feature::from_key(key) else {
                anyhow::bail!("Unknown feature '{key}'");
            };
            vector.values[feature.index()] = *value;
        }

        Ok(vector)
    }

    /// Value of a single feature.
    pub const fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    /// Raw values in trained order.
    pub const fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Iterates `(feature, value)` pairs in trained order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.into_iter().map(|f| (f, self.get(f)))
    }

    /// Notes about values that cannot occur in a real sample.
    ///
    /// These are advisory only and never block a prediction.
    pub fn implausible_values(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, value)| *value < 0.0)
            .map(|(feature, value)| {
                format!("{feature} is {value}, which is not physically possible.")
            })
            .collect()
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::defaults()
    }
}
