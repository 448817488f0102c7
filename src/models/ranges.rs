//! Ideal chemical ranges for good quality red wine.
//!
//! The table is derived from red wines rated 7 or higher and is used both as
//! reference material for the user and by the advisory engine.

use std::fmt::Write;

use serde::Serialize;

use super::features::{Feature, FEATURE_COUNT};

/// Note shown underneath the ideal values table.
pub const RANGES_NOTE: &str = "These ranges are based on data from red wines rated 7 or higher. \
     Matching these values improves your chance of a good quality prediction.";

/// Inclusive ideal interval for one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeEntry {
    /// Feature the interval applies to
    pub feature: Feature,
    /// Lowest ideal value (inclusive)
    pub low: f64,
    /// Highest ideal value (inclusive)
    pub high: f64,
    /// Measurement unit, empty when dimensionless or unspecified
    pub unit: &'static str,
    /// Why the measurement matters for quality
    pub rationale: &'static str,
}

impl RangeEntry {
    const fn new(
        feature: Feature,
        low: f64,
        high: f64,
        unit: &'static str,
        rationale: &'static str,
    ) -> Self {
        Self {
            feature,
            low,
            high,
            unit,
            rationale,
        }
    }

    /// Returns true if `value` lies within `[low, high]`.
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// The ideal ranges, one per feature, in trained order.
pub const RANGE_TABLE: [RangeEntry; FEATURE_COUNT] = [
    RangeEntry::new(Feature::FixedAcidity, 6.5, 8.5, "", "Adds freshness and structure"),
    RangeEntry::new(Feature::VolatileAcidity, 0.25, 0.55, "", "Avoids sour/vinegar taste"),
    RangeEntry::new(Feature::CitricAcid, 0.30, 0.50, "", "Enhances fruity flavor"),
    RangeEntry::new(Feature::ResidualSugar, 1.5, 3.0, "g/L", "Balances acidity and sweetness"),
    RangeEntry::new(Feature::Chlorides, 0.045, 0.070, "", "Affects saltiness"),
    RangeEntry::new(Feature::FreeSulfurDioxide, 10.0, 30.0, "mg/L", "Prevents spoilage and oxidation"),
    RangeEntry::new(Feature::TotalSulfurDioxide, 30.0, 70.0, "mg/L", "Maintains freshness over time"),
    RangeEntry::new(Feature::Density, 0.994, 0.997, "g/cm³", "Reflects sugar/alcohol balance"),
    RangeEntry::new(Feature::Ph, 3.2, 3.5, "", "Influences taste and stability"),
    RangeEntry::new(Feature::Sulphates, 0.60, 0.80, "", "Affects preservation and flavor"),
    RangeEntry::new(Feature::Alcohol, 10.5, 13.0, "%", "Adds aroma and body"),
];

/// Renders the ideal values table as Markdown.
pub fn render_markdown() -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "### Ideal Chemical Properties for Good Quality Red Wine (Quality >= 7)\n"
    );
    let _ = writeln!(output, "| Feature | Ideal Range / Value | Why It Matters |");
    let _ = writeln!(output, "|---------|---------------------|----------------|");

    for entry in &RANGE_TABLE {
        let unit = if entry.unit.is_empty() {
            String::new()
        } else {
            format!(" {}", entry.unit)
        };
        let _ = writeln!(
            output,
            "| {} | {} – {}{} | {} |",
            entry.feature.display_name(),
            entry.low,
            entry.high,
            unit,
            entry.rationale
        );
    }

    let _ = writeln!(output, "\n{RANGES_NOTE}");
    output
}
