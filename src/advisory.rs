//! Advice for wines predicted not to be good quality.
//!
//! Each input is compared to its ideal range; every value outside the range
//! produces one message. Messages follow the range table order, not the size
//! of the deviation.

use serde::Serialize;

use crate::models::{Feature, FeatureVector, RangeEntry};

/// Shown when a not-good wine has no out-of-range measurements.
pub const CLOSE_TO_IDEAL: &str =
    "This wine is close to ideal ranges. Minor tuning may still improve it.";

/// Which side of the ideal range a value falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Value is lower than the range
    Below,
    /// Value is higher than the range
    Above,
}

/// One measurement outside its ideal range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deviation {
    /// Offending feature
    pub feature: Feature,
    /// Value supplied by the user
    pub value: f64,
    /// Ideal lower bound
    pub low: f64,
    /// Ideal upper bound
    pub high: f64,
    /// Side of the range the value falls on
    pub direction: Direction,
}

impl Deviation {
    /// Human-readable advice line.
    ///
    /// Numbers keep a decimal point (`13.0`, not `13`).
    pub fn message(&self) -> String {
        format!(
            "{} is {:?} but should be between {:?} and {:?}.",
            self.feature, self.value, self.low, self.high
        )
    }
}

/// Finds every input outside its range, in table order.
pub fn deviations(inputs: &FeatureVector, ranges: &[RangeEntry]) -> Vec<Deviation> {
    ranges
        .iter()
        .filter_map(|range| {
            let value = inputs.get(range.feature);
            if range.contains(value) {
                return None;
            }
            let direction = if value < range.low {
                Direction::Below
            } else {
                Direction::Above
            };
            Some(Deviation {
                feature: range.feature,
                value,
                low: range.low,
                high: range.high,
                direction,
            })
        })
        .collect()
}

/// Advice messages for every out-of-range input.
///
/// Empty when every value is within its inclusive range; the caller then
/// shows [`CLOSE_TO_IDEAL`].
pub fn explain(inputs: &FeatureVector, ranges: &[RangeEntry]) -> Vec<String> {
    deviations(inputs, ranges)
        .iter()
        .map(Deviation::message)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RANGE_TABLE;

    fn in_range_sample() -> FeatureVector {
        FeatureVector::new([
            7.5, 0.4, 0.4, 2.0, 0.06, 20.0, 50.0, 0.995, 3.3, 0.7, 11.5,
        ])
    }

    #[test]
    fn test_defaults_flag_volatile_acidity() {
        let advice = explain(&FeatureVector::defaults(), &RANGE_TABLE);
        assert!(advice.contains(&"Volatile Acidity is 0.7 but should be between 0.25 and 0.55.".to_string()));
    }

    #[test]
    fn test_defaults_full_advice_in_table_order() {
        let found: Vec<Feature> = deviations(&FeatureVector::defaults(), &RANGE_TABLE)
            .iter()
            .map(|d| d.feature)
            .collect();
        assert_eq!(
            found,
            vec![
                Feature::VolatileAcidity,
                Feature::CitricAcid,
                Feature::Chlorides,
                Feature::Density,
                Feature::Ph,
                Feature::Sulphates,
                Feature::Alcohol,
            ]
        );
    }

    #[test]
    fn test_in_range_sample_has_no_advice() {
        assert!(explain(&in_range_sample(), &RANGE_TABLE).is_empty());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let lows = FeatureVector::new(RANGE_TABLE.map(|r| r.low));
        let highs = FeatureVector::new(RANGE_TABLE.map(|r| r.high));
        assert!(explain(&lows, &RANGE_TABLE).is_empty());
        assert!(explain(&highs, &RANGE_TABLE).is_empty());
    }

    #[test]
    fn test_empty_iff_all_in_range() {
        for feature in Feature::ALL {
            let mut values = *in_range_sample().as_array();
            values[feature.index()] = 1000.0;
            let advice = explain(&FeatureVector::new(values), &RANGE_TABLE);
            assert_eq!(advice.len(), 1, "{feature} should be flagged");
            assert!(advice[0].starts_with(feature.display_name()));
        }
    }

    #[test]
    fn test_direction() {
        let mut values = *in_range_sample().as_array();
        values[Feature::Alcohol.index()] = 9.0;
        values[Feature::Ph.index()] = 3.9;

        let found = deviations(&FeatureVector::new(values), &RANGE_TABLE);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].feature, Feature::Ph);
        assert_eq!(found[0].direction, Direction::Above);
        assert_eq!(found[1].feature, Feature::Alcohol);
        assert_eq!(found[1].direction, Direction::Below);
    }

    #[test]
    fn test_message_format_for_whole_numbers() {
        let mut values = *in_range_sample().as_array();
        values[Feature::FreeSulfurDioxide.index()] = 45.0;
        let advice = explain(&FeatureVector::new(values), &RANGE_TABLE);
        assert_eq!(
            advice,
            vec!["Free Sulfur Dioxide is 45.0 but should be between 10.0 and 30.0.".to_string()]
        );
    }

    #[test]
    fn test_message_keeps_decimal_point_on_bounds() {
        let mut values = *in_range_sample().as_array();
        values[Feature::Alcohol.index()] = 9.4;
        values[Feature::ResidualSugar.index()] = 3.5;
        let advice = explain(&FeatureVector::new(values), &RANGE_TABLE);
        assert_eq!(
            advice,
            vec![
                "Residual Sugar is 3.5 but should be between 1.5 and 3.0.".to_string(),
                "Alcohol is 9.4 but should be between 10.5 and 13.0.".to_string(),
            ]
        );
    }
}
