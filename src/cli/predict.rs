//! One-off prediction command.

use std::collections::HashMap;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::advisory::{self, CLOSE_TO_IDEAL};
use crate::config::Config;
use crate::constants::GOOD_RECOMMENDATION;
use crate::models::{FeatureVector, QualityLabel, RANGE_TABLE};
use crate::predictor::Predictor;

/// Predict the quality of a single sample
#[derive(Debug, Clone, Args)]
pub struct PredictArgs {
    /// Override a measurement, e.g. `--set alcohol=12.5` (repeatable).
    /// Unset measurements use the form defaults.
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub values: Vec<(String, f64)>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct PredictOutput {
    label: QualityLabel,
    confidence: f64,
    warnings: Vec<String>,
    advice: Vec<String>,
}

impl PredictArgs {
    /// Execute the predict command
    pub fn execute(&self, config: &Config) -> Result<()> {
        let inputs: HashMap<String, f64> = self.values.iter().cloned().collect();
        let vector = FeatureVector::from_inputs(&inputs)?;

        let predictor = Predictor::load(&config.paths.scaler, &config.paths.model)?;
        let result = predictor.predict(&vector);

        let advice = if result.label.is_good() {
            Vec::new()
        } else {
            advisory::explain(&vector, &RANGE_TABLE)
        };

        let output = PredictOutput {
            label: result.label,
            confidence: result.confidence,
            warnings: vector.implausible_values(),
            advice,
        };

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&output).context("Failed to serialize JSON")?
            );
            return Ok(());
        }

        for warning in &output.warnings {
            println!("Warning: {warning}");
        }

        if result.label.is_good() {
            println!("✓ This wine is GOOD quality!");
            println!("Confidence: {}", result.confidence_display());
            println!("Recommendation: {GOOD_RECOMMENDATION}");
        } else {
            println!("✗ This wine is NOT good quality.");
            println!("Confidence: {}", result.confidence_display());
            if output.advice.is_empty() {
                println!("{CLOSE_TO_IDEAL}");
            } else {
                println!();
                println!("Possible reasons why this wine is not good quality:");
                for line in &output.advice {
                    println!("  - {line}");
                }
            }
        }

        Ok(())
    }
}

/// Parses `key=value` into a feature key and finite number.
fn parse_assignment(raw: &str) -> Result<(String, f64), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("invalid number '{}': {e}", value.trim()))?;
    if !value.is_finite() {
        return Err(format!("value for '{}' must be a finite number", key.trim()));
    }
    Ok((key.trim().to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("alcohol=12.5").unwrap(),
            ("alcohol".to_string(), 12.5)
        );
        assert_eq!(
            parse_assignment(" ph = 3.3 ").unwrap(),
            ("ph".to_string(), 3.3)
        );
    }

    #[test]
    fn test_parse_assignment_errors() {
        assert!(parse_assignment("alcohol").is_err());
        assert!(parse_assignment("alcohol=strong").is_err());
        assert!(parse_assignment("alcohol=nan").is_err());
        assert!(parse_assignment("alcohol=inf").is_err());
    }
}
