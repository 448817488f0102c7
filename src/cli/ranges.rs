//! Ideal values table command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::models::{ranges, RANGES_NOTE, RANGE_TABLE};

/// Print the ideal chemical ranges for good quality wine
#[derive(Debug, Clone, Args)]
pub struct RangesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct RangeRow {
    feature: &'static str,
    low: f64,
    high: f64,
    #[serde(skip_serializing_if = "str::is_empty")]
    unit: &'static str,
    rationale: &'static str,
}

#[derive(Debug, Serialize)]
struct RangesOutput {
    ranges: Vec<RangeRow>,
    note: &'static str,
}

impl RangesArgs {
    /// Execute the ranges command
    pub fn execute(&self) -> Result<()> {
        if !self.json {
            print!("{}", ranges::render_markdown());
            return Ok(());
        }

        let output = RangesOutput {
            ranges: RANGE_TABLE
                .iter()
                .map(|r| RangeRow {
                    feature: r.feature.key(),
                    low: r.low,
                    high: r.high,
                    unit: r.unit,
                    rationale: r.rationale,
                })
                .collect(),
            note: RANGES_NOTE,
        };

        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize JSON")?
        );
        Ok(())
    }
}
