//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and version information.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Wine Quality Checker";

/// The binary name of the application (used in command examples, lowercase with hyphens).
pub const APP_BINARY_NAME: &str = "winecheck";

/// Directory name under the platform config directory.
pub const APP_CONFIG_DIR: &str = "WineQualityChecker";

/// Recommendation shown alongside a good prediction.
pub const GOOD_RECOMMENDATION: &str =
    "You can label and market this wine as part of your premium collection.";
