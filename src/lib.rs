//! Wine Quality Checker Library
//!
//! This library provides the decision logic behind the wine quality form:
//! the ideal range table, the prediction adapter over a fitted scaler and
//! classifier, the advisory engine, and per-session lists of good wines.

// Module declarations
pub mod advisory;
pub mod cli;
pub mod config;
pub mod constants;
pub mod models;
pub mod predictor;
pub mod session;
#[cfg(feature = "web")]
pub mod web;
