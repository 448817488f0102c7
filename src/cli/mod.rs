//! Command-line handlers.
//!
//! Headless access to the same logic the form uses, for scripting and quick
//! checks without starting the server.

pub mod config;
pub mod predict;
pub mod ranges;

pub use config::ConfigArgs;
pub use predict::PredictArgs;
pub use ranges::RangesArgs;
