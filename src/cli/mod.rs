// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for the bridge.
//!
//! This module contains the command-line interface logic: argument parsing,
//! console diagnostics, and the driver that prints the result document.

// Modules
/// CLI arguments.
pub mod args;

/// Console diagnostics.
pub mod logging;

/// Driver logic.
pub mod run;
