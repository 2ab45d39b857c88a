//! Customer retention impact calculator
//!
//! Derives current, improved and impact metrics from a handful of retention
//! inputs, and exports the snapshot to a spreadsheet endpoint or a CSV file.

pub mod config;
pub mod derivation;
pub mod error;
pub mod format;
pub mod inputs;
pub mod shell;
pub mod snapshot;

pub use config::SessionConfig;
pub use derivation::{derive, Insights, Results};
pub use inputs::{CallMetadata, InputField, Inputs};
