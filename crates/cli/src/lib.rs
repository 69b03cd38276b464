//! CLI tool for consistent hash rings.
//!
//! Provides commands for:
//! - Looking keys up on a ring built from flags or a JSON config
//! - Measuring the migration ratio of a membership change
//! - Inspecting per-node ring ownership

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
