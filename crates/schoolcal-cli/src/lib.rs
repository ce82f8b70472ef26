//! CLI, configuration and output for the school calendar.
//!
//! This crate provides the `schoolcal` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
