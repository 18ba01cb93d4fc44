//! Command implementations for concur-bench CLI
//!
//! Each command is organized into its own module.

pub mod check;
pub mod config;
pub mod run;
pub mod version;
