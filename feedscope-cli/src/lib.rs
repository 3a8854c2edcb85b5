//! Feedscope CLI
//!
//! Library half of the `feedscope` binary: argument parsing, TOML
//! configuration, tracing setup and report rendering.

pub mod args;
pub mod config;
pub mod error;
pub mod report;
pub mod telemetry;
