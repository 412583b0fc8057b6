//! # dnsscope-cli
//!
//! Command-line interface for the dnsscope analysis engine.
//!
//! ## Features
//!
//! - **Full analysis**: records, security posture, resolver health and heuristics in one run
//! - **Single components**: `records`, `security`, `health`, `wildcard`, `trace`
//! - **Educational mode**: `--explain` describes every probe before it runs
//! - **Multiple output formats**: Pretty tables, JSON, YAML

pub mod cli;
pub mod config;
pub mod education;
pub mod output;

pub use cli::run;
