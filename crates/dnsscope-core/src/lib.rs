//! Core types and configuration for the dnsscope DNS analysis engine.
//!
//! This crate holds everything the engine shares across its layers without
//! doing any I/O itself:
//!
//! - **Types**: the report data model ([`AnalysisReport`] and its parts)
//! - **Domain input**: [`DomainTarget`], the only fallible step before network I/O
//! - **Configuration**: [`EngineConfig`] and the public [`ResolverPanel`]
//! - **Errors**: [`DnsScopeError`] and the [`Result`] alias
//!
//! # Example
//!
//! ```rust,ignore
//! use dnsscope_core::{DomainTarget, Result};
//!
//! fn check(input: &str) -> Result<()> {
//!     let target = DomainTarget::parse(input)?;
//!     println!("analyzing {target}");
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/dnsscope-core/0.3.0")]

mod config;
mod domain;
mod error;
pub mod types;

pub use config::*;
pub use domain::DomainTarget;
pub use error::{DnsScopeError, Result};
pub use types::*;
