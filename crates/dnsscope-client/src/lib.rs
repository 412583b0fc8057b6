//! Outbound adapters for the dnsscope engine.
//!
//! Each collaborator sits behind a trait so the engine can be driven by
//! mocks in tests or by alternative backends:
//!
//! - [`RecordResolver`] / [`HickoryGateway`]: direct record resolution
//! - [`AdvancedQuery`] / [`DigTool`]: the external query tool
//! - [`DohProbe`] / [`DohClient`]: DNS-over-HTTPS reachability

#![doc(html_root_url = "https://docs.rs/dnsscope-client/0.3.0")]

mod doh;
mod query_tool;
mod resolver;

pub use doh::{DohClient, DohClientBuilder, DohProbe};
pub use query_tool::{AdvancedQuery, DigTool, QueryKind, ToolOutput};
pub use resolver::{HickoryGateway, RecordResolver};
pub use dnsscope_core::{DnsScopeError, Result};
