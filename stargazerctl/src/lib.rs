//! Command line client for Stargazer.
//!
//! Validates identifiers locally, then either posts the batch to a running
//! server or, in direct mode, resolves it in-process with
//! [`stargazer_core::StarAggregator`].

pub mod client;
pub mod error;
pub mod render;
pub mod validation;

pub use client::{DirectOptions, StarsClient, resolve_direct};
pub use error::ClientError;
pub use render::{USAGE, render_table};
pub use validation::{validate_repos, validate_server_url};
