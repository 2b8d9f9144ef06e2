//! GitHub integration
//!
//! - URL parsing and normalization
//! - Repository creation through the REST API

mod client;
mod url;

pub use client::*;
pub use url::*;
