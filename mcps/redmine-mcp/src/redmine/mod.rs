//! Redmine REST API access
//!
//! HTTP client and error types for one Redmine instance.

pub mod client;
pub mod error;

pub use client::{encode_query, Payload, RedmineClient};
pub use error::{ensure_positive, RedmineError, RedmineResult};
