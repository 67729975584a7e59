//! Handler implementations for Redmine MCP tools
//!
//! Organized by domain: issue, reference data, attachment. Handlers check
//! arguments before touching the client and return plain `RedmineResult`s;
//! the server folds them into response envelopes.

mod attachment;
mod issue;
mod reference;

pub use attachment::*;
pub use issue::*;
pub use reference::*;

use serde::Serialize;

use crate::redmine::{ensure_positive, RedmineError, RedmineResult};

/// Confirmation for writes that Redmine answers with an empty body
#[derive(Debug, Clone, Serialize)]
pub struct Acknowledgement {
    pub issue_id: u64,
    pub success: bool,
    pub message: String,
}

impl Acknowledgement {
    fn new(issue_id: u64, message: impl Into<String>) -> Self {
        Self {
            issue_id,
            success: true,
            message: message.into(),
        }
    }
}

/// Check an optional id, passing `None` through
fn positive_opt(field: &str, id: Option<u64>) -> RedmineResult<Option<u64>> {
    id.map(|id| ensure_positive(field, id)).transpose()
}

/// Reject blank free-text fields that Redmine requires
fn require_text(field: &str, value: &str) -> RedmineResult<()> {
    if value.trim().is_empty() {
        return Err(RedmineError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}
