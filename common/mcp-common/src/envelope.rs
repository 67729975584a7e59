//! Response envelopes for MCP tool calls
//!
//! Every tool answers with a `CallToolResult`. Successful payloads are
//! pretty-printed JSON with `is_error` unset; failures carry
//! a human-readable message with `is_error = true`. Clients must treat the
//! flag, not the payload shape, as authoritative.

use std::fmt::Display;

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

/// Wrap serializable data as a pretty-printed JSON success envelope
///
/// Serialization failures are reported as an error envelope instead of a
/// protocol fault, so the caller always receives a `CallToolResult`.
pub fn json_success<T: Serialize>(data: &T) -> CallToolResult {
    match serde_json::to_string_pretty(data) {
        Ok(json) => CallToolResult::success(vec![Content::text(json)]),
        Err(e) => error_envelope(format!("failed to serialize response: {}", e)),
    }
}

/// Build an error envelope carrying `message`
pub fn error_envelope(message: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {}", message.into()))])
}

/// Fold a handler result into the uniform envelope
///
/// ```rust,ignore
/// let outcome = handlers::get_issue(&client, params).await;
/// Ok(mcp_common::envelope(outcome))
/// ```
pub fn envelope<T, E>(result: Result<T, E>) -> CallToolResult
where
    T: Serialize,
    E: Display,
{
    match result {
        Ok(data) => json_success(&data),
        Err(e) => {
            tracing::debug!(error = %e, "tool call failed");
            error_envelope(e.to_string())
        }
    }
}

/// Returns the concatenated text of every text item in a result
///
/// Handy for in-process callers and tests that want the payload back.
pub fn result_text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| match &c.raw {
            rmcp::model::RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// True when the result is an error envelope
pub fn is_error(result: &CallToolResult) -> bool {
    result.is_error.unwrap_or(false)
}
