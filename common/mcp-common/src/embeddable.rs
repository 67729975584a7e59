//! In-process tool dispatch
//!
//! [`EmbeddableMcp`] lets a host (or a test) list and invoke a server's
//! tools by name with a JSON argument object, without going through a
//! transport. Argument decoding happens before the tool body runs, so a
//! malformed call never reaches the network.

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

/// Failures of the dispatch itself, as opposed to tool failures
///
/// Tool failures are reported inside the returned `CallToolResult` as an
/// error envelope; these variants only cover calls that could not be
/// dispatched at all.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Arguments did not match the tool's schema
    #[error("invalid parameters: {0}")]
    InvalidParams(#[from] serde_json::Error),

    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::McpError(err.message.to_string())
    }
}

pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// An MCP server whose tools can be called directly
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Name used in MCP configuration files
    fn server_name(&self) -> &str;

    fn list_tools(&self) -> Vec<Tool>;

    /// Decode `params` for tool `name` and run it
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    fn server_description(&self) -> Option<&str> {
        None
    }
}

/// Decode a tool's argument object, treating `null` as `{}`
///
/// MCP clients send no `arguments` at all for parameterless calls.
pub fn decode_params<T: serde::de::DeserializeOwned>(params: Value) -> EmbeddableResult<T> {
    let params = match params {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    Ok(serde_json::from_value(params)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Paging {
        limit: Option<u32>,
    }

    #[derive(Debug, Deserialize)]
    struct Lookup {
        #[allow(dead_code)]
        id: u64,
    }

    #[test]
    fn test_decode_null_as_empty_object() {
        let paging: Paging = decode_params(Value::Null).unwrap();
        assert!(paging.limit.is_none());
    }

    #[test]
    fn test_decode_missing_required_field() {
        let result: EmbeddableResult<Lookup> = decode_params(serde_json::json!({}));
        assert!(matches!(result, Err(EmbeddableError::InvalidParams(_))));
    }

    #[test]
    fn test_decode_wrong_type() {
        let result: EmbeddableResult<Lookup> = decode_params(serde_json::json!({ "id": "seven" }));
        assert!(matches!(result, Err(EmbeddableError::InvalidParams(_))));
    }
}
