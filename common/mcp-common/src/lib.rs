//! MCP Common - shared plumbing for the MCP servers in this workspace
//!
//! - **Tracing**: [`init_tracing`] wires `tracing-subscriber` to stderr
//! - **Envelopes**: [`envelope`], [`json_success`] and [`error_envelope`]
//!   turn handler results into `CallToolResult`s that never fault the transport
//! - **Embedding**: [`EmbeddableMcp`] for calling tools in-process
//!
//! ```rust,ignore
//! use mcp_common::envelope;
//!
//! #[tool(description = "Fetch an issue")]
//! async fn get_issue(&self, Parameters(p): Parameters<GetIssueParams>)
//!     -> Result<CallToolResult, McpError>
//! {
//!     Ok(envelope(handlers::get_issue(&self.client, p).await))
//! }
//! ```

pub mod embeddable;
pub mod envelope;
pub mod init;

pub use embeddable::{decode_params, EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use envelope::{envelope, error_envelope, is_error, json_success, result_text};
pub use init::{init_tracing, LogFormat};

pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

pub use async_trait::async_trait;
