//! MCP Server implementation
//!
//! This module defines the main MCP server that exposes Redmine operations
//! as tools. Handler implementations are in the handlers/ module.
//!
//! Every tool answers with a `CallToolResult`: handler failures (bad
//! arguments, timeouts, non-2xx answers) become error envelopes with
//! `is_error = true` rather than protocol errors. Arguments that do not
//! deserialize into a tool's parameter type are reported the same way, on
//! both the stdio transport and the in-process path. Only an unknown tool
//! name is a protocol error.

use std::fmt::Display;

use mcp_common::{
    async_trait, decode_params, envelope, error_envelope, EmbeddableError, EmbeddableMcp,
    EmbeddableResult,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::ToolCallContext, wrapper::Parameters},
    model::{
        CallToolRequestParam, CallToolResult, ErrorCode, ListToolsResult, PaginatedRequestParam,
        ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    tool, tool_router, ErrorData as McpError, RoleServer,
};
use serde_json::Value;

use crate::config::RedmineConfig;
use crate::handlers;
use crate::params::*;
use crate::redmine::{RedmineClient, RedmineResult};

const INSTRUCTIONS: &str = "Redmine MCP Server - provides tools for reading, creating and \
     updating Redmine issues, listing projects, trackers, statuses, users and priorities, \
     adding notes, changing status and attaching files. Use get_metadata first to discover \
     the ids the other tools expect.";

/// The main Redmine MCP Server
#[derive(Clone)]
pub struct RedmineMcpServer {
    client: RedmineClient,
    /// Used by `create_issue` when the caller names no project
    default_project_id: Option<u64>,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router - each tool delegates to its handler
// ============================================================================

#[tool_router]
impl RedmineMcpServer {
    /// Build the server and its HTTP client from validated settings
    pub fn new(config: RedmineConfig) -> RedmineResult<Self> {
        let default_project_id = config.default_project_id;
        let client = RedmineClient::new(config)?;

        tracing::info!(
            url = client.config().base_url(),
            default_project_id = ?default_project_id,
            "Redmine client ready"
        );

        Ok(Self {
            client,
            default_project_id,
            tool_router: Self::tool_router(),
        })
    }

    // ========================================================================
    // Issue Tools
    // ========================================================================

    #[tool(
        description = "Get a Redmine issue by ID, including attachments and journals (history/notes) by default"
    )]
    async fn get_issue(
        &self,
        Parameters(params): Parameters<GetIssueParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(envelope(handlers::get_issue(&self.client, params).await))
    }

    #[tool(
        description = "Create a Redmine issue. project_id falls back to the configured default project"
    )]
    async fn create_issue(
        &self,
        Parameters(params): Parameters<CreateIssueParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(envelope(
            handlers::create_issue(&self.client, self.default_project_id, params).await,
        ))
    }

    #[tool(description = "Update fields of a Redmine issue; only the given fields change")]
    async fn update_issue(
        &self,
        Parameters(params): Parameters<UpdateIssueParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(envelope(handlers::update_issue(&self.client, params).await))
    }

    #[tool(
        description = "Search Redmine issues by project, tracker, status, assignee, author, priority or subject, with pagination"
    )]
    async fn search_issues(
        &self,
        Parameters(params): Parameters<SearchIssuesParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(envelope(handlers::search_issues(&self.client, params).await))
    }

    #[tool(description = "Add a note (comment) to a Redmine issue")]
    async fn add_note(
        &self,
        Parameters(params): Parameters<AddNoteParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(envelope(handlers::add_note(&self.client, params).await))
    }

    #[tool(description = "Change the status of a Redmine issue, optionally with a note")]
    async fn update_status(
        &self,
        Parameters(params): Parameters<UpdateStatusParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(envelope(handlers::update_status(&self.client, params).await))
    }

    #[tool(
        description = "Attach a file (base64 content) to a Redmine issue and return the updated issue"
    )]
    async fn upload_attachment(
        &self,
        Parameters(params): Parameters<UploadAttachmentParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(envelope(
            handlers::upload_attachment(&self.client, params).await,
        ))
    }

    // ========================================================================
    // Reference Data Tools
    // ========================================================================

    #[tool(description = "List Redmine projects")]
    async fn list_projects(
        &self,
        Parameters(params): Parameters<PageParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(envelope(handlers::list_projects(&self.client, params).await))
    }

    #[tool(description = "List Redmine trackers (issue types)")]
    async fn list_trackers(&self) -> Result<CallToolResult, McpError> {
        Ok(envelope(handlers::list_trackers(&self.client).await))
    }

    #[tool(description = "List Redmine issue statuses")]
    async fn list_statuses(&self) -> Result<CallToolResult, McpError> {
        Ok(envelope(handlers::list_statuses(&self.client).await))
    }

    #[tool(description = "List Redmine users (requires an administrator API key)")]
    async fn list_users(
        &self,
        Parameters(params): Parameters<PageParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(envelope(handlers::list_users(&self.client, params).await))
    }

    #[tool(description = "List Redmine issue priorities")]
    async fn list_priorities(&self) -> Result<CallToolResult, McpError> {
        Ok(envelope(handlers::list_priorities(&self.client).await))
    }

    #[tool(description = "List Redmine trackers and issue statuses in one call")]
    async fn list_trackers_and_statuses(&self) -> Result<CallToolResult, McpError> {
        Ok(envelope(handlers::trackers_and_statuses(&self.client).await))
    }

    #[tool(
        description = "Get projects, trackers, statuses, users and priorities in one call. Priorities may be empty if unavailable"
    )]
    async fn get_metadata(&self) -> Result<CallToolResult, McpError> {
        Ok(envelope(handlers::metadata(&self.client).await))
    }

    #[tool(description = "Get the Redmine user that owns the configured API key")]
    async fn get_current_user(&self) -> Result<CallToolResult, McpError> {
        Ok(envelope(handlers::current_user(&self.client).await))
    }
}

/// Error envelope for arguments that do not fit a tool's parameter type
fn invalid_arguments(err: impl Display) -> CallToolResult {
    error_envelope(format!("invalid arguments: {}", err))
}

/// Turn the router's `INVALID_PARAMS` fault for a known tool into an envelope
///
/// `Parameters<T>` rejects malformed arguments with an `McpError` before the
/// tool body runs.
fn envelope_argument_errors(
    result: Result<CallToolResult, McpError>,
) -> Result<CallToolResult, McpError> {
    match result {
        Err(e) if e.code == ErrorCode::INVALID_PARAMS => Ok(invalid_arguments(e.message)),
        other => other,
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

impl rmcp::ServerHandler for RedmineMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        if !self.tool_router.has_route(&request.name) {
            return Err(McpError::invalid_params(
                format!("tool not found: {}", request.name),
                None,
            ));
        }
        let tcc = ToolCallContext::new(self, request, context);
        envelope_argument_errors(self.tool_router.call(tcc).await)
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            meta: None,
            next_cursor: None,
        })
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for RedmineMcpServer {
    fn server_name(&self) -> &str {
        "redmine"
    }

    fn server_description(&self) -> Option<&str> {
        Some(INSTRUCTIONS)
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        match self.dispatch(name, params).await {
            Err(EmbeddableError::InvalidParams(e)) => Ok(invalid_arguments(e)),
            other => other,
        }
    }
}

impl RedmineMcpServer {
    async fn dispatch(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        let result = match name {
            "get_issue" => self.get_issue(Parameters(decode_params(params)?)).await,
            "create_issue" => self.create_issue(Parameters(decode_params(params)?)).await,
            "update_issue" => self.update_issue(Parameters(decode_params(params)?)).await,
            "search_issues" => self.search_issues(Parameters(decode_params(params)?)).await,
            "add_note" => self.add_note(Parameters(decode_params(params)?)).await,
            "update_status" => self.update_status(Parameters(decode_params(params)?)).await,
            "upload_attachment" => {
                self.upload_attachment(Parameters(decode_params(params)?))
                    .await
            }
            "list_projects" => self.list_projects(Parameters(decode_params(params)?)).await,
            "list_trackers" => self.list_trackers().await,
            "list_statuses" => self.list_statuses().await,
            "list_users" => self.list_users(Parameters(decode_params(params)?)).await,
            "list_priorities" => self.list_priorities().await,
            "list_trackers_and_statuses" => self.list_trackers_and_statuses().await,
            "get_metadata" => self.get_metadata().await,
            "get_current_user" => self.get_current_user().await,
            _ => return Err(EmbeddableError::ToolNotFound(name.to_string())),
        };
        result.map_err(Into::into)
    }
}
