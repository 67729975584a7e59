//! Redmine MCP Server
//!
//! Exposes the Redmine REST API as MCP tools over stdio.
//!
//! # Configuration
//! - `REDMINE_URL`, `REDMINE_API_KEY` (required)
//! - `REDMINE_TIMEOUT_SECS`, `REDMINE_INSECURE_TLS`, `REDMINE_DEFAULT_PROJECT_ID` (optional)
//! - or `~/.binks/redmine.toml` / `REDMINE_CONFIG_PATH`

use rmcp::{transport::stdio, ServiceExt};

use redmine_mcp::{Config, RedmineMcpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mcp_common::init_tracing("redmine_mcp")?;

    tracing::info!("Starting Redmine MCP Server");

    let config = Config::load()?;
    tracing::info!("Redmine URL: {}", config.redmine.base_url());

    let server = RedmineMcpServer::new(config.redmine)?;
    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");
    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
