//! Redmine MCP Library
//!
//! MCP-compatible tools for the Redmine issue tracker, backed by its REST API.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use redmine_mcp::{RedmineConfig, RedmineMcpServer};
//!
//! let config = RedmineConfig::new("https://redmine.example.com", api_key);
//! let server = RedmineMcpServer::new(config)?;
//! // Use with in-memory transport, EmbeddableMcp::call_tool, or serve via stdio
//! ```
//!
//! # Features
//! - Issues: get, create, update, search, add note, change status, attach file
//! - Reference data: projects, trackers, statuses, users, priorities, current user
//! - Aggregates: trackers + statuses, full metadata (priorities best-effort)
//!
//! # Configuration
//! Set `REDMINE_URL` and `REDMINE_API_KEY`, or configure `~/.binks/redmine.toml`

pub mod config;
pub mod handlers;
pub mod params;
pub mod redmine;
pub mod server;
pub mod types;

// Re-export main server type
pub use server::RedmineMcpServer;

pub use config::{Config, RedmineConfig};
pub use redmine::{RedmineClient, RedmineError, RedmineResult};

// Re-export parameter types for direct API usage
pub use params::*;
