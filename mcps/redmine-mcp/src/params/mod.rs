//! Parameter types for Redmine MCP tools

mod attachment;
mod issue;

pub use attachment::*;
pub use issue::*;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pagination for collection endpoints
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct PageParams {
    #[schemars(description = "Maximum number of records (Redmine default 25, max 100)")]
    pub limit: Option<u32>,
    #[schemars(description = "Number of records to skip")]
    pub offset: Option<u32>,
}
