//! Attachment parameter types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UploadAttachmentParams {
    #[schemars(description = "Issue ID to attach the file to")]
    pub issue_id: u64,
    #[schemars(description = "File name shown in Redmine")]
    pub filename: String,
    #[schemars(description = "File content, base64-encoded")]
    pub content_base64: String,
    #[schemars(description = "MIME type, e.g. 'text/plain'")]
    pub content_type: Option<String>,
    #[schemars(description = "Attachment description")]
    pub description: Option<String>,
}
