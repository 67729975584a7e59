//! Upload types
//!
//! Redmine attaches files in two steps: the bytes go to `/uploads.json`,
//! which hands back a token, and the token is then referenced from an issue
//! update together with the file's metadata.

use serde::{Deserialize, Serialize};

/// Opaque handle returned by `POST /uploads.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadToken {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub token: String,
}

/// One entry of the `uploads` array in an issue update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub token: String,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UploadedFile {
    pub fn new(token: UploadToken, filename: impl Into<String>) -> Self {
        Self {
            token: token.token,
            filename: filename.into(),
            content_type: None,
            description: None,
        }
    }

    pub fn content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}
