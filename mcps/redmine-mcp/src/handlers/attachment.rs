//! Attachment handler
//!
//! Composes the two-step upload: push the bytes to get a token, attach the
//! token to the issue, then re-read the issue so the caller sees the file.

use base64::Engine;
use tracing::info;

use crate::params::UploadAttachmentParams;
use crate::redmine::{ensure_positive, RedmineClient, RedmineError, RedmineResult};
use crate::types::{Issue, UploadedFile};

use super::require_text;

/// Decode a base64 payload, tolerating `data:` URL prefixes and line breaks
pub fn decode_content(encoded: &str) -> RedmineResult<Vec<u8>> {
    let body = match encoded.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => encoded,
    };
    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(RedmineError::validation("content_base64 must not be empty"));
    }

    base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| RedmineError::Validation(format!("content_base64 is not valid base64: {}", e)))
}

/// Upload a file and attach it to an issue; returns the refreshed issue
pub async fn upload_attachment(
    client: &RedmineClient,
    params: UploadAttachmentParams,
) -> RedmineResult<Issue> {
    let issue_id = ensure_positive("issue_id", params.issue_id)?;
    require_text("filename", &params.filename)?;
    let bytes = decode_content(&params.content_base64)?;
    let size = bytes.len();

    let token = client.upload(bytes, Some(&params.filename)).await?;

    let file = UploadedFile::new(token, params.filename.clone())
        .content_type(params.content_type)
        .description(params.description);
    client.add_attachment(issue_id, file).await?;

    info!(issue_id, filename = %params.filename, size, "attached file");

    client.get_issue(issue_id, Some("attachments")).await
}
