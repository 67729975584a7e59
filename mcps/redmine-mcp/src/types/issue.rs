//! Issue type definitions
//!
//! Inbound shapes mirror `GET /issues/{id}.json`; outbound shapes are the
//! bodies for `POST /issues.json` and `PUT /issues/{id}.json`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::IdName;
use super::upload::UploadedFile;

/// A Redmine issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,

    pub project: IdName,

    pub tracker: IdName,

    pub status: IdName,

    pub priority: IdName,

    pub author: IdName,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<IdName>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,

    pub subject: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub start_date: Option<String>,

    #[serde(default)]
    pub due_date: Option<String>,

    /// Completion percentage, 0-100
    #[serde(default)]
    pub done_ratio: u8,

    #[serde(default)]
    pub is_private: bool,

    #[serde(default)]
    pub estimated_hours: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomFieldValue>,

    pub created_on: String,

    pub updated_on: String,

    #[serde(default)]
    pub closed_on: Option<String>,

    /// Present when requested with `include=attachments`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,

    /// Present when requested with `include=journals`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub journals: Vec<Journal>,
}

/// Parent issue reference (Redmine sends only the id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentRef {
    pub id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFieldValue {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// String or array of strings for multi-value fields
    #[serde(default)]
    pub value: serde_json::Value,
}

/// File attached to an issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: u64,
    pub filename: String,
    #[serde(default)]
    pub filesize: u64,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<IdName>,
    #[serde(default)]
    pub created_on: Option<String>,
}

/// History entry: a note and/or a set of field changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<IdName>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub private_notes: bool,
    #[serde(default)]
    pub created_on: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<JournalDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalDetail {
    #[serde(default)]
    pub property: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub old_value: Option<String>,
    #[serde(default)]
    pub new_value: Option<String>,
}

/// Body of `POST /issues.json`
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewIssue {
    pub project_id: u64,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_issue_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done_ratio: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
}

/// Body of `PUT /issues/{id}.json`; unset fields are left untouched
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_issue_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done_ratio: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    /// Journal note added with the update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_notes: Option<bool>,
    /// Upload tokens to attach
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploads: Option<Vec<UploadedFile>>,
}

impl IssueUpdate {
    /// True when the update would send an empty `issue` object
    pub fn is_empty(&self) -> bool {
        serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_object().map(|o| o.is_empty()))
            .unwrap_or(true)
    }
}

/// Filters for `GET /issues.json`
///
/// Only fields that are set end up in the query string. `filters` carries
/// any other Redmine filter verbatim (`cf_3`, `created_on`, `fixed_version_id`, ...);
/// a filter whose key matches a set named field is dropped, so each key is
/// sent at most once.
#[derive(Debug, Clone, Default)]
pub struct IssueQuery {
    pub project_id: Option<String>,
    pub subproject_id: Option<String>,
    pub tracker_id: Option<u64>,
    /// `open`, `closed`, `*` or a status id
    pub status_id: Option<String>,
    /// User id or `me`
    pub assigned_to_id: Option<String>,
    pub author_id: Option<String>,
    pub priority_id: Option<u64>,
    pub parent_id: Option<u64>,
    /// Redmine subject filter; prefix with `~` for "contains"
    pub subject: Option<String>,
    /// e.g. `updated_on:desc`
    pub sort: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub filters: BTreeMap<String, String>,
}

impl IssueQuery {
    /// Name/value pairs for every defined filter, in a stable order
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                pairs.push((key.to_string(), value));
            }
        };

        push("project_id", self.project_id.clone());
        push("subproject_id", self.subproject_id.clone());
        push("tracker_id", self.tracker_id.map(|v| v.to_string()));
        push("status_id", self.status_id.clone());
        push("assigned_to_id", self.assigned_to_id.clone());
        push("author_id", self.author_id.clone());
        push("priority_id", self.priority_id.map(|v| v.to_string()));
        push("parent_id", self.parent_id.map(|v| v.to_string()));
        push("subject", self.subject.clone());
        push("sort", self.sort.clone());
        push("limit", self.limit.map(|v| v.to_string()));
        push("offset", self.offset.map(|v| v.to_string()));

        let named = pairs.len();
        for (key, value) in &self.filters {
            if pairs[..named].iter().any(|(k, _)| k == key) {
                tracing::debug!(filter = %key, "named field overrides raw filter");
                continue;
            }
            pairs.push((key.clone(), value.clone()));
        }
        pairs
    }
}

/// Response of `GET /issues.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueList {
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}
