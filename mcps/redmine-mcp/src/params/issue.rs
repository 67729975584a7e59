//! Issue-related parameter types

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetIssueParams {
    #[schemars(description = "Issue ID")]
    pub issue_id: u64,
    #[schemars(
        description = "Comma-separated associations to include (default: attachments,journals). Use '' for none"
    )]
    pub include: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateIssueParams {
    #[schemars(description = "Project ID. Falls back to the configured default project")]
    pub project_id: Option<u64>,
    #[schemars(description = "Issue subject")]
    pub subject: String,
    #[schemars(description = "Issue description (Textile or Markdown, per Redmine settings)")]
    pub description: Option<String>,
    #[schemars(description = "Tracker ID (see list_trackers)")]
    pub tracker_id: Option<u64>,
    #[schemars(description = "Initial status ID (see list_statuses)")]
    pub status_id: Option<u64>,
    #[schemars(description = "Priority ID (see list_priorities)")]
    pub priority_id: Option<u64>,
    #[schemars(description = "Assignee user ID")]
    pub assigned_to_id: Option<u64>,
    #[schemars(description = "Parent issue ID")]
    pub parent_issue_id: Option<u64>,
    #[schemars(description = "Start date (YYYY-MM-DD)")]
    pub start_date: Option<String>,
    #[schemars(description = "Due date (YYYY-MM-DD)")]
    pub due_date: Option<String>,
    #[schemars(description = "Estimated hours")]
    pub estimated_hours: Option<f64>,
    #[schemars(description = "Mark the issue private")]
    pub is_private: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateIssueParams {
    #[schemars(description = "Issue ID")]
    pub issue_id: u64,
    #[schemars(description = "New subject")]
    pub subject: Option<String>,
    #[schemars(description = "New description")]
    pub description: Option<String>,
    #[schemars(description = "Move to another project")]
    pub project_id: Option<u64>,
    #[schemars(description = "New tracker ID")]
    pub tracker_id: Option<u64>,
    #[schemars(description = "New status ID")]
    pub status_id: Option<u64>,
    #[schemars(description = "New priority ID")]
    pub priority_id: Option<u64>,
    #[schemars(description = "New assignee user ID")]
    pub assigned_to_id: Option<u64>,
    #[schemars(description = "New parent issue ID")]
    pub parent_issue_id: Option<u64>,
    #[schemars(description = "Start date (YYYY-MM-DD)")]
    pub start_date: Option<String>,
    #[schemars(description = "Due date (YYYY-MM-DD)")]
    pub due_date: Option<String>,
    #[schemars(description = "Estimated hours")]
    pub estimated_hours: Option<f64>,
    #[schemars(description = "Percent done (0-100)")]
    pub done_ratio: Option<u8>,
    #[schemars(description = "Mark the issue private or public")]
    pub is_private: Option<bool>,
    #[schemars(description = "Note to add along with the change")]
    pub notes: Option<String>,
    #[schemars(description = "Make the note private; requires notes")]
    pub private_notes: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchIssuesParams {
    #[schemars(description = "Project ID or identifier")]
    pub project_id: Option<String>,
    #[schemars(description = "Subproject filter, e.g. '!*' to exclude subprojects")]
    pub subproject_id: Option<String>,
    #[schemars(description = "Tracker ID")]
    pub tracker_id: Option<u64>,
    #[schemars(description = "Status: 'open' (Redmine default), 'closed', '*' for all, or a status ID")]
    pub status_id: Option<String>,
    #[schemars(description = "Assignee user ID, or 'me'")]
    pub assigned_to_id: Option<String>,
    #[schemars(description = "Author user ID, or 'me'")]
    pub author_id: Option<String>,
    #[schemars(description = "Priority ID")]
    pub priority_id: Option<u64>,
    #[schemars(description = "Parent issue ID")]
    pub parent_id: Option<u64>,
    #[schemars(description = "Subject filter; prefix with '~' for contains")]
    pub subject: Option<String>,
    #[schemars(description = "Sort order, e.g. 'updated_on:desc'")]
    pub sort: Option<String>,
    #[schemars(description = "Maximum number of issues (Redmine caps this at 100)")]
    pub limit: Option<u32>,
    #[schemars(description = "Number of issues to skip")]
    pub offset: Option<u32>,
    #[schemars(description = "Additional raw Redmine filters, e.g. {\"cf_3\": \"blue\"}")]
    pub filters: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddNoteParams {
    #[schemars(description = "Issue ID")]
    pub issue_id: u64,
    #[schemars(description = "Note text")]
    pub notes: String,
    #[schemars(description = "Only visible to users with the 'view private notes' permission")]
    pub private_notes: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateStatusParams {
    #[schemars(description = "Issue ID")]
    pub issue_id: u64,
    #[schemars(description = "Target status ID (see list_statuses)")]
    pub status_id: u64,
    #[schemars(description = "Optional note explaining the transition")]
    pub notes: Option<String>,
}
