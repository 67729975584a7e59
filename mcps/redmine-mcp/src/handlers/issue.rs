//! Issue handler implementations

use tracing::info;

use crate::params::{
    AddNoteParams, CreateIssueParams, GetIssueParams, SearchIssuesParams, UpdateIssueParams,
    UpdateStatusParams,
};
use crate::redmine::{ensure_positive, RedmineClient, RedmineError, RedmineResult};
use crate::types::{Issue, IssueList, IssueQuery, IssueUpdate, NewIssue};

use super::{positive_opt, require_text, Acknowledgement};

/// Associations fetched when the caller does not ask for specific ones
pub const DEFAULT_ISSUE_INCLUDE: &str = "attachments,journals";

/// Fetch a single issue
pub async fn get_issue(client: &RedmineClient, params: GetIssueParams) -> RedmineResult<Issue> {
    let include = params
        .include
        .unwrap_or_else(|| DEFAULT_ISSUE_INCLUDE.to_string());
    client.get_issue(params.issue_id, Some(&include)).await
}

/// Create an issue, substituting `default_project` when no project is given
///
/// Without either, the call fails validation and never reaches Redmine.
pub async fn create_issue(
    client: &RedmineClient,
    default_project: Option<u64>,
    params: CreateIssueParams,
) -> RedmineResult<Issue> {
    let project_id = params.project_id.or(default_project).ok_or_else(|| {
        RedmineError::validation(
            "project_id is required (no default project is configured)",
        )
    })?;
    let project_id = ensure_positive("project_id", project_id)?;
    require_text("subject", &params.subject)?;

    let issue = NewIssue {
        project_id,
        subject: params.subject,
        description: params.description,
        tracker_id: positive_opt("tracker_id", params.tracker_id)?,
        status_id: positive_opt("status_id", params.status_id)?,
        priority_id: positive_opt("priority_id", params.priority_id)?,
        assigned_to_id: positive_opt("assigned_to_id", params.assigned_to_id)?,
        parent_issue_id: positive_opt("parent_issue_id", params.parent_issue_id)?,
        start_date: params.start_date,
        due_date: params.due_date,
        estimated_hours: params.estimated_hours,
        done_ratio: None,
        is_private: params.is_private,
    };

    let created = client.create_issue(&issue).await?;
    info!(issue_id = created.id, project_id, "created issue");
    Ok(created)
}

/// Update any subset of an issue's fields
pub async fn update_issue(
    client: &RedmineClient,
    params: UpdateIssueParams,
) -> RedmineResult<Acknowledgement> {
    if matches!(params.done_ratio, Some(r) if r > 100) {
        return Err(RedmineError::validation("done_ratio must be between 0 and 100"));
    }
    if params.private_notes == Some(true) && params.notes.is_none() {
        return Err(RedmineError::validation("private_notes requires notes"));
    }

    let update = IssueUpdate {
        subject: params.subject,
        description: params.description,
        project_id: positive_opt("project_id", params.project_id)?,
        tracker_id: positive_opt("tracker_id", params.tracker_id)?,
        status_id: positive_opt("status_id", params.status_id)?,
        priority_id: positive_opt("priority_id", params.priority_id)?,
        assigned_to_id: positive_opt("assigned_to_id", params.assigned_to_id)?,
        parent_issue_id: positive_opt("parent_issue_id", params.parent_issue_id)?,
        start_date: params.start_date,
        due_date: params.due_date,
        estimated_hours: params.estimated_hours,
        done_ratio: params.done_ratio,
        is_private: params.is_private,
        notes: params.notes,
        private_notes: params.private_notes,
        ..Default::default()
    };

    client.update_issue(params.issue_id, &update).await?;
    Ok(Acknowledgement::new(
        params.issue_id,
        format!("Issue #{} updated", params.issue_id),
    ))
}

/// List issues matching the given filters
pub async fn search_issues(
    client: &RedmineClient,
    params: SearchIssuesParams,
) -> RedmineResult<IssueList> {
    let query = IssueQuery {
        project_id: params.project_id,
        subproject_id: params.subproject_id,
        tracker_id: params.tracker_id,
        status_id: params.status_id,
        assigned_to_id: params.assigned_to_id,
        author_id: params.author_id,
        priority_id: params.priority_id,
        parent_id: params.parent_id,
        subject: params.subject,
        sort: params.sort,
        limit: params.limit,
        offset: params.offset,
        filters: params.filters.unwrap_or_default(),
    };
    client.search_issues(&query).await
}

/// Add a journal note to an issue
pub async fn add_note(
    client: &RedmineClient,
    params: AddNoteParams,
) -> RedmineResult<Acknowledgement> {
    require_text("notes", &params.notes)?;
    client
        .add_note(
            params.issue_id,
            &params.notes,
            params.private_notes.unwrap_or(false),
        )
        .await?;
    Ok(Acknowledgement::new(
        params.issue_id,
        format!("Note added to issue #{}", params.issue_id),
    ))
}

/// Transition an issue to another status
pub async fn update_status(
    client: &RedmineClient,
    params: UpdateStatusParams,
) -> RedmineResult<Acknowledgement> {
    client
        .transition_status(params.issue_id, params.status_id, params.notes)
        .await?;
    Ok(Acknowledgement::new(
        params.issue_id,
        format!(
            "Issue #{} moved to status {}",
            params.issue_id, params.status_id
        ),
    ))
}
