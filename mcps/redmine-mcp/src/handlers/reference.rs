//! Reference data handlers
//!
//! Single-collection listings plus the two fan-out aggregates. Aggregate
//! sub-fetches run concurrently; only priorities are allowed to fail.

use tracing::warn;

use crate::params::PageParams;
use crate::redmine::{RedmineClient, RedmineResult};
use crate::types::{
    BestEffort, IssueStatus, Metadata, Page, Pagination, Priority, Project, Tracker,
    TrackersAndStatuses, User,
};

/// Page size used by `get_metadata` for projects and users
const METADATA_PAGE_LIMIT: u32 = 100;

fn pagination(params: PageParams) -> Pagination {
    Pagination::new(params.limit, params.offset)
}

pub async fn list_projects(
    client: &RedmineClient,
    params: PageParams,
) -> RedmineResult<Page<Project>> {
    client.list_projects(&pagination(params)).await
}

pub async fn list_trackers(client: &RedmineClient) -> RedmineResult<Vec<Tracker>> {
    client.list_trackers().await
}

pub async fn list_statuses(client: &RedmineClient) -> RedmineResult<Vec<IssueStatus>> {
    client.list_statuses().await
}

pub async fn list_users(client: &RedmineClient, params: PageParams) -> RedmineResult<Page<User>> {
    client.list_users(&pagination(params)).await
}

pub async fn list_priorities(client: &RedmineClient) -> RedmineResult<Vec<Priority>> {
    client.list_priorities().await
}

pub async fn current_user(client: &RedmineClient) -> RedmineResult<User> {
    client.current_user().await
}

/// Trackers and statuses fetched together; either failing fails the call
pub async fn trackers_and_statuses(client: &RedmineClient) -> RedmineResult<TrackersAndStatuses> {
    let (trackers, statuses) = tokio::try_join!(client.list_trackers(), client.list_statuses())?;
    Ok(TrackersAndStatuses { trackers, statuses })
}

/// Everything needed to fill in an issue form
///
/// Priorities are best-effort: some Redmine setups deny the enumerations
/// endpoint, in which case the list comes back empty.
pub async fn metadata(client: &RedmineClient) -> RedmineResult<Metadata> {
    let page = Pagination::new(Some(METADATA_PAGE_LIMIT), None);

    let (projects, trackers, statuses, users, priorities) = tokio::join!(
        client.list_projects(&page),
        client.list_trackers(),
        client.list_statuses(),
        client.list_users(&page),
        client.list_priorities(),
    );

    let priorities = BestEffort::from_result(priorities);
    if let BestEffort::Unavailable { reason } = &priorities {
        warn!(%reason, "priorities unavailable, returning empty list");
    }

    Ok(Metadata {
        projects: projects?.items,
        trackers: trackers?,
        statuses: statuses?,
        users: users?.items,
        priorities: priorities.unwrap_or_default(),
    })
}
