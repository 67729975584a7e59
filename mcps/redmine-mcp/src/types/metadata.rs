//! Aggregated reference data returned by the fan-out tools

use serde::Serialize;

use super::common::{IssueStatus, Priority, Project, Tracker, User};

/// Outcome of a sub-fetch whose failure must not sink the aggregate
#[derive(Debug, Clone)]
pub enum BestEffort<T> {
    Available(T),
    Unavailable { reason: String },
}

impl<T> BestEffort<T> {
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => BestEffort::Available(value),
            Err(e) => BestEffort::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}

impl<T: Default> BestEffort<T> {
    /// The fetched value, or `T::default()` when unavailable
    pub fn unwrap_or_default(self) -> T {
        match self {
            BestEffort::Available(value) => value,
            BestEffort::Unavailable { .. } => T::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackersAndStatuses {
    pub trackers: Vec<Tracker>,
    pub statuses: Vec<IssueStatus>,
}

/// Everything needed to fill in an issue form
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub projects: Vec<Project>,
    pub trackers: Vec<Tracker>,
    pub statuses: Vec<IssueStatus>,
    pub users: Vec<User>,
    /// Empty when the priorities endpoint could not be read
    pub priorities: Vec<Priority>,
}
