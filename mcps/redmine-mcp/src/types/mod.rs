//! Redmine data types
//!
//! Wire shapes for the Redmine REST API plus the aggregates the server
//! returns. Nothing here outlives a single tool call.

pub mod common;
pub mod issue;
pub mod metadata;
pub mod upload;

pub use common::{IdName, IssueStatus, Page, Pagination, Priority, Project, Tracker, User};
pub use issue::{
    Attachment, CustomFieldValue, Issue, IssueList, IssueQuery, IssueUpdate, Journal,
    JournalDetail, NewIssue, ParentRef,
};
pub use metadata::{BestEffort, Metadata, TrackersAndStatuses};
pub use upload::{UploadToken, UploadedFile};
