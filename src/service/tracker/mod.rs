pub mod github;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use thiserror::Error;

use crate::base::types::Issue;

// Errors.

/// Failure of a single tracker call.
///
/// Clients never swallow these; the orchestrator decides which safe default applies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("request timed out")]
    Timeout,
    #[error("request failed: {0}")]
    Network(String),
    #[error("resource not found")]
    NotFound,
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TrackerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl TrackerError {
    /// Classify a non-success status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => Self::NotFound,
            other => Self::Status(other),
        }
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;

// Traits.

/// Generic issue tracker trait that clients must implement.
///
/// Each method is one thin call against the tracker's API, scoped to the configured repository.
#[async_trait]
pub trait GenericIssueTracker: Send + Sync + 'static {
    /// Search issues with a tracker query string.
    async fn search_issues(&self, query: &str) -> TrackerResult<Vec<Issue>>;

    /// List the logins of the repository's contributors.
    async fn list_contributors(&self) -> TrackerResult<Vec<String>>;

    /// Whether `login` may be assigned to the issue.
    async fn is_assignable(&self, issue_number: u64, login: &str) -> TrackerResult<bool>;

    /// Close the issue.
    async fn close_issue(&self, issue_number: u64) -> TrackerResult<()>;

    /// Post a comment on the issue.
    async fn comment_issue(&self, issue_number: u64, body: &str) -> TrackerResult<()>;

    /// Add assignees to the issue.
    async fn add_assignees(&self, issue_number: u64, assignees: &[String]) -> TrackerResult<()>;
}

// Structs.

/// Issue tracker client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct TrackerClient {
    inner: Arc<dyn GenericIssueTracker>,
}

impl Deref for TrackerClient {
    type Target = dyn GenericIssueTracker;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl TrackerClient {
    pub fn new(inner: Arc<dyn GenericIssueTracker>) -> Self {
        Self { inner }
    }
}
