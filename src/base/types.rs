//! Common types and result handling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Application-level error.
pub type Err = anyhow::Error;
/// Application-level result.
pub type Res<T> = Result<T, Err>;
/// Application-level result without a value.
pub type Void = Res<()>;

/// The state of an issue on the tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// Still open.
    #[default]
    Open,
    /// Closed, for whatever reason.
    Closed,
}

/// A label attached to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name.
    pub name: String,
}

/// The author of an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login handle.
    pub login: String,
}

/// An issue as delivered by the event payload or the search endpoint.
///
/// Missing `number` and `title` fall back to `0` and `""` so that the duplicate check can reject
/// them explicitly instead of failing at deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number, unique within the repository.
    #[serde(default)]
    pub number: u64,
    /// Issue title.
    #[serde(default)]
    pub title: String,
    /// Free-form body. GitHub sends `null` for an empty body.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
    /// Labels attached to the issue.
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Open or closed.
    #[serde(default)]
    pub state: IssueState,
    /// Link to the issue in the web UI.
    #[serde(default)]
    pub html_url: Option<String>,
    /// The author.
    #[serde(default)]
    pub user: Option<User>,
    /// When the issue was opened.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// Whether the issue is currently open.
    pub fn is_open(&self) -> bool {
        self.state == IssueState::Open
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Open and closed issues judged to duplicate the subject, in search order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Duplicates {
    /// Duplicates that are still open.
    pub open: Vec<Issue>,
    /// Duplicates that were closed.
    pub closed: Vec<Issue>,
}

impl Duplicates {
    /// Whether no duplicate was found at all.
    pub fn is_empty(&self) -> bool {
        self.open.is_empty() && self.closed.is_empty()
    }
}

/// The terminal state of one triage run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageOutcome {
    /// The issue did not look like it followed a template; it was commented on and closed.
    Invalid,
    /// The issue duplicates others (by number); it was commented on and closed.
    Duplicate {
        /// Open duplicates.
        open: Vec<u64>,
        /// Closed duplicates.
        closed: Vec<u64>,
    },
    /// The issue passed all checks and was handed to these assignees (possibly none).
    Passed {
        /// Logins the issue was assigned to.
        assignees: Vec<String>,
    },
}
