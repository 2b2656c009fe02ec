//! Triage of a newly opened issue.
//!
//! The run is strictly linear: template check, then duplicate check, then assignment. Every
//! terminal branch posts exactly one comment and closes the issue at most once. Tracker failures
//! are logged and replaced by a safe default here, never inside the clients.

use std::path::Path;

use minijinja::context;
use rand::Rng;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::{
    base::{
        config::Config,
        templates::{DUPLICATED, INVALID_TEMPLATE, PASSED},
        types::{Duplicates, Issue, Res, TriageOutcome},
    },
    check::{
        assignees::check_assignees,
        duplicate::{DuplicateCheckError, check_duplicate},
        template::check_template,
    },
    service::{render::TemplateRenderer, tracker::TrackerClient},
};

/// Extract the issue from a webhook event payload.
pub fn issue_from_event(event: &str) -> Res<Issue> {
    let mut event: Value = serde_json::from_str(event)?;
    let issue = event
        .get_mut("issue")
        .map(Value::take)
        .ok_or_else(|| anyhow::anyhow!("Event payload does not contain an `issue` object."))?;

    Ok(serde_json::from_value(issue)?)
}

/// Read the event payload at `path` and extract its issue.
#[instrument]
pub async fn load_issue(path: &Path) -> Res<Issue> {
    let event = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| anyhow::anyhow!("Failed to read event payload `{}`: {}", path.display(), err))?;

    issue_from_event(&event)
}

/// Triage one issue and report where it ended up.
///
/// Only a duplicate-check validation error (missing title or number) aborts the run.
#[instrument(skip_all, fields(issue = issue.number))]
pub async fn handle_issue_event<R>(issue: &Issue, config: &Config, tracker: &TrackerClient, renderer: &TemplateRenderer, rng: &mut R) -> Res<TriageOutcome>
where
    R: Rng + ?Sized,
{
    // Template check.

    if !check_template(issue) {
        info!("Issue does not follow a template.");

        let comment = renderer.render(INVALID_TEMPLATE, context! { issue });
        post_comment(tracker, issue.number, &comment).await;
        close(tracker, issue.number).await;

        return Ok(TriageOutcome::Invalid);
    }

    // Duplicate check.

    let duplicates = match check_duplicate(issue, config, tracker).await {
        Ok(duplicates) => duplicates,
        Err(DuplicateCheckError::Search(err)) => {
            warn!("Duplicate search failed, treating the issue as unique: {}", err);
            Duplicates::default()
        }
        Err(DuplicateCheckError::Invalid(err)) => {
            return Err(anyhow::anyhow!("Cannot check issue #{} for duplicates: {}", issue.number, err));
        }
    };

    if !duplicates.is_empty() {
        info!("Duplicate issues found: {} open, {} closed.", duplicates.open.len(), duplicates.closed.len());

        let comment = renderer.render(
            DUPLICATED,
            context! {
                issue,
                open_duplicates => &duplicates.open,
                closed_duplicates => &duplicates.closed,
            },
        );
        post_comment(tracker, issue.number, &comment).await;
        close(tracker, issue.number).await;

        return Ok(TriageOutcome::Duplicate {
            open: duplicates.open.iter().map(|i| i.number).collect(),
            closed: duplicates.closed.iter().map(|i| i.number).collect(),
        });
    }

    // Assignment.

    let assignees = match check_assignees(issue.number, config.assignee_count, tracker, rng).await {
        Ok(assignees) => assignees,
        Err(err) => {
            warn!("Failed to fetch contributors: {}", err);
            Vec::new()
        }
    };

    if assignees.is_empty() {
        info!("No available contributors to assign the issue.");
    } else if let Err(err) = tracker.add_assignees(issue.number, &assignees).await {
        error!("Failed to add assignees: {}", err);
    } else {
        info!("Assigned issue to: {}", assignees.join(", "));
    }

    let comment = renderer.render(PASSED, context! { issue, assignees => &assignees });
    post_comment(tracker, issue.number, &comment).await;

    Ok(TriageOutcome::Passed { assignees })
}

async fn post_comment(tracker: &TrackerClient, issue_number: u64, comment: &str) {
    if let Err(err) = tracker.comment_issue(issue_number, comment).await {
        error!("Failed to comment on the issue: {}", err);
    }
}

async fn close(tracker: &TrackerClient, issue_number: u64) {
    if let Err(err) = tracker.close_issue(issue_number).await {
        error!("Failed to close the issue: {}", err);
    }
}
