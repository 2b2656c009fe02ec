//! Duplicate detection by fuzzy title and body matching.

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Duplicates, Issue},
    },
    service::tracker::{TrackerClient, TrackerError},
};

use super::{normalize::normalize, similarity};

/// Candidates whose title token-set score falls below this are never duplicates.
///
/// Independent of the configurable overall threshold.
pub const TITLE_SCORE_FLOOR: f64 = 66.0;

/// Weight of the title score in the overall score.
pub const TITLE_WEIGHT: f64 = 0.7;

/// Weight of the body score in the overall score.
pub const BODY_WEIGHT: f64 = 0.3;

/// Normalized bodies are cut to this many characters before partial matching.
pub const MAX_SCORED_BODY_CHARS: usize = 1024;

/// The subject issue lacks a field the duplicate check needs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("issue title is missing")]
    MissingTitle,
    #[error("issue number is missing")]
    MissingNumber,
}

/// Why a duplicate check produced no verdict.
#[derive(Debug, Error)]
pub enum DuplicateCheckError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("failed to search for duplicate issues: {0}")]
    Search(#[from] TrackerError),
}

/// Ensure the issue carries the title and number the check discriminates on.
pub fn validate(issue: &Issue) -> Result<(), ValidationError> {
    if issue.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }

    if issue.number == 0 {
        return Err(ValidationError::MissingNumber);
    }

    Ok(())
}

/// Build the search query for issues in `repository` mentioning `title`.
pub fn search_query(repository: &str, title: &str) -> String {
    let phrase = title.replace('"', "");
    format!("repo:{repository} is:issue \"{}\"", phrase.trim())
}

fn scored_body(body: &str) -> String {
    normalize(body).chars().take(MAX_SCORED_BODY_CHARS).collect()
}

/// Overall similarity of a candidate to the subject, or `None` when the titles are too far apart.
///
/// `subject_body` must already be normalized.
pub fn score_candidate(subject_title: &str, subject_body: &str, candidate: &Issue) -> Option<f64> {
    let title_score = similarity::token_set_ratio(subject_title, &candidate.title);

    if title_score < TITLE_SCORE_FLOOR {
        return None;
    }

    let body_score = similarity::partial_ratio(subject_body, &scored_body(&candidate.body));

    Some(TITLE_WEIGHT * title_score + BODY_WEIGHT * body_score)
}

/// Split `candidates` into open and closed duplicates of `issue`.
///
/// The issue itself is never reported, even when the search returns it.
pub fn find_duplicates(issue: &Issue, candidates: &[Issue], threshold: u8) -> Result<Duplicates, ValidationError> {
    validate(issue)?;

    let subject_body = scored_body(&issue.body);
    let mut duplicates = Duplicates::default();

    for candidate in candidates.iter().filter(|candidate| candidate.number != issue.number) {
        let Some(overall) = score_candidate(&issue.title, &subject_body, candidate) else {
            debug!("Skipping #{}: title too different.", candidate.number);
            continue;
        };

        debug!("Candidate #{} scored {:.1}.", candidate.number, overall);

        if overall < f64::from(threshold) {
            continue;
        }

        if candidate.is_open() {
            duplicates.open.push(candidate.clone());
        } else {
            duplicates.closed.push(candidate.clone());
        }
    }

    Ok(duplicates)
}

/// Search the tracker for issues resembling `issue` and return the likely duplicates.
#[instrument(skip_all, fields(issue = issue.number))]
pub async fn check_duplicate(issue: &Issue, config: &Config, tracker: &TrackerClient) -> Result<Duplicates, DuplicateCheckError> {
    validate(issue)?;

    let query = search_query(&config.github_repository, &issue.title);
    let candidates = tracker.search_issues(&query).await?;

    info!("Search returned {} candidate(s).", candidates.len());

    Ok(find_duplicates(issue, &candidates, config.duplicate_threshold)?)
}
