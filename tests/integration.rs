#![cfg(test)]

use std::{collections::HashSet, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use issue_triage::{
    base::{
        config::{Config, ConfigInner},
        templates::RENDER_ERROR_COMMENT,
        types::{Issue, IssueState, Label, TriageOutcome},
    },
    interaction::issue_event::handle_issue_event,
    service::{
        render::TemplateRenderer,
        tracker::{GenericIssueTracker, TrackerClient, TrackerError, TrackerResult},
    },
};
use mockall::{Sequence, mock};
use rand::{SeedableRng, rngs::StdRng};

// Mocks.

// Mock issue tracker for testing.

mock! {
    pub Tracker {}

    #[async_trait]
    impl GenericIssueTracker for Tracker {
        async fn search_issues(&self, query: &str) -> TrackerResult<Vec<Issue>>;
        async fn list_contributors(&self) -> TrackerResult<Vec<String>>;
        async fn is_assignable(&self, issue_number: u64, login: &str) -> TrackerResult<bool>;
        async fn close_issue(&self, issue_number: u64) -> TrackerResult<()>;
        async fn comment_issue(&self, issue_number: u64, body: &str) -> TrackerResult<()>;
        async fn add_assignees(&self, issue_number: u64, assignees: &[String]) -> TrackerResult<()>;
    }
}

/// Helper function to build a test configuration.
fn test_config() -> Config {
    Config::from(ConfigInner {
        github_token: "ghp_test".to_string(),
        github_repository: "octo/widgets".to_string(),
        github_event_path: Some(PathBuf::from("event.json")),
        ..Default::default()
    })
}

fn issue(number: u64, title: &str, body: &str, labels: &[&str], state: IssueState) -> Issue {
    Issue {
        number,
        title: title.to_string(),
        body: body.to_string(),
        labels: labels.iter().map(|name| Label { name: name.to_string() }).collect(),
        state,
        ..Default::default()
    }
}

fn templated(number: u64, title: &str, body: &str) -> Issue {
    issue(number, title, &format!("<!-- TEMPLATE: bug -->\n{body}"), &[], IssueState::Open)
}

async fn run(subject: &Issue, tracker: MockTracker) -> issue_triage::base::types::Res<TriageOutcome> {
    let config = test_config();
    let tracker = TrackerClient::new(Arc::new(tracker));
    let renderer = TemplateRenderer::new(None);
    let mut rng = StdRng::seed_from_u64(1);

    handle_issue_event(subject, &config, &tracker, &renderer, &mut rng).await
}

#[tokio::test]
async fn test_invalid_issue_is_commented_and_closed() {
    let subject = issue(42, "Crash", "no template here", &[], IssueState::Open);
    let mut tracker = MockTracker::new();
    let mut seq = Sequence::new();

    tracker
        .expect_comment_issue()
        .withf(|number, body| *number == 42 && body.contains("does not follow"))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    tracker.expect_close_issue().withf(|number| *number == 42).times(1).in_sequence(&mut seq).returning(|_| Ok(()));
    tracker.expect_search_issues().never();
    tracker.expect_list_contributors().never();

    let outcome = run(&subject, tracker).await.unwrap();

    assert_eq!(outcome, TriageOutcome::Invalid);
}

#[tokio::test]
async fn test_failed_comment_still_closes_invalid_issue() {
    let subject = issue(42, "Crash", "", &[], IssueState::Open);
    let mut tracker = MockTracker::new();

    tracker.expect_comment_issue().times(1).returning(|_, _| Err(TrackerError::Timeout));
    tracker.expect_close_issue().times(1).returning(|_| Ok(()));

    let outcome = run(&subject, tracker).await.unwrap();

    assert_eq!(outcome, TriageOutcome::Invalid);
}

#[tokio::test]
async fn test_duplicates_are_commented_and_closed() {
    let body = "The app crashes when loading the main window.";
    let subject = templated(10, "App crashes on load", body);
    let results = vec![
        subject.clone(),
        issue(3, "App crashes on load (bug)", body, &["bug"], IssueState::Open),
        issue(4, "Bug: app crashes on load", body, &[], IssueState::Closed),
        issue(5, "Add dark mode", body, &[], IssueState::Open),
    ];

    let mut tracker = MockTracker::new();

    tracker
        .expect_search_issues()
        .withf(|query| query == "repo:octo/widgets is:issue \"App crashes on load\"")
        .times(1)
        .returning(move |_| Ok(results.clone()));
    tracker
        .expect_comment_issue()
        .withf(|number, body| *number == 10 && body.contains("#3 App crashes on load (bug)") && body.contains("#4 Bug: app crashes on load"))
        .times(1)
        .returning(|_, _| Ok(()));
    tracker.expect_close_issue().withf(|number| *number == 10).times(1).returning(|_| Ok(()));
    tracker.expect_list_contributors().never();
    tracker.expect_add_assignees().never();

    let outcome = run(&subject, tracker).await.unwrap();

    assert_eq!(outcome, TriageOutcome::Duplicate { open: vec![3], closed: vec![4] });
}

#[tokio::test]
async fn test_unique_issue_is_assigned_and_commented() {
    let subject = templated(10, "App crashes on load", "Steps to reproduce.");
    let mut tracker = MockTracker::new();

    tracker.expect_search_issues().times(1).returning(|_| Ok(Vec::new()));
    tracker
        .expect_list_contributors()
        .times(1)
        .returning(|| Ok(vec!["ana".to_string(), "bo".to_string(), "cy".to_string()]));
    tracker.expect_is_assignable().times(3).returning(|_, login| Ok(login != "cy"));
    tracker
        .expect_add_assignees()
        .withf(|number, assignees| *number == 10 && assignees == ["ana".to_string(), "bo".to_string()])
        .times(1)
        .returning(|_, _| Ok(()));
    tracker
        .expect_comment_issue()
        .withf(|number, body| *number == 10 && body.contains("@ana, @bo"))
        .times(1)
        .returning(|_, _| Ok(()));
    tracker.expect_close_issue().never();

    let outcome = run(&subject, tracker).await.unwrap();

    assert_eq!(outcome, TriageOutcome::Passed { assignees: vec!["ana".to_string(), "bo".to_string()] });
}

#[tokio::test]
async fn test_failed_search_treats_issue_as_unique() {
    let subject = templated(10, "App crashes on load", "");
    let mut tracker = MockTracker::new();

    tracker.expect_search_issues().times(1).returning(|_| Err(TrackerError::Status(503)));
    tracker.expect_list_contributors().times(1).returning(|| Ok(vec!["ana".to_string()]));
    tracker.expect_is_assignable().times(1).returning(|_, _| Ok(true));
    tracker.expect_add_assignees().times(1).returning(|_, _| Ok(()));
    tracker.expect_comment_issue().times(1).returning(|_, _| Ok(()));
    tracker.expect_close_issue().never();

    let outcome = run(&subject, tracker).await.unwrap();

    assert_eq!(outcome, TriageOutcome::Passed { assignees: vec!["ana".to_string()] });
}

#[tokio::test]
async fn test_failed_contributor_listing_passes_without_assignees() {
    let subject = templated(10, "App crashes on load", "");
    let mut tracker = MockTracker::new();

    tracker.expect_search_issues().times(1).returning(|_| Ok(Vec::new()));
    tracker.expect_list_contributors().times(1).returning(|| Err(TrackerError::Timeout));
    tracker.expect_add_assignees().never();
    tracker
        .expect_comment_issue()
        .withf(|_, body| body.contains("No contributor could be assigned"))
        .times(1)
        .returning(|_, _| Ok(()));
    tracker.expect_close_issue().never();

    let outcome = run(&subject, tracker).await.unwrap();

    assert_eq!(outcome, TriageOutcome::Passed { assignees: Vec::new() });
}

#[tokio::test]
async fn test_failed_probe_skips_contributor() {
    let subject = templated(10, "App crashes on load", "");
    let mut tracker = MockTracker::new();

    tracker.expect_search_issues().returning(|_| Ok(Vec::new()));
    tracker.expect_list_contributors().returning(|| Ok(vec!["ana".to_string(), "bo".to_string()]));
    tracker.expect_is_assignable().returning(|_, login| if login == "ana" { Err(TrackerError::Network("reset".to_string())) } else { Ok(true) });
    tracker.expect_add_assignees().withf(|_, assignees| assignees == ["bo".to_string()]).times(1).returning(|_, _| Ok(()));
    tracker.expect_comment_issue().times(1).returning(|_, _| Ok(()));

    let outcome = run(&subject, tracker).await.unwrap();

    assert_eq!(outcome, TriageOutcome::Passed { assignees: vec!["bo".to_string()] });
}

#[tokio::test]
async fn test_many_assignable_contributors_are_sampled() {
    let subject = templated(10, "App crashes on load", "");
    let pool = vec!["ana", "bo", "cy", "di", "ed"];
    let contributors: Vec<String> = pool.iter().map(|login| login.to_string()).collect();
    let mut tracker = MockTracker::new();

    tracker.expect_search_issues().returning(|_| Ok(Vec::new()));
    tracker.expect_list_contributors().returning(move || Ok(contributors.clone()));
    tracker.expect_is_assignable().times(5).returning(|_, _| Ok(true));
    tracker.expect_add_assignees().withf(|_, assignees| assignees.len() == 2).times(1).returning(|_, _| Ok(()));
    tracker.expect_comment_issue().times(1).returning(|_, _| Ok(()));

    let TriageOutcome::Passed { assignees } = run(&subject, tracker).await.unwrap() else {
        panic!("expected the issue to pass");
    };

    assert_eq!(assignees.len(), 2);
    assert_eq!(assignees.iter().collect::<HashSet<_>>().len(), 2);
    assert!(assignees.iter().all(|login| pool.contains(&login.as_str())));
}

#[tokio::test]
async fn test_missing_number_aborts_duplicate_check() {
    let subject = issue(0, "App crashes on load", "", &["bug"], IssueState::Open);
    let mut tracker = MockTracker::new();

    tracker.expect_search_issues().never();
    tracker.expect_comment_issue().never();
    tracker.expect_close_issue().never();

    assert!(run(&subject, tracker).await.is_err());
}

#[tokio::test]
async fn test_broken_custom_template_posts_apology() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("invalid_template.j2"), "{{ unclosed").unwrap();

    let subject = issue(42, "Crash", "", &[], IssueState::Open);
    let mut tracker = MockTracker::new();

    tracker
        .expect_comment_issue()
        .withf(|_, body| body == RENDER_ERROR_COMMENT)
        .times(1)
        .returning(|_, _| Ok(()));
    tracker.expect_close_issue().times(1).returning(|_| Ok(()));

    let config = test_config();
    let tracker = TrackerClient::new(Arc::new(tracker));
    let renderer = TemplateRenderer::new(Some(dir.path()));
    let mut rng = StdRng::seed_from_u64(1);

    let outcome = handle_issue_event(&subject, &config, &tracker, &renderer, &mut rng).await.unwrap();

    assert_eq!(outcome, TriageOutcome::Invalid);
}
