//! Event handling for issue-triage.
//!
//! This module turns an incoming issue event into tracker side effects:
//! - Extracting the issue from the event payload
//! - Running the template, duplicate and assignment checks in order
//! - Posting the rendered comment and closing the issue where needed

pub mod issue_event;
