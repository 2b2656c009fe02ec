//! The triage checks run against a new issue.
//!
//! - Template conformance.
//! - Duplicate detection over normalized, fuzzily compared text.
//! - Assignee selection.

pub mod assignees;
pub mod duplicate;
pub mod normalize;
pub mod similarity;
pub mod template;
