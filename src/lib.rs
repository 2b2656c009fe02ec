//! Library root for `issue-triage`.
//!
//! Issue-triage is a GitHub issue bot designed to:
//! - Close issues that were not opened from an issue template
//! - Detect likely duplicates by fuzzy-matching title and body against existing issues
//! - Assign passing issues to contributors at random
//! - Explain every decision with a rendered comment
//!
//! The bot talks to the tracker through the `GenericIssueTracker` trait, so the
//! GitHub client can be swapped for a mock in tests.

#[deny(missing_docs)]
pub mod base;
pub mod check;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up the necessary services and triages the issue from the configured event:
/// - Creates the runtime context with the tracker client and template renderer
/// - Runs the template, duplicate, and assignment checks
pub async fn start(config: Config) -> Void {
    info!("Starting issue-triage ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config)?;

    // Triage the issue.
    let outcome = runtime.start().await?;

    info!("Triage finished: {:?}", outcome);

    Ok(())
}
