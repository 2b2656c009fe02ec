//! Runtime services and shared state for issue-triage.

use rand::{SeedableRng, rngs::StdRng};
use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, TriageOutcome},
    },
    interaction::issue_event,
    service::{render::TemplateRenderer, tracker::TrackerClient},
};

/// Runtime service context.
///
/// This struct holds the configuration, the tracker client, and the template renderer.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The issue tracker client instance.
    pub tracker: TrackerClient,
    /// The comment template renderer.
    pub renderer: TemplateRenderer,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Res<Self> {
        // Initialize the tracker client.
        let tracker = TrackerClient::github(&config)?;

        // Initialize the template renderer.
        let renderer = TemplateRenderer::from_config(&config);

        Ok(Self { config, tracker, renderer })
    }

    /// Read the configured event payload and triage its issue.
    pub async fn start(&self) -> Res<TriageOutcome> {
        let event_path = self
            .config
            .github_event_path
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Missing GITHUB_EVENT_PATH environment variable."))?;

        let issue = issue_event::load_issue(event_path).await?;
        info!("Triaging issue #{}: {}", issue.number, issue.title);

        let mut rng = StdRng::from_entropy();
        issue_event::handle_issue_event(&issue, &self.config, &self.tracker, &self.renderer, &mut rng).await
    }
}
