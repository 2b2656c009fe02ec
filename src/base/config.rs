//! Load configuration via `config` crate with env-override support.

use std::{
    ops::Deref,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use serde::Deserialize;

use super::types::{Res, Void};

/// Default GitHub REST API base URL.
fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

/// Default overall similarity score (0-100) at which a candidate counts as a duplicate.
fn default_duplicate_threshold() -> u8 {
    80
}

/// Default number of contributors to assign to a passing issue.
fn default_assignee_count() -> usize {
    2
}

/// Default per-request timeout, in seconds.
fn default_request_timeout_secs() -> u64 {
    10
}

/// Configuration for the issue-triage application.
///
/// Trivially cloneable; every component receives it by reference.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared configuration values.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

/// Configuration values, deserialized from the file and environment sources.
#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// GitHub API token (`GITHUB_TOKEN`).
    #[serde(default)]
    pub github_token: String,
    /// Repository in `owner/name` form (`GITHUB_REPOSITORY`).
    #[serde(default)]
    pub github_repository: String,
    /// Path to the JSON event payload (`GITHUB_EVENT_PATH`).
    #[serde(default)]
    pub github_event_path: Option<PathBuf>,
    /// GitHub REST API base URL (`GITHUB_API_URL`).
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,
    /// Overall score (0-100) at or above which a candidate is a duplicate (`DUPLICATE_THRESHOLD`).
    #[serde(default = "default_duplicate_threshold")]
    pub duplicate_threshold: u8,
    /// Custom comment template directory (`TEMPLATES_DIR`).
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
    /// Directory the action was checked out to (`GITHUB_ACTION_PATH`).
    /// Its `templates` subdirectory is the default template directory.
    #[serde(default)]
    pub github_action_path: Option<PathBuf>,
    /// Number of contributors to assign (`ASSIGNEE_COUNT`).
    #[serde(default = "default_assignee_count")]
    pub assignee_count: usize,
    /// Timeout for each tracker request, in seconds (`REQUEST_TIMEOUT_SECS`).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            github_token: String::new(),
            github_repository: String::new(),
            github_event_path: None,
            github_api_url: default_github_api_url(),
            duplicate_threshold: default_duplicate_threshold(),
            templates_dir: None,
            github_action_path: None,
            assignee_count: default_assignee_count(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ConfigInner {
    /// Reject configurations that cannot drive a run, before any network call happens.
    pub fn validate(&self) -> Void {
        if self.github_token.trim().is_empty() {
            return Err(anyhow::anyhow!("Missing GITHUB_TOKEN environment variable."));
        }

        if self.github_repository.trim().is_empty() {
            return Err(anyhow::anyhow!("Missing GITHUB_REPOSITORY environment variable."));
        }

        match self.github_repository.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {}
            _ => return Err(anyhow::anyhow!("GITHUB_REPOSITORY must be of the form `owner/name`, got `{}`.", self.github_repository)),
        }

        if self.github_event_path.is_none() {
            return Err(anyhow::anyhow!("Missing GITHUB_EVENT_PATH environment variable."));
        }

        if self.duplicate_threshold > 100 {
            return Err(anyhow::anyhow!("Duplicate threshold must be between 0 and 100."));
        }

        if self.assignee_count < 1 {
            return Err(anyhow::anyhow!("Assignee count must be at least 1."));
        }

        if self.request_timeout_secs < 1 {
            return Err(anyhow::anyhow!("Request timeout must be at least 1 second."));
        }

        Ok(())
    }

    /// The per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The directory to look up comment templates in, if any.
    ///
    /// `TEMPLATES_DIR` wins; otherwise the `templates` folder shipped next to the action.
    /// Empty paths count as unset, since action inputs default to `""`.
    pub fn template_dir(&self) -> Option<PathBuf> {
        let non_empty = |p: &&PathBuf| !p.as_os_str().is_empty();

        self.templates_dir
            .as_ref()
            .filter(non_empty)
            .cloned()
            .or_else(|| self.github_action_path.as_ref().filter(non_empty).map(|p| p.join("templates")))
    }
}

impl Config {
    /// Load the configuration from an optional TOML file, overridden by the environment.
    ///
    /// `event_path` takes precedence over both sources when given.
    pub fn load(explicit_path: Option<&Path>, event_path: Option<&Path>) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        cfg = cfg
            .add_source(
                config::Environment::default().source(Some(
                    std::env::vars()
                        .filter(|(key, _)| ENV_KEYS.contains(&key.as_str()))
                        .collect(),
                )),
            )
            .set_override_option("github_event_path", event_path.map(|p| p.to_string_lossy().into_owned()))?;

        let inner: ConfigInner = cfg.build()?.try_deserialize()?;
        inner.validate()?;

        Ok(inner.into())
    }
}

/// Environment variables the configuration reads; everything else in the environment is ignored.
const ENV_KEYS: &[&str] = &[
    "GITHUB_TOKEN",
    "GITHUB_REPOSITORY",
    "GITHUB_EVENT_PATH",
    "GITHUB_API_URL",
    "DUPLICATE_THRESHOLD",
    "TEMPLATES_DIR",
    "GITHUB_ACTION_PATH",
    "ASSIGNEE_COUNT",
    "REQUEST_TIMEOUT_SECS",
];
