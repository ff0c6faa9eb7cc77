//! Static crawler configuration.
//!
//! All values are fixed at process start and read-only afterwards. The
//! configuration is loaded from an optional YAML file; any field the file omits
//! keeps its built-in default, so an empty file is a valid configuration.
//!
//! ```yaml
//! fox_max_pages: 2
//! request_delay_secs: 0.5
//! stopwords: [the, a, an]
//! ```

use crate::error::{NewsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

/// Upper bound of the jitter factor applied to the request delay.
pub const MAX_JITTER_FACTOR: f64 = 1.5;

/// Crawler settings shared by every adapter and the analyzer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of search result pages processed for Fox News.
    pub fox_max_pages: usize,
    /// Maximum number of search result pages processed for Reuters.
    pub reuters_max_pages: usize,
    /// Base delay applied (with jitter) before every outbound request.
    pub request_delay_secs: f64,
    /// Result limit used when a search does not specify one.
    pub default_limit: usize,
    /// Pool of user-agent strings; one is picked per fetcher.
    pub user_agents: Vec<String>,
    /// Words ignored by keyword extraction.
    pub stopwords: Vec<String>,
    /// Upper bound on the number of keywords ever returned.
    pub max_keywords: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fox_max_pages: 3,
            reuters_max_pages: 3,
            request_delay_secs: 1.0,
            default_limit: 5,
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/133.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Safari/605.1.15".to_string(),
            ],
            stopwords: [
                "the", "a", "an", "in", "on", "at", "to", "for", "of", "and", "is", "are", "was",
                "were",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_keywords: 10,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, or defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or
    /// describes an unusable configuration (see [`Config::validate`]).
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path).await?;
                let config: Config = serde_yaml::from_str(&raw)?;
                info!(path = %path.display(), "Loaded configuration file");
                config
            }
            None => Config::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the crawler misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.user_agents.is_empty() {
            return Err(NewsError::Config("user_agents must not be empty".to_string()));
        }
        // The jittered delay reaches 1.5x the base, so that must fit a Duration too.
        if Duration::try_from_secs_f64(self.request_delay_secs * MAX_JITTER_FACTOR).is_err() {
            return Err(NewsError::Config(format!(
                "request_delay_secs must be a non-negative number of representable seconds, got {}",
                self.request_delay_secs
            )));
        }
        Ok(())
    }

    /// Base request delay; saturates at [`Duration::MAX`] for unvalidated values.
    pub fn request_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.request_delay_secs).unwrap_or(Duration::MAX)
    }
}
