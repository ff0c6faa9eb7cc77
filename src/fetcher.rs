//! Rate-limited HTTP fetching.
//!
//! Every outbound request made by a source adapter goes through the [`Fetch`]
//! trait. The production implementation, [`RateLimitedFetcher`], sleeps for a
//! jittered delay before each request and identifies itself with a user agent
//! chosen once, when the fetcher is built, so that one session looks like one
//! consistent client.
//!
//! # Failure Model
//!
//! A fetch never errors: non-success statuses, network failures and bodies
//! that claim to be JSON but do not parse all yield `None`. Callers treat
//! `None` as "no data for this page" and decide for themselves whether that is
//! acceptable.
//!
//! # Jitter
//!
//! ```text
//! delay = base_delay * (0.5 + uniform[0, 1))
//! ```

use crate::config::Config;
use crate::utils::truncate_for_log;
use rand::{Rng, rng};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// The response declared a JSON content type.
    Json(serde_json::Value),
    /// Anything else, typically an HTML document.
    Text(String),
}

impl Body {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Body::Json(value) => Some(value),
            Body::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            Body::Json(_) => None,
        }
    }
}

/// Issues a single GET request and decodes the response.
///
/// Implementors must not retry; one call is one request.
// Fetch futures are awaited on the caller's task and need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    /// Fetch `url` with the given query parameters.
    ///
    /// # Returns
    ///
    /// The decoded body, or `None` on any transport failure or non-success
    /// status.
    async fn fetch(&self, url: &str, params: &[(&str, &str)]) -> Option<Body>;
}

/// [`Fetch`] implementation backed by `reqwest` with a jittered pre-request delay.
#[derive(Clone)]
pub struct RateLimitedFetcher {
    client: Client,
    headers: HeaderMap,
    user_agent: String,
    base_delay: Duration,
}

impl fmt::Debug for RateLimitedFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimitedFetcher")
            .field("user_agent", &self.user_agent)
            .field("base_delay", &self.base_delay)
            .finish()
    }
}

impl RateLimitedFetcher {
    /// Build a fetcher, picking one user agent from `config.user_agents`.
    pub fn new(config: &Config) -> Self {
        let user_agent = if config.user_agents.is_empty() {
            String::new()
        } else {
            let idx = rng().random_range(0..config.user_agents.len());
            config.user_agents[idx].clone()
        };
        Self::with_user_agent(user_agent, config.request_delay())
    }

    pub fn with_user_agent(user_agent: String, base_delay: Duration) -> Self {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&user_agent) {
            headers.insert(USER_AGENT, value);
        }
        headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE));

        Self {
            client: Client::new(),
            headers,
            user_agent,
            base_delay,
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The headers sent when a request does not supply its own.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Compute the jittered delay for the next request.
    ///
    /// Saturates at [`Duration::MAX`] instead of overflowing.
    pub fn jittered_delay(&self) -> Duration {
        let factor = 0.5 + rng().random::<f64>();
        Duration::try_from_secs_f64(self.base_delay.as_secs_f64() * factor).unwrap_or(Duration::MAX)
    }

    /// Fetch with explicit headers replacing the fetcher's defaults.
    #[instrument(level = "debug", skip(self, headers, params))]
    pub async fn fetch_with_headers(
        &self,
        url: &str,
        headers: Option<HeaderMap>,
        params: &[(&str, &str)],
    ) -> Option<Body> {
        let delay = self.jittered_delay();
        debug!(?delay, "Sleeping before request");
        sleep(delay).await;

        let headers = headers.unwrap_or_else(|| self.headers.clone());
        let response = match self.client.get(url).headers(headers).query(params).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Non-success status; treating as no data");
            return None;
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed reading response body");
                return None;
            }
        };
        debug!(bytes = text.len(), is_json, "Fetched response body");

        if is_json {
            match serde_json::from_str(&text) {
                Ok(value) => Some(Body::Json(value)),
                Err(e) => {
                    warn!(
                        error = %e,
                        body_preview = %truncate_for_log(&text, 200),
                        "Declared JSON body did not parse"
                    );
                    None
                }
            }
        } else {
            Some(Body::Text(text))
        }
    }
}

impl Fetch for RateLimitedFetcher {
    async fn fetch(&self, url: &str, params: &[(&str, &str)]) -> Option<Body> {
        self.fetch_with_headers(url, None, params).await
    }
}
