//! Session configuration.

use std::time::Duration;
use url::Url;

/// Production endpoint of the InkPress API.
pub const DEFAULT_BASE_URL: &str = "https://api.inkpress.io/v1";

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Configuration for a [`TaskSession`](crate::TaskSession).
///
/// The defaults target the production API; tests and self-hosted
/// deployments override the base URL. Worker URLs inherit the scheme of
/// the base URL, so a session pointed at a plain-HTTP deployment talks
/// plain HTTP to its workers as well.
///
/// # Examples
///
/// ```rust
/// use inkpress::SessionConfig;
/// use std::time::Duration;
///
/// let config = SessionConfig::default()
///     .with_timeout(Duration::from_secs(120));
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the API, including the version prefix.
    pub base_url: Url,
    /// Timeout applied to every request.
    pub timeout: Duration,
    /// Value sent in the `User-Agent` header.
    pub user_agent: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: default_timeout(),
            user_agent: format!("inkpress-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SessionConfig {
    /// Create a configuration with the production defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the base API URL.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the `User-Agent` header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
