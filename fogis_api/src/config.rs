//! Connection settings for the portal client.

use std::time::Duration;

/// Production base URL of the referee portal. All page paths are relative to it.
pub const DEFAULT_BASE_URL: &str = "https://fogis.svenskfotboll.se/mdk";

/// Request timeout applied to every HTTP exchange unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Settings shared by the authenticator and the RPC transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL including the `/mdk` prefix, without trailing slash.
    pub base_url: String,
    /// Timeout for a single HTTP request.
    pub timeout: Duration,
    /// User agent sent with every request. The portal rejects obvious bots.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Reads `FOGIS_BASE_URL`, `FOGIS_TIMEOUT_SECS` and `FOGIS_USER_AGENT`,
    /// falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = env_string("FOGIS_BASE_URL")
            .unwrap_or_else(|| defaults.base_url.clone());
        let user_agent = env_string("FOGIS_USER_AGENT")
            .unwrap_or_else(|| defaults.user_agent.clone());
        let timeout = env_u64("FOGIS_TIMEOUT_SECS", defaults.timeout.as_secs());
        Self {
            timeout: Duration::from_secs(timeout),
            ..defaults
        }
        .with_base_url(&base_url)
        .with_user_agent(&user_agent)
    }

    /// Points the client at a different portal root. Used for testing with wiremock.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Scheme and host of the base URL, used for `Origin` headers.
    pub(crate) fn origin(&self) -> String {
        match url::Url::parse(&self.base_url) {
            Ok(url) => url.origin().ascii_serialization(),
            Err(_) => self.base_url.clone(),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|val| !val.trim().is_empty())
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = ClientConfig::default().with_base_url("http://localhost:8080/mdk/");
        assert_eq!(config.base_url, "http://localhost:8080/mdk");
        assert_eq!(
            config.url("/Login.aspx"),
            "http://localhost:8080/mdk/Login.aspx"
        );
    }

    #[test]
    fn origin_strips_path() {
        let config = ClientConfig::default();
        assert_eq!(config.origin(), "https://fogis.svenskfotboll.se");

        let local = ClientConfig::default().with_base_url("http://127.0.0.1:4000/mdk");
        assert_eq!(local.origin(), "http://127.0.0.1:4000");
    }

    #[test]
    fn default_timeout_is_thirty_seconds() {
        assert_eq!(ClientConfig::default().timeout, Duration::from_secs(30));
    }
}
