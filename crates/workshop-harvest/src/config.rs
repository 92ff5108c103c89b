//! Harvest configuration: request identity, timeouts and politeness delay.

use std::time::Duration;

/// Browser User-Agent sent with every request. Steam rejects bot-like agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/91.0.4472.124 Safari/537.36";

/// Every accepted item reference must start with this prefix.
pub const DEFAULT_HOST_PREFIX: &str = "https://steamcommunity.com/";

/// Canonical single-item URL; the numeric item id is appended.
pub const DEFAULT_ITEM_URL_BASE: &str = "https://steamcommunity.com/sharedfiles/filedetails/?id=";

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause between two successive requests to the workshop host.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);

/// Settings shared by the fetcher, the modpack expander and the harvester.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Additional request headers, sent verbatim.
    pub extra_headers: Vec<(String, String)>,
    /// Prefix every item reference must start with.
    pub host_prefix: String,
    /// Base used to build child item URLs when expanding a modpack.
    pub item_url_base: String,
    /// Timeout for a single GET.
    pub timeout: Duration,
    /// Delay inserted between successive requests.
    pub request_delay: Duration,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            extra_headers: Vec::new(),
            host_prefix: DEFAULT_HOST_PREFIX.to_string(),
            item_url_base: DEFAULT_ITEM_URL_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

impl HarvestConfig {
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    pub fn with_host_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.host_prefix = prefix.into();
        self
    }

    pub fn with_item_url_base(mut self, base: impl Into<String>) -> Self {
        self.item_url_base = base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarvestConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.request_delay, Duration::from_secs(1));
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert!(config.item_url_base.starts_with(&config.host_prefix));
    }

    #[test]
    fn test_builders_override_fields() {
        let config = HarvestConfig::default()
            .with_timeout(Duration::from_millis(250))
            .with_request_delay(Duration::ZERO)
            .with_host_prefix("http://127.0.0.1:8080/")
            .with_header("Accept-Language", "en-US");
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.request_delay, Duration::ZERO);
        assert_eq!(config.host_prefix, "http://127.0.0.1:8080/");
        assert_eq!(
            config.extra_headers,
            vec![("Accept-Language".to_string(), "en-US".to_string())]
        );
    }
}
