//! Connection settings for the REST API client

use url::Url;

use crate::error::RestClientResult;

/// Origin the MoFA Stage backend listens on out of the box
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

pub const DEFAULT_USER_AGENT: &str = concat!("mofa-stage-client/", env!("CARGO_PKG_VERSION"));

/// Where and how the client talks to the service
///
/// `base_url` is the service origin; the `/api` prefix is appended per
/// request, so any path on `base_url` is replaced.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            ..Default::default()
        }
    }

    /// Create a config from a base URL string
    pub fn from_url(base_url: &str) -> RestClientResult<Self> {
        Ok(Self::new(Url::parse(base_url)?))
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
