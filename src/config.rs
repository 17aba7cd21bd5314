//! Configuration options for the storefront client

use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Default API root of a locally running storefront backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:8081/api";

/// Token value meaning "no bearer token, rely on the cookie session"
pub const DEFAULT_SESSION_MARKER: &str = "oauth2-session";

/// Configuration options for the storefront client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Root URL every resource path is appended to
    pub base_url: String,

    /// The request timeout
    pub request_timeout: Duration,

    /// Sentinel token value that disables the bearer header
    pub session_marker: String,

    /// Storage key of the compatibility bearer token
    pub token_key: String,

    /// Storage key of the signed-in user's id
    pub user_id_key: String,

    /// Route raised when the server answers 401
    pub login_route: String,

    /// Route raised after logout
    pub home_route: String,

    /// Root of the OAuth provider redirects. Falls back to the origin of
    /// `base_url` when unset.
    pub oauth_base_url: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            session_marker: DEFAULT_SESSION_MARKER.to_string(),
            token_key: "token".to_string(),
            user_id_key: "userId".to_string(),
            login_route: "/login".to_string(),
            home_route: "/".to_string(),
            oauth_base_url: None,
        }
    }
}

impl ClientOptions {
    /// Load options from `STOREFRONT_API_URL` and the optional
    /// `STOREFRONT_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("STOREFRONT_API_URL")
            .map_err(|_| Error::config("STOREFRONT_API_URL environment variable not found"))?;
        Url::parse(&base_url)?;

        let mut options = Self::default().with_base_url(&base_url);
        if let Ok(raw) = std::env::var("STOREFRONT_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                Error::config(format!("STOREFRONT_TIMEOUT_SECS is not a number: {}", raw))
            })?;
            options = options.with_request_timeout(Duration::from_secs(secs));
        }
        Ok(options)
    }

    /// Set the API root
    pub fn with_base_url(mut self, value: &str) -> Self {
        self.base_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Duration) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the cookie-session sentinel token value
    pub fn with_session_marker(mut self, value: &str) -> Self {
        self.session_marker = value.to_string();
        self
    }

    /// Set the route raised on 401
    pub fn with_login_route(mut self, value: &str) -> Self {
        self.login_route = value.to_string();
        self
    }

    /// Set the route raised after logout
    pub fn with_home_route(mut self, value: &str) -> Self {
        self.home_route = value.to_string();
        self
    }

    /// Set the OAuth redirect root
    pub fn with_oauth_base_url(mut self, value: &str) -> Self {
        self.oauth_base_url = Some(value.trim_end_matches('/').to_string());
        self
    }

    /// Root used for provider redirects
    pub fn oauth_root(&self) -> Result<String> {
        match &self.oauth_base_url {
            Some(root) => Ok(root.clone()),
            None => Ok(Url::parse(&self.base_url)?.origin().ascii_serialization()),
        }
    }
}
