//! HTTP gateway shared by every resource client
//!
//! One configured `reqwest` client with a fixed API root, a cookie jar for
//! the server session, JSON content type and a request timeout. Every
//! request passes through the same two hooks:
//!
//! * before sending, a stored bearer token is attached unless it is the
//!   cookie-session sentinel;
//! * after receiving a 401, the stored token and user id are removed and the
//!   host is asked to navigate to the login route.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::Url;

use crate::auth::StoredToken;
use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::navigation::Navigator;
use crate::storage::TokenStorage;

/// The configured gateway. Cheap to clone; clones share the cookie jar,
/// storage and navigator.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    options: Arc<ClientOptions>,
    storage: Arc<dyn TokenStorage>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Build the gateway
    pub fn new(
        options: ClientOptions,
        storage: Arc<dyn TokenStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        Url::parse(&options.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .cookie_store(true)
            .timeout(options.request_timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            options: Arc::new(options),
            storage,
            navigator,
        })
    }

    /// Client options
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Local token storage
    pub fn storage(&self) -> &dyn TokenStorage {
        self.storage.as_ref()
    }

    /// Navigation hook
    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    /// Create a GET request
    pub fn get(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::GET)
    }

    /// Create a POST request
    pub fn post(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::POST)
    }

    /// Create a PUT request
    pub fn put(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::PUT)
    }

    /// Create a DELETE request
    pub fn delete(&self, path: &str) -> FetchBuilder<'_> {
        FetchBuilder::new(self, path, Method::DELETE)
    }

    /// Remove the persisted token and user id
    pub fn clear_credentials(&self) {
        self.storage.remove_item(&self.options.token_key);
        self.storage.remove_item(&self.options.user_id_key);
    }

    fn bearer_token(&self) -> Option<String> {
        StoredToken::load(
            self.storage.as_ref(),
            &self.options.token_key,
            &self.options.session_marker,
        )
        .and_then(|token| token.bearer().map(str::to_string))
    }

    // Hard navigation rather than a store transition, so a 401 raised while
    // handling this one cannot re-enter.
    fn handle_unauthorized(&self) {
        log::warn!(
            "Received 401, clearing credentials and redirecting to {}",
            self.options.login_route
        );
        self.clear_credentials();
        self.navigator.navigate(&self.options.login_route);
    }
}

/// Helper for building and executing a single gateway request
pub struct FetchBuilder<'a> {
    api: &'a ApiClient,
    url: String,
    method: Method,
    query_params: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl<'a> FetchBuilder<'a> {
    fn new(api: &'a ApiClient, path: &str, method: Method) -> Self {
        Self {
            api,
            url: format!("{}{}", api.options.base_url, path),
            method,
            query_params: Vec::new(),
            body: None,
        }
    }

    /// Add a query parameter
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a JSON body to the request
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    fn build(&self) -> Result<RequestBuilder> {
        let mut url = Url::parse(&self.url)?;

        if !self.query_params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                query_pairs.append_pair(key, value);
            }
        }

        let mut req = self.api.client.request(self.method.clone(), url);

        if let Some(token) = self.api.bearer_token() {
            req = req.bearer_auth(token);
        }

        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }

        Ok(req)
    }

    async fn send(&self) -> Result<Response> {
        let req = self.build()?;
        log::debug!("{} {}", self.method, self.url);

        let response = req.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.api.handle_unauthorized();
            let text = response.text().await.unwrap_or_default();
            let (message, _) = error_payload(status, &text);
            return Err(Error::Unauthorized(message));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let (message, details) = error_payload(status, &text);
            log::debug!("{} {} failed with {}: {}", self.method, self.url, status, message);
            return Err(Error::Api {
                status: status.as_u16(),
                message,
                details,
            });
        }

        Ok(response)
    }

    /// Execute the request and parse the response body as JSON
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<T> {
        let response = self.send().await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Execute the request and discard the response body
    pub async fn execute_empty(&self) -> Result<()> {
        self.send().await?;
        Ok(())
    }
}

/// Pull a human readable message (and the parsed payload) out of an error body
fn error_payload(status: StatusCode, text: &str) -> (String, Option<Value>) {
    let details = serde_json::from_str::<Value>(text).ok();

    let from_json = details.as_ref().and_then(|value| {
        ["message", "error"]
            .iter()
            .filter_map(|field| value.get(*field).and_then(Value::as_str))
            .find(|msg| !msg.is_empty())
            .map(str::to_string)
    });

    let message = match from_json {
        Some(msg) => msg,
        None if !text.trim().is_empty() => text.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };

    (message, details)
}
