//! Types for authentication and user profiles

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use url::Url;

/// Identity provider a user signed up with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthProvider {
    Local,
    Google,
    Github,
    #[serde(other)]
    Other,
}

/// User profile as returned by the auth endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user ID. Session-only identity payloads may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Email address
    #[serde(default)]
    pub email: String,

    /// Avatar URL
    #[serde(
        default,
        rename = "imageUrl",
        alias = "pictureUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub picture_url: Option<String>,

    /// The provider the account was created through
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<AuthProvider>,

    /// The creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

/// Profile fields a user may change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
}

impl UserUpdate {
    /// The full profile that results from applying this update to `user`
    pub fn merged_into(&self, user: &User) -> User {
        let mut merged = user.clone();
        if let Some(name) = &self.name {
            merged.name = name.clone();
        }
        if let Some(email) = &self.email {
            merged.email = email.clone();
        }
        if let Some(picture_url) = &self.picture_url {
            merged.picture_url = Some(picture_url.clone());
        }
        merged
    }
}

/// OAuth providers the backend can redirect to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Github,
}

impl OAuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
        }
    }
}

/// Outcome carried back to the login route by the OAuth redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OAuthCallback {
    Success { user_id: i64, email: String },
    Failure(String),
}

impl OAuthCallback {
    const PARAMS: [&'static str; 3] = ["userId", "email", "error"];

    /// Parse the callback parameters from the current URL, if present
    pub fn from_url(url: &Url) -> Option<Self> {
        let mut user_id = None;
        let mut email = None;
        let mut error = None;

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "userId" => user_id = Some(value.into_owned()),
                "email" => email = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                _ => {}
            }
        }

        if let Some(error) = error {
            return Some(OAuthCallback::Failure(error));
        }

        match (user_id, email) {
            (Some(raw_id), Some(email)) => match raw_id.parse::<i64>() {
                Ok(user_id) => Some(OAuthCallback::Success { user_id, email }),
                Err(_) => Some(OAuthCallback::Failure(format!(
                    "invalid userId in callback: {}",
                    raw_id
                ))),
            },
            _ => None,
        }
    }

    /// `url` with the callback parameters removed, so they are consumed once
    pub fn strip(url: &Url) -> Url {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !Self::PARAMS.contains(&key.as_ref()))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        let mut stripped = url.clone();
        if kept.is_empty() {
            stripped.set_query(None);
        } else {
            stripped.query_pairs_mut().clear().extend_pairs(kept);
        }
        stripped
    }
}
