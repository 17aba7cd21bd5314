//! Locally persisted session credentials

use crate::storage::TokenStorage;

/// How the current client proves its identity to the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredToken {
    /// A real bearer token, sent as `Authorization: Bearer <token>`
    Bearer(String),

    /// The session-marker sentinel: identity travels in the session cookie
    CookieSession,
}

impl StoredToken {
    /// Interpret a stored token value
    pub fn from_stored(value: &str, session_marker: &str) -> Self {
        if value == session_marker {
            StoredToken::CookieSession
        } else {
            StoredToken::Bearer(value.to_string())
        }
    }

    /// Read the token under `key`, if any
    pub fn load(storage: &dyn TokenStorage, key: &str, session_marker: &str) -> Option<Self> {
        storage
            .get_item(key)
            .filter(|value| !value.is_empty())
            .map(|value| Self::from_stored(&value, session_marker))
    }

    /// The bearer token to attach, if this is not a cookie session
    pub fn bearer(&self) -> Option<&str> {
        match self {
            StoredToken::Bearer(token) => Some(token),
            StoredToken::CookieSession => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn sentinel_means_cookie_session() {
        let token = StoredToken::from_stored("oauth2-session", "oauth2-session");
        assert_eq!(token, StoredToken::CookieSession);
        assert_eq!(token.bearer(), None);
    }

    #[test]
    fn other_values_are_bearer_tokens() {
        let token = StoredToken::from_stored("eyJhbGciOi", "oauth2-session");
        assert_eq!(token.bearer(), Some("eyJhbGciOi"));
    }

    #[test]
    fn missing_or_empty_token_loads_nothing() {
        let storage = MemoryStorage::new();
        assert_eq!(StoredToken::load(&storage, "token", "oauth2-session"), None);

        storage.set_item("token", "").unwrap();
        assert_eq!(StoredToken::load(&storage, "token", "oauth2-session"), None);
    }
}
