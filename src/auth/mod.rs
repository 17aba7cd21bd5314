//! Authentication and user profile endpoints

mod session;
mod types;

use crate::error::Result;
use crate::fetch::ApiClient;

pub use session::*;
pub use types::*;

/// Client for the `/auth` resource
#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    /// Create a new auth client on top of the gateway
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Resolve the user behind the current cookie session
    pub async fn get_current_user(&self) -> Result<User> {
        self.api.get("/auth/user").execute().await
    }

    /// Fetch a user by id
    pub async fn get_user_by_id(&self, id: i64) -> Result<User> {
        self.api.get(&format!("/auth/user/{}", id)).execute().await
    }

    /// Fetch a user by email address
    pub async fn get_user_by_email(&self, email: &str) -> Result<User> {
        let path = format!("/auth/user/email/{}", urlencoding::encode(email));
        self.api.get(&path).execute().await
    }

    /// Replace a user's profile; returns the profile the server stored
    pub async fn update_user(&self, id: i64, user: &User) -> Result<User> {
        self.api
            .put(&format!("/auth/user/{}", id))
            .json(user)?
            .execute()
            .await
    }

    /// End the server session
    pub async fn logout(&self) -> Result<()> {
        self.api.post("/auth/logout").execute_empty().await
    }

    /// URL the browser should be sent to for a provider sign-in
    pub fn authorization_url(&self, provider: OAuthProvider) -> Result<String> {
        let root = self.api.options().oauth_root()?;
        Ok(format!("{}/oauth2/authorization/{}", root, provider.as_str()))
    }
}
