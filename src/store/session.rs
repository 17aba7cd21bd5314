//! Session store: who is signed in

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use url::Url;

use crate::auth::{AuthClient, OAuthCallback, User, UserUpdate};
use crate::error::{Error, Result};
use crate::fetch::ApiClient;

/// Snapshot of the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// The signed-in user; `None` for anonymous visitors
    pub user: Option<User>,
    /// True only while init or a session login is in flight
    pub loading: bool,
    /// Set by a failed session login, cleared by the next successful transition
    pub error: Option<String>,
    /// Bumped by every sign-in, sign-out and failed sign-in. Observers that
    /// only see the latest snapshot still detect an identity change that
    /// ends on the same user.
    pub epoch: u64,
}

/// Transitions of [`SessionState`]
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    LoginStart,
    LoginSuccess(User),
    LoginFailure(Option<String>),
    Logout,
    UpdateUser(User),
}

/// Apply one action to a session snapshot
pub fn reduce(state: &SessionState, action: SessionAction) -> SessionState {
    match action {
        SessionAction::LoginStart => SessionState {
            loading: true,
            error: None,
            ..state.clone()
        },
        SessionAction::LoginSuccess(user) => SessionState {
            user: Some(user),
            loading: false,
            error: None,
            epoch: state.epoch + 1,
        },
        SessionAction::LoginFailure(error) => SessionState {
            user: None,
            loading: false,
            error,
            epoch: state.epoch + 1,
        },
        SessionAction::Logout => SessionState {
            epoch: state.epoch + 1,
            ..SessionState::default()
        },
        // A profile response that settles after logout must not resurrect the user.
        SessionAction::UpdateUser(user) if state.user.is_some() => SessionState {
            user: Some(user),
            error: None,
            ..state.clone()
        },
        SessionAction::UpdateUser(_) => state.clone(),
    }
}

/// Process-wide session state with its operations
pub struct SessionStore {
    api: ApiClient,
    auth: AuthClient,
    state: watch::Sender<SessionState>,
    initialized: AtomicBool,
}

impl SessionStore {
    /// Create an anonymous, not yet initialized store
    pub fn new(api: ApiClient) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            auth: AuthClient::new(api.clone()),
            api,
            state,
            initialized: AtomicBool::new(false),
        }
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Current snapshot
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Identity epoch of the current snapshot
    pub fn epoch(&self) -> u64 {
        self.state.borrow().epoch
    }

    fn dispatch(&self, action: SessionAction) {
        log::debug!("Session action: {:?}", action);
        self.state.send_modify(|state| *state = reduce(state, action));
    }

    /// Resolve the current cookie session. Runs once per store; later calls
    /// return the current user without a request.
    ///
    /// Failing to resolve is the normal anonymous state, not an error.
    pub async fn init(&self) -> Option<User> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return self.user();
        }

        self.dispatch(SessionAction::LoginStart);
        match self.auth.get_current_user().await {
            Ok(user) => {
                log::info!("Resolved session for user {:?}", user.id);
                self.dispatch(SessionAction::LoginSuccess(user.clone()));
                Some(user)
            }
            Err(err) => {
                log::debug!("No active session: {}", err);
                self.dispatch(SessionAction::LoginFailure(None));
                None
            }
        }
    }

    /// Complete an OAuth sign-in whose redirect carried the user's id and email
    pub async fn login_with_session(&self, user_id: i64, email: &str) -> Result<User> {
        log::debug!("Session login for {} ({})", user_id, email);
        self.dispatch(SessionAction::LoginStart);

        match self.auth.get_user_by_id(user_id).await {
            Ok(user) => {
                log::info!("Signed in user {}", user_id);
                self.dispatch(SessionAction::LoginSuccess(user.clone()));
                Ok(user)
            }
            Err(err) => {
                log::error!("Session login failed: {}", err);
                self.dispatch(SessionAction::LoginFailure(Some(err.to_string())));
                Err(err)
            }
        }
    }

    /// Token-based sign-in kept for compatibility: persists the token and
    /// user id locally and adopts `user` as is
    pub fn login(&self, token: &str, user: User) -> Result<User> {
        self.dispatch(SessionAction::LoginStart);

        let options = self.api.options();
        let stored = self
            .api
            .storage()
            .set_item(&options.token_key, token)
            .and_then(|_| match user.id {
                Some(id) => self
                    .api
                    .storage()
                    .set_item(&options.user_id_key, &id.to_string()),
                None => Ok(()),
            });

        match stored {
            Ok(()) => {
                self.dispatch(SessionAction::LoginSuccess(user.clone()));
                Ok(user)
            }
            Err(err) => {
                self.dispatch(SessionAction::LoginFailure(Some(err.to_string())));
                Err(err)
            }
        }
    }

    /// Drive [`login_with_session`](Self::login_with_session) from the URL the
    /// OAuth redirect landed on. `Ok(None)` when the URL carries no callback.
    pub async fn handle_oauth_callback(&self, url: &Url) -> Result<Option<User>> {
        match OAuthCallback::from_url(url) {
            None => Ok(None),
            Some(OAuthCallback::Failure(error)) => {
                log::error!("OAuth2 login error: {}", error);
                Err(Error::auth(format!("Login failed: {}", error)))
            }
            Some(OAuthCallback::Success { user_id, email }) => {
                self.login_with_session(user_id, &email).await.map(Some)
            }
        }
    }

    /// Sign out. The remote logout is best effort; local state is reset
    /// regardless of its outcome.
    pub async fn logout(&self) {
        self.api.clear_credentials();

        if let Err(err) = self.auth.logout().await {
            log::warn!("Logout request failed: {}", err);
        }

        self.dispatch(SessionAction::Logout);
        self.api.navigator().navigate(&self.api.options().home_route);
    }

    /// Change the signed-in user's profile. The stored user becomes exactly
    /// what the server returns.
    pub async fn update_user(&self, update: &UserUpdate) -> Result<User> {
        let user = self
            .user()
            .ok_or_else(|| Error::ownership("Please login to update your profile"))?;
        let id = user
            .id
            .ok_or_else(|| Error::ownership("Session user has no id"))?;

        let merged = update.merged_into(&user);
        let updated = self.auth.update_user(id, &merged).await?;
        self.dispatch(SessionAction::UpdateUser(updated.clone()));
        Ok(updated)
    }
}
