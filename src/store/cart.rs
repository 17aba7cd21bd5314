//! Cart store: the signed-in user's cart
//!
//! Every operation is gated on the session's user. Server responses replace
//! the cart wholesale. Mutations are not sequenced against each other: when
//! two requests race, the response that settles last wins, whichever was
//! issued last.
//!
//! A cart belongs to one session epoch. Responses and failures that settle
//! after the epoch moved on are returned to the caller but never applied,
//! and reads never show a cart from an earlier epoch.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::auth::User;
use crate::cart::{validate_quantity, Cart, CartClient};
use crate::error::{Error, Result};
use crate::fetch::ApiClient;
use crate::store::session::SessionState;

/// Message of the error raised by `add_item` without a signed-in user
pub const LOGIN_REQUIRED: &str = "Please login to add items to cart";

/// Snapshot of the cart store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    pub cart: Cart,
    pub loading: bool,
    pub error: Option<String>,
    /// Session epoch this cart belongs to
    pub epoch: u64,
}

/// Transitions of [`CartState`]
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    SetLoading(bool),
    /// A freshly loaded cart
    SetCart(Cart),
    /// The cart returned by a mutation
    Replace(Cart),
    SetError(String),
    /// The server cart was emptied
    Clear,
    /// Empty cart owned by a new session epoch
    Reset(u64),
}

/// Apply one action to a cart snapshot
pub fn reduce(state: &CartState, action: CartAction) -> CartState {
    match action {
        CartAction::SetLoading(loading) => CartState {
            loading,
            ..state.clone()
        },
        CartAction::SetCart(cart) => CartState {
            cart,
            loading: false,
            error: None,
            ..state.clone()
        },
        CartAction::Replace(cart) => CartState {
            cart,
            error: None,
            ..state.clone()
        },
        CartAction::SetError(error) => CartState {
            error: Some(error),
            loading: false,
            ..state.clone()
        },
        CartAction::Clear => CartState {
            cart: Cart::empty(),
            error: None,
            ..state.clone()
        },
        CartAction::Reset(epoch) => CartState {
            epoch,
            ..CartState::default()
        },
    }
}

/// Whose cart the requests address
#[derive(Debug, Clone, PartialEq, Eq)]
enum OwnerId {
    User(i64),
    /// User payload without an id: fall back to the session-identified
    /// endpoints
    CurrentSession(String),
}

/// A cart owner within one session epoch. Signing out and back in as the
/// same user yields a different owner.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Owner {
    id: OwnerId,
    epoch: u64,
}

impl Owner {
    fn of(session: &SessionState) -> Option<Self> {
        let user = session.user.as_ref()?;
        let id = match user.id {
            Some(id) => OwnerId::User(id),
            None => OwnerId::CurrentSession(user.email.clone()),
        };
        Some(Owner {
            id,
            epoch: session.epoch,
        })
    }

    fn user_id(&self) -> Result<i64> {
        match self.id {
            OwnerId::User(id) => Ok(id),
            OwnerId::CurrentSession(_) => Err(Error::ownership(
                "Cart owner has no id; only loading and adding are available",
            )),
        }
    }
}

/// Process-wide cart state with its operations
pub struct CartStore {
    carts: CartClient,
    session: watch::Receiver<SessionState>,
    state: watch::Sender<CartState>,
}

impl CartStore {
    /// Create an empty store following the given session
    pub fn new(api: ApiClient, session: watch::Receiver<SessionState>) -> Self {
        let epoch = session.borrow().epoch;
        let (state, _) = watch::channel(CartState {
            epoch,
            ..CartState::default()
        });
        Self {
            carts: CartClient::new(api),
            session,
            state,
        }
    }

    /// Receive every state change. Snapshots whose `epoch` is behind the
    /// session's are stale and about to be reset.
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    /// Current snapshot; empty when the session moved to a new epoch the
    /// store has not caught up with yet
    pub fn state(&self) -> CartState {
        let epoch = self.session.borrow().epoch;
        let state = self.state.borrow();
        if state.epoch == epoch {
            state.clone()
        } else {
            reduce(&state, CartAction::Reset(epoch))
        }
    }

    pub fn cart(&self) -> Cart {
        self.state().cart
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state().error
    }

    /// Sum of quantities in the current cart, computed on every call
    pub fn item_count(&self) -> u32 {
        self.state().cart.item_count()
    }

    // Adopting a newer epoch and applying the action happen in one
    // transition.
    fn dispatch(&self, owner: &Owner, action: CartAction) {
        log::debug!("Cart action: {:?}", action);
        self.state.send_modify(|state| {
            if state.epoch != owner.epoch {
                *state = reduce(state, CartAction::Reset(owner.epoch));
            }
            *state = reduce(state, action);
        });
    }

    fn owner(&self) -> Option<Owner> {
        Owner::of(&self.session.borrow())
    }

    fn is_current(&self, owner: &Owner) -> bool {
        self.owner().as_ref() == Some(owner)
    }

    // An outcome for an owner who has since signed out (or been replaced)
    // is dropped instead of being shown to the next session.
    fn settle(&self, owner: &Owner, result: Result<Cart>, action: fn(Cart) -> CartAction) -> Result<Cart> {
        match result {
            Ok(cart) => {
                if self.is_current(owner) {
                    self.dispatch(owner, action(cart.clone()));
                } else {
                    log::debug!("Dropping cart response for previous owner {:?}", owner);
                }
                Ok(cart)
            }
            Err(err) => Err(self.fail(owner, err)),
        }
    }

    fn fail(&self, owner: &Owner, err: Error) -> Error {
        log::error!("Cart operation failed: {}", err);
        if self.is_current(owner) {
            self.dispatch(owner, CartAction::SetError(err.to_string()));
        }
        err
    }

    /// Fetch the owner's cart and replace the local one. No-op without a user.
    pub async fn load(&self) -> Result<()> {
        let Some(owner) = self.owner() else {
            return Ok(());
        };

        self.dispatch(&owner, CartAction::SetLoading(true));
        let result = match owner.id {
            OwnerId::User(id) => self.carts.get_cart(id).await,
            OwnerId::CurrentSession(_) => self.carts.get_current_cart().await,
        };

        self.settle(&owner, result, CartAction::SetCart).map(|_| ())
    }

    /// Add a product. Fails with an ownership error, without a request, when
    /// nobody is signed in.
    pub async fn add_item(&self, product_id: i64, quantity: u32) -> Result<Cart> {
        let owner = self.owner().ok_or_else(|| Error::ownership(LOGIN_REQUIRED))?;
        validate_quantity(quantity)?;

        let result = match owner.id {
            OwnerId::User(id) => self.carts.add_item(id, product_id, quantity).await,
            OwnerId::CurrentSession(_) => self.carts.add_item_to_current(product_id, quantity).await,
        };
        self.settle(&owner, result, CartAction::Replace)
    }

    /// Set a line's quantity. `Ok(None)` without a request when nobody is
    /// signed in.
    pub async fn update_item(&self, product_id: i64, quantity: u32) -> Result<Option<Cart>> {
        let Some(owner) = self.owner() else {
            return Ok(None);
        };
        validate_quantity(quantity)?;
        let user_id = owner.user_id()?;

        let result = self.carts.update_item(user_id, product_id, quantity).await;
        self.settle(&owner, result, CartAction::Replace).map(Some)
    }

    /// Remove a line. `Ok(None)` without a request when nobody is signed in.
    pub async fn remove_item(&self, product_id: i64) -> Result<Option<Cart>> {
        let Some(owner) = self.owner() else {
            return Ok(None);
        };
        let user_id = owner.user_id()?;

        let result = self.carts.remove_item(user_id, product_id).await;
        self.settle(&owner, result, CartAction::Replace).map(Some)
    }

    /// Empty the cart on the server, then locally. No-op without a user.
    pub async fn clear_cart(&self) -> Result<()> {
        let Some(owner) = self.owner() else {
            return Ok(());
        };
        let user_id = owner.user_id()?;

        match self.carts.clear_cart(user_id).await {
            Ok(()) => {
                if self.is_current(&owner) {
                    self.dispatch(&owner, CartAction::Clear);
                }
                Ok(())
            }
            Err(err) => Err(self.fail(&owner, err)),
        }
    }

    /// React to a new session epoch: start over with an empty cart and
    /// reload it when somebody is signed in
    pub async fn on_session_change(&self, epoch: u64, user: Option<&User>) {
        self.state.send_if_modified(|state| {
            // Epochs only grow; an operation may already have adopted this
            // one or a later one.
            if state.epoch >= epoch {
                return false;
            }
            *state = reduce(state, CartAction::Reset(epoch));
            true
        });

        match user {
            Some(user) => {
                log::info!("User {:?} authenticated, loading cart", user.id);
                if let Err(err) = self.load().await {
                    log::warn!("Cart reload failed: {}", err);
                }
            }
            None => log::info!("No signed-in user, cart reset"),
        }
    }

    /// Follow the session in a background task until the session store is
    /// dropped
    pub fn spawn_session_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        let mut session = self.session.clone();

        tokio::spawn(async move {
            let mut seen: Option<u64> = None;
            loop {
                let (epoch, user) = {
                    let state = session.borrow_and_update();
                    (state.epoch, state.user.clone())
                };
                // Intermediate snapshots may be skipped, but every epoch
                // change is seen, so a logout followed by re-login as the
                // same user still resets and reloads.
                if seen != Some(epoch) {
                    store.on_session_change(epoch, user.as_ref()).await;
                    seen = Some(epoch);
                }

                if session.changed().await.is_err() {
                    break;
                }
            }
            log::debug!("Session closed, cart listener stopped");
        })
    }
}
