//! Storefront Rust Client Library
//!
//! A Rust client for an e-commerce storefront backend: catalog browsing,
//! cart management, checkout through a hosted payment widget, order history
//! and user session handling.
//!
//! Resource clients map one operation to one HTTP call. The two stores hold
//! process-wide state: [`store::SessionStore`] tracks who is signed in and
//! [`store::CartStore`] follows it, reloading or resetting the cart whenever
//! the user changes.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod fetch;
pub mod navigation;
pub mod orders;
pub mod pagination;
pub mod payments;
pub mod products;
pub mod storage;
pub mod store;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::auth::{AuthClient, User};
use crate::cart::CartClient;
use crate::checkout::Checkout;
use crate::config::ClientOptions;
use crate::fetch::ApiClient;
use crate::navigation::{LogNavigator, Navigator};
use crate::orders::OrderClient;
use crate::payments::PaymentClient;
use crate::products::ProductClient;
use crate::storage::{MemoryStorage, TokenStorage};
use crate::store::{CartStore, SessionStore};

pub use crate::error::{Error, Result};

/// The main entry point: one gateway, the resource clients on top of it,
/// and the two stores
pub struct Storefront {
    api: ApiClient,
    session: Arc<SessionStore>,
    cart: Arc<CartStore>,
    started: AtomicBool,
}

impl Storefront {
    /// Create a client with in-memory token storage that only logs
    /// navigation requests
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_client::{Storefront, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_base_url("https://shop.example.com/api");
    /// let storefront = Storefront::new(options)?;
    /// assert!(storefront.session().user().is_none());
    /// # Ok::<(), storefront_client::Error>(())
    /// ```
    pub fn new(options: ClientOptions) -> Result<Self> {
        Self::new_with(options, Arc::new(MemoryStorage::new()), Arc::new(LogNavigator))
    }

    /// Create a client with host-provided token storage and navigation
    pub fn new_with(
        options: ClientOptions,
        storage: Arc<dyn TokenStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let api = ApiClient::new(options, storage, navigator)?;
        let session = Arc::new(SessionStore::new(api.clone()));
        let cart = Arc::new(CartStore::new(api.clone(), session.subscribe()));

        Ok(Self {
            api,
            session,
            cart,
            started: AtomicBool::new(false),
        })
    }

    /// Wire the cart to the session and resolve the current session.
    /// Must be called from within a tokio runtime.
    ///
    /// Only the first call spawns the cart's session listener; later calls
    /// return the current user. The listener ends when the session store is
    /// dropped.
    pub async fn start(&self) -> Option<User> {
        if !self.started.swap(true, Ordering::SeqCst) {
            // Detached; it stops on its own once the session channel closes.
            drop(self.cart.spawn_session_listener());
        }
        self.session.init().await
    }

    /// The shared gateway
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn cart(&self) -> &Arc<CartStore> {
        &self.cart
    }

    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.api.clone())
    }

    pub fn products(&self) -> ProductClient {
        ProductClient::new(self.api.clone())
    }

    /// Raw cart endpoints, bypassing the cart store
    pub fn carts(&self) -> CartClient {
        CartClient::new(self.api.clone())
    }

    pub fn orders(&self) -> OrderClient {
        OrderClient::new(self.api.clone())
    }

    pub fn payments(&self) -> PaymentClient {
        PaymentClient::new(self.api.clone())
    }

    /// Checkout bound to this storefront's stores
    pub fn checkout(&self) -> Checkout {
        Checkout::new(
            Arc::clone(&self.session),
            Arc::clone(&self.cart),
            self.orders(),
            self.payments(),
        )
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::cart::Cart;
    pub use crate::checkout::{PaymentConfirmer, ShippingAddress};
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::products::{Product, ProductQuery};
    pub use crate::Storefront;
}
