//! Checkout orchestration
//!
//! Placing an order spans three parties: the order and payment endpoints of
//! the server, and a hosted payment widget that collects the card and
//! confirms the intent. The widget is abstracted as a [`PaymentConfirmer`];
//! this crate only hands it the client secret and billing details.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::orders::{CreateOrderRequest, Order, OrderClient};
use crate::payments::PaymentClient;
use crate::store::{CartStore, SessionStore};

/// Payment status reported for a confirmed intent
pub const PAYMENT_SUCCEEDED: &str = "succeeded";
/// Payment status reported for a declined or failed intent
pub const PAYMENT_FAILED: &str = "failed";

/// Where the order ships. Every field is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl ShippingAddress {
    /// Reject the address when any field is blank
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("zip code", &self.zip_code),
            ("country", &self.country),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(Error::validation(format!(
                "Shipping address is missing the {}",
                name
            ))),
            None => Ok(()),
        }
    }
}

impl fmt::Display for ShippingAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {} {}, {}",
            self.street, self.city, self.state, self.zip_code, self.country
        )
    }
}

/// Billing details handed to the payment widget with the client secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingDetails {
    pub name: String,
    pub email: String,
    pub address: ShippingAddress,
}

/// Outcome of a confirmation by the payment widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedPayment {
    pub payment_intent_id: String,
    pub status: String,
}

impl ConfirmedPayment {
    pub fn succeeded(&self) -> bool {
        self.status == PAYMENT_SUCCEEDED
    }
}

/// The hosted payment widget: collects card data and confirms an intent
#[async_trait]
pub trait PaymentConfirmer: Send + Sync {
    /// Confirm the intent identified by `client_secret`. An `Err` means the
    /// widget could not run at all; a declined card is an `Ok` whose status
    /// is not `succeeded`.
    async fn confirm(&self, client_secret: &str, billing: &BillingDetails) -> Result<ConfirmedPayment>;
}

/// A paid order
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    pub order: Order,
    pub payment_intent_id: String,
}

/// Turns the signed-in user's cart into a paid order
#[derive(Clone)]
pub struct Checkout {
    session: Arc<SessionStore>,
    cart: Arc<CartStore>,
    orders: OrderClient,
    payments: PaymentClient,
}

impl Checkout {
    pub fn new(
        session: Arc<SessionStore>,
        cart: Arc<CartStore>,
        orders: OrderClient,
        payments: PaymentClient,
    ) -> Self {
        Self {
            session,
            cart,
            orders,
            payments,
        }
    }

    /// Place an order for the current cart and pay for it
    ///
    /// The order is created before payment, so a failed payment leaves a
    /// server-side order with a `failed` payment status.
    pub async fn place_order(
        &self,
        address: &ShippingAddress,
        confirmer: &dyn PaymentConfirmer,
    ) -> Result<CheckoutReceipt> {
        let user = self
            .session
            .user()
            .ok_or_else(|| Error::ownership("Please login to place an order"))?;
        let user_id = user
            .id
            .ok_or_else(|| Error::ownership("Session user has no id"))?;

        if self.cart.cart().is_empty() {
            return Err(Error::validation("Your cart is empty"));
        }
        address.validate()?;

        let formatted = address.to_string();
        let order = self
            .orders
            .create(&CreateOrderRequest {
                user_id,
                shipping_address: formatted.clone(),
                billing_address: formatted,
            })
            .await?;
        log::info!("Created order {} for user {}", order.id, user_id);

        let intent = self.payments.create_payment_intent(order.id).await?;
        let billing = BillingDetails {
            name: user.name.clone(),
            email: user.email.clone(),
            address: address.clone(),
        };

        let confirmed = confirmer.confirm(&intent.client_secret, &billing).await?;

        if !confirmed.succeeded() {
            log::error!(
                "Payment for order {} ended in status {}",
                order.id,
                confirmed.status
            );
            if let Err(err) = self
                .orders
                .update_payment_status(order.id, &confirmed.payment_intent_id, PAYMENT_FAILED)
                .await
            {
                log::warn!("Could not report failed payment for order {}: {}", order.id, err);
            }
            return Err(Error::payment("Payment failed. Please try again."));
        }

        let order = self
            .orders
            .update_payment_status(order.id, &confirmed.payment_intent_id, PAYMENT_SUCCEEDED)
            .await?;

        if let Err(err) = self.cart.clear_cart().await {
            log::warn!("Order {} paid but the cart was not cleared: {}", order.id, err);
        }

        Ok(CheckoutReceipt {
            order,
            payment_intent_id: confirmed.payment_intent_id,
        })
    }
}
