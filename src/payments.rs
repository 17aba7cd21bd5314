//! Payment endpoints
//!
//! The server talks to the payment processor; this client only ever sees
//! payment intents and their client secrets, never card data.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fetch::ApiClient;

/// A payment intent as reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    /// Secret handed to the hosted payment widget
    pub client_secret: String,
    pub payment_intent_id: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateIntentRequest {
    order_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmRequest<'a> {
    payment_intent_id: &'a str,
}

/// Client for the `/payments` resource
#[derive(Clone)]
pub struct PaymentClient {
    api: ApiClient,
}

impl PaymentClient {
    /// Create a new payment client on top of the gateway
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Open a payment intent for an order
    pub async fn create_payment_intent(&self, order_id: i64) -> Result<PaymentIntent> {
        self.api
            .post("/payments/create-payment-intent")
            .json(&CreateIntentRequest { order_id })?
            .execute()
            .await
    }

    /// Ask the server to confirm a payment intent
    pub async fn confirm_payment(&self, payment_intent_id: &str) -> Result<PaymentIntent> {
        self.api
            .post("/payments/confirm-payment")
            .json(&ConfirmRequest { payment_intent_id })?
            .execute()
            .await
    }

    /// Current state of a payment intent
    pub async fn get_payment_intent(&self, payment_intent_id: &str) -> Result<PaymentIntent> {
        let path = format!(
            "/payments/payment-intent/{}",
            urlencoding::encode(payment_intent_id)
        );
        self.api.get(&path).execute().await
    }
}
