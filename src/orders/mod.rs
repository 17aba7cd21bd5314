//! Order endpoints

mod types;

use crate::error::Result;
use crate::fetch::ApiClient;
use crate::pagination::{Page, PageResponse};

pub use types::*;

/// Page size used by the paged order history
pub const HISTORY_PAGE_SIZE: u32 = 10;

/// Client for the `/orders` resource
#[derive(Clone)]
pub struct OrderClient {
    api: ApiClient,
}

impl OrderClient {
    /// Create a new order client on top of the gateway
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Place an order from the user's cart
    pub async fn create(&self, request: &CreateOrderRequest) -> Result<Order> {
        self.api.post("/orders").json(request)?.execute().await
    }

    /// Fetch one order
    pub async fn get(&self, id: i64) -> Result<Order> {
        self.api.get(&format!("/orders/{}", id)).execute().await
    }

    /// Full order history of a user
    pub async fn by_user(&self, user_id: i64) -> Result<Vec<Order>> {
        self.api
            .get(&format!("/orders/user/{}", user_id))
            .execute()
            .await
    }

    /// Paged order history of a user
    pub async fn by_user_paginated(&self, user_id: i64, page: u32, size: u32) -> Result<Page<Order>> {
        let response: PageResponse<Order> = self
            .api
            .get(&format!("/orders/user/{}/paginated", user_id))
            .query("page", page)
            .query("size", size)
            .execute()
            .await?;
        Ok(response.into())
    }

    /// Move an order to another status
    pub async fn update_status(&self, id: i64, status: OrderStatus) -> Result<Order> {
        self.api
            .put(&format!("/orders/{}/status", id))
            .json(&StatusUpdate { status })?
            .execute()
            .await
    }

    /// Attach a payment outcome to an order
    pub async fn update_payment_status(
        &self,
        id: i64,
        payment_intent_id: &str,
        payment_status: &str,
    ) -> Result<Order> {
        let body = PaymentStatusUpdate {
            payment_intent_id,
            payment_status,
        };
        self.api
            .put(&format!("/orders/{}/payment", id))
            .json(&body)?
            .execute()
            .await
    }

    /// Every order (administrative)
    pub async fn all(&self) -> Result<Vec<Order>> {
        self.api.get("/orders").execute().await
    }

    /// Orders in one status (administrative)
    pub async fn by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        self.api
            .get(&format!("/orders/status/{}", status.as_str()))
            .execute()
            .await
    }
}
