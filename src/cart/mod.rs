//! Cart endpoints
//!
//! Every mutating endpoint answers with the full cart. Quantities are
//! validated here so an invalid request never reaches the network.

mod types;

use crate::error::Result;
use crate::fetch::ApiClient;

pub use types::*;

/// Client for the `/cart` resource
#[derive(Clone)]
pub struct CartClient {
    api: ApiClient,
}

impl CartClient {
    /// Create a new cart client on top of the gateway
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Cart of a user
    pub async fn get_cart(&self, user_id: i64) -> Result<Cart> {
        self.api.get(&format!("/cart/{}", user_id)).execute().await
    }

    /// Cart of whoever owns the current cookie session
    pub async fn get_current_cart(&self) -> Result<Cart> {
        self.api.get("/cart/current").execute().await
    }

    /// Add a product to a user's cart
    pub async fn add_item(&self, user_id: i64, product_id: i64, quantity: u32) -> Result<Cart> {
        let body = AddItemRequest {
            product_id,
            quantity: validate_quantity(quantity)?,
        };
        self.api
            .post(&format!("/cart/{}/items", user_id))
            .json(&body)?
            .execute()
            .await
    }

    /// Add a product to the current session's cart
    pub async fn add_item_to_current(&self, product_id: i64, quantity: u32) -> Result<Cart> {
        let body = AddItemRequest {
            product_id,
            quantity: validate_quantity(quantity)?,
        };
        self.api
            .post("/cart/current/items")
            .json(&body)?
            .execute()
            .await
    }

    /// Set the quantity of one line
    pub async fn update_item(&self, user_id: i64, product_id: i64, quantity: u32) -> Result<Cart> {
        let body = UpdateItemRequest {
            quantity: validate_quantity(quantity)?,
        };
        self.api
            .put(&format!("/cart/{}/items/{}", user_id, product_id))
            .json(&body)?
            .execute()
            .await
    }

    /// Remove one line
    pub async fn remove_item(&self, user_id: i64, product_id: i64) -> Result<Cart> {
        self.api
            .delete(&format!("/cart/{}/items/{}", user_id, product_id))
            .execute()
            .await
    }

    /// Empty the whole cart. The response body is ignored.
    pub async fn clear_cart(&self, user_id: i64) -> Result<()> {
        self.api
            .delete(&format!("/cart/{}", user_id))
            .execute_empty()
            .await
    }
}
