//! Cart types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::products::Product;

/// One line of a cart. `product` is the snapshot the server returned at
/// read time and may be stale against the live catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Price of this line: unit price times quantity
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// A cart as the server reports it. The server is authoritative for the
/// total; the client replaces the whole value and never patches it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,

    #[serde(default, alias = "total")]
    pub total_price: Decimal,
}

impl Cart {
    /// The empty cart
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line quantities
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// The line holding `product_id`, if any
    pub fn item_for_product(&self, product_id: i64) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == product_id)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddItemRequest {
    pub product_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateItemRequest {
    pub quantity: u32,
}

/// Reject quantities below one before anything is sent
pub fn validate_quantity(quantity: u32) -> Result<u32> {
    if quantity < 1 {
        return Err(Error::validation(format!(
            "quantity must be at least 1, got {}",
            quantity
        )));
    }
    Ok(quantity)
}
