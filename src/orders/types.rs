//! Order types

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::Product;

/// Fulfilment status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Processing => "PROCESSING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// One line of a placed order, priced at order time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i64,
    pub product: Product,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

/// A placed order. Immutable on the client apart from the status and
/// payment-status updates the server performs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,

    #[serde(default, alias = "orderItems")]
    pub items: Vec<OrderItem>,

    pub status: OrderStatus,

    #[serde(default, alias = "totalAmount")]
    pub total_price: Decimal,

    #[serde(default)]
    pub shipping_address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

/// Body of `POST /orders`. The server builds the lines and total from the
/// user's cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: i64,
    pub shipping_address: String,
    pub billing_address: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusUpdate {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentStatusUpdate<'a> {
    pub payment_intent_id: &'a str,
    pub payment_status: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn order_accepts_backend_field_names() {
        let order: Order = serde_json::from_value(json!({
            "id": 12,
            "orderItems": [{
                "id": 1,
                "product": {"id": 5, "name": "Mug", "price": 10},
                "quantity": 2,
                "price": 10
            }],
            "status": "PENDING",
            "totalAmount": 20,
            "shippingAddress": "1 Main St, Springfield, IL 62701, US",
            "paymentStatus": "created",
            "createdAt": "2024-03-01T10:15:30.123"
        }))
        .unwrap();

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_price, Decimal::from(20));
        assert_eq!(order.payment_status.as_deref(), Some("created"));
    }

    #[test]
    fn status_serializes_uppercase() {
        let body = serde_json::to_value(StatusUpdate {
            status: OrderStatus::Shipped,
        })
        .unwrap();
        assert_eq!(body, json!({"status": "SHIPPED"}));
        assert_eq!(OrderStatus::Shipped.as_str(), "SHIPPED");
    }
}
