//! Order types.
//!
//! Orders are created once at checkout and are immutable afterwards; there
//! is no status transition logic in this codebase.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Error returned when parsing an [`OrderStatus`] from a string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct ParseOrderStatusError(pub String);

/// Lifecycle status of an order.
///
/// Checkout always creates orders as [`OrderStatus::Pending`]; the other
/// values exist for orders written by external tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Canonical lowercase name, as stored and displayed.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ParseOrderStatusError(other.to_string())),
        }
    }
}

/// Shipping address captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// A denormalized snapshot of a product at order time.
///
/// Snapshotting keeps order history stable when catalog entries are later
/// edited or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product id at the time of ordering.
    pub product_id: String,
    /// Product name at the time of ordering.
    pub product_name: String,
    /// Product image URL at the time of ordering.
    pub product_image: String,
    /// Unit price at the time of ordering.
    pub price: Decimal,
    /// Units ordered. Checkout always writes 1; seeded sample orders may
    /// carry other values.
    pub quantity: u32,
    /// Line total (`price * quantity`).
    pub total: Decimal,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Document id assigned by the store at creation.
    pub id: String,
    /// Owning user id.
    pub user_id: String,
    /// Ordered line items.
    pub items: Vec<OrderItem>,
    /// Sum of line item totals.
    pub total_amount: Decimal,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub order_date: DateTime<Utc>,
    /// Estimated delivery; checkout fixes this at `order_date + 7 days`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<DateTime<Utc>>,
    /// Where the order ships to.
    pub shipping_address: ShippingAddress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            let parsed: OrderStatus = status.as_str().parse().expect("parse");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_order_status_serde_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Shipped).expect("serialize");
        assert_eq!(json, "\"shipped\"");
    }

    #[test]
    fn test_order_status_default_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_order_serde_round_trip() {
        let order = Order {
            id: "order-1".to_string(),
            user_id: "user-1".to_string(),
            items: vec![OrderItem {
                product_id: "product-1".to_string(),
                product_name: "Classic Grey Hooded Sweatshirt".to_string(),
                product_image: "https://example.com/hoodie.jpg".to_string(),
                price: Decimal::new(9000, 2),
                quantity: 1,
                total: Decimal::new(9000, 2),
            }],
            total_amount: Decimal::new(9000, 2),
            status: OrderStatus::Pending,
            order_date: "2026-08-01T12:00:00Z".parse().expect("timestamp"),
            delivery_date: Some("2026-08-08T12:00:00Z".parse().expect("timestamp")),
            shipping_address: ShippingAddress {
                street: "123 Main St".to_string(),
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                zip_code: "94105".to_string(),
                country: "USA".to_string(),
            },
        };

        let json = serde_json::to_string(&order).expect("serialize");
        let back: Order = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, order);
    }
}
