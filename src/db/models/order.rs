//! Order model
//!
//! Orders snapshot their line items at creation time: name, price and image
//! are copied from the submitted payload, never referenced, so later catalog
//! edits cannot alter order history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use crate::utils::Messages;

/// Payment method stamped on orders that do not name one
pub const DEFAULT_PAYMENT_METHOD: &str = "Cash on Delivery";

/// Order status - closed set, free-form strings are rejected
///
/// Transitions: every order starts `Pending`. Self-service cancellation is
/// permitted from `Pending` only. Admins move orders forward through the
/// remaining states; `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipping,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Parse a wire status token; `None` for anything outside the set
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "SHIPPING" => Some(Self::Shipping),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Shipping => "SHIPPING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Whether a customer may still cancel the order themselves
    pub fn allows_self_cancel(self) -> bool {
        self == Self::Pending
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Order line item, snapshotted at creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    pub qty: i64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub selected_color: String,
    #[serde(default)]
    pub selected_size: String,
}

impl OrderItem {
    /// Fill in catalog defaults for unset color/size
    pub fn apply_defaults(&mut self, messages: &Messages) {
        if self.selected_color.is_empty() {
            self.selected_color = messages.default_color.to_string();
        }
        if self.selected_size.is_empty() {
            self.selected_size = messages.default_size.to_string();
        }
    }
}

/// Order document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Absent for guest checkout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: OrderStatus,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Wire id ("order:key"), empty before the document is persisted
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_round_trips_the_closed_set() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Shipping,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn status_parse_rejects_free_form_strings() {
        assert_eq!(OrderStatus::parse(""), None);
        assert_eq!(OrderStatus::parse("pending"), None);
        assert_eq!(OrderStatus::parse("Chờ xác nhận"), None);
        assert_eq!(OrderStatus::parse("DELIVERED"), None);
    }

    #[test]
    fn only_pending_allows_self_cancel() {
        assert!(OrderStatus::Pending.allows_self_cancel());
        assert!(!OrderStatus::Confirmed.allows_self_cancel());
        assert!(!OrderStatus::Shipping.allows_self_cancel());
        assert!(!OrderStatus::Completed.allows_self_cancel());
        assert!(!OrderStatus::Cancelled.allows_self_cancel());
    }

    #[test]
    fn completed_and_cancelled_are_terminal() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Shipping.is_terminal());
    }
}
