//! Cart model
//!
//! One cart document per known user, identified by a unique `userId` index.
//! Line items are merged by identity key (productId, selectedColor,
//! selectedSize) - two items with the same key must never coexist.
//!
//! Reconciliation is implemented as pure methods on [`Cart`] so the merge
//! rules are testable without a database; the repository wraps them in a
//! revision compare-and-swap loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;
use crate::utils::Messages;

/// A single cart line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub qty: i64,
    #[serde(default)]
    pub selected_color: String,
    #[serde(default)]
    pub selected_size: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
}

/// Identity key deciding whether two line items are "the same"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemKey {
    pub product_id: String,
    #[serde(default)]
    pub selected_color: String,
    #[serde(default)]
    pub selected_size: String,
}

impl CartItem {
    /// Fill in catalog defaults for unset color/size
    pub fn apply_defaults(&mut self, messages: &Messages) {
        if self.selected_color.is_empty() {
            self.selected_color = messages.default_color.to_string();
        }
        if self.selected_size.is_empty() {
            self.selected_size = messages.default_size.to_string();
        }
    }

    pub fn key(&self) -> ItemKey {
        ItemKey {
            product_id: self.product_id.clone(),
            selected_color: self.selected_color.clone(),
            selected_size: self.selected_size.clone(),
        }
    }

    pub fn matches(&self, key: &ItemKey) -> bool {
        self.product_id == key.product_id
            && self.selected_color == key.selected_color
            && self.selected_size == key.selected_size
    }
}

/// Cart document - at most one per user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub user_id: String,
    pub items: Vec<CartItem>,
    /// Write counter for conditional updates; bumps on every mutation
    #[serde(default)]
    pub revision: i64,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Empty cart value - returned to anonymous callers and users without
    /// a persisted cart (not an error)
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id: user_id.into(),
            items: Vec::new(),
            revision: 0,
            updated_at: Utc::now(),
        }
    }

    /// Merge an incoming item: increment quantity on identity-key match,
    /// append otherwise. Never produces duplicate keys.
    pub fn merge_item(&mut self, item: CartItem) {
        let key = item.key();
        for existing in &mut self.items {
            if existing.matches(&key) {
                existing.qty += item.qty;
                return;
            }
        }
        self.items.push(item);
    }

    /// Replace the quantity of the matching item. A quantity below 1 deletes
    /// the item (zero/negative quantities are never stored). Returns whether
    /// any item matched the key.
    pub fn set_quantity(&mut self, key: &ItemKey, qty: i64) -> bool {
        let Some(pos) = self.items.iter().position(|i| i.matches(key)) else {
            return false;
        };
        if qty >= 1 {
            self.items[pos].qty = qty;
        } else {
            self.items.remove(pos);
        }
        true
    }

    /// Remove the matching item. A non-matching key is a silent no-op.
    pub fn remove_item(&mut self, key: &ItemKey) {
        self.items.retain(|i| !i.matches(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product: &str, color: &str, size: &str, qty: i64) -> CartItem {
        CartItem {
            product_id: product.to_string(),
            qty,
            selected_color: color.to_string(),
            selected_size: size.to_string(),
            price: 10.0,
            name: format!("Product {product}"),
            image: String::new(),
        }
    }

    #[test]
    fn merge_new_key_appends_with_submitted_quantity() {
        let mut cart = Cart::empty("u1");
        cart.merge_item(item("p1", "Red", "M", 2));
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].qty, 2);

        // Same product, different size - distinct identity key
        cart.merge_item(item("p1", "Red", "L", 1));
        assert_eq!(cart.items.len(), 2);
    }

    #[test]
    fn merge_existing_key_increments_quantity() {
        let mut cart = Cart::empty("u1");
        cart.merge_item(item("p1", "Red", "M", 2));
        cart.merge_item(item("p1", "Red", "M", 3));
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].qty, 5);
    }

    #[test]
    fn set_quantity_replaces_not_adds() {
        let mut cart = Cart::empty("u1");
        cart.merge_item(item("p1", "Red", "M", 2));
        let matched = cart.set_quantity(&item("p1", "Red", "M", 0).key(), 7);
        assert!(matched);
        assert_eq!(cart.items[0].qty, 7);
    }

    #[test]
    fn set_quantity_below_one_deletes_item() {
        let mut cart = Cart::empty("u1");
        cart.merge_item(item("p1", "Red", "M", 2));
        assert!(cart.set_quantity(&item("p1", "Red", "M", 0).key(), 0));
        assert!(cart.items.is_empty());
    }

    #[test]
    fn set_quantity_unknown_key_reports_no_match() {
        let mut cart = Cart::empty("u1");
        cart.merge_item(item("p1", "Red", "M", 2));
        assert!(!cart.set_quantity(&item("p2", "Red", "M", 0).key(), 3));
        assert_eq!(cart.items[0].qty, 2);
    }

    #[test]
    fn remove_unknown_key_is_silent_noop() {
        let mut cart = Cart::empty("u1");
        cart.merge_item(item("p1", "Red", "M", 2));
        cart.remove_item(&item("p9", "Red", "M", 0).key());
        assert_eq!(cart.items.len(), 1);
    }

    #[test]
    fn defaults_applied_only_to_unset_fields() {
        let msgs = Messages::en();
        let mut it = item("p1", "", "", 1);
        it.apply_defaults(&msgs);
        assert_eq!(it.selected_color, "Default");
        assert_eq!(it.selected_size, "One Size");

        let mut it = item("p1", "Blue", "XL", 1);
        it.apply_defaults(&msgs);
        assert_eq!(it.selected_color, "Blue");
        assert_eq!(it.selected_size, "XL");
    }
}
