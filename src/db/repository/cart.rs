//! Cart repository
//!
//! Mutations run as a read-modify-write loop guarded by a revision
//! compare-and-swap: the conditional update only lands when the stored
//! revision still matches the one that was read, otherwise the loop retries
//! from a fresh read. Concurrent writers can no longer silently overwrite
//! each other.

use std::time::Duration;

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Cart, CartItem, ItemKey};

const TABLE: &str = "cart";

/// Attempts before a contended mutation gives up
const MAX_CAS_RETRIES: usize = 3;

/// Outcome of a quantity update - both "no cart" and "no such item" are
/// distinct not-found cases with their own user-facing message
#[derive(Debug)]
pub enum CartUpdateOutcome {
    Updated(Cart),
    CartMissing,
    ItemMissing,
}

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>, deadline: Duration) -> Self {
        Self {
            base: BaseRepository::new(db, deadline),
        }
    }

    /// Find the user's cart, if one has been persisted
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Option<Cart>> {
        let user_id = user_id.to_string();
        self.base
            .bounded("cart.find_by_user", async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM cart WHERE userId = $userId LIMIT 1")
                    .bind(("userId", user_id))
                    .await?;
                let carts: Vec<Cart> = result.take(0)?;
                Ok(carts.into_iter().next())
            })
            .await
    }

    /// Add an item, merging by identity key. Creates the cart lazily.
    pub async fn add_item(&self, user_id: &str, item: CartItem) -> RepoResult<Cart> {
        for _ in 0..MAX_CAS_RETRIES {
            match self.find_by_user(user_id).await? {
                None => {
                    let mut cart = Cart::empty(user_id);
                    cart.merge_item(item.clone());
                    cart.revision = 1;
                    cart.updated_at = Utc::now();
                    match self.try_create(cart).await {
                        Ok(created) => return Ok(created),
                        // Unique index hit: another request created the cart
                        // between our read and insert - merge into it instead.
                        Err(RepoError::Duplicate(_)) => continue,
                        Err(e) => return Err(e),
                    }
                }
                Some(mut cart) => {
                    let expected = cart.revision;
                    cart.merge_item(item.clone());
                    if let Some(updated) =
                        self.try_replace_items(user_id, expected, &cart.items).await?
                    {
                        return Ok(updated);
                    }
                }
            }
        }
        Err(RepoError::Conflict(format!(
            "cart for {user_id} is being modified concurrently"
        )))
    }

    /// Replace a line item's quantity; below 1 deletes the item.
    pub async fn update_quantity(
        &self,
        user_id: &str,
        key: &ItemKey,
        qty: i64,
    ) -> RepoResult<CartUpdateOutcome> {
        for _ in 0..MAX_CAS_RETRIES {
            let Some(mut cart) = self.find_by_user(user_id).await? else {
                return Ok(CartUpdateOutcome::CartMissing);
            };
            let expected = cart.revision;
            if !cart.set_quantity(key, qty) {
                return Ok(CartUpdateOutcome::ItemMissing);
            }
            if let Some(updated) = self.try_replace_items(user_id, expected, &cart.items).await? {
                return Ok(CartUpdateOutcome::Updated(updated));
            }
        }
        Err(RepoError::Conflict(format!(
            "cart for {user_id} is being modified concurrently"
        )))
    }

    /// Remove a line item. `None` when no cart exists; a non-matching key
    /// against an existing cart succeeds without changes.
    pub async fn remove_item(&self, user_id: &str, key: &ItemKey) -> RepoResult<Option<Cart>> {
        for _ in 0..MAX_CAS_RETRIES {
            let Some(mut cart) = self.find_by_user(user_id).await? else {
                return Ok(None);
            };
            let expected = cart.revision;
            cart.remove_item(key);
            if let Some(updated) = self.try_replace_items(user_id, expected, &cart.items).await? {
                return Ok(Some(updated));
            }
        }
        Err(RepoError::Conflict(format!(
            "cart for {user_id} is being modified concurrently"
        )))
    }

    /// Delete the whole cart document. Idempotent.
    pub async fn clear(&self, user_id: &str) -> RepoResult<()> {
        let user_id = user_id.to_string();
        self.base
            .bounded("cart.clear", async {
                self.base
                    .db()
                    .query("DELETE cart WHERE userId = $userId")
                    .bind(("userId", user_id))
                    .await?
                    .check()?;
                Ok(())
            })
            .await
    }

    async fn try_create(&self, cart: Cart) -> RepoResult<Cart> {
        self.base
            .bounded("cart.create", async {
                let created: Option<Cart> = self.base.db().create(TABLE).content(cart).await?;
                created.ok_or_else(|| RepoError::Database("cart insert returned nothing".into()))
            })
            .await
    }

    /// Conditional write: lands only if the stored revision still matches.
    /// `None` means the revision moved and the caller must re-read.
    async fn try_replace_items(
        &self,
        user_id: &str,
        expected_revision: i64,
        items: &[CartItem],
    ) -> RepoResult<Option<Cart>> {
        let user_id = user_id.to_string();
        let items = items.to_vec();
        self.base
            .bounded("cart.replace_items", async {
                let mut result = self
                    .base
                    .db()
                    .query(
                        "UPDATE cart SET items = $items, updatedAt = $now, revision = revision + 1 \
                         WHERE userId = $userId AND revision = $revision RETURN AFTER",
                    )
                    .bind(("items", items))
                    .bind(("now", Utc::now()))
                    .bind(("userId", user_id))
                    .bind(("revision", expected_revision))
                    .await?;
                let carts: Vec<Cart> = result.take(0)?;
                Ok(carts.into_iter().next())
            })
            .await
    }
}
