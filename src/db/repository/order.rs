//! Order repository
//!
//! Orders are immutable snapshots apart from two transitions: the admin
//! status update and the self-service cancellation. Cancellation is
//! conditioned on the stored status still being PENDING, so a racing
//! confirm/cancel pair cannot both win.

use std::time::Duration;

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, decode_documents, parse_record_id};
use crate::db::models::{Order, OrderStatus};

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>, deadline: Duration) -> Self {
        Self {
            base: BaseRepository::new(db, deadline),
        }
    }

    /// Persist a new order, returning it with its generated id
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        self.base
            .bounded("order.create", async {
                let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
                created.ok_or_else(|| RepoError::Database("order insert returned nothing".into()))
            })
            .await
    }

    /// Find one order. `None` covers both missing documents and
    /// syntactically invalid ids.
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let Some(record_id) = parse_record_id(TABLE, id) else {
            return Ok(None);
        };
        self.base
            .bounded("order.find_by_id", async {
                let order: Option<Order> = self.base.db().select(record_id).await?;
                Ok(order)
            })
            .await
    }

    /// All orders of one owner, newest first
    pub async fn find_by_owner(&self, owner: &str) -> RepoResult<Vec<Order>> {
        let owner = owner.to_string();
        self.base
            .bounded("order.find_by_owner", async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM order WHERE userId = $userId ORDER BY createdAt DESC")
                    .bind(("userId", owner))
                    .await?;
                let raw: Vec<serde_json::Value> = result.take(0)?;
                Ok(decode_documents(raw, TABLE))
            })
            .await
    }

    /// Every order, newest first (admin listing)
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        self.base
            .bounded("order.find_all", async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM order ORDER BY createdAt DESC")
                    .await?;
                let raw: Vec<serde_json::Value> = result.take(0)?;
                Ok(decode_documents(raw, TABLE))
            })
            .await
    }

    /// Most recent orders (admin dashboard)
    pub async fn find_recent(&self, limit: i64) -> RepoResult<Vec<Order>> {
        self.base
            .bounded("order.find_recent", async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM order ORDER BY createdAt DESC LIMIT $limit")
                    .bind(("limit", limit))
                    .await?;
                let raw: Vec<serde_json::Value> = result.take(0)?;
                Ok(decode_documents(raw, TABLE))
            })
            .await
    }

    /// Set the status of an order. `None` when the order does not exist.
    pub async fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> RepoResult<Option<Order>> {
        let Some(record_id) = parse_record_id(TABLE, id) else {
            return Ok(None);
        };
        self.base
            .bounded("order.update_status", async {
                let mut result = self
                    .base
                    .db()
                    .query("UPDATE $order SET status = $status, updatedAt = $now RETURN AFTER")
                    .bind(("order", record_id))
                    .bind(("status", status))
                    .bind(("now", Utc::now()))
                    .await?;
                let orders: Vec<Order> = result.take(0)?;
                Ok(orders.into_iter().next())
            })
            .await
    }

    /// Cancel an order if - and only if - it is still PENDING.
    ///
    /// The status check happens inside the conditional update, atomically
    /// with the write; `None` means the order is gone or no longer pending.
    pub async fn cancel_pending(&self, id: &str, reason: &str) -> RepoResult<Option<Order>> {
        let Some(record_id) = parse_record_id(TABLE, id) else {
            return Ok(None);
        };
        let reason = reason.to_string();
        self.base
            .bounded("order.cancel_pending", async {
                let mut result = self
                    .base
                    .db()
                    .query(
                        "UPDATE $order SET status = $cancelled, cancelReason = $reason, \
                         cancelledAt = $now, updatedAt = $now \
                         WHERE status = $pending RETURN AFTER",
                    )
                    .bind(("order", record_id))
                    .bind(("cancelled", OrderStatus::Cancelled))
                    .bind(("reason", reason))
                    .bind(("now", Utc::now()))
                    .bind(("pending", OrderStatus::Pending))
                    .await?;
                let orders: Vec<Order> = result.take(0)?;
                Ok(orders.into_iter().next())
            })
            .await
    }

    /// Hard delete. `false` when nothing was removed.
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let Some(record_id) = parse_record_id(TABLE, id) else {
            return Ok(false);
        };
        self.base
            .bounded("order.delete", async {
                let mut result = self
                    .base
                    .db()
                    .query("DELETE $order RETURN BEFORE")
                    .bind(("order", record_id))
                    .await?;
                let removed: Vec<serde_json::Value> = result.take(0)?;
                Ok(!removed.is_empty())
            })
            .await
    }
}
