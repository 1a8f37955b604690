//! Repository module
//!
//! All storage access goes through a repository. Every operation is bounded
//! by the configured deadline; exceeding it surfaces as `Timeout` rather
//! than hanging the request.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

#[cfg(test)]
mod tests;

// Re-exports
pub use cart::{CartRepository, CartUpdateOutcome};
pub use order::OrderRepository;
pub use product::{ProductFilter, ProductRepository};
pub use user::UserRepository;

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

use crate::utils::AppError;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Write conflict: {0}")]
    Conflict(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        map_db_error(err)
    }
}

/// Classify a storage error; unique-index violations become `Duplicate`
fn map_db_error(err: surrealdb::Error) -> RepoError {
    let msg = err.to_string();
    if msg.contains("already contains") || msg.contains("unique") {
        RepoError::Duplicate(msg)
    } else {
        RepoError::Database(msg)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Conflict(msg) => AppError::Conflict(msg),
            RepoError::Timeout(msg) => AppError::Unavailable(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference and operation deadline
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
    deadline: Duration,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>, deadline: Duration) -> Self {
        Self { db, deadline }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Run a storage operation under the configured deadline
    pub async fn bounded<T, F>(&self, op: &'static str, fut: F) -> RepoResult<T>
    where
        F: Future<Output = RepoResult<T>>,
    {
        match tokio::time::timeout(self.deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(RepoError::Timeout(format!(
                "{op} exceeded {}ms",
                self.deadline.as_millis()
            ))),
        }
    }
}

/// Parse a wire id into a record id for `table`.
///
/// Accepts both the prefixed form ("order:abc") and the bare key ("abc").
/// `None` for syntactically invalid ids or ids pointing at another table -
/// callers treat that the same as a missing document.
pub fn parse_record_id(table: &str, id: &str) -> Option<RecordId> {
    if id.is_empty() {
        return None;
    }
    if id.contains(':') {
        let rid: RecordId = id.parse().ok()?;
        (rid.table() == table).then_some(rid)
    } else {
        Some(RecordId::from_table_key(table, id))
    }
}

/// Row shape of `SELECT count() ... GROUP ALL`
#[derive(Debug, Deserialize)]
pub(crate) struct CountRow {
    pub count: i64,
}

/// Decode a batch of raw documents, skipping malformed ones.
///
/// A single corrupt document must not fail a whole listing; it is logged
/// and dropped.
pub(crate) fn decode_documents<T: DeserializeOwned>(
    values: Vec<serde_json::Value>,
    table: &str,
) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<T>(value) {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(target: "database", table, error = %e, "Skipping malformed document");
                None
            }
        })
        .collect()
}
