//! Database module
//!
//! Handles the embedded SurrealDB instance and startup schema definitions.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "sportgear";
const DATABASE: &str = "store";

/// Database service - owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the RocksDB-backed database under `data_dir` and
    /// apply the schema definitions.
    pub async fn new(data_dir: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(data_dir)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;
        tracing::info!("Database ready at {data_dir} (SurrealDB/RocksDB)");

        Ok(Self { db })
    }
}

/// Idempotent schema definitions, applied at every startup.
///
/// The unique index on `cart.userId` is what enforces the one-cart-per-user
/// invariant; a racing second insert fails instead of creating a duplicate.
pub async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        "
        DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_user_email ON TABLE user FIELDS email UNIQUE;

        DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_product_slug ON TABLE product FIELDS slug;

        DEFINE TABLE IF NOT EXISTS cart SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_cart_user ON TABLE cart FIELDS userId UNIQUE;

        DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
        ",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
    .check()
    .map_err(|e| AppError::database(format!("Schema definition rejected: {e}")))?;
    Ok(())
}
