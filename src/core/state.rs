//! Server state
//!
//! `ServerState` holds shared references to every service a handler needs:
//! configuration, the database handle, the JWT service and the message
//! catalog. Cloning is shallow (Arc / handle clones).

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::utils::Messages;

#[derive(Clone)]
pub struct ServerState {
    /// Server configuration (immutable after startup)
    pub config: Config,
    /// Embedded database handle
    pub db: Surreal<Db>,
    /// JWT service
    pub jwt_service: Arc<JwtService>,
    /// Localized user-facing messages
    pub messages: Arc<Messages>,
}

impl ServerState {
    /// Manual constructor; most callers use [`ServerState::initialize`]
    pub fn new(config: Config, db: Surreal<Db>, jwt_service: Arc<JwtService>) -> Self {
        let messages = Arc::new(Messages::for_locale(&config.locale));
        Self {
            config,
            db,
            jwt_service,
            messages,
        }
    }

    /// Initialize server state: database first, then services
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let db_service = DbService::new(&config.data_dir).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Ok(Self::new(config.clone(), db_service.db, jwt_service))
    }

    /// Database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// JWT service
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// Message catalog for the configured locale
    pub fn messages(&self) -> &Messages {
        &self.messages
    }
}
