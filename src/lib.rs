//! Sportgear - sports gear e-commerce backend
//!
//! # Architecture overview
//!
//! REST/JSON API over an embedded document database. The core of the
//! system is the cart reconciliation and order lifecycle engine; catalog
//! browsing, auth and admin reports sit around it.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # Config, state, server startup
//! ├── auth/          # JWT, typed principal, extractors
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # Embedded SurrealDB, models, repositories
//! └── utils/         # Errors, logging, validation, messages, money
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult, Messages};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured security events via tracing
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Prepare the process environment: .env file, then logging
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   _____                  __
  / ___/____  ____  _____/ /_____ ____  ____ ______
  \__ \/ __ \/ __ \/ ___/ __/ __ `/ _ \/ __ `/ ___/
 ___/ / /_/ / /_/ / /  / /_/ /_/ /  __/ /_/ / /
/____/ .___/\____/_/   \__/\__, /\___/\__,_/_/
    /_/                   /____/
    "#
    );
}
