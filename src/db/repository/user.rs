//! User repository

use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, CountRow, RepoError, RepoResult, decode_documents};
use crate::db::models::User;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>, deadline: Duration) -> Self {
        Self {
            base: BaseRepository::new(db, deadline),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email = email.to_string();
        self.base
            .bounded("user.find_by_email", async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM user WHERE email = $email LIMIT 1")
                    .bind(("email", email))
                    .await?;
                let users: Vec<User> = result.take(0)?;
                Ok(users.into_iter().next())
            })
            .await
    }

    /// Create a user account. Duplicate emails fail with `Duplicate`, both
    /// via the pre-check and the unique index underneath it.
    pub async fn create(&self, user: User) -> RepoResult<User> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "user with email {} already exists",
                user.email
            )));
        }
        self.base
            .bounded("user.create", async {
                let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
                created.ok_or_else(|| RepoError::Database("user insert returned nothing".into()))
            })
            .await
    }

    /// All accounts (admin listing)
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        self.base
            .bounded("user.find_all", async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM user ORDER BY createdAt DESC")
                    .await?;
                let raw: Vec<serde_json::Value> = result.take(0)?;
                Ok(decode_documents(raw, TABLE))
            })
            .await
    }

    pub async fn count(&self) -> RepoResult<i64> {
        self.base
            .bounded("user.count", async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT count() FROM user GROUP ALL")
                    .await?;
                let rows: Vec<CountRow> = result.take(0)?;
                Ok(rows.first().map(|r| r.count).unwrap_or(0))
            })
            .await
    }
}
