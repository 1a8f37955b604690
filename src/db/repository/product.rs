//! Product repository

use std::time::Duration;

use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, CountRow, RepoError, RepoResult, decode_documents, parse_record_id};
use crate::db::models::{Product, ProductUpdate};

const TABLE: &str = "product";

/// Related-products cap
const RELATED_LIMIT: i64 = 8;

/// Catalog listing filter
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: i64,
    pub limit: i64,
}

impl ProductFilter {
    fn where_clause(&self) -> String {
        let mut conditions: Vec<&str> = Vec::new();
        if self.category.is_some() {
            conditions.push("category = $category");
        }
        if self.subcategory.is_some() {
            conditions.push(
                "string::lowercase(subcategory) CONTAINS string::lowercase($subcategory)",
            );
        }
        if self.search.is_some() {
            conditions.push(
                "(string::lowercase(name) CONTAINS string::lowercase($search) \
                 OR string::lowercase(description) CONTAINS string::lowercase($search))",
            );
        }
        if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        }
    }

    fn order_clause(&self) -> &'static str {
        match self.sort.as_deref() {
            Some("price_asc") => " ORDER BY price ASC",
            Some("price_desc") => " ORDER BY price DESC",
            _ => " ORDER BY createdAt DESC",
        }
    }
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>, deadline: Duration) -> Self {
        Self {
            base: BaseRepository::new(db, deadline),
        }
    }

    /// Filtered, sorted, paginated listing plus the total match count
    pub async fn list(&self, filter: &ProductFilter) -> RepoResult<(Vec<Product>, i64)> {
        let page = filter.page.max(1);
        let limit = filter.limit.clamp(1, 100);
        let start = (page - 1) * limit;
        let where_clause = filter.where_clause();

        let list_sql = format!(
            "SELECT * FROM product{}{} LIMIT $limit START $start",
            where_clause,
            filter.order_clause()
        );
        let count_sql = format!("SELECT count() FROM product{where_clause} GROUP ALL");
        let filter = filter.clone();

        self.base
            .bounded("product.list", async {
                let mut query = self
                    .base
                    .db()
                    .query(list_sql)
                    .query(count_sql)
                    .bind(("limit", limit))
                    .bind(("start", start));
                if let Some(category) = filter.category {
                    query = query.bind(("category", category));
                }
                if let Some(subcategory) = filter.subcategory {
                    query = query.bind(("subcategory", subcategory));
                }
                if let Some(search) = filter.search {
                    query = query.bind(("search", search));
                }

                let mut result = query.await?;
                let raw: Vec<serde_json::Value> = result.take(0)?;
                let counts: Vec<CountRow> = result.take(1)?;
                let total = counts.first().map(|r| r.count).unwrap_or(0);
                Ok((decode_documents(raw, TABLE), total))
            })
            .await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let Some(record_id) = parse_record_id(TABLE, id) else {
            return Ok(None);
        };
        self.base
            .bounded("product.find_by_id", async {
                let product: Option<Product> = self.base.db().select(record_id).await?;
                Ok(product)
            })
            .await
    }

    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Product>> {
        let slug = slug.to_string();
        self.base
            .bounded("product.find_by_slug", async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM product WHERE slug = $slug LIMIT 1")
                    .bind(("slug", slug))
                    .await?;
                let products: Vec<Product> = result.take(0)?;
                Ok(products.into_iter().next())
            })
            .await
    }

    /// Newest products sharing the given product's category, excluding it
    pub async fn find_related(&self, id: &str) -> RepoResult<Option<Vec<Product>>> {
        let Some(product) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let category = product.category.clone();
        let record_id = product.id.clone();
        self.base
            .bounded("product.find_related", async {
                let mut result = self
                    .base
                    .db()
                    .query(
                        "SELECT * FROM product WHERE category = $category AND id != $id \
                         ORDER BY createdAt DESC LIMIT $limit",
                    )
                    .bind(("category", category))
                    .bind(("id", record_id))
                    .bind(("limit", RELATED_LIMIT))
                    .await?;
                let raw: Vec<serde_json::Value> = result.take(0)?;
                Ok(Some(decode_documents(raw, TABLE)))
            })
            .await
    }

    pub async fn create(&self, product: Product) -> RepoResult<Product> {
        self.base
            .bounded("product.create", async {
                let created: Option<Product> =
                    self.base.db().create(TABLE).content(product).await?;
                created
                    .ok_or_else(|| RepoError::Database("product insert returned nothing".into()))
            })
            .await
    }

    /// Merge the supplied fields into the document; `None` when missing
    pub async fn update(&self, id: &str, update: ProductUpdate) -> RepoResult<Option<Product>> {
        let Some(record_id) = parse_record_id(TABLE, id) else {
            return Ok(None);
        };
        let mut data = serde_json::to_value(&update)
            .map_err(|e| RepoError::Database(format!("update payload encoding: {e}")))?;
        data["updatedAt"] = serde_json::json!(Utc::now());

        self.base
            .bounded("product.update", async {
                let mut result = self
                    .base
                    .db()
                    .query("UPDATE $product MERGE $data RETURN AFTER")
                    .bind(("product", record_id))
                    .bind(("data", data))
                    .await?;
                let products: Vec<Product> = result.take(0)?;
                Ok(products.into_iter().next())
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let Some(record_id) = parse_record_id(TABLE, id) else {
            return Ok(false);
        };
        self.base
            .bounded("product.delete", async {
                let mut result = self
                    .base
                    .db()
                    .query("DELETE $product RETURN BEFORE")
                    .bind(("product", record_id))
                    .await?;
                let removed: Vec<serde_json::Value> = result.take(0)?;
                Ok(!removed.is_empty())
            })
            .await
    }

    pub async fn count(&self) -> RepoResult<i64> {
        self.base
            .bounded("product.count", async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT count() FROM product GROUP ALL")
                    .await?;
                let rows: Vec<CountRow> = result.take(0)?;
                Ok(rows.first().map(|r| r.count).unwrap_or(0))
            })
            .await
    }
}
