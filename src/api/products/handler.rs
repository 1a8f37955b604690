//! Product API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::MessageResponse;
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::{ProductFilter, ProductRepository};
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

const DEFAULT_PAGE_SIZE: i64 = 12;

fn product_repo(state: &ServerState) -> ProductRepository {
    ProductRepository::new(state.get_db(), state.config.db_timeout())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub page: i64,
    pub pages: i64,
    pub total: i64,
}

/// GET /api/products - filtered, sorted, paginated catalog listing
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductsQuery>,
) -> AppResult<Json<ProductListResponse>> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let filter = ProductFilter {
        category: non_empty(query.category),
        subcategory: non_empty(query.subcategory),
        search: non_empty(query.search),
        sort: query.sort,
        page: query.page.unwrap_or(1).max(1),
        limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100),
    };

    let (products, total) = product_repo(&state).list(&filter).await?;
    let pages = (total as u64).div_ceil(filter.limit as u64) as i64;

    Ok(Json(ProductListResponse {
        products,
        page: filter.page,
        pages,
        total,
    }))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let msgs = state.messages();
    let product = product_repo(&state)
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(msgs.product_not_found))?;
    Ok(Json(product))
}

/// GET /api/products/slug/{slug}
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Product>> {
    let msgs = state.messages();
    let product = product_repo(&state)
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found(msgs.product_not_found))?;
    Ok(Json(product))
}

/// GET /api/products/{id}/related - newest products in the same category
pub async fn get_related(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Product>>> {
    let msgs = state.messages();
    let related = product_repo(&state)
        .find_related(&id)
        .await?
        .ok_or_else(|| AppError::not_found(msgs.product_not_found))?;
    Ok(Json(related))
}

/// POST /api/admin/products - create a catalog product
pub async fn create(
    State(state): State<ServerState>,
    AdminUser(_admin): AdminUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let msgs = state.messages();
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    if !payload.price.is_finite() || payload.price <= 0.0 {
        return Err(AppError::validation(msgs.invalid_product_data));
    }

    let product = payload.into_product(Utc::now());
    let created = product_repo(&state).create(product).await?;
    tracing::info!(product_id = %created.id.as_ref().map(|i| i.to_string()).unwrap_or_default(), "Product created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/admin/products/{id} - merge the supplied fields
pub async fn update(
    State(state): State<ServerState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let msgs = state.messages();
    if let Some(price) = payload.price
        && (!price.is_finite() || price <= 0.0)
    {
        return Err(AppError::validation(msgs.invalid_product_data));
    }

    let updated = product_repo(&state)
        .update(&id, payload)
        .await?
        .ok_or_else(|| AppError::not_found(msgs.product_not_found))?;
    Ok(Json(updated))
}

/// DELETE /api/admin/products/{id}
pub async fn delete(
    State(state): State<ServerState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let msgs = state.messages();
    if product_repo(&state).delete(&id).await? {
        Ok(Json(MessageResponse::new(msgs.product_deleted)))
    } else {
        Err(AppError::not_found(msgs.product_not_found))
    }
}
