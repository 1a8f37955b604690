//! Cart API handlers
//!
//! The cart store keeps one document per known user; anonymous callers are
//! served an empty cart value and nothing is persisted for them.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::api::MessageResponse;
use crate::auth::OptionalUser;
use crate::core::ServerState;
use crate::db::models::{Cart, CartItem, ItemKey};
use crate::db::repository::{CartRepository, CartUpdateOutcome};
use crate::utils::{AppError, AppResult};

fn cart_repo(state: &ServerState) -> CartRepository {
    CartRepository::new(state.get_db(), state.config.db_timeout())
}

/// GET /api/cart - the caller's cart, or an empty cart value
pub async fn get_cart(
    State(state): State<ServerState>,
    OptionalUser(user): OptionalUser,
) -> AppResult<Json<Cart>> {
    let Some(user) = user else {
        return Ok(Json(Cart::empty(String::new())));
    };

    let cart = cart_repo(&state)
        .find_by_user(&user.id)
        .await?
        .unwrap_or_else(|| Cart::empty(&user.id));
    Ok(Json(cart))
}

/// POST /api/cart - add an item, merging by identity key
pub async fn add_to_cart(
    State(state): State<ServerState>,
    OptionalUser(user): OptionalUser,
    Json(mut item): Json<CartItem>,
) -> AppResult<Json<Cart>> {
    let msgs = state.messages();
    let Some(user) = user else {
        return Err(AppError::unauthorized_msg(msgs.login_to_sync_cart));
    };

    if item.product_id.is_empty() || item.qty < 1 {
        return Err(AppError::validation(msgs.invalid_product_data));
    }
    item.apply_defaults(msgs);

    tracing::debug!(user_id = %user.id, product_id = %item.product_id, "Adding item to cart");

    let cart = cart_repo(&state).add_item(&user.id, item).await?;
    Ok(Json(cart))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub product_id: String,
    #[serde(default)]
    pub selected_color: String,
    #[serde(default)]
    pub selected_size: String,
    pub qty: i64,
}

/// PUT /api/cart/update - replace a line item's quantity (below 1 deletes)
pub async fn update_item(
    State(state): State<ServerState>,
    OptionalUser(user): OptionalUser,
    Json(payload): Json<UpdateItemRequest>,
) -> AppResult<Json<Cart>> {
    let msgs = state.messages();
    let Some(user) = user else {
        return Err(AppError::unauthorized());
    };

    let key = ItemKey {
        product_id: payload.product_id,
        selected_color: payload.selected_color,
        selected_size: payload.selected_size,
    };

    match cart_repo(&state)
        .update_quantity(&user.id, &key, payload.qty)
        .await?
    {
        CartUpdateOutcome::Updated(cart) => Ok(Json(cart)),
        CartUpdateOutcome::CartMissing => Err(AppError::not_found(msgs.cart_not_found)),
        CartUpdateOutcome::ItemMissing => Err(AppError::not_found(msgs.item_not_found)),
    }
}

/// DELETE /api/cart/remove - drop a line item (unknown keys are a no-op)
pub async fn remove_item(
    State(state): State<ServerState>,
    OptionalUser(user): OptionalUser,
    Json(key): Json<ItemKey>,
) -> AppResult<Json<Cart>> {
    let msgs = state.messages();
    let Some(user) = user else {
        return Err(AppError::unauthorized());
    };

    match cart_repo(&state).remove_item(&user.id, &key).await? {
        Some(cart) => Ok(Json(cart)),
        None => Err(AppError::not_found(msgs.cart_not_found)),
    }
}

/// DELETE /api/cart/clear - delete the whole cart document (idempotent)
pub async fn clear_cart(
    State(state): State<ServerState>,
    OptionalUser(user): OptionalUser,
) -> AppResult<Json<MessageResponse>> {
    let msgs = state.messages();
    let Some(user) = user else {
        return Err(AppError::unauthorized());
    };

    cart_repo(&state).clear(&user.id).await?;
    Ok(Json(MessageResponse::new(msgs.cart_cleared)))
}
