//! Order API handlers
//!
//! Orders are created from a submitted cart-like payload with every
//! descriptive field snapshotted; they are never recomputed from the
//! catalog afterwards.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::MessageResponse;
use crate::auth::{AdminUser, CurrentUser, OptionalUser};
use crate::core::ServerState;
use crate::db::models::{DEFAULT_PAYMENT_METHOD, Order, OrderItem, OrderStatus};
use crate::db::repository::OrderRepository;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN,
    validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, Messages};

fn order_repo(state: &ServerState) -> OrderRepository {
    OrderRepository::new(state.get_db(), state.config.db_timeout())
}

// ── Creation ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// Validate a creation payload; each failure carries its own user-facing
/// message rather than a generic 400
fn validate_create(payload: &CreateOrderRequest, msgs: &Messages) -> Result<(), AppError> {
    if payload.customer_name.trim().is_empty()
        || payload.customer_email.trim().is_empty()
        || payload.customer_phone.trim().is_empty()
        || payload.shipping_address.trim().is_empty()
    {
        return Err(AppError::validation(msgs.customer_info_required));
    }
    validate_required_text(&payload.customer_name, "customerName", MAX_NAME_LEN)?;
    validate_required_text(&payload.customer_email, "customerEmail", MAX_EMAIL_LEN)?;
    validate_required_text(&payload.customer_phone, "customerPhone", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.shipping_address, "shippingAddress", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    if payload.items.is_empty() {
        return Err(AppError::validation(msgs.order_items_required));
    }
    if !payload.total.is_finite() || payload.total <= 0.0 {
        return Err(AppError::validation(msgs.invalid_total));
    }
    Ok(())
}

/// POST /api/orders - create an order (guest checkout permitted)
pub async fn create(
    State(state): State<ServerState>,
    OptionalUser(user): OptionalUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let msgs = state.messages();
    validate_create(&payload, msgs)?;

    let now = Utc::now();
    let mut items = payload.items;
    for item in &mut items {
        item.apply_defaults(msgs);
    }

    let order = Order {
        id: None,
        user_id: user.map(|u| u.id),
        customer_name: payload.customer_name,
        customer_email: payload.customer_email,
        customer_phone: payload.customer_phone,
        shipping_address: payload.shipping_address,
        note: payload.note,
        items,
        total: payload.total,
        status: OrderStatus::Pending,
        payment_method: payload
            .payment_method
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
        cancel_reason: None,
        cancelled_at: None,
        created_at: now,
        updated_at: now,
    };

    let created = order_repo(&state).create(order).await?;
    tracing::info!(order_id = %created.id_string(), "Order created");
    Ok((StatusCode::CREATED, Json(created)))
}

// ── Listing ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Owner scope of a listing request
#[derive(Debug, PartialEq, Eq)]
enum ListScope {
    Owner(String),
    Empty,
}

/// Resolve the listing scope. Authenticated callers always see their own
/// orders; the caller-supplied `userId` filter is honored for admins only;
/// anonymous callers see nothing.
fn list_scope(user: Option<&CurrentUser>, query_user: Option<String>) -> ListScope {
    match user {
        Some(user) if user.is_admin => {
            match query_user.filter(|q| !q.is_empty()) {
                Some(target) => ListScope::Owner(target),
                None => ListScope::Owner(user.id.clone()),
            }
        }
        Some(user) => ListScope::Owner(user.id.clone()),
        None => ListScope::Empty,
    }
}

/// GET /api/orders - the caller's orders, newest first (always an array)
pub async fn list(
    State(state): State<ServerState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = match list_scope(user.as_ref(), query.user_id) {
        ListScope::Owner(owner) => order_repo(&state).find_by_owner(&owner).await?,
        ListScope::Empty => Vec::new(),
    };
    Ok(Json(orders))
}

/// GET /api/admin/orders - every order, newest first
pub async fn list_all(
    State(state): State<ServerState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order_repo(&state).find_all().await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let msgs = state.messages();
    let order = order_repo(&state)
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(msgs.order_not_found))?;
    Ok(Json(order))
}

// ── Transitions ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// PUT /api/orders/{id} - admin status update, closed status set only
pub async fn update_status(
    State(state): State<ServerState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<Order>> {
    let msgs = state.messages();
    let token = payload.status.trim();
    if token.is_empty() {
        return Err(AppError::validation(msgs.status_required));
    }
    let status =
        OrderStatus::parse(token).ok_or_else(|| AppError::validation(msgs.invalid_status))?;

    let updated = order_repo(&state)
        .update_status(&id, status)
        .await?
        .ok_or_else(|| AppError::not_found(msgs.order_not_found))?;
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    #[serde(default)]
    pub cancel_reason: String,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub success: bool,
    pub message: String,
    pub order: Order,
}

/// Ownership rule for self-service cancellation: an authenticated caller
/// may not cancel someone else's order. Guest orders carry no owner, so the
/// check is skipped for them - a documented gap, any caller who knows the
/// id may cancel a pending guest order.
fn may_cancel(order: &Order, user: Option<&CurrentUser>) -> bool {
    match (&order.user_id, user) {
        (Some(owner), Some(user)) => owner == &user.id,
        _ => true,
    }
}

/// PUT /api/orders/{id}/cancel - self-service cancel of a pending order
pub async fn cancel(
    State(state): State<ServerState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<String>,
    Json(payload): Json<CancelRequest>,
) -> AppResult<Json<CancelResponse>> {
    let msgs = state.messages();
    let reason = payload.cancel_reason.trim();
    if reason.is_empty() {
        return Err(AppError::validation(msgs.cancel_reason_required));
    }
    validate_required_text(reason, "cancelReason", MAX_NOTE_LEN)?;

    let repo = order_repo(&state);
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(msgs.order_not_found))?;

    if !order.status.allows_self_cancel() {
        return Err(AppError::invalid_state(msgs.cannot_cancel));
    }
    if !may_cancel(&order, user.as_ref()) {
        return Err(AppError::forbidden(msgs.not_your_order));
    }

    // The pending check rides inside the conditional update; losing a race
    // against a concurrent confirm/cancel surfaces as invalid state.
    let cancelled = repo
        .cancel_pending(&id, reason)
        .await?
        .ok_or_else(|| AppError::invalid_state(msgs.cannot_cancel))?;

    tracing::info!(order_id = %id, reason = %reason, "Order cancelled");

    Ok(Json(CancelResponse {
        success: true,
        message: msgs.order_cancelled.to_string(),
        order: cancelled,
    }))
}

/// DELETE /api/orders/{id} - admin hard delete
pub async fn delete_order(
    State(state): State<ServerState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let msgs = state.messages();
    if order_repo(&state).delete(&id).await? {
        Ok(Json(MessageResponse::new(msgs.order_deleted)))
    } else {
        Err(AppError::not_found(msgs.order_not_found))
    }
}
