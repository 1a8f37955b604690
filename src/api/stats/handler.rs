//! Admin report handlers
//!
//! Count/sum reports folded over the order collection. Revenue sums run on
//! `Decimal`, never on accumulated floats. Cancelled orders are excluded
//! from every revenue and sales figure.

use std::collections::HashMap;

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderStatus, UserInfo};
use crate::db::repository::{OrderRepository, ProductRepository, UserRepository};
use crate::utils::AppResult;
use crate::utils::money::{to_decimal, to_f64};

const RECENT_ORDERS_LIMIT: i64 = 10;
const TOP_PRODUCTS_LIMIT: usize = 5;

fn order_repo(state: &ServerState) -> OrderRepository {
    OrderRepository::new(state.get_db(), state.config.db_timeout())
}

// ── Dashboard ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_products: i64,
    pub total_orders: i64,
    pub total_revenue: f64,
    pub today_orders: i64,
    pub today_revenue: f64,
    pub pending_orders: i64,
    pub completed_orders: i64,
}

fn fold_dashboard(
    total_users: i64,
    total_products: i64,
    orders: &[Order],
    now: DateTime<Utc>,
) -> DashboardStats {
    let today_start = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc();

    let mut total_revenue = Decimal::ZERO;
    let mut today_revenue = Decimal::ZERO;
    let mut today_orders = 0;
    let mut pending_orders = 0;
    let mut completed_orders = 0;

    for order in orders {
        let earns = order.status != OrderStatus::Cancelled;
        if earns {
            total_revenue += to_decimal(order.total);
        }
        if order.created_at >= today_start {
            today_orders += 1;
            if earns {
                today_revenue += to_decimal(order.total);
            }
        }
        match order.status {
            OrderStatus::Pending => pending_orders += 1,
            OrderStatus::Completed => completed_orders += 1,
            _ => {}
        }
    }

    DashboardStats {
        total_users,
        total_products,
        total_orders: orders.len() as i64,
        total_revenue: to_f64(total_revenue),
        today_orders,
        today_revenue: to_f64(today_revenue),
        pending_orders,
        completed_orders,
    }
}

/// GET /api/admin/stats
pub async fn dashboard(
    State(state): State<ServerState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<DashboardStats>> {
    let total_users = UserRepository::new(state.get_db(), state.config.db_timeout())
        .count()
        .await?;
    let total_products = ProductRepository::new(state.get_db(), state.config.db_timeout())
        .count()
        .await?;
    let orders = order_repo(&state).find_all().await?;

    Ok(Json(fold_dashboard(
        total_users,
        total_products,
        &orders,
        Utc::now(),
    )))
}

// ── Recent orders ───────────────────────────────────────────────────

/// GET /api/admin/orders/recent
pub async fn recent_orders(
    State(state): State<ServerState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order_repo(&state).find_recent(RECENT_ORDERS_LIMIT).await?;
    Ok(Json(orders))
}

// ── Users with stats ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithStats {
    #[serde(flatten)]
    pub user: UserInfo,
    pub total_orders: i64,
    pub total_spent: f64,
}

fn fold_user_stats(users: Vec<UserInfo>, orders: &[Order]) -> Vec<UserWithStats> {
    let mut by_owner: HashMap<&str, (i64, Decimal)> = HashMap::new();
    for order in orders {
        let Some(owner) = order.user_id.as_deref() else {
            continue;
        };
        let entry = by_owner.entry(owner).or_default();
        entry.0 += 1;
        if order.status != OrderStatus::Cancelled {
            entry.1 += to_decimal(order.total);
        }
    }

    users
        .into_iter()
        .map(|user| {
            let (total_orders, spent) = by_owner.get(user.id.as_str()).copied().unwrap_or_default();
            UserWithStats {
                user,
                total_orders,
                total_spent: to_f64(spent),
            }
        })
        .collect()
}

/// GET /api/admin/users - accounts joined with order count and spend
pub async fn users_with_stats(
    State(state): State<ServerState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<Vec<UserWithStats>>> {
    let users = UserRepository::new(state.get_db(), state.config.db_timeout())
        .find_all()
        .await?;
    let orders = order_repo(&state).find_all().await?;

    let infos = users.iter().map(UserInfo::from).collect();
    Ok(Json(fold_user_stats(infos, &orders)))
}

// ── Top products ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub total_sold: i64,
    pub revenue: f64,
}

fn fold_top_products(orders: &[Order], limit: usize) -> Vec<TopProduct> {
    let mut by_product: HashMap<&str, TopProductAcc> = HashMap::new();
    for order in orders {
        if order.status == OrderStatus::Cancelled {
            continue;
        }
        for item in &order.items {
            let acc = by_product
                .entry(item.product_id.as_str())
                .or_insert_with(|| TopProductAcc {
                    name: item.name.clone(),
                    image: item.image.clone(),
                    total_sold: 0,
                    revenue: Decimal::ZERO,
                });
            acc.total_sold += item.qty;
            acc.revenue += to_decimal(item.price) * Decimal::from(item.qty);
        }
    }

    let mut top: Vec<TopProduct> = by_product
        .into_iter()
        .map(|(product_id, acc)| TopProduct {
            product_id: product_id.to_string(),
            name: acc.name,
            image: acc.image,
            total_sold: acc.total_sold,
            revenue: to_f64(acc.revenue),
        })
        .collect();
    top.sort_by(|a, b| b.total_sold.cmp(&a.total_sold));
    top.truncate(limit);
    top
}

struct TopProductAcc {
    name: String,
    image: String,
    total_sold: i64,
    revenue: Decimal,
}

/// GET /api/admin/products/top - best sellers by units
pub async fn top_products(
    State(state): State<ServerState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<Vec<TopProduct>>> {
    let orders = order_repo(&state).find_all().await?;
    Ok(Json(fold_top_products(&orders, TOP_PRODUCTS_LIMIT)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::OrderItem;
    use chrono::TimeZone;

    fn order(
        owner: Option<&str>,
        status: OrderStatus,
        total: f64,
        created_at: DateTime<Utc>,
    ) -> Order {
        Order {
            id: None,
            user_id: owner.map(str::to_string),
            customer_name: "A".to_string(),
            customer_email: "a@b.vn".to_string(),
            customer_phone: "09".to_string(),
            shipping_address: "X".to_string(),
            note: None,
            items: vec![OrderItem {
                product_id: "p1".to_string(),
                name: "Trail Shoe".to_string(),
                price: total,
                qty: 1,
                image: String::new(),
                selected_color: "Default".to_string(),
                selected_size: "One Size".to_string(),
            }],
            total,
            status,
            payment_method: "Cash on Delivery".to_string(),
            cancel_reason: None,
            cancelled_at: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn dashboard_fold_is_exact_and_excludes_cancelled() {
        let now = Utc.with_ymd_and_hms(2026, 8, 8, 12, 0, 0).unwrap();
        let today = Utc.with_ymd_and_hms(2026, 8, 8, 9, 0, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2026, 8, 7, 9, 0, 0).unwrap();

        let orders = vec![
            order(Some("u1"), OrderStatus::Pending, 0.1, today),
            order(Some("u1"), OrderStatus::Completed, 0.2, yesterday),
            order(None, OrderStatus::Cancelled, 99.0, today),
        ];

        let stats = fold_dashboard(5, 7, &orders, now);
        assert_eq!(stats.total_users, 5);
        assert_eq!(stats.total_products, 7);
        assert_eq!(stats.total_orders, 3);
        // 0.1 + 0.2 sums exactly; the cancelled 99.0 is not revenue
        assert_eq!(stats.total_revenue, 0.3);
        assert_eq!(stats.today_orders, 2);
        assert_eq!(stats.today_revenue, 0.1);
        assert_eq!(stats.pending_orders, 1);
        assert_eq!(stats.completed_orders, 1);
    }

    #[test]
    fn user_stats_fold_groups_by_owner() {
        let now = Utc::now();
        let orders = vec![
            order(Some("user:u1"), OrderStatus::Completed, 10.0, now),
            order(Some("user:u1"), OrderStatus::Cancelled, 5.0, now),
            order(None, OrderStatus::Completed, 7.0, now),
        ];
        let users = vec![
            UserInfo {
                id: "user:u1".to_string(),
                email: "u1@b.vn".to_string(),
                name: "U1".to_string(),
                is_admin: false,
            },
            UserInfo {
                id: "user:u2".to_string(),
                email: "u2@b.vn".to_string(),
                name: "U2".to_string(),
                is_admin: false,
            },
        ];

        let stats = fold_user_stats(users, &orders);
        // Cancelled orders count toward history but not spend
        assert_eq!(stats[0].total_orders, 2);
        assert_eq!(stats[0].total_spent, 10.0);
        assert_eq!(stats[1].total_orders, 0);
        assert_eq!(stats[1].total_spent, 0.0);
    }

    #[test]
    fn top_products_ranks_by_units() {
        let now = Utc::now();
        let mut a = order(None, OrderStatus::Completed, 10.0, now);
        a.items = vec![
            OrderItem {
                product_id: "p1".to_string(),
                name: "Shoe".to_string(),
                price: 10.0,
                qty: 3,
                image: String::new(),
                selected_color: String::new(),
                selected_size: String::new(),
            },
            OrderItem {
                product_id: "p2".to_string(),
                name: "Sock".to_string(),
                price: 2.0,
                qty: 1,
                image: String::new(),
                selected_color: String::new(),
                selected_size: String::new(),
            },
        ];
        let mut b = order(None, OrderStatus::Completed, 4.0, now);
        b.items = vec![OrderItem {
            product_id: "p2".to_string(),
            name: "Sock".to_string(),
            price: 2.0,
            qty: 4,
            image: String::new(),
            selected_color: String::new(),
            selected_size: String::new(),
        }];

        let top = fold_top_products(&[a, b], 5);
        assert_eq!(top[0].product_id, "p2");
        assert_eq!(top[0].total_sold, 5);
        assert_eq!(top[0].revenue, 10.0);
        assert_eq!(top[1].product_id, "p1");

        let trimmed = fold_top_products(&[], 5);
        assert!(trimmed.is_empty());
    }
}
