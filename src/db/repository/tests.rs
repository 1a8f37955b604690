//! Repository tests against the in-memory SurrealDB engine

use std::time::Duration;

use chrono::{TimeZone, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

use super::*;
use crate::db::define_schema;
use crate::db::models::{CartItem, ItemKey, Order, OrderItem, OrderStatus, User};

const DEADLINE: Duration = Duration::from_secs(10);

async fn test_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.expect("in-memory engine");
    db.use_ns("test").use_db("test").await.expect("namespace");
    define_schema(&db).await.expect("schema");
    db
}

fn item(product: &str, color: &str, size: &str, qty: i64) -> CartItem {
    CartItem {
        product_id: product.to_string(),
        qty,
        selected_color: color.to_string(),
        selected_size: size.to_string(),
        price: 10.0,
        name: format!("Product {product}"),
        image: String::new(),
    }
}

fn key(product: &str, color: &str, size: &str) -> ItemKey {
    ItemKey {
        product_id: product.to_string(),
        selected_color: color.to_string(),
        selected_size: size.to_string(),
    }
}

fn order(owner: Option<&str>, status: OrderStatus) -> Order {
    let now = Utc::now();
    Order {
        id: None,
        user_id: owner.map(str::to_string),
        customer_name: "Nguyễn Văn A".to_string(),
        customer_email: "a@example.vn".to_string(),
        customer_phone: "0900000000".to_string(),
        shipping_address: "1 Lê Lợi, Quận 1".to_string(),
        note: None,
        items: vec![OrderItem {
            product_id: "p1".to_string(),
            name: "Trail Shoe".to_string(),
            price: 10.0,
            qty: 2,
            image: String::new(),
            selected_color: "Default".to_string(),
            selected_size: "One Size".to_string(),
        }],
        total: 20.0,
        status,
        payment_method: "Cash on Delivery".to_string(),
        cancel_reason: None,
        cancelled_at: None,
        created_at: now,
        updated_at: now,
    }
}

// ── Cart ────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_item_creates_cart_lazily() {
    let repo = CartRepository::new(test_db().await, DEADLINE);
    assert!(repo.find_by_user("u1").await.unwrap().is_none());

    let cart = repo.add_item("u1", item("p1", "Red", "M", 2)).await.unwrap();
    assert_eq!(cart.user_id, "u1");
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].qty, 2);
    assert_eq!(cart.revision, 1);
    assert!(repo.find_by_user("u1").await.unwrap().is_some());
}

#[tokio::test]
async fn add_item_merges_by_identity_key() {
    let repo = CartRepository::new(test_db().await, DEADLINE);
    repo.add_item("u1", item("p1", "Red", "M", 2)).await.unwrap();
    let cart = repo.add_item("u1", item("p1", "Red", "M", 3)).await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].qty, 5);

    // Same product, different color - a second line item
    let cart = repo.add_item("u1", item("p1", "Blue", "M", 1)).await.unwrap();
    assert_eq!(cart.items.len(), 2);
}

#[tokio::test]
async fn concurrent_adds_do_not_lose_either_write() {
    let repo = CartRepository::new(test_db().await, DEADLINE);
    let (a, b) = tokio::join!(
        repo.add_item("u1", item("p1", "Red", "M", 1)),
        repo.add_item("u1", item("p2", "Red", "M", 1)),
    );
    a.unwrap();
    b.unwrap();

    let cart = repo.find_by_user("u1").await.unwrap().expect("cart exists");
    assert_eq!(cart.items.len(), 2, "one of the concurrent adds was lost");
}

#[tokio::test]
async fn update_quantity_replaces_or_deletes() {
    let repo = CartRepository::new(test_db().await, DEADLINE);
    repo.add_item("u1", item("p1", "Red", "M", 2)).await.unwrap();

    match repo.update_quantity("u1", &key("p1", "Red", "M"), 7).await.unwrap() {
        CartUpdateOutcome::Updated(cart) => assert_eq!(cart.items[0].qty, 7),
        other => panic!("expected update, got {other:?}"),
    }

    // Quantity 0 deletes the line item instead of storing a zero
    match repo.update_quantity("u1", &key("p1", "Red", "M"), 0).await.unwrap() {
        CartUpdateOutcome::Updated(cart) => assert!(cart.items.is_empty()),
        other => panic!("expected update, got {other:?}"),
    }
}

#[tokio::test]
async fn update_quantity_distinguishes_missing_cart_and_item() {
    let repo = CartRepository::new(test_db().await, DEADLINE);
    assert!(matches!(
        repo.update_quantity("ghost", &key("p1", "Red", "M"), 1).await.unwrap(),
        CartUpdateOutcome::CartMissing
    ));

    repo.add_item("u1", item("p1", "Red", "M", 2)).await.unwrap();
    assert!(matches!(
        repo.update_quantity("u1", &key("p9", "Red", "M"), 1).await.unwrap(),
        CartUpdateOutcome::ItemMissing
    ));
}

#[tokio::test]
async fn remove_item_is_silent_for_unknown_keys() {
    let repo = CartRepository::new(test_db().await, DEADLINE);
    assert!(repo.remove_item("ghost", &key("p1", "Red", "M")).await.unwrap().is_none());

    repo.add_item("u1", item("p1", "Red", "M", 2)).await.unwrap();
    let cart = repo
        .remove_item("u1", &key("p9", "Red", "M"))
        .await
        .unwrap()
        .expect("cart exists");
    assert_eq!(cart.items.len(), 1, "unknown key must not change the cart");

    let cart = repo
        .remove_item("u1", &key("p1", "Red", "M"))
        .await
        .unwrap()
        .expect("cart exists");
    assert!(cart.items.is_empty());
}

#[tokio::test]
async fn clear_cart_is_idempotent() {
    let repo = CartRepository::new(test_db().await, DEADLINE);
    repo.add_item("u1", item("p1", "Red", "M", 2)).await.unwrap();

    repo.clear("u1").await.unwrap();
    assert!(repo.find_by_user("u1").await.unwrap().is_none());

    // Second clear against an absent cart still succeeds
    repo.clear("u1").await.unwrap();
}

// ── Orders ──────────────────────────────────────────────────────────

#[tokio::test]
async fn created_order_round_trips() {
    let repo = OrderRepository::new(test_db().await, DEADLINE);
    let created = repo.create(order(Some("u1"), OrderStatus::Pending)).await.unwrap();
    assert!(created.id.is_some());

    let fetched = repo
        .find_by_id(&created.id_string())
        .await
        .unwrap()
        .expect("order exists");
    assert_eq!(fetched.status, OrderStatus::Pending);
    assert_eq!(fetched.items[0].qty, 2);
    assert_eq!(fetched.total, 20.0);
}

#[tokio::test]
async fn find_by_id_handles_bad_ids() {
    let repo = OrderRepository::new(test_db().await, DEADLINE);
    assert!(repo.find_by_id("").await.unwrap().is_none());
    assert!(repo.find_by_id("not a valid ##id").await.unwrap().is_none());
    assert!(repo.find_by_id("product:abc").await.unwrap().is_none());
    assert!(repo.find_by_id("order:missing").await.unwrap().is_none());
}

#[tokio::test]
async fn cancel_succeeds_only_while_pending() {
    let repo = OrderRepository::new(test_db().await, DEADLINE);
    let created = repo.create(order(Some("u1"), OrderStatus::Pending)).await.unwrap();
    let id = created.id_string();

    let cancelled = repo
        .cancel_pending(&id, "đặt nhầm")
        .await
        .unwrap()
        .expect("pending order cancels");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.cancel_reason.as_deref(), Some("đặt nhầm"));
    assert!(cancelled.cancelled_at.is_some());

    // Already cancelled - the conditional update no longer matches
    assert!(repo.cancel_pending(&id, "again").await.unwrap().is_none());

    let confirmed = repo.create(order(Some("u1"), OrderStatus::Confirmed)).await.unwrap();
    assert!(
        repo.cancel_pending(&confirmed.id_string(), "too late")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn update_status_sets_status_and_timestamp() {
    let repo = OrderRepository::new(test_db().await, DEADLINE);
    let created = repo.create(order(None, OrderStatus::Pending)).await.unwrap();

    let updated = repo
        .update_status(&created.id_string(), OrderStatus::Shipping)
        .await
        .unwrap()
        .expect("order exists");
    assert_eq!(updated.status, OrderStatus::Shipping);
    assert!(updated.updated_at >= created.updated_at);

    assert!(
        repo.update_status("order:missing", OrderStatus::Shipping)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn listing_scopes_by_owner_and_sorts_newest_first() {
    let repo = OrderRepository::new(test_db().await, DEADLINE);

    let mut old = order(Some("u1"), OrderStatus::Pending);
    old.created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let mut new = order(Some("u1"), OrderStatus::Pending);
    new.created_at = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let old = repo.create(old).await.unwrap();
    let new = repo.create(new).await.unwrap();
    repo.create(order(Some("u2"), OrderStatus::Pending)).await.unwrap();
    repo.create(order(None, OrderStatus::Pending)).await.unwrap();

    let orders = repo.find_by_owner("u1").await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id_string(), new.id_string());
    assert_eq!(orders[1].id_string(), old.id_string());

    assert!(repo.find_by_owner("nobody").await.unwrap().is_empty());
    assert_eq!(repo.find_all().await.unwrap().len(), 4);
}

#[tokio::test]
async fn malformed_order_documents_are_skipped_in_listings() {
    let db = test_db().await;
    let repo = OrderRepository::new(db.clone(), DEADLINE);
    repo.create(order(Some("u1"), OrderStatus::Pending)).await.unwrap();

    // A document missing required fields must not poison the whole listing
    db.query("CREATE order SET junk = true")
        .await
        .expect("raw insert");

    let orders = repo.find_all().await.unwrap();
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn delete_reports_whether_anything_was_removed() {
    let repo = OrderRepository::new(test_db().await, DEADLINE);
    let created = repo.create(order(None, OrderStatus::Pending)).await.unwrap();

    assert!(repo.delete(&created.id_string()).await.unwrap());
    assert!(!repo.delete(&created.id_string()).await.unwrap());
    assert!(!repo.delete("order:missing").await.unwrap());
}

// ── Products ────────────────────────────────────────────────────────

fn product(name: &str, category: &str, price: f64) -> crate::db::models::Product {
    crate::db::models::ProductCreate {
        name: name.to_string(),
        description: format!("{name} description"),
        price,
        original_price: None,
        discount: None,
        image: String::new(),
        images: vec![],
        category: category.to_string(),
        subcategory: String::new(),
        brand: None,
        slug: None,
        stock: 10,
        colors: vec![],
        sizes: vec![],
        features: vec![],
    }
    .into_product(Utc::now())
}

#[tokio::test]
async fn product_listing_filters_and_paginates() {
    let repo = ProductRepository::new(test_db().await, DEADLINE);
    repo.create(product("Trail Shoe", "shoes", 120.0)).await.unwrap();
    repo.create(product("Road Shoe", "shoes", 90.0)).await.unwrap();
    repo.create(product("Running Sock", "accessories", 9.0)).await.unwrap();

    let (all, total) = repo.list(&ProductFilter { page: 1, limit: 10, ..Default::default() })
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(total, 3);

    let shoes = ProductFilter {
        category: Some("shoes".to_string()),
        sort: Some("price_asc".to_string()),
        page: 1,
        limit: 10,
        ..Default::default()
    };
    let (products, total) = repo.list(&shoes).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(products[0].name, "Road Shoe");

    let search = ProductFilter {
        search: Some("trail".to_string()),
        page: 1,
        limit: 10,
        ..Default::default()
    };
    let (products, total) = repo.list(&search).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(products[0].name, "Trail Shoe");

    // Second page of a one-per-page listing
    let paged = ProductFilter { page: 2, limit: 1, ..Default::default() };
    let (products, total) = repo.list(&paged).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn product_slug_and_related_lookups() {
    let repo = ProductRepository::new(test_db().await, DEADLINE);
    let shoe = repo.create(product("Trail Shoe", "shoes", 120.0)).await.unwrap();
    repo.create(product("Road Shoe", "shoes", 90.0)).await.unwrap();
    repo.create(product("Running Sock", "accessories", 9.0)).await.unwrap();

    let by_slug = repo
        .find_by_slug("trail-shoe")
        .await
        .unwrap()
        .expect("slug resolves");
    assert_eq!(by_slug.name, "Trail Shoe");

    let shoe_id = shoe.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
    let related = repo
        .find_related(&shoe_id)
        .await
        .unwrap()
        .expect("product exists");
    assert_eq!(related.len(), 1, "same category, excluding the product itself");
    assert_eq!(related[0].name, "Road Shoe");

    assert!(repo.find_related("product:missing").await.unwrap().is_none());
}

// ── Users ───────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let repo = UserRepository::new(test_db().await, DEADLINE);
    let user = User {
        id: None,
        email: "a@example.vn".to_string(),
        name: "A".to_string(),
        password_hash: "x".to_string(),
        is_admin: false,
        created_at: Utc::now(),
    };
    repo.create(user.clone()).await.unwrap();
    match repo.create(user).await {
        Err(RepoError::Duplicate(_)) => {}
        other => panic!("expected duplicate error, got {other:?}"),
    }
    assert_eq!(repo.count().await.unwrap(), 1);
}
