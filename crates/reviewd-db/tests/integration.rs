//! Integration tests for reviewd-db. The `#[sqlx::test]` cases need a running
//! Postgres (DATABASE_URL); the rest are offline.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use reviewd_core::{AppConfig, Environment};
use reviewd_db::{NewProduct, NewReview, NewReviewMedia, PoolConfig};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        upload_dir: PathBuf::from("./uploads"),
        public_base_url: "http://localhost:3000".to_string(),
        invites_base_url: "https://invites.example.com".to_string(),
        invites_timeout_secs: 30,
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

fn guest_review<'a>(product_id: &'a str, rating: i16) -> NewReview<'a> {
    NewReview {
        rating,
        comment: None,
        product_id,
        user_id: None,
        customer_name: Some("Guest Reviewer"),
        customer_email: None,
        shopify_shop: None,
        shopify_product_id: None,
        invitation_token: None,
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn ensure_product_exists_is_idempotent(pool: sqlx::PgPool) {
    let inserted = reviewd_db::ensure_product_exists(
        &pool,
        "ext-prod-1",
        "Product X123",
        Some("Product imported from shop store.example"),
        Some("X123"),
    )
    .await
    .expect("first ensure");
    assert!(inserted, "first call should insert");

    let inserted_again = reviewd_db::ensure_product_exists(
        &pool,
        "ext-prod-1",
        "Different Name",
        None,
        Some("OTHER"),
    )
    .await
    .expect("second ensure");
    assert!(!inserted_again, "second call should be a no-op");

    let product = reviewd_db::get_product(&pool, "ext-prod-1")
        .await
        .expect("get product")
        .expect("product exists");
    assert_eq!(product.name, "Product X123", "first writer wins");
    assert_eq!(product.sku.as_deref(), Some("X123"));
    assert!(product.active);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE id = 'ext-prod-1'")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(count, 1, "exactly one row regardless of call count");
}

#[sqlx::test(migrations = "../../migrations")]
async fn mark_helpful_increments_by_exactly_one_per_call(pool: sqlx::PgPool) {
    let product = reviewd_db::create_product(
        &pool,
        &NewProduct {
            name: "Helpful Target",
            ..NewProduct::default()
        },
    )
    .await
    .expect("create product");

    let (review, _) = reviewd_db::create_review(&pool, &guest_review(&product.id, 5), &[])
        .await
        .expect("create review");
    assert_eq!(review.helpful, 0);

    let first = reviewd_db::mark_helpful(&pool, review.id)
        .await
        .expect("first bump")
        .expect("review found");
    assert_eq!(first.helpful, 1);

    let second = reviewd_db::mark_helpful(&pool, review.id)
        .await
        .expect("second bump")
        .expect("review found");
    assert_eq!(second.helpful, 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn mark_helpful_returns_none_for_unknown_review(pool: sqlx::PgPool) {
    let missing = reviewd_db::mark_helpful(&pool, uuid::Uuid::new_v4())
        .await
        .expect("query ok");
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn concurrent_helpful_bumps_lose_no_increment(pool: sqlx::PgPool) {
    let product = reviewd_db::create_product(
        &pool,
        &NewProduct {
            name: "Contended Product",
            ..NewProduct::default()
        },
    )
    .await
    .expect("create product");
    let (review, _) = reviewd_db::create_review(&pool, &guest_review(&product.id, 4), &[])
        .await
        .expect("create review");

    let mut handles = Vec::new();
    for _ in 0..10 {
        let pool = pool.clone();
        let id = review.id;
        handles.push(tokio::spawn(async move {
            reviewd_db::mark_helpful(&pool, id).await
        }));
    }
    for handle in handles {
        handle
            .await
            .expect("task join")
            .expect("bump ok")
            .expect("review found");
    }

    let helpful: i32 = sqlx::query_scalar("SELECT helpful FROM reviews WHERE id = $1")
        .bind(review.id)
        .fetch_one(&pool)
        .await
        .expect("read counter");
    assert_eq!(helpful, 10);
}

#[sqlx::test(migrations = "../../migrations")]
async fn create_review_persists_media_in_same_unit(pool: sqlx::PgPool) {
    let product = reviewd_db::create_product(
        &pool,
        &NewProduct {
            name: "Media Product",
            ..NewProduct::default()
        },
    )
    .await
    .expect("create product");

    let media = [
        NewReviewMedia {
            media_type: "IMAGE",
            url: "http://localhost:3000/uploads/a.png",
            filename: Some("a.png"),
            size_bytes: Some(1024),
        },
        NewReviewMedia {
            media_type: "VIDEO",
            url: "http://localhost:3000/uploads/b.mp4",
            filename: Some("b.mp4"),
            size_bytes: Some(2048),
        },
    ];
    let (review, media_rows) = reviewd_db::create_review(&pool, &guest_review(&product.id, 5), &media)
        .await
        .expect("create review with media");

    assert_eq!(media_rows.len(), 2);
    assert!(media_rows.iter().all(|m| m.review_id == review.id));

    let stored = reviewd_db::list_media_for_reviews(&pool, &[review.id])
        .await
        .expect("list media");
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].media_type, "IMAGE");
    assert_eq!(stored[1].media_type, "VIDEO");
}

#[sqlx::test(migrations = "../../migrations")]
async fn create_review_rejects_invalid_media_type_atomically(pool: sqlx::PgPool) {
    let product = reviewd_db::create_product(
        &pool,
        &NewProduct {
            name: "Rollback Product",
            ..NewProduct::default()
        },
    )
    .await
    .expect("create product");

    let media = [NewReviewMedia {
        media_type: "AUDIO", // violates the CHECK constraint
        url: "http://localhost:3000/uploads/c.mp3",
        filename: None,
        size_bytes: None,
    }];
    let result = reviewd_db::create_review(&pool, &guest_review(&product.id, 5), &media).await;
    assert!(result.is_err(), "invalid media type must fail the insert");

    let review_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
        .fetch_one(&pool)
        .await
        .expect("count reviews");
    assert_eq!(review_count, 0, "review insert must roll back with its media");
}

#[sqlx::test(migrations = "../../migrations")]
async fn review_without_any_identity_is_rejected_by_schema(pool: sqlx::PgPool) {
    let product = reviewd_db::create_product(
        &pool,
        &NewProduct {
            name: "Identity Product",
            ..NewProduct::default()
        },
    )
    .await
    .expect("create product");

    let anonymous = NewReview {
        rating: 4,
        comment: None,
        product_id: &product.id,
        user_id: None,
        customer_name: None,
        customer_email: None,
        shopify_shop: None,
        shopify_product_id: None,
        invitation_token: None,
    };
    let result = reviewd_db::create_review(&pool, &anonymous, &[]).await;
    assert!(result.is_err(), "CHECK constraint must reject anonymous reviews");
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_reviews_filters_by_product_and_shop(pool: sqlx::PgPool) {
    let product_a = reviewd_db::create_product(
        &pool,
        &NewProduct {
            name: "Product A",
            ..NewProduct::default()
        },
    )
    .await
    .expect("create product a");
    let product_b = reviewd_db::create_product(
        &pool,
        &NewProduct {
            name: "Product B",
            ..NewProduct::default()
        },
    )
    .await
    .expect("create product b");

    let mut shop_review = guest_review(&product_a.id, 5);
    shop_review.shopify_shop = Some("store.example");
    reviewd_db::create_review(&pool, &shop_review, &[])
        .await
        .expect("create shop review");
    reviewd_db::create_review(&pool, &guest_review(&product_b.id, 3), &[])
        .await
        .expect("create plain review");

    let for_a = reviewd_db::list_reviews_for_product(&pool, &product_a.id, None)
        .await
        .expect("list for product a");
    assert_eq!(for_a.len(), 1);

    let for_shop = reviewd_db::list_reviews_by_shop(&pool, "store.example")
        .await
        .expect("list by shop");
    assert_eq!(for_shop.len(), 1);
    assert_eq!(for_shop[0].product_id, product_a.id);

    let all = reviewd_db::list_reviews(&pool).await.expect("list all");
    assert_eq!(all.len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn seed_demo_data_populates_all_tables(pool: sqlx::PgPool) {
    let seeded = reviewd_db::seed::seed_demo_data(&pool)
        .await
        .expect("seed should succeed");
    assert_eq!(seeded, 6);

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .expect("count users");
    let products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&pool)
        .await
        .expect("count products");
    let reviews: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
        .fetch_one(&pool)
        .await
        .expect("count reviews");
    assert_eq!(users, 3);
    assert_eq!(products, 4);
    assert_eq!(reviews, 6);
}
