//! Demo data for local development.

use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Inserts a small demo dataset: users, categories, products, posts, and a
/// mix of authenticated and guest reviews.
///
/// Everything runs inside a single transaction; if any insert fails the whole
/// batch is rolled back. Returns the number of reviews seeded.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails.
pub async fn seed_demo_data(pool: &PgPool) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;

    let users: [(&str, &str); 3] = [
        ("alice@example.com", "Alice Hartman"),
        ("ben@example.com", "Ben Okafor"),
        ("carla@example.com", "Carla Reyes"),
    ];
    let mut user_ids = Vec::with_capacity(users.len());
    for (email, name) in users {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (email, name) VALUES ($1, $2) \
             ON CONFLICT (email) DO UPDATE SET name = EXCLUDED.name, updated_at = NOW() \
             RETURNING id",
        )
        .bind(email)
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;
        user_ids.push(id);
    }

    for (name, description) in [
        ("Electronics", "Phones, audio, and gadgets"),
        ("Home & Kitchen", "Appliances and household goods"),
    ] {
        sqlx::query(
            "INSERT INTO categories (name, description) VALUES ($1, $2) \
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(description)
        .execute(&mut *tx)
        .await?;
    }

    let products: [(&str, &str, &str, &str); 4] = [
        (
            "Smartphone XYZ Pro",
            "Flagship phone with a 108MP camera and all-day battery.",
            "1299.99",
            "PHONE-XYZ-PRO-001",
        ),
        (
            "Wireless Headphones",
            "Over-ear headphones with active noise cancellation.",
            "299.99",
            "HEADPHONE-BT-001",
        ),
        (
            "Automatic Coffee Maker",
            "Built-in grinder, 12 brew programs, programmable timer.",
            "899.99",
            "COFFEE-AUTO-001",
        ),
        (
            "Fitness Smartwatch",
            "Health tracking, GPS, water resistant.",
            "599.99",
            "WATCH-FIT-001",
        ),
    ];
    let mut product_ids = Vec::with_capacity(products.len());
    for (name, description, price, sku) in products {
        let id: String = sqlx::query_scalar(
            "INSERT INTO products (name, description, price, sku) \
             VALUES ($1, $2, $3::NUMERIC, $4) \
             RETURNING id",
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(sku)
        .fetch_one(&mut *tx)
        .await?;
        product_ids.push(id);
    }

    for (title, content, author) in [
        (
            "How to pick the right smartphone",
            "A practical guide to choosing a phone that fits your needs.",
            user_ids[0],
        ),
        (
            "Better coffee at home",
            "Simple steps toward a consistently good cup.",
            user_ids[1],
        ),
    ] {
        sqlx::query(
            "INSERT INTO posts (title, content, published, author_id) VALUES ($1, $2, TRUE, $3)",
        )
        .bind(title)
        .bind(content)
        .bind(author)
        .execute(&mut *tx)
        .await?;
    }

    // (rating, comment, product index, user index or guest identity, verified)
    struct SeedReview {
        rating: i16,
        comment: &'static str,
        product: usize,
        user: Option<usize>,
        guest: Option<(&'static str, &'static str)>,
        verified: bool,
    }
    let reviews = [
        SeedReview {
            rating: 5,
            comment: "Excellent phone, the camera is superb and the battery lasts all day.",
            product: 0,
            user: Some(0),
            guest: None,
            verified: true,
        },
        SeedReview {
            rating: 4,
            comment: "Great sound quality, though a bit pricey.",
            product: 1,
            user: Some(1),
            guest: None,
            verified: true,
        },
        SeedReview {
            rating: 5,
            comment: "Best coffee maker I have owned. Easy to use.",
            product: 2,
            user: Some(2),
            guest: None,
            verified: true,
        },
        SeedReview {
            rating: 3,
            comment: "Does the job but I expected more features.",
            product: 0,
            user: None,
            guest: Some(("Dana Cole", "dana@example.com")),
            verified: false,
        },
        SeedReview {
            rating: 4,
            comment: "Solid watch for workouts, battery holds up well.",
            product: 3,
            user: None,
            guest: Some(("Evan Park", "evan@example.com")),
            verified: true,
        },
        SeedReview {
            rating: 5,
            comment: "Noise cancellation works perfectly on flights.",
            product: 1,
            user: None,
            guest: Some(("Fay Nguyen", "fay@example.com")),
            verified: true,
        },
    ];

    for review in &reviews {
        let (customer_name, customer_email) = match review.guest {
            Some((name, email)) => (Some(name), Some(email)),
            None => (None, None),
        };
        sqlx::query(
            "INSERT INTO reviews \
               (rating, comment, verified, product_id, user_id, customer_name, customer_email) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(review.rating)
        .bind(review.comment)
        .bind(review.verified)
        .bind(&product_ids[review.product])
        .bind(review.user.map(|i| user_ids[i]))
        .bind(customer_name)
        .bind(customer_email)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(reviews.len())
}
