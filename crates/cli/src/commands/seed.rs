//! Seed the remote document store.
//!
//! `seed products` pushes the bundled catalog into the `products`
//! collection so a fresh store starts with the same data the storefront
//! bundles, skipping any product whose name already exists. `seed orders`
//! creates a small set of sample orders for exercising the order history.

use std::collections::HashSet;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use secrecy::SecretString;
use tracing::info;

use cartwheel_core::{Order, OrderItem, OrderStatus, ShippingAddress};
use cartwheel_storefront::catalog::local;
use cartwheel_storefront::config::DocumentStoreConfig;
use cartwheel_storefront::store::{DocumentStore, StoreClient, collections, encode};

/// Build the store client from `DOCSTORE_URL` / `DOCSTORE_API_KEY`.
fn store_from_env() -> Result<StoreClient, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let base_url = std::env::var("DOCSTORE_URL").map_err(|_| "DOCSTORE_URL not set")?;
    let api_key = std::env::var("DOCSTORE_API_KEY")
        .map(SecretString::from)
        .map_err(|_| "DOCSTORE_API_KEY not set")?;

    Ok(StoreClient::new(&DocumentStoreConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        api_key,
    }))
}

/// Seed the `products` collection from the bundled catalog.
///
/// Products already present (matched by name) are left untouched.
///
/// # Errors
///
/// Returns an error if environment variables are missing or a store
/// operation fails.
pub async fn products() -> Result<(), Box<dyn std::error::Error>> {
    let client = store_from_env()?;

    let existing = client.list(collections::PRODUCTS).await?;
    let existing_names: HashSet<String> = existing
        .iter()
        .filter_map(|doc| doc.fields.get("name"))
        .filter_map(|name| name.as_str().map(ToString::to_string))
        .collect();

    info!(existing = existing_names.len(), "Fetched existing products");

    let mut seen = HashSet::new();
    let to_seed: Vec<_> = local::products()
        .into_iter()
        .filter(|product| seen.insert(product.name.clone()))
        .filter(|product| !existing_names.contains(&product.name))
        .collect();

    if to_seed.is_empty() {
        info!("Store is already up-to-date. No new products to add.");
        return Ok(());
    }

    let mut inserted = 0usize;
    for product in &to_seed {
        client
            .create(collections::PRODUCTS, encode(product)?)
            .await?;
        inserted += 1;
    }

    info!(inserted, "Seeding complete");
    Ok(())
}

/// Create sample orders for a user.
///
/// # Errors
///
/// Returns an error if environment variables are missing or a store
/// operation fails.
pub async fn orders(user_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = store_from_env()?;
    let now = Utc::now();

    let address = |street: &str, city: &str, state: &str, zip: &str| ShippingAddress {
        street: street.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        zip_code: zip.to_string(),
        country: "USA".to_string(),
    };

    let item = |id: &str, name: &str, image: &str, cents: i64, quantity: u32| OrderItem {
        product_id: id.to_string(),
        product_name: name.to_string(),
        product_image: image.to_string(),
        price: Decimal::new(cents, 2),
        quantity,
        total: Decimal::new(cents * i64::from(quantity), 2),
    };

    let samples = vec![
        Order {
            id: String::new(),
            user_id: user_id.to_string(),
            items: vec![
                item(
                    "sample-1",
                    "Classic Grey Hooded Sweatshirt",
                    "https://i.imgur.com/R2PN9Wq.jpeg",
                    90_00,
                    1,
                ),
                item(
                    "sample-2",
                    "Classic Black T-Shirt",
                    "https://i.imgur.com/9DqEOV5.jpeg",
                    35_00,
                    2,
                ),
            ],
            total_amount: Decimal::new(160_00, 2),
            status: OrderStatus::Delivered,
            order_date: now - Duration::days(10),
            delivery_date: Some(now - Duration::days(3)),
            shipping_address: address("123 Main St", "San Francisco", "CA", "94105"),
        },
        Order {
            id: String::new(),
            user_id: user_id.to_string(),
            items: vec![item(
                "sample-3",
                "Sleek Wireless Headphone & Inked Earbud Set",
                "https://i.imgur.com/yVeIeDa.jpeg",
                44_00,
                1,
            )],
            total_amount: Decimal::new(44_00, 2),
            status: OrderStatus::Shipped,
            order_date: now - Duration::days(3),
            delivery_date: Some(now + Duration::days(2)),
            shipping_address: address("456 Oak Ave", "Los Angeles", "CA", "90210"),
        },
        Order {
            id: String::new(),
            user_id: user_id.to_string(),
            items: vec![item(
                "sample-4",
                "Vibrant Pink Classic Sneakers",
                "https://i.imgur.com/mcW42Gi.jpeg",
                84_00,
                1,
            )],
            total_amount: Decimal::new(84_00, 2),
            status: OrderStatus::Pending,
            order_date: now,
            delivery_date: Some(now + Duration::days(7)),
            shipping_address: address("789 Pine St", "Seattle", "WA", "98101"),
        },
    ];

    for order in &samples {
        let id = client.create(collections::ORDERS, encode(order)?).await?;
        info!(order_id = %id, status = %order.status, "Sample order created");
    }

    info!(count = samples.len(), user_id, "Sample orders created");
    Ok(())
}
