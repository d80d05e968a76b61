//! INSERT executors.
//!
//! Each function acquires its own connection, performs one logical operation,
//! and releases the connection on return. Orders and their items are written
//! inside a single transaction so a failed item insert rolls back the whole
//! order.

use crate::config::Config;
use crate::connect::connect;
use crate::error::DatagenError;
use crate::generate::{NewCustomer, NewProduct, OrderDraft, ProductRef};
use tracing::debug;

/// Insert one customer and return its generated id.
pub async fn insert_customer(config: &Config, customer: &NewCustomer) -> Result<i32, DatagenError> {
    let client = connect(&config.connection_string()).await?;

    let row = client
        .query_one(
            "INSERT INTO customers (first_name, last_name, email) \
             VALUES ($1, $2, $3) RETURNING id",
            &[&customer.first_name, &customer.last_name, &customer.email],
        )
        .await?;

    Ok(row.get(0))
}

/// Insert one product and return its generated id.
pub async fn insert_product(config: &Config, product: &NewProduct) -> Result<i32, DatagenError> {
    let client = connect(&config.connection_string()).await?;

    let row = client
        .query_one(
            "INSERT INTO products (name, description, price, category) \
             VALUES ($1, $2, $3, $4) RETURNING id",
            &[
                &product.name,
                &product.description,
                &product.price,
                &product.category,
            ],
        )
        .await?;

    Ok(row.get(0))
}

/// Insert the initial product batch atomically.
pub async fn insert_seed_products(
    config: &Config,
    products: &[NewProduct],
) -> Result<(), DatagenError> {
    let mut client = connect(&config.connection_string()).await?;
    let txn = client.transaction().await?;

    for product in products {
        txn.execute(
            "INSERT INTO products (name, description, price, category) \
             VALUES ($1, $2, $3, $4)",
            &[
                &product.name,
                &product.description,
                &product.price,
                &product.category,
            ],
        )
        .await?;
    }

    txn.commit().await?;
    Ok(())
}

/// Insert an order and all of its items in one transaction; return the order id.
pub async fn insert_order(
    config: &Config,
    customer_id: i32,
    order: &OrderDraft,
) -> Result<i32, DatagenError> {
    let mut client = connect(&config.connection_string()).await?;
    let txn = client.transaction().await?;

    let row = txn
        .query_one(
            "INSERT INTO orders (customer_id, status, total_amount) \
             VALUES ($1, $2, $3) RETURNING id",
            &[&customer_id, &order.status, &order.total_amount],
        )
        .await?;
    let order_id: i32 = row.get(0);

    for item in &order.items {
        txn.execute(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price) \
             VALUES ($1, $2, $3, $4)",
            &[&order_id, &item.product_id, &item.quantity, &item.unit_price],
        )
        .await?;
    }

    txn.commit().await?;
    debug!("Committed order {} with {} items", order_id, order.items.len());

    Ok(order_id)
}

/// Fetch the current product pool (ids with their current prices).
pub async fn product_refs(config: &Config) -> Result<Vec<ProductRef>, DatagenError> {
    let client = connect(&config.connection_string()).await?;

    let rows = client
        .query("SELECT id, price FROM products ORDER BY id", &[])
        .await?;

    Ok(rows
        .iter()
        .map(|row| ProductRef {
            id: row.get(0),
            price: row.get(1),
        })
        .collect())
}

/// Count existing products, used to decide whether to seed at startup.
pub async fn product_count(config: &Config) -> Result<i64, DatagenError> {
    let client = connect(&config.connection_string()).await?;
    let row = client.query_one("SELECT COUNT(*) FROM products", &[]).await?;
    Ok(row.get(0))
}
