//! Idempotent database and schema bootstrap.
//!
//! Two steps, each retried independently: ensure the target database exists
//! (against the administrative database, autocommit since `CREATE DATABASE`
//! cannot run inside a transaction), then ensure all enabled tables exist
//! inside one transaction. Failure of either step after retry exhaustion is
//! fatal to startup.

use crate::config::{Category, Config};
use crate::connect::connect;
use crate::error::DatagenError;
use crate::retry::with_retries;
use tracing::{debug, info};

/// Run both bootstrap steps.
pub async fn run(config: &Config) -> Result<(), DatagenError> {
    let policy = config.retry_policy();

    with_retries("ensure database exists", &policy, || {
        ensure_database(config)
    })
    .await?;

    with_retries("ensure schema exists", &policy, || ensure_schema(config)).await?;

    Ok(())
}

/// Create the target database if it is absent.
async fn ensure_database(config: &Config) -> Result<(), DatagenError> {
    let client = connect(&config.admin_connection_string()).await?;

    let existing = client
        .query_opt(
            "SELECT 1 FROM pg_database WHERE datname = $1",
            &[&config.database],
        )
        .await?;

    if existing.is_some() {
        debug!("Database '{}' already exists", config.database);
        return Ok(());
    }

    // The database name is a trusted identifier from configuration, not user
    // input, so quoting it into DDL is acceptable here.
    client
        .execute(&format!("CREATE DATABASE \"{}\"", config.database), &[])
        .await?;
    info!("Created database '{}'", config.database);

    Ok(())
}

/// Create all enabled tables inside a single transaction. Any failure rolls
/// the whole DDL pass back.
async fn ensure_schema(config: &Config) -> Result<(), DatagenError> {
    let mut client = connect(&config.connection_string()).await?;
    let txn = client.transaction().await?;

    for (table, ddl) in table_ddl(&config.categories) {
        debug!("Ensuring table '{}' exists", table);
        txn.batch_execute(&ddl).await?;
    }

    txn.commit().await?;
    info!("Schema bootstrap complete for '{}'", config.database);

    Ok(())
}

/// DDL statements for the enabled categories, in dependency order.
///
/// Foreign-key clauses are emitted only when the referenced table's category
/// is enabled, so a reduced category set still bootstraps cleanly.
pub fn table_ddl(categories: &[Category]) -> Vec<(&'static str, String)> {
    let customers = categories.contains(&Category::Customers);
    let products = categories.contains(&Category::Products);
    let orders = categories.contains(&Category::Orders);

    let mut ddl = Vec::new();

    if customers {
        ddl.push((
            "customers",
            "CREATE TABLE IF NOT EXISTS customers (
                id SERIAL PRIMARY KEY,
                first_name VARCHAR(255) NOT NULL,
                last_name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )"
            .to_string(),
        ));
    }

    if products {
        ddl.push((
            "products",
            "CREATE TABLE IF NOT EXISTS products (
                id SERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                description TEXT,
                price NUMERIC(10, 2) NOT NULL CHECK (price > 0),
                category VARCHAR(100),
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )"
            .to_string(),
        ));
    }

    if orders {
        let customer_ref = if customers {
            " REFERENCES customers(id) ON DELETE SET NULL"
        } else {
            ""
        };
        ddl.push((
            "orders",
            format!(
                "CREATE TABLE IF NOT EXISTS orders (
                id SERIAL PRIMARY KEY,
                customer_id INTEGER{customer_ref},
                order_date TIMESTAMPTZ NOT NULL DEFAULT now(),
                status VARCHAR(50) NOT NULL,
                total_amount NUMERIC(10, 2) NOT NULL
            )"
            ),
        ));

        let product_ref = if products {
            " REFERENCES products(id) ON DELETE SET NULL"
        } else {
            ""
        };
        ddl.push((
            "order_items",
            format!(
                "CREATE TABLE IF NOT EXISTS order_items (
                id SERIAL PRIMARY KEY,
                order_id INTEGER NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
                product_id INTEGER{product_ref},
                quantity INTEGER NOT NULL CHECK (quantity >= 1),
                unit_price NUMERIC(10, 2) NOT NULL
            )"
            ),
        ));
    }

    ddl
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customers_only_creates_single_table() {
        let ddl = table_ddl(&[Category::Customers]);
        let tables: Vec<_> = ddl.iter().map(|(t, _)| *t).collect();
        assert_eq!(tables, vec!["customers"]);
    }

    #[test]
    fn test_all_categories_create_four_tables() {
        let ddl = table_ddl(&[Category::Customers, Category::Orders, Category::Products]);
        let tables: Vec<_> = ddl.iter().map(|(t, _)| *t).collect();
        assert_eq!(tables, vec!["customers", "products", "orders", "order_items"]);
    }

    #[test]
    fn test_ddl_is_idempotent_create() {
        for (_, sql) in table_ddl(&[Category::Customers, Category::Orders, Category::Products]) {
            assert!(sql.contains("CREATE TABLE IF NOT EXISTS"));
        }
    }

    #[test]
    fn test_foreign_keys_present_when_all_enabled() {
        let ddl = table_ddl(&[Category::Customers, Category::Orders, Category::Products]);
        let orders = &ddl.iter().find(|(t, _)| *t == "orders").unwrap().1;
        let items = &ddl.iter().find(|(t, _)| *t == "order_items").unwrap().1;

        assert!(orders.contains("REFERENCES customers(id) ON DELETE SET NULL"));
        assert!(items.contains("REFERENCES orders(id) ON DELETE CASCADE"));
        assert!(items.contains("REFERENCES products(id) ON DELETE SET NULL"));
    }

    #[test]
    fn test_foreign_keys_skipped_for_disabled_categories() {
        let ddl = table_ddl(&[Category::Orders]);
        let tables: Vec<_> = ddl.iter().map(|(t, _)| *t).collect();
        assert_eq!(tables, vec!["orders", "order_items"]);

        let orders = &ddl.iter().find(|(t, _)| *t == "orders").unwrap().1;
        let items = &ddl.iter().find(|(t, _)| *t == "order_items").unwrap().1;
        assert!(!orders.contains("REFERENCES customers"));
        assert!(!items.contains("REFERENCES products"));
        // The order -> order_items link is internal to the category
        assert!(items.contains("REFERENCES orders(id) ON DELETE CASCADE"));
    }

    #[test]
    fn test_constraints() {
        let ddl = table_ddl(&[Category::Products, Category::Orders]);
        let products = &ddl.iter().find(|(t, _)| *t == "products").unwrap().1;
        let items = &ddl.iter().find(|(t, _)| *t == "order_items").unwrap().1;

        assert!(products.contains("CHECK (price > 0)"));
        assert!(items.contains("CHECK (quantity >= 1)"));
    }
}
