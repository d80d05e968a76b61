//! End-to-end tests against a live PostgreSQL.
//!
//! These need a reachable server (connection settings via the usual
//! `POSTGRES_*` environment variables) and are ignored by default:
//!
//! ```bash
//! cargo test --test e2e_postgresql -- --ignored
//! ```

use clap::Parser;
use pg_datagen::{bootstrap, producer, Config, RowGenerator};
use rust_decimal::Decimal;
use tokio_postgres::NoTls;

/// Build a config for a throwaway database unique to this test.
fn test_config(test_name: &str, categories: &str) -> Config {
    let database = format!("pg_datagen_e2e_{}_{}", test_name, std::process::id());
    Config::try_parse_from([
        "pg-datagen",
        "--database",
        &database,
        "--categories",
        categories,
        "--seed",
        "42",
        "--max-retries",
        "2",
        "--retry-base-delay-secs",
        "1",
    ])
    .unwrap()
}

async fn admin_client(config: &Config) -> tokio_postgres::Client {
    let (client, connection) =
        tokio_postgres::connect(&config.admin_connection_string(), NoTls)
            .await
            .expect("admin connection failed");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("PostgreSQL connection error: {e}");
        }
    });
    client
}

async fn target_client(config: &Config) -> tokio_postgres::Client {
    let (client, connection) = tokio_postgres::connect(&config.connection_string(), NoTls)
        .await
        .expect("target connection failed");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("PostgreSQL connection error: {e}");
        }
    });
    client
}

async fn drop_test_database(config: &Config) {
    let admin = admin_client(config).await;
    admin
        .execute(
            &format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)", config.database),
            &[],
        )
        .await
        .expect("failed to drop test database");
}

async fn table_names(client: &tokio_postgres::Client) -> Vec<String> {
    client
        .query(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = 'public' ORDER BY table_name",
            &[],
        )
        .await
        .unwrap()
        .iter()
        .map(|row| row.get(0))
        .collect()
}

#[tokio::test]
#[ignore]
async fn test_bootstrap_is_idempotent() {
    let config = test_config("idempotent", "customers,orders,products");
    drop_test_database(&config).await;

    bootstrap::run(&config).await.expect("first bootstrap failed");
    bootstrap::run(&config).await.expect("second bootstrap failed");

    let client = target_client(&config).await;
    assert_eq!(
        table_names(&client).await,
        vec!["customers", "order_items", "orders", "products"]
    );

    drop(client);
    drop_test_database(&config).await;
}

#[tokio::test]
#[ignore]
async fn test_customers_only_creates_single_table() {
    let config = test_config("custonly", "customers");
    drop_test_database(&config).await;

    bootstrap::run(&config).await.expect("bootstrap failed");

    let client = target_client(&config).await;
    assert_eq!(table_names(&client).await, vec!["customers"]);

    drop(client);
    drop_test_database(&config).await;
}

#[tokio::test]
#[ignore]
async fn test_seed_products_inserted_before_first_customer() {
    let config = test_config("seeding", "customers,orders,products");
    drop_test_database(&config).await;

    bootstrap::run(&config).await.expect("bootstrap failed");

    // A shutdown message queued up-front stops the loop at the first
    // iteration boundary, after startup seeding has run.
    let (tx, rx) = tokio::sync::broadcast::channel(1);
    tx.send(()).unwrap();
    producer::run(&config, rx).await.expect("producer failed");

    let client = target_client(&config).await;
    let products: i64 = client
        .query_one("SELECT COUNT(*) FROM products", &[])
        .await
        .unwrap()
        .get(0);
    let customers: i64 = client
        .query_one("SELECT COUNT(*) FROM customers", &[])
        .await
        .unwrap()
        .get(0);

    assert_eq!(products, 10);
    assert_eq!(customers, 0);

    drop(client);
    drop_test_database(&config).await;
}

#[tokio::test]
#[ignore]
async fn test_iteration_preserves_order_total_invariant() {
    let config = test_config("totals", "customers,orders,products");
    drop_test_database(&config).await;

    bootstrap::run(&config).await.expect("bootstrap failed");

    let mut generator = RowGenerator::new(42);
    let seed_batch = generator.seed_products();
    pg_datagen::insert::insert_seed_products(&config, &seed_batch)
        .await
        .expect("seeding failed");

    for _ in 0..5 {
        producer::run_iteration(&config, &mut generator)
            .await
            .expect("iteration failed");
    }

    let client = target_client(&config).await;
    let rows = client
        .query(
            "SELECT o.total_amount, \
                    (SELECT COALESCE(SUM(i.quantity * i.unit_price), 0) \
                     FROM order_items i WHERE i.order_id = o.id) \
             FROM orders o",
            &[],
        )
        .await
        .unwrap();

    for row in &rows {
        let total: Decimal = row.get(0);
        let item_sum: Decimal = row.get(1);
        assert_eq!(total, item_sum);
    }

    let quantities = client
        .query("SELECT quantity FROM order_items", &[])
        .await
        .unwrap();
    for row in &quantities {
        let quantity: i32 = row.get(0);
        assert!((1..=5).contains(&quantity));
    }

    drop(client);
    drop_test_database(&config).await;
}
