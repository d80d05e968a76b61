//! The long-running generator loop.
//!
//! One logical task: per iteration it inserts a customer (and possibly an
//! order and a product, depending on enabled categories), then pauses for a
//! random interval. Errors inside an iteration are logged and followed by a
//! fixed recovery delay; they never terminate the loop. Shutdown is observed
//! at the top of each iteration, so shutdown latency is bounded by one
//! iteration plus one pause.

use crate::config::{Category, Config};
use crate::error::DatagenError;
use crate::generate::RowGenerator;
use crate::insert;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{error, info};

/// Fixed pause after a failed iteration. Distinct from the retry helper's
/// backoff: it never grows across iterations.
const RECOVERY_DELAY: Duration = Duration::from_secs(5);

/// Run the generator loop until a shutdown message arrives.
pub async fn run(
    config: &Config,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), DatagenError> {
    let mut generator = match config.seed {
        Some(seed) => RowGenerator::new(seed),
        None => RowGenerator::from_entropy(),
    };

    if config.category_enabled(Category::Products) {
        seed_products_if_empty(config, &mut generator).await?;
    }

    loop {
        if shutdown.try_recv().is_ok() {
            break;
        }

        match run_iteration(config, &mut generator).await {
            Ok(()) => {
                let pause = generator.pause(
                    config.insert_interval_min_secs,
                    config.insert_interval_max_secs,
                );
                tokio::time::sleep(pause).await;
            }
            Err(e) => {
                error!("Generator iteration failed: {e}. Continuing after recovery delay");
                tokio::time::sleep(RECOVERY_DELAY).await;
            }
        }
    }

    info!("Shutdown requested, generator loop stopped");
    Ok(())
}

/// Seed the initial product batch when no products exist yet, so order
/// generation has a non-empty pool. A partially-populated table is left
/// alone: there is no backfill below the seed count.
async fn seed_products_if_empty(
    config: &Config,
    generator: &mut RowGenerator,
) -> Result<(), DatagenError> {
    let count = insert::product_count(config).await?;
    if count > 0 {
        return Ok(());
    }

    let products = generator.seed_products();
    insert::insert_seed_products(config, &products).await?;
    info!("Seeded {} products", products.len());

    Ok(())
}

/// One pass of inserts. Any failure aborts the remainder of the iteration.
pub async fn run_iteration(
    config: &Config,
    generator: &mut RowGenerator,
) -> Result<(), DatagenError> {
    if config.category_enabled(Category::Customers) {
        let customer = generator.customer();
        let customer_id = insert::insert_customer(config, &customer).await?;
        info!(
            "Inserted customer {} ({} {})",
            customer_id, customer.first_name, customer.last_name
        );

        // Orders require a customer that was just inserted and a non-empty
        // product pool.
        if config.category_enabled(Category::Orders) && config.category_enabled(Category::Products)
        {
            let products = insert::product_refs(config).await?;
            if let Some(order) = generator.order(&products) {
                let order_id = insert::insert_order(config, customer_id, &order).await?;
                info!(
                    "Inserted order {} for customer {} ({} items, total {})",
                    order_id,
                    customer_id,
                    order.items.len(),
                    order.total_amount
                );
            }
        }
    }

    if config.category_enabled(Category::Products) && generator.should_generate_product() {
        let product = generator.product();
        let product_id = insert::insert_product(config, &product).await?;
        info!(
            "Inserted product {} ({}, {})",
            product_id, product.name, product.price
        );
    }

    Ok(())
}
