//! Seeded random row generation.
//!
//! All randomness lives here, behind a seeded RNG, so that a fixed seed and a
//! fixed product pool produce a fully deterministic set of row drafts. The
//! executors in [`crate::insert`] turn drafts into INSERT statements.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::time::Duration;

/// Number of products seeded when the product table is empty at startup.
pub const SEED_PRODUCT_COUNT: usize = 10;

/// Maximum number of distinct products per order.
pub const MAX_ORDER_ITEMS: usize = 3;

/// Maximum quantity per order item.
pub const MAX_ITEM_QUANTITY: i32 = 5;

/// Probability of inserting a product on any given iteration.
const PRODUCT_PROBABILITY: f64 = 0.2;

const FIRST_NAMES: &[&str] = &["John", "Jane", "Bob", "Alice", "Charlie", "Diana"];
const LAST_NAMES: &[&str] = &["Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia"];

const PRODUCT_NAMES: &[&str] = &[
    "Laptop",
    "Smartphone",
    "Headphones",
    "Monitor",
    "Keyboard",
    "Mouse",
    "Tablet",
    "Webcam",
    "Printer",
    "Router",
    "Speaker",
    "Microphone",
];

const PRODUCT_CATEGORIES: &[&str] = &["electronics", "accessories", "office", "networking"];

const PRODUCT_ADJECTIVES: &[&str] = &["Compact", "Wireless", "Ergonomic", "Portable", "Premium"];

const ORDER_STATUSES: &[&str] = &["pending", "processing", "shipped", "delivered"];

/// Customer row draft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Product row draft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
}

/// An existing product as seen by order generation: its id and current price.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProductRef {
    pub id: i32,
    pub price: Decimal,
}

/// Order item draft. `unit_price` captures the product price at draft time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderItemDraft {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Order row draft plus its items. Inserted atomically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderDraft {
    pub status: String,
    pub total_amount: Decimal,
    pub items: Vec<OrderItemDraft>,
}

/// Row generator backed by a seeded RNG for reproducible output.
pub struct RowGenerator {
    rng: StdRng,
}

impl RowGenerator {
    /// Create a generator with a fixed seed (same seed = same rows).
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Draw a customer; the email is derived from the chosen names.
    pub fn customer(&mut self) -> NewCustomer {
        let first_name = self.pick(FIRST_NAMES);
        let last_name = self.pick(LAST_NAMES);
        let email = format!(
            "{}.{}@example.com",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        );

        NewCustomer {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email,
        }
    }

    /// Draw a product with a price uniform in [50, 1500] at 2 decimal places.
    pub fn product(&mut self) -> NewProduct {
        let adjective = self.pick(PRODUCT_ADJECTIVES);
        let name = self.pick(PRODUCT_NAMES);
        let category = self.pick(PRODUCT_CATEGORIES);

        // Draw whole cents so the price is exact at scale 2.
        let cents: i64 = self.rng.gen_range(5_000..=150_000);

        NewProduct {
            name: format!("{adjective} {name}"),
            description: format!("{adjective} {name} ({category})"),
            price: Decimal::new(cents, 2),
            category: category.to_string(),
        }
    }

    /// Draw the initial product batch inserted when the table is empty.
    pub fn seed_products(&mut self) -> Vec<NewProduct> {
        (0..SEED_PRODUCT_COUNT).map(|_| self.product()).collect()
    }

    /// Draft an order over 1..=3 distinct products from the given pool.
    ///
    /// Returns `None` when the pool is empty. `total_amount` is the sum of
    /// quantity times the pool price of each chosen product.
    pub fn order(&mut self, products: &[ProductRef]) -> Option<OrderDraft> {
        if products.is_empty() {
            return None;
        }

        let item_count = self
            .rng
            .gen_range(1..=MAX_ORDER_ITEMS)
            .min(products.len());

        let items: Vec<OrderItemDraft> = products
            .choose_multiple(&mut self.rng, item_count)
            .map(|product| OrderItemDraft {
                product_id: product.id,
                quantity: self.rng.gen_range(1..=MAX_ITEM_QUANTITY),
                unit_price: product.price,
            })
            .collect();

        let total_amount = items
            .iter()
            .map(|item| item.unit_price * Decimal::from(item.quantity))
            .sum();

        let status = self.pick(ORDER_STATUSES).to_string();

        Some(OrderDraft {
            status,
            total_amount,
            items,
        })
    }

    /// Roll the per-iteration product insert (20% probability).
    pub fn should_generate_product(&mut self) -> bool {
        self.rng.gen_bool(PRODUCT_PROBABILITY)
    }

    /// Draw a pause uniform in `[min_secs, max_secs]`.
    pub fn pause(&mut self, min_secs: u64, max_secs: u64) -> Duration {
        let secs = self.rng.gen_range(min_secs as f64..=max_secs as f64);
        Duration::from_secs_f64(secs)
    }

    fn pick(&mut self, pool: &'static [&'static str]) -> &'static str {
        pool[self.rng.gen_range(0..pool.len())]
    }
}
