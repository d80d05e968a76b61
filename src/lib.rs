//! pg-datagen
//!
//! A synthetic e-commerce traffic generator for PostgreSQL, intended to feed
//! downstream change-data-capture and analytics pipelines with a steady
//! stream of INSERTs.
//!
//! # How it works
//!
//! - Bootstrap ensures the target database and the tables for each enabled
//!   category (`customers`, `products`, `orders`) exist, with bounded
//!   retries.
//! - The generator loop then inserts randomized customers, products, and
//!   orders until a termination signal arrives, sleeping a random interval
//!   between iterations.
//!
//! # CLI Usage
//!
//! ```bash
//! # Generate everything against a local PostgreSQL
//! pg-datagen --host localhost --database inventory
//!
//! # Customers only, reproducible rows
//! pg-datagen --categories customers --seed 42
//!
//! # Configuration also comes from the environment
//! POSTGRES_HOST=db TABLE_CATEGORIES=customers,products pg-datagen
//! ```

pub mod bootstrap;
pub mod config;
pub mod connect;
pub mod error;
pub mod generate;
pub mod insert;
pub mod producer;
pub mod retry;

pub use config::{Category, Config};
pub use error::DatagenError;
pub use generate::RowGenerator;
pub use retry::RetryPolicy;
