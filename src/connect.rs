//! Per-operation PostgreSQL connections.
//!
//! Every database operation acquires its own client and drops it when done;
//! there is no pooling or reuse across operations. Dropping the client ends
//! the spawned connection task.

use crate::error::DatagenError;
use tokio_postgres::{Client, NoTls};

/// Open a single connection and spawn its driver task.
pub async fn connect(connection_string: &str) -> Result<Client, DatagenError> {
    let (client, connection) = tokio_postgres::connect(connection_string, NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("PostgreSQL connection error: {e}");
        }
    });

    Ok(client)
}
