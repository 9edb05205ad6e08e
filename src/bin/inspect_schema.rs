//! Utility to inspect the `customers` table and print its columns.

use rust_clientes_api::config::Config;
use rust_clientes_api::db::Database;

/// Connects to the configured database and lists the columns of `customers`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let db = Database::new(config.database.connect_options()?, 1).await?;

    let columns: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT column_name, data_type, is_nullable FROM information_schema.columns WHERE table_name = 'customers' ORDER BY ordinal_position",
    )
    .fetch_all(&db.pool)
    .await?;

    if columns.is_empty() {
        println!("Table 'customers' not found. It is created on server startup.");
        return Ok(());
    }

    println!("customers");
    for (column, data_type, nullable) in columns {
        println!("  - {}: {} (nullable: {})", column, data_type, nullable);
    }

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
        .fetch_one(&db.pool)
        .await?;
    println!("{} row(s)", count);

    Ok(())
}
