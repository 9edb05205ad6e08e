use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};

pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(options: PgConnectOptions, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Creates the `customers` table when it does not exist yet.
    pub async fn ensure_customers_table(&self) -> anyhow::Result<()> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT FROM pg_tables WHERE schemaname = current_schema() AND tablename = 'customers')",
        )
        .fetch_one(&self.pool)
        .await?;

        if exists {
            tracing::info!("Customers table already exists");
            return Ok(());
        }

        tracing::info!("Customers table not found, creating it");
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS customers (
                document    VARCHAR(14) PRIMARY KEY,
                legal_name  TEXT        NOT NULL CHECK (btrim(legal_name) <> ''),
                blocklisted BOOLEAN     NOT NULL DEFAULT FALSE,
                created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        tracing::info!("Customers table created");

        Ok(())
    }
}
