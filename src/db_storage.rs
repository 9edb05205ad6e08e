use crate::document::Document;
use crate::errors::{AppError, ResultExt};
use crate::models::{Customer, CustomerChanges, CustomerDraft, CustomerFilter};
use crate::repository::CustomerRepository;
use async_trait::async_trait;
use sqlx::PgPool;

/// PostgreSQL storage for customers (`customers` table, see `db::ensure_customers_table`).
#[derive(Clone)]
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Shared by COUNT and page queries; $1 is the optional legal name filter.
// strpos instead of LIKE so user input never acts as a wildcard.
const FILTER_CLAUSE: &str =
    "($1::text IS NULL OR strpos(lower(legal_name), lower($1::text)) > 0)";

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn create(&self, customer: &CustomerDraft) -> Result<Customer, AppError> {
        let result = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (document, legal_name, blocklisted)
            VALUES ($1, $2, $3)
            RETURNING document, legal_name, blocklisted, created_at, updated_at
            "#,
        )
        .bind(customer.document.as_str())
        .bind(&customer.legal_name)
        .bind(customer.blocklisted)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(created) => Ok(created),
            // Lost a race with a concurrent insert of the same document
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::Conflict(format!(
                    "Customer with document {} already exists",
                    customer.document
                )))
            }
            Err(e) => Err(e).context(format!("inserting customer {}", customer.document)),
        }
    }

    async fn find_by_document(&self, document: &Document) -> Result<Option<Customer>, AppError> {
        sqlx::query_as::<_, Customer>(
            r#"
            SELECT document, legal_name, blocklisted, created_at, updated_at
            FROM customers
            WHERE document = $1
            "#,
        )
        .bind(document.as_str())
        .fetch_optional(&self.pool)
        .await
        .context(format!("loading customer {}", document))
    }

    async fn update(
        &self,
        document: &Document,
        changes: &CustomerChanges,
    ) -> Result<Option<Customer>, AppError> {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET legal_name = COALESCE($2, legal_name),
                blocklisted = COALESCE($3, blocklisted),
                updated_at = now()
            WHERE document = $1
            RETURNING document, legal_name, blocklisted, created_at, updated_at
            "#,
        )
        .bind(document.as_str())
        .bind(changes.legal_name.as_deref())
        .bind(changes.blocklisted)
        .fetch_optional(&self.pool)
        .await
        .context(format!("updating customer {}", document))
    }

    async fn delete_by_document(&self, document: &Document) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE document = $1")
            .bind(document.as_str())
            .execute(&self.pool)
            .await
            .context(format!("deleting customer {}", document))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: &CustomerFilter) -> Result<(Vec<Customer>, i64), AppError> {
        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM customers WHERE {}", FILTER_CLAUSE))
                .bind(filter.legal_name.as_deref())
                .fetch_one(&self.pool)
                .await
                .context("counting customers")?;

        let customers = sqlx::query_as::<_, Customer>(&format!(
            r#"
            SELECT document, legal_name, blocklisted, created_at, updated_at
            FROM customers
            WHERE {}
            ORDER BY legal_name COLLATE "C" ASC, document ASC
            LIMIT $2 OFFSET $3
            "#,
            FILTER_CLAUSE
        ))
        .bind(filter.legal_name.as_deref())
        .bind(i64::from(filter.limit))
        .bind(i64::try_from(filter.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .context("listing customers")?;

        Ok((customers, total))
    }
}
