use crate::document::Document;
use crate::errors::AppError;
use crate::models::{Customer, CustomerChanges, CustomerDraft, CustomerFilter};
use async_trait::async_trait;

/// Storage capability for customers.
///
/// The registry service operates exclusively through this trait, enabling
/// pluggable backends (`PgCustomerRepository` for production,
/// `MemoryCustomerRepository` for tests and local runs).
///
/// Implementations must enforce uniqueness of `document` and maintain the
/// `created_at`/`updated_at` timestamps.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Inserts a new customer. Fails with `AppError::Conflict` if the document exists.
    async fn create(&self, customer: &CustomerDraft) -> Result<Customer, AppError>;

    async fn find_by_document(&self, document: &Document) -> Result<Option<Customer>, AppError>;

    /// Applies `changes` and returns the updated record, or `None` if absent.
    async fn update(
        &self,
        document: &Document,
        changes: &CustomerChanges,
    ) -> Result<Option<Customer>, AppError>;

    /// Returns whether a record was removed.
    async fn delete_by_document(&self, document: &Document) -> Result<bool, AppError>;

    /// One page ordered by `legal_name` ascending, plus the total count of
    /// records matching the filter.
    async fn list(&self, filter: &CustomerFilter) -> Result<(Vec<Customer>, i64), AppError>;
}
