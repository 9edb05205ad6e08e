use crate::document::Document;
use crate::errors::AppError;
use crate::models::{
    Customer, CustomerChanges, CustomerDraft, CustomerFilter, CustomerPage, CustomerUpdate,
    NewCustomer,
};
use crate::repository::CustomerRepository;
use std::sync::Arc;

/// Customer registry: validates input, then delegates to the storage backend.
///
/// Document validation and field checks always run before any storage call,
/// so a rejected request never writes anything.
#[derive(Clone)]
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository>,
}

impl CustomerService {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self { repository }
    }

    /// Registers a new customer.
    ///
    /// # Errors
    ///
    /// * `BadRequest` - invalid document or blank legal name.
    /// * `Conflict` - a customer with the same document already exists.
    pub async fn create(&self, payload: NewCustomer) -> Result<Customer, AppError> {
        let document = parse_document(&payload.document)?;

        if payload.legal_name.trim().is_empty() {
            return Err(AppError::BadRequest("legal_name cannot be empty".to_string()));
        }

        if self.repository.find_by_document(&document).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Customer with document {} already exists",
                document
            )));
        }

        tracing::info!("Registering {} {}", document.kind(), document);
        self.repository
            .create(&CustomerDraft {
                document,
                legal_name: payload.legal_name,
                blocklisted: payload.blocklisted,
            })
            .await
    }

    /// Lists customers ordered by legal name.
    ///
    /// A filter matching no record at all is reported as `NotFound`; a page
    /// past the end of a non-empty result is returned empty.
    pub async fn list(
        &self,
        legal_name: Option<String>,
        page: u32,
        limit: u32,
    ) -> Result<CustomerPage, AppError> {
        if page < 1 {
            return Err(AppError::BadRequest("page must be at least 1".to_string()));
        }
        if limit < 1 {
            return Err(AppError::BadRequest("limit must be at least 1".to_string()));
        }

        let filter = CustomerFilter {
            legal_name: legal_name.filter(|name| !name.is_empty()),
            page,
            limit,
        };
        let (customers, total) = self.repository.list(&filter).await?;

        if total == 0 {
            return Err(AppError::NotFound(
                "No customers found matching the given legal name".to_string(),
            ));
        }

        Ok(CustomerPage {
            customers,
            total,
            page,
            limit,
        })
    }

    pub async fn get(&self, raw_document: &str) -> Result<Customer, AppError> {
        let document = parse_document(raw_document)?;
        self.repository
            .find_by_document(&document)
            .await?
            .ok_or_else(|| not_found(&document))
    }

    /// Applies a partial update. Only fields present in `update` are changed;
    /// a blank `legal_name` keeps the stored one.
    pub async fn update(
        &self,
        raw_document: &str,
        update: CustomerUpdate,
    ) -> Result<Customer, AppError> {
        let document = parse_document(raw_document)?;
        let changes = CustomerChanges::from(update);

        if changes.is_empty() {
            tracing::debug!("Update for {} carries no applicable changes", document);
        }

        self.repository
            .update(&document, &changes)
            .await?
            .ok_or_else(|| not_found(&document))
    }

    pub async fn delete(&self, raw_document: &str) -> Result<(), AppError> {
        let document = parse_document(raw_document)?;
        if self.repository.delete_by_document(&document).await? {
            tracing::info!("Deleted customer {}", document);
            Ok(())
        } else {
            Err(not_found(&document))
        }
    }
}

fn parse_document(raw: &str) -> Result<Document, AppError> {
    Document::parse(raw).ok_or_else(|| {
        tracing::debug!("Rejected invalid document: {:?}", raw);
        AppError::BadRequest("Invalid document".to_string())
    })
}

fn not_found(document: &Document) -> AppError {
    AppError::NotFound(format!("Customer with document {} not found", document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_storage::MemoryCustomerRepository;

    fn service() -> (CustomerService, Arc<MemoryCustomerRepository>) {
        let repo = Arc::new(MemoryCustomerRepository::new());
        (CustomerService::new(repo.clone()), repo)
    }

    fn new_customer(document: &str, legal_name: &str) -> NewCustomer {
        NewCustomer {
            document: document.to_string(),
            legal_name: legal_name.to_string(),
            blocklisted: false,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let (service, _) = service();
        let created = service
            .create(new_customer("529.982.247-25", "João Silva"))
            .await
            .unwrap();
        assert_eq!(created.document, "52998224725");

        let fetched = service.get("52998224725").await.unwrap();
        assert_eq!(fetched.document, created.document);
        assert_eq!(fetched.legal_name, "João Silva");
        assert!(!fetched.blocklisted);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_without_writing() {
        let (service, repo) = service();

        let err = service
            .create(new_customer("52998224726", "João Silva"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = service
            .create(new_customer("52998224725", "   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        assert!(repo.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_create_conflicts() {
        let (service, repo) = service();
        service
            .create(new_customer("33000167000101", "Empresa XYZ"))
            .await
            .unwrap();

        let err = service
            .create(new_customer("33.000.167/0001-01", "Empresa XYZ"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(repo.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_errors() {
        let (service, _) = service();
        assert!(matches!(
            service.get("123").await.unwrap_err(),
            AppError::BadRequest(_)
        ));
        assert!(matches!(
            service.get("52998224725").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_update_blank_name_preserved_and_blocklist_applied() {
        let (service, _) = service();
        service
            .create(new_customer("52998224725", "João Silva"))
            .await
            .unwrap();

        let updated = service
            .update(
                "52998224725",
                CustomerUpdate {
                    legal_name: Some(" ".to_string()),
                    blocklisted: Some(true),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.legal_name, "João Silva");
        assert!(updated.blocklisted);

        let fetched = service.get("52998224725").await.unwrap();
        assert!(fetched.blocklisted);

        let renamed = service
            .update(
                "529.982.247-25",
                CustomerUpdate {
                    legal_name: Some("João Silva ME".to_string()),
                    blocklisted: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.legal_name, "João Silva ME");
        assert!(renamed.blocklisted);
    }

    #[tokio::test]
    async fn test_update_missing_customer_is_not_found() {
        let (service, _) = service();
        let err = service
            .update("52998224725", CustomerUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service
            .update("00000000000", CustomerUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let (service, repo) = service();
        service
            .create(new_customer("52998224725", "João Silva"))
            .await
            .unwrap();

        service.delete("529.982.247-25").await.unwrap();
        assert!(repo.is_empty().unwrap());

        assert!(matches!(
            service.delete("52998224725").await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            service.delete("5299822472").await.unwrap_err(),
            AppError::BadRequest(_)
        ));
    }

    #[tokio::test]
    async fn test_list_pagination_and_filter() {
        let (service, _) = service();
        service
            .create(new_customer("52998224725", "João Silva"))
            .await
            .unwrap();
        service
            .create(new_customer("33000167000101", "Empresa XYZ"))
            .await
            .unwrap();

        let page = service.list(None, 2, 1).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.customers.len(), 1);
        assert_eq!(page.customers[0].legal_name, "João Silva");

        let page = service.list(Some("empresa".to_string()), 1, 10).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.customers[0].document, "33000167000101");

        let page = service.list(None, 5, 10).await.unwrap();
        assert_eq!(page.total, 2);
        assert!(page.customers.is_empty());

        assert!(matches!(
            service
                .list(Some("inexistente".to_string()), 1, 10)
                .await
                .unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            service.list(None, 0, 10).await.unwrap_err(),
            AppError::BadRequest(_)
        ));
        assert!(matches!(
            service.list(None, 1, 0).await.unwrap_err(),
            AppError::BadRequest(_)
        ));
    }
}
