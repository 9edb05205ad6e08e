use crate::document::Document;
use crate::errors::AppError;
use crate::models::{Customer, CustomerChanges, CustomerDraft, CustomerFilter};
use crate::repository::CustomerRepository;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory customer storage keyed by document.
#[derive(Debug, Default)]
pub struct MemoryCustomerRepository {
    inner: RwLock<BTreeMap<String, Customer>>,
}

impl MemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored customers.
    pub fn len(&self) -> Result<usize, AppError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, Customer>>, AppError> {
        self.inner
            .read()
            .map_err(|e| AppError::InternalError(format!("Lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, Customer>>, AppError> {
        self.inner
            .write()
            .map_err(|e| AppError::InternalError(format!("Lock: {}", e)))
    }
}

#[async_trait]
impl CustomerRepository for MemoryCustomerRepository {
    async fn create(&self, customer: &CustomerDraft) -> Result<Customer, AppError> {
        let mut store = self.write()?;
        let key = customer.document.as_str();

        if store.contains_key(key) {
            return Err(AppError::Conflict(format!(
                "Customer with document {} already exists",
                key
            )));
        }

        let now = Utc::now();
        let record = Customer {
            document: key.to_string(),
            legal_name: customer.legal_name.clone(),
            blocklisted: customer.blocklisted,
            created_at: now,
            updated_at: now,
        };
        store.insert(record.document.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_document(&self, document: &Document) -> Result<Option<Customer>, AppError> {
        Ok(self.read()?.get(document.as_str()).cloned())
    }

    async fn update(
        &self,
        document: &Document,
        changes: &CustomerChanges,
    ) -> Result<Option<Customer>, AppError> {
        let mut store = self.write()?;
        let Some(customer) = store.get_mut(document.as_str()) else {
            return Ok(None);
        };

        if let Some(legal_name) = &changes.legal_name {
            customer.legal_name = legal_name.clone();
        }
        if let Some(blocklisted) = changes.blocklisted {
            customer.blocklisted = blocklisted;
        }
        customer.updated_at = Utc::now();

        Ok(Some(customer.clone()))
    }

    async fn delete_by_document(&self, document: &Document) -> Result<bool, AppError> {
        Ok(self.write()?.remove(document.as_str()).is_some())
    }

    async fn list(&self, filter: &CustomerFilter) -> Result<(Vec<Customer>, i64), AppError> {
        let store = self.read()?;

        let mut matching: Vec<&Customer> = store
            .values()
            .filter(|c| filter.matches(&c.legal_name))
            .collect();
        matching.sort_by(|a, b| {
            a.legal_name
                .cmp(&b.legal_name)
                .then_with(|| a.document.cmp(&b.document))
        });

        let total = matching.len() as i64;
        let offset = usize::try_from(filter.offset()).unwrap_or(usize::MAX);
        let page = matching
            .into_iter()
            .skip(offset)
            .take(filter.limit as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }
}
