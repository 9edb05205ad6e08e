use crate::document::Document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

// ============ Database Models ============

/// A registered customer, as stored in the `customers` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Customer {
    /// Normalized CPF (11 digits) or CNPJ (14 digits). Primary key.
    pub document: String,
    /// Individual name or business legal name ("razão social").
    pub legal_name: String,
    /// Whether the customer is on the blocklist.
    pub blocklisted: bool,
    /// Timestamp of creation.
    pub created_at: DateTime<Utc>,
    /// Timestamp of last update.
    pub updated_at: DateTime<Utc>,
}

/// A validated customer ready to be inserted.
#[derive(Debug, Clone)]
pub struct CustomerDraft {
    pub document: Document,
    pub legal_name: String,
    pub blocklisted: bool,
}

/// Field changes to apply to a stored customer. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerChanges {
    pub legal_name: Option<String>,
    pub blocklisted: Option<bool>,
}

impl CustomerChanges {
    pub fn is_empty(&self) -> bool {
        self.legal_name.is_none() && self.blocklisted.is_none()
    }
}

impl From<CustomerUpdate> for CustomerChanges {
    /// An empty or whitespace-only `legal_name` is ignored, never applied.
    fn from(update: CustomerUpdate) -> Self {
        Self {
            legal_name: update.legal_name.filter(|name| !name.trim().is_empty()),
            blocklisted: update.blocklisted,
        }
    }
}

/// Listing criteria handed to the storage layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerFilter {
    /// Case-insensitive substring of `legal_name`.
    pub legal_name: Option<String>,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl CustomerFilter {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// True when `legal_name` contains the filter, ignoring case.
    pub fn matches(&self, legal_name: &str) -> bool {
        match &self.legal_name {
            Some(filter) => legal_name
                .to_lowercase()
                .contains(&filter.to_lowercase()),
            None => true,
        }
    }
}

/// One page of customers plus the count of all matching records.
#[derive(Debug, Clone)]
pub struct CustomerPage {
    pub customers: Vec<Customer>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

// ============ API Request Models ============

/// Body of `POST /customers`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewCustomer {
    /// CPF or CNPJ, with or without punctuation.
    #[schema(example = "529.982.247-25")]
    pub document: String,
    #[schema(example = "João Silva")]
    pub legal_name: String,
    #[serde(default)]
    pub blocklisted: bool,
}

/// Body of `PUT /customers/{document}`. Absent and `null` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CustomerUpdate {
    #[schema(example = "João Silva ME")]
    pub legal_name: Option<String>,
    pub blocklisted: Option<bool>,
}

/// Query string of `GET /customers`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCustomersParams {
    /// Filter by legal name (case-insensitive substring).
    pub legal_name: Option<String>,
    /// Page number, starting at 1.
    #[param(default = 1, minimum = 1)]
    pub page: Option<u32>,
    /// Items per page.
    #[param(default = 10, minimum = 1)]
    pub limit: Option<u32>,
}

// ============ API Response Models ============

/// Public representation of a customer. Timestamps are not exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    #[schema(example = "52998224725")]
    pub document: String,
    #[schema(example = "João Silva")]
    pub legal_name: String,
    pub blocklisted: bool,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            document: customer.document,
            legal_name: customer.legal_name,
            blocklisted: customer.blocklisted,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListCustomersResponse {
    pub page: u32,
    pub limit: u32,
    /// Records matching the filter, before pagination.
    pub total: i64,
    pub customers: Vec<CustomerResponse>,
}

impl From<CustomerPage> for ListCustomersResponse {
    fn from(page: CustomerPage) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            total: page.total,
            customers: page.customers.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// Seconds since the server started.
    pub uptime_seconds: f64,
    /// Requests received since the server started.
    pub request_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
