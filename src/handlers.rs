use crate::errors::AppError;
use crate::models::*;
use crate::request_counter::RequestCounter;
use crate::services::CustomerService;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Customer registry backed by the configured storage.
    pub customers: CustomerService,
    /// Requests received since startup, incremented by middleware.
    pub request_counter: Arc<RequestCounter>,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(customers: CustomerService) -> Self {
        Self {
            customers,
            request_counter: Arc::new(RequestCounter::new()),
            started_at: Instant::now(),
        }
    }
}

/// POST /customers
///
/// Registers a customer after validating its CPF/CNPJ.
#[utoipa::path(
    post,
    path = "/customers",
    tag = "customers",
    request_body = NewCustomer,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 400, description = "Invalid document or malformed body", body = ErrorResponse),
        (status = 409, description = "Customer already registered", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    )
)]
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewCustomer>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomerResponse>), AppError> {
    let Json(payload) = payload.map_err(bad_body)?;
    tracing::info!("POST /customers - document: {}", payload.document);

    let customer = state.customers.create(payload).await?;

    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// GET /customers
///
/// Paginated listing ordered by legal name, optionally filtered by a
/// case-insensitive legal name substring.
#[utoipa::path(
    get,
    path = "/customers",
    tag = "customers",
    params(ListCustomersParams),
    responses(
        (status = 200, description = "One page of customers", body = ListCustomersResponse),
        (status = 400, description = "Invalid pagination parameters", body = ErrorResponse),
        (status = 404, description = "No customer matches the filter", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    )
)]
pub async fn list_customers(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListCustomersParams>, QueryRejection>,
) -> Result<Json<ListCustomersResponse>, AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    tracing::info!("GET /customers - params: {:?}", params);

    let page = state
        .customers
        .list(
            params.legal_name,
            params.page.unwrap_or(DEFAULT_PAGE),
            params.limit.unwrap_or(DEFAULT_LIMIT),
        )
        .await?;

    Ok(Json(page.into()))
}

/// GET /customers/:document
#[utoipa::path(
    get,
    path = "/customers/{document}",
    tag = "customers",
    params(("document" = String, Path, description = "Customer CPF or CNPJ")),
    responses(
        (status = 200, description = "Customer found", body = CustomerResponse),
        (status = 400, description = "Invalid document", body = ErrorResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse)
    )
)]
pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(document): Path<String>,
) -> Result<Json<CustomerResponse>, AppError> {
    tracing::info!("GET /customers/{}", document);

    let customer = state.customers.get(&document).await?;

    Ok(Json(customer.into()))
}

/// PUT /customers/:document
///
/// Partial update: only `legal_name` and `blocklisted` values present in the
/// body are applied. A blank `legal_name` is ignored.
#[utoipa::path(
    put,
    path = "/customers/{document}",
    tag = "customers",
    params(("document" = String, Path, description = "Customer CPF or CNPJ")),
    request_body = CustomerUpdate,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 400, description = "Invalid document or malformed body", body = ErrorResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    )
)]
pub async fn update_customer(
    State(state): State<Arc<AppState>>,
    Path(document): Path<String>,
    payload: Result<Json<CustomerUpdate>, JsonRejection>,
) -> Result<Json<CustomerResponse>, AppError> {
    let Json(update) = payload.map_err(bad_body)?;
    tracing::info!("PUT /customers/{} - update: {:?}", document, update);

    let customer = state.customers.update(&document, update).await?;

    Ok(Json(customer.into()))
}

/// DELETE /customers/:document
#[utoipa::path(
    delete,
    path = "/customers/{document}",
    tag = "customers",
    params(("document" = String, Path, description = "Customer CPF or CNPJ")),
    responses(
        (status = 200, description = "Customer deleted", body = MessageResponse),
        (status = 400, description = "Invalid document", body = ErrorResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    )
)]
pub async fn delete_customer(
    State(state): State<Arc<AppState>>,
    Path(document): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    tracing::info!("DELETE /customers/{}", document);

    state.customers.delete(&document).await?;

    Ok(Json(MessageResponse {
        message: "Customer deleted successfully".to_string(),
    }))
}

/// GET /status
///
/// Uptime and number of requests served since startup.
#[utoipa::path(
    get,
    path = "/status",
    tag = "status",
    responses(
        (status = 200, description = "Server status", body = StatusResponse)
    )
)]
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        uptime_seconds: state.started_at.elapsed().as_secs_f64(),
        request_count: state.request_counter.get(),
    })
}

fn bad_body(rejection: JsonRejection) -> AppError {
    tracing::warn!("Rejected request body: {}", rejection.body_text());
    AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
}
