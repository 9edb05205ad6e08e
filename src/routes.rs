use crate::handlers::{self, AppState};
use crate::openapi::ApiDoc;
use crate::request_counter::{count_requests, RequestCounter};
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the application routes with the request counter applied.
///
/// Transport layers (tracing, CORS, rate limiting) are added by the binary.
pub fn build_router(state: Arc<AppState>) -> Router {
    let counter = state.request_counter.clone();
    with_request_counter(api_routes(state), counter)
}

/// Customer CRUD, status and API docs, without request counting.
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/customers",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/customers/:document",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route("/status", get(handlers::status))
        // API Documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

/// Counts every request reaching `router`, including unknown routes and
/// responses produced by layers already applied to it.
pub fn with_request_counter(router: Router, counter: Arc<RequestCounter>) -> Router {
    router.layer(middleware::from_fn_with_state(counter, count_requests))
}
