use crate::handlers;
use crate::models::{
    CustomerResponse, CustomerUpdate, ErrorResponse, ListCustomersResponse, MessageResponse,
    NewCustomer, StatusResponse,
};
use utoipa::OpenApi;

/// OpenAPI document for the customer registry, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Clientes API",
        description = "Registry of customers identified by CPF or CNPJ"
    ),
    paths(
        handlers::create_customer,
        handlers::list_customers,
        handlers::get_customer,
        handlers::update_customer,
        handlers::delete_customer,
        handlers::status,
    ),
    components(schemas(
        NewCustomer,
        CustomerUpdate,
        CustomerResponse,
        ListCustomersResponse,
        StatusResponse,
        MessageResponse,
        ErrorResponse,
    )),
    tags(
        (name = "customers", description = "Customer registry operations"),
        (name = "status", description = "Server status")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_all_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/customers", "/customers/{document}", "/status"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
