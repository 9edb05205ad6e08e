//! Prints the OpenAPI document of the service as pretty JSON.
//!
//! Usage: `cargo run --bin generate-openapi > openapi.json`

use rust_clientes_api::api::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
