use std::env;
use std::str::FromStr;

use rust_clientes_api::db::Database;
use sqlx::postgres::PgConnectOptions;
use rust_clientes_api::db_storage::PgCustomerRepository;
use rust_clientes_api::document::Document;
use rust_clientes_api::errors::AppError;
use rust_clientes_api::models::{CustomerChanges, CustomerDraft, CustomerFilter};
use rust_clientes_api::repository::CustomerRepository;

async fn connect() -> anyhow::Result<PgCustomerRepository> {
    let db_url = env::var("TEST_DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("Set TEST_DATABASE_URL to run this test"))?;

    let db = Database::new(PgConnectOptions::from_str(&db_url)?, 2).await?;
    db.ensure_customers_table().await?;
    Ok(PgCustomerRepository::new(db.pool.clone()))
}

/// Integration smoke test for PostgreSQL customer storage.
/// Marked ignored to avoid running against production by accident; set TEST_DATABASE_URL to run.
/// Uses the CNPJ 11.222.333/0001-81 and removes it again.
#[tokio::test]
#[ignore]
async fn customer_storage_smoke_test() -> anyhow::Result<()> {
    let repo = connect().await?;

    let document = Document::parse("11.222.333/0001-81")
        .ok_or_else(|| anyhow::anyhow!("fixture document must be valid"))?;
    repo.delete_by_document(&document).await?;

    let draft = CustomerDraft {
        document: document.clone(),
        legal_name: "Storage Smoke Test LTDA".to_string(),
        blocklisted: false,
    };
    let created = repo.create(&draft).await?;
    assert_eq!(created.document, "11222333000181");

    let duplicate = repo.create(&draft).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let updated = repo
        .update(
            &document,
            &CustomerChanges {
                legal_name: None,
                blocklisted: Some(true),
            },
        )
        .await?
        .ok_or_else(|| anyhow::anyhow!("customer vanished"))?;
    assert_eq!(updated.legal_name, "Storage Smoke Test LTDA");
    assert!(updated.blocklisted);
    assert!(updated.updated_at >= created.updated_at);

    let (page, total) = repo
        .list(&CustomerFilter {
            legal_name: Some("smoke TEST".to_string()),
            page: 1,
            limit: 10,
        })
        .await?;
    assert!(total >= 1);
    assert!(page.iter().any(|c| c.document == "11222333000181"));

    assert!(repo.delete_by_document(&document).await?);
    assert!(repo.find_by_document(&document).await?.is_none());
    Ok(())
}

/// Listing order must not depend on the database locale: it matches the
/// in-memory backend's code point order.
#[tokio::test]
#[ignore]
async fn customer_listing_uses_code_point_order() -> anyhow::Result<()> {
    let repo = connect().await?;

    let fixtures = [
        ("52998224725", "collation check empresa"),
        ("11144477735", "Collation check Zeta"),
    ];
    let mut documents = Vec::new();
    for (raw, legal_name) in fixtures {
        let document =
            Document::parse(raw).ok_or_else(|| anyhow::anyhow!("fixture document must be valid"))?;
        repo.delete_by_document(&document).await?;
        repo.create(&CustomerDraft {
            document: document.clone(),
            legal_name: legal_name.to_string(),
            blocklisted: false,
        })
        .await?;
        documents.push(document);
    }

    let (page, _) = repo
        .list(&CustomerFilter {
            legal_name: Some("collation check".to_string()),
            page: 1,
            limit: 10,
        })
        .await?;
    let names: Vec<_> = page.iter().map(|c| c.legal_name.as_str()).collect();
    assert_eq!(names, vec!["Collation check Zeta", "collation check empresa"]);

    for document in &documents {
        repo.delete_by_document(document).await?;
    }
    Ok(())
}
