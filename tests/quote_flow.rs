mod common;

use grua_ops_api::{
    dto::{people::CreateClientRequest, quotes::QuoteRequest},
    error::AppError,
    middleware::auth::Role,
    routes::params::QuoteQuery,
    services::{client_service, quote_service},
};
use serde_json::json;

// Draft with lines -> totals persisted -> update replaces lines and sends -> admin deletes.
#[tokio::test]
async fn quote_lifecycle_persists_computed_totals() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;
    let seller = common::create_user(&state, Role::Supervisor, "vendas@grua.local").await?;
    let admin = common::create_user(&state, Role::Admin, "admin@grua.local").await?;

    let client = client_service::create_client(
        &state,
        &seller,
        CreateClientRequest {
            name: "Construtora Horizonte".into(),
            cnpj: Some("12345678000190".into()),
            email: None,
            phone: None,
        },
    )
    .await?
    .data
    .unwrap();

    let draft: QuoteRequest = serde_json::from_value(json!({
        "kind": "locacao",
        "client_id": client.id,
        "lease_months": 13,
        "monthly_costs": [
            {
                "cost_type": "locacao",
                "description": "Locação da grua",
                "monthly_value": 1_500_000,
                "required": true
            }
        ],
        "fixed_values": [
            { "value_type": "art", "description": "ART", "quantity": 1, "unit_value": 50_000 }
        ],
        "complements": [
            { "sku": "SERV-004", "quantity": 1 }
        ]
    }))?;

    let created = quote_service::create_quote(&state, &seller, draft.clone())
        .await?
        .data
        .unwrap();
    assert!(created.quote.number.starts_with("ORC-"));
    assert_eq!(created.quote.status, "rascunho");
    assert_eq!(created.quote.total, 19_500_000 + 50_000 + 300_000);
    assert_eq!(created.monthly_costs[0].total, 19_500_000);
    assert_eq!(created.items[0].item_type, "servico");
    assert!(created.quote.valid_until > chrono::Utc::now().date_naive());

    // Sending without site and equipment is rejected.
    let incomplete = QuoteRequest {
        send: true,
        ..draft.clone()
    };
    let rejected = quote_service::update_quote(&state, &seller, created.quote.id, incomplete).await;
    assert!(matches!(rejected, Err(AppError::BadRequest(_))));

    let sent = QuoteRequest {
        send: true,
        site_name: Some("Residencial Jardim Sul".into()),
        equipment: Some("Grua GT 250".into()),
        fixed_values: Vec::new(),
        ..draft
    };
    let updated = quote_service::update_quote(&state, &seller, created.quote.id, sent)
        .await?
        .data
        .unwrap();
    assert_eq!(updated.quote.status, "enviado");
    assert_eq!(updated.quote.number, created.quote.number);
    assert!(updated.fixed_values.is_empty());
    assert_eq!(updated.quote.total, 19_800_000);

    let listed = quote_service::list_quotes(
        &state,
        QuoteQuery {
            status: Some("enviado".into()),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(listed.data.unwrap().items.len(), 1);

    let forbidden = quote_service::delete_quote(&state, &seller, created.quote.id).await;
    assert!(matches!(forbidden, Err(AppError::Forbidden)));
    quote_service::delete_quote(&state, &admin, created.quote.id).await?;
    let gone = quote_service::get_quote(&state, created.quote.id).await;
    assert!(matches!(gone, Err(AppError::NotFound)));

    Ok(())
}
