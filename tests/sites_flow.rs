mod common;

use chrono::NaiveDate;
use grua_ops_api::{
    dto::{
        people::CreateClientRequest,
        sites::{
            CreateCraneRequest, CreateDocumentRequest, CreateLogbookEntryRequest,
            CreateSiteRequest, UpdateLogbookEntryRequest,
        },
    },
    error::AppError,
    middleware::auth::Role,
    routes::params::{LogbookQuery, SearchQuery, SiteQuery},
    services::{client_service, site_service},
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
}

#[tokio::test]
async fn site_crane_and_logbook_flow() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;
    let supervisor = common::create_user(&state, Role::Supervisor, "sup@grua.local").await?;
    let operator = common::create_user(&state, Role::Employee, "op@grua.local").await?;
    let colleague = common::create_user(&state, Role::Employee, "colega@grua.local").await?;
    let employee_id = common::create_employee(&state, Some(&operator), "João Pereira").await?;

    let client = client_service::create_client(
        &state,
        &supervisor,
        CreateClientRequest {
            name: "Construtora Horizonte".into(),
            cnpj: Some("12345678000190".into()),
            email: Some("contato@horizonte.local".into()),
            phone: None,
        },
    )
    .await?
    .data
    .unwrap();

    let duplicate = client_service::create_client(
        &state,
        &supervisor,
        CreateClientRequest {
            name: "Outra Construtora".into(),
            cnpj: Some("12345678000190".into()),
            email: None,
            phone: None,
        },
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let clients = client_service::list_clients(
        &state,
        SearchQuery {
            q: Some("horizonte".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(clients.items.len(), 1);

    let site_request = || CreateSiteRequest {
        name: "Residencial Jardim Sul".into(),
        client_id: Some(client.id),
        address: Some("Av. das Palmeiras, 1200".into()),
        city: Some("São Paulo".into()),
        state: Some("sp".into()),
        status: None,
    };
    let denied = site_service::create_site(&state, &operator, site_request()).await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    let site = site_service::create_site(&state, &supervisor, site_request())
        .await?
        .data
        .unwrap();
    assert_eq!(site.status, "Ativa");
    assert_eq!(site.state.as_deref(), Some("SP"));

    let found = site_service::list_sites(
        &state,
        SiteQuery {
            q: Some("jardim".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(found.items.len(), 1);

    let crane = site_service::create_crane(
        &state,
        &supervisor,
        site.id,
        CreateCraneRequest {
            name: "Grua 01".into(),
            model: Some("GT 250".into()),
            manufacturer: Some("Liebherr".into()),
            status: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(crane.status, "Operacional");

    site_service::create_document(
        &state,
        &supervisor,
        site.id,
        CreateDocumentRequest {
            title: "ART de montagem".into(),
            kind: "art".into(),
            storage_path: "sites/jardim-sul/art.pdf".into(),
        },
    )
    .await?;

    let checklist = site_service::create_logbook_entry(
        &state,
        &operator,
        crane.id,
        CreateLogbookEntryRequest {
            employee_id: Some(employee_id),
            entry_date: day(2),
            kind: "checklist".into(),
            description: "Checklist diário".into(),
            status: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(checklist.status, "ok");

    let bad_kind = site_service::create_logbook_entry(
        &state,
        &operator,
        crane.id,
        CreateLogbookEntryRequest {
            employee_id: None,
            entry_date: day(3),
            kind: "passeio".into(),
            description: "Tipo desconhecido".into(),
            status: None,
        },
    )
    .await;
    assert!(matches!(bad_kind, Err(AppError::BadRequest(_))));

    let issue = site_service::create_logbook_entry(
        &state,
        &operator,
        crane.id,
        CreateLogbookEntryRequest {
            employee_id: Some(employee_id),
            entry_date: day(5),
            kind: "ocorrencia".into(),
            description: "Ruído no redutor de giro".into(),
            status: Some("pendente".into()),
        },
    )
    .await?
    .data
    .unwrap();

    // Only the author or an approver may edit.
    let foreign = site_service::update_logbook_entry(
        &state,
        &colleague,
        issue.id,
        UpdateLogbookEntryRequest {
            employee_id: None,
            entry_date: None,
            kind: None,
            description: None,
            status: Some("resolvido".into()),
        },
    )
    .await;
    assert!(matches!(foreign, Err(AppError::Forbidden)));

    let resolved = site_service::update_logbook_entry(
        &state,
        &operator,
        issue.id,
        UpdateLogbookEntryRequest {
            employee_id: None,
            entry_date: None,
            kind: None,
            description: None,
            status: Some("resolvido".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(resolved.status, "resolvido");

    let ok_only = site_service::crane_logbook(
        &state,
        crane.id,
        LogbookQuery {
            status: Some("ok".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(ok_only.items.len(), 1);

    let stats = site_service::crane_logbook_stats(&state, crane.id)
        .await?
        .data
        .unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.last_entry_date, Some(day(5)));

    let detail = site_service::get_site(&state, site.id).await?.data.unwrap();
    assert_eq!(detail.crane_count, 1);
    assert_eq!(detail.document_count, 1);
    assert_eq!(detail.logbook_count, 2);

    let by_operator = site_service::delete_logbook_entry(&state, &operator, checklist.id).await;
    assert!(matches!(by_operator, Err(AppError::Forbidden)));
    site_service::delete_logbook_entry(&state, &supervisor, checklist.id).await?;

    let site_log = site_service::site_logbook(&state, site.id, LogbookQuery::default())
        .await?
        .data
        .unwrap();
    assert_eq!(site_log.items.len(), 1);

    Ok(())
}
