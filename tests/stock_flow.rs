mod common;

use grua_ops_api::{
    domain::stock::{MovementType, StockStatus},
    dto::stock::{CreateCategoryRequest, CreateMovementRequest, CreateProductRequest},
    error::AppError,
    middleware::auth::Role,
    routes::params::{MovementQuery, ProductQuery},
    services::stock_service,
};
use tokio::task::JoinSet;

// Category -> product with opening stock -> exit -> overdraw rejected -> alerts and CSV.
#[tokio::test]
async fn movements_update_levels_alerts_and_export() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;
    let supervisor = common::create_user(&state, Role::Supervisor, "sup@grua.local").await?;
    let operator = common::create_user(&state, Role::Employee, "op@grua.local").await?;

    let category = stock_service::create_category(
        &state,
        &supervisor,
        CreateCategoryRequest {
            name: "Cabos".into(),
            description: None,
            status: None,
        },
    )
    .await?
    .data
    .unwrap();

    let duplicate = stock_service::create_category(
        &state,
        &supervisor,
        CreateCategoryRequest {
            name: "Cabos".into(),
            description: None,
            status: None,
        },
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let forbidden = stock_service::create_product(
        &state,
        &operator,
        product_request(category.id, Some(10)),
    )
    .await;
    assert!(matches!(forbidden, Err(AppError::Forbidden)));

    let product = stock_service::create_product(
        &state,
        &supervisor,
        product_request(category.id, Some(200)),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(product.stock.available, 200);
    assert_eq!(product.stock.total_value, 200 * 4_500);
    assert_eq!(product.stock.status, StockStatus::Normal);

    let opening = stock_service::list_movements(
        &state,
        MovementQuery {
            product_id: Some(product.id),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(opening.data.unwrap().items.len(), 1);

    let exit = stock_service::record_movement(
        &state,
        &operator,
        CreateMovementRequest {
            product_id: product.id,
            movement_type: MovementType::Saida,
            quantity: 120,
            reason: "Montagem Grua 01".into(),
            notes: None,
            reference: Some("REQ-17".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(exit.movement.quantity_before, 200);
    assert_eq!(exit.movement.quantity_after, 80);
    assert_eq!(exit.product.stock.status, StockStatus::EstoqueBaixo);

    let overdraw = stock_service::record_movement(
        &state,
        &operator,
        CreateMovementRequest {
            product_id: product.id,
            movement_type: MovementType::Saida,
            quantity: 81,
            reason: "Excesso".into(),
            notes: None,
            reference: None,
        },
    )
    .await;
    assert!(matches!(overdraw, Err(AppError::BadRequest(_))));

    let low = stock_service::list_products(
        &state,
        ProductQuery {
            low_stock: true,
            ..Default::default()
        },
    )
    .await?;
    assert!(low.data.unwrap().items.iter().any(|p| p.id == product.id));

    let snapshot = state.stock_alerts.refresh(&state.orm).await?;
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].product_id, product.id);

    let export = stock_service::export_csv(&state).await?;
    assert!(export.filename.starts_with("estoque_"));
    assert_eq!(export.body.lines().count(), 2);
    assert!(export.body.contains("\"Cabo de aço, 12mm\""));

    let admin = common::create_user(&state, Role::Admin, "admin@grua.local").await?;
    let in_use = stock_service::delete_category(&state, &admin, category.id).await;
    assert!(matches!(in_use, Err(AppError::Conflict(_))));

    // Concurrent exits queue on the stock row: only what is available goes out.
    let shackle = stock_service::create_product(
        &state,
        &supervisor,
        CreateProductRequest {
            name: "Manilha 3/4".into(),
            ..product_request(category.id, Some(100))
        },
    )
    .await?
    .data
    .unwrap();

    let shackle_id = shackle.id;
    let mut exits = JoinSet::new();
    for n in 0..6 {
        let state = state.clone();
        let operator = operator.clone();
        exits.spawn(async move {
            stock_service::record_movement(
                &state,
                &operator,
                CreateMovementRequest {
                    product_id: shackle_id,
                    movement_type: MovementType::Saida,
                    quantity: 30,
                    reason: format!("Retirada {n}"),
                    notes: None,
                    reference: None,
                },
            )
            .await
        });
    }
    let (mut accepted, mut refused) = (0, 0);
    while let Some(joined) = exits.join_next().await {
        match joined? {
            Ok(_) => accepted += 1,
            Err(AppError::BadRequest(_)) => refused += 1,
            Err(other) => panic!("unexpected movement error: {other:?}"),
        }
    }
    assert_eq!((accepted, refused), (3, 3));

    let current = stock_service::get_product(&state, shackle.id)
        .await?
        .data
        .unwrap();
    assert_eq!(current.stock.available, 10);

    let mut withdrawals: Vec<_> = stock_service::list_movements(
        &state,
        MovementQuery {
            product_id: Some(shackle.id),
            movement_type: Some(MovementType::Saida),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap()
    .items;
    withdrawals.sort_by_key(|m| std::cmp::Reverse(m.quantity_before));
    assert_eq!(withdrawals.len(), 3);
    assert_eq!(withdrawals[0].quantity_before, 100);
    for pair in withdrawals.windows(2) {
        assert_eq!(pair[0].quantity_after, pair[1].quantity_before);
    }
    assert_eq!(
        withdrawals.last().map(|m| m.quantity_after),
        Some(current.stock.available)
    );

    Ok(())
}

fn product_request(
    category_id: uuid::Uuid,
    initial_quantity: Option<i32>,
) -> CreateProductRequest {
    CreateProductRequest {
        name: "Cabo de aço, 12mm".into(),
        description: None,
        category_id,
        unit: "M".into(),
        unit_price: 4_500,
        min_stock: 100,
        max_stock: Some(1_000),
        location: Some("Galpão A".into()),
        status: None,
        initial_quantity,
    }
}
