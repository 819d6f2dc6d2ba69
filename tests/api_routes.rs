mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use grua_ops_api::{
    build_app,
    middleware::auth::Role,
    services::auth_service::issue_token,
};
use serde_json::{Value, json};
use uuid::Uuid;

fn server() -> TestServer {
    TestServer::new(build_app(common::lazy_state())).expect("test server")
}

fn token(role: Role) -> String {
    issue_token(Uuid::new_v4(), role, common::JWT_SECRET).expect("token")
}

#[tokio::test]
async fn health_is_public() {
    let response = server().get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let response = server().get("/api/quotes/complements").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server()
        .get("/api/quotes/complements")
        .authorization_bearer("not-a-jwt")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn complement_catalog_lists_every_sku() {
    let response = server()
        .get("/api/quotes/complements")
        .authorization_bearer(token(Role::Employee))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let items = body["data"].as_array().expect("catalog array");
    assert_eq!(items.len(), 21);
    assert!(items.iter().any(|i| i["sku"] == "SERV-004" && i["pricing_mode"] == "unico"));
}

#[tokio::test]
async fn preview_prices_a_thirteen_month_rental() {
    let payload = json!({
        "kind": "locacao",
        "client_id": Uuid::new_v4(),
        "lease_months": 13,
        "monthly_costs": [
            {
                "cost_type": "locacao",
                "description": "Locação",
                "monthly_value": 1_500_000,
                "required": true
            }
        ],
        "complements": [
            { "sku": "SERV-004", "quantity": 1 }
        ]
    });

    let response = server()
        .post("/api/quotes/preview")
        .authorization_bearer(token(Role::Employee))
        .json(&payload)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let breakdown = &body["data"]["breakdown"];
    assert_eq!(breakdown["monthly_total"], 19_500_000);
    assert_eq!(breakdown["complements_total"], 300_000);
    assert_eq!(breakdown["grand_total"], 19_800_000);
}

#[tokio::test]
async fn preview_rejects_fixed_values_on_construction_quotes() {
    let payload = json!({
        "kind": "obra",
        "client_id": Uuid::new_v4(),
        "lease_months": 2,
        "fixed_values": [
            { "value_type": "frete", "description": "Frete", "quantity": 1, "unit_value": 10_000 }
        ]
    });

    let response = server()
        .post("/api/quotes/preview")
        .authorization_bearer(token(Role::Supervisor))
        .json(&payload)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_paths_use_the_envelope() {
    let response = server().get("/api/nothing-here").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["message"], "Not Found");
}

#[tokio::test]
async fn openapi_docs_are_served() {
    let response = server().get("/docs").await;
    response.assert_status_ok();
}
