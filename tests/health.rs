use chrono::Utc;
use grua_ops_api::routes::health::health_check;

#[tokio::test]
async fn health_reports_service_identity() {
    let before = Utc::now();
    let body = health_check().await.0;

    assert_eq!(body.message, "Health check");
    assert!(body.meta.is_none());

    let data = body.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.service, "grua-ops-api");
    assert!(!data.version.is_empty());
    assert!(data.checked_at >= before);
}
