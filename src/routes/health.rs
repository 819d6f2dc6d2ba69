use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::response::ApiResponse;

/// Liveness payload; the database is not touched.
#[derive(Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub service: String,
    pub version: String,
    pub checked_at: DateTime<Utc>,
}

impl HealthData {
    fn up() -> Self {
        Self {
            status: "ok".into(),
            service: env!("CARGO_PKG_NAME").into(),
            version: env!("CARGO_PKG_VERSION").into(),
            checked_at: Utc::now(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = ApiResponse<HealthData>)),
    tag = "Health"
)]
pub async fn health_check() -> Json<ApiResponse<HealthData>> {
    Json(ApiResponse::success("Health check", HealthData::up(), None))
}
