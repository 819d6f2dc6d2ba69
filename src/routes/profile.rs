use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::{
        auth::ChangePasswordRequest,
        people::{BenefitList, CertificateList, PayslipList, UpdateProfileRequest},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Employee,
    response::ApiResponse,
    services::profile_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/payslips", get(payslips))
        .route("/benefits", get(benefits))
        .route("/certificates", get(certificates))
        .route("/password", post(change_password))
}

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (
            status = 200,
            description = "Employee linked to the current user",
            body = ApiResponse<Employee>
        ),
        (status = 404, description = "No employee linked"),
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Employee>>> {
    let resp = profile_service::get_profile(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Update contact data", body = ApiResponse<Employee>),
        (status = 404, description = "No employee linked"),
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<Employee>>> {
    let resp = profile_service::update_profile(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/profile/payslips",
    responses((status = 200, description = "Own payslips", body = ApiResponse<PayslipList>)),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn payslips(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PayslipList>>> {
    Ok(Json(profile_service::payslips(&state, &user).await?))
}

#[utoipa::path(
    get,
    path = "/api/profile/benefits",
    responses((status = 200, description = "Own benefits", body = ApiResponse<BenefitList>)),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn benefits(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<BenefitList>>> {
    Ok(Json(profile_service::benefits(&state, &user).await?))
}

#[utoipa::path(
    get,
    path = "/api/profile/certificates",
    responses(
        (
            status = 200,
            description = "Own certificates",
            body = ApiResponse<CertificateList>
        )
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn certificates(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CertificateList>>> {
    Ok(Json(profile_service::certificates(&state, &user).await?))
}

#[utoipa::path(
    post,
    path = "/api/profile/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Current password is incorrect"),
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = profile_service::change_password(&state, &user, payload).await?;
    Ok(Json(resp))
}
