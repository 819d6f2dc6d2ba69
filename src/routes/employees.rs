use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::people::{
        CreateBenefitRequest, CreateCertificateRequest, CreateEmployeeRequest,
        CreatePayslipRequest, EmployeeList, UpdateEmployeeRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Benefit, Certificate, Employee, Payslip},
    response::ApiResponse,
    routes::params::SearchQuery,
    services::employee_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route("/{id}", get(get_employee).put(update_employee))
        .route("/{id}/payslips", post(add_payslip))
        .route("/{id}/benefits", post(add_benefit))
        .route("/{id}/certificates", post(add_certificate))
}

#[utoipa::path(
    get,
    path = "/api/employees",
    params(SearchQuery),
    responses(
        (status = 200, description = "List employees", body = ApiResponse<EmployeeList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn list_employees(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<EmployeeList>>> {
    let resp = employee_service::list_employees(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 200, description = "Create employee (admin only)", body = ApiResponse<Employee>),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "User already linked"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn create_employee(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateEmployeeRequest>,
) -> AppResult<Json<ApiResponse<Employee>>> {
    let resp = employee_service::create_employee(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Get employee", body = ApiResponse<Employee>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn get_employee(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Employee>>> {
    let resp = employee_service::get_employee(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = Uuid, Path, description = "Employee ID")),
    request_body = UpdateEmployeeRequest,
    responses(
        (status = 200, description = "Update employee (admin only)", body = ApiResponse<Employee>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn update_employee(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> AppResult<Json<ApiResponse<Employee>>> {
    let resp = employee_service::update_employee(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/employees/{id}/payslips",
    params(("id" = Uuid, Path, description = "Employee ID")),
    request_body = CreatePayslipRequest,
    responses((status = 200, description = "Attach payslip", body = ApiResponse<Payslip>)),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn add_payslip(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreatePayslipRequest>,
) -> AppResult<Json<ApiResponse<Payslip>>> {
    let resp = employee_service::add_payslip(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/employees/{id}/benefits",
    params(("id" = Uuid, Path, description = "Employee ID")),
    request_body = CreateBenefitRequest,
    responses((status = 200, description = "Attach benefit", body = ApiResponse<Benefit>)),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn add_benefit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateBenefitRequest>,
) -> AppResult<Json<ApiResponse<Benefit>>> {
    let resp = employee_service::add_benefit(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/employees/{id}/certificates",
    params(("id" = Uuid, Path, description = "Employee ID")),
    request_body = CreateCertificateRequest,
    responses((status = 200, description = "Attach certificate", body = ApiResponse<Certificate>)),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn add_certificate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateCertificateRequest>,
) -> AppResult<Json<ApiResponse<Certificate>>> {
    let resp = employee_service::add_certificate(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
