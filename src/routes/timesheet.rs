use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    domain::timesheet::Decision,
    dto::timesheet::{
        BatchDecisionRequest, BatchResult, CreateJustificationRequest, DecisionRequest,
        EntryList, JustificationList, PunchRequest, SummaryList, UpdateEntryRequest,
        UpsertEntryRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Justification, TimesheetEntry},
    response::ApiResponse,
    routes::params::{EntryQuery, JustificationQuery, SummaryQuery},
    services::timesheet_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_entries).post(upsert_entry))
        .route("/entries/{id}", get(get_entry).put(update_entry))
        .route("/entries/{id}/approve", post(approve_entry))
        .route("/entries/{id}/reject", post(reject_entry))
        .route("/punch", post(punch))
        .route("/overtime/pending", get(pending_overtime))
        .route("/overtime/approve-batch", post(approve_batch))
        .route("/overtime/reject-batch", post(reject_batch))
        .route("/summary", get(summary))
        .route(
            "/justifications",
            get(list_justifications).post(create_justification),
        )
        .route("/justifications/{id}/approve", post(approve_justification))
        .route("/justifications/{id}/reject", post(reject_justification))
}

#[utoipa::path(
    get,
    path = "/api/timesheet/entries",
    params(EntryQuery),
    responses(
        (
            status = 200,
            description = "List day entries; employees only see their own",
            body = ApiResponse<EntryList>
        ),
    ),
    security(("bearer_auth" = [])),
    tag = "Timesheet"
)]
pub async fn list_entries(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<EntryQuery>,
) -> AppResult<Json<ApiResponse<EntryList>>> {
    let resp = timesheet_service::list_entries(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/timesheet/entries",
    request_body = UpsertEntryRequest,
    responses(
        (
            status = 200,
            description = "Create or replace a day entry",
            body = ApiResponse<TimesheetEntry>
        ),
        (status = 400, description = "Invalid marks or entry already decided"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Timesheet"
)]
pub async fn upsert_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpsertEntryRequest>,
) -> AppResult<Json<ApiResponse<TimesheetEntry>>> {
    let resp = timesheet_service::upsert_entry(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/timesheet/entries/{id}",
    params(("id" = Uuid, Path, description = "Entry ID")),
    responses(
        (status = 200, description = "Get day entry", body = ApiResponse<TimesheetEntry>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Timesheet"
)]
pub async fn get_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<TimesheetEntry>>> {
    let resp = timesheet_service::get_entry(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/timesheet/entries/{id}",
    params(("id" = Uuid, Path, description = "Entry ID")),
    request_body = UpdateEntryRequest,
    responses(
        (
            status = 200,
            description = "Edit marks and recompute",
            body = ApiResponse<TimesheetEntry>
        ),
        (status = 400, description = "Invalid marks or entry already decided"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Timesheet"
)]
pub async fn update_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEntryRequest>,
) -> AppResult<Json<ApiResponse<TimesheetEntry>>> {
    let resp = timesheet_service::update_entry(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/timesheet/punch",
    request_body = PunchRequest,
    responses(
        (
            status = 200,
            description = "Record the next clock event",
            body = ApiResponse<TimesheetEntry>
        ),
        (status = 400, description = "Day already closed or out of order"),
    ),
    security(("bearer_auth" = [])),
    tag = "Timesheet"
)]
pub async fn punch(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PunchRequest>,
) -> AppResult<Json<ApiResponse<TimesheetEntry>>> {
    let resp = timesheet_service::punch(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/timesheet/entries/{id}/approve",
    params(("id" = Uuid, Path, description = "Entry ID")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Approve overtime", body = ApiResponse<TimesheetEntry>),
        (status = 400, description = "Entry is not pending approval"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Timesheet"
)]
pub async fn approve_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecisionRequest>,
) -> AppResult<Json<ApiResponse<TimesheetEntry>>> {
    let resp =
        timesheet_service::decide_overtime(&state, &user, id, Decision::Approve, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/timesheet/entries/{id}/reject",
    params(("id" = Uuid, Path, description = "Entry ID")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Reject overtime", body = ApiResponse<TimesheetEntry>),
        (status = 400, description = "Entry is not pending approval"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Timesheet"
)]
pub async fn reject_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecisionRequest>,
) -> AppResult<Json<ApiResponse<TimesheetEntry>>> {
    let resp =
        timesheet_service::decide_overtime(&state, &user, id, Decision::Reject, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/timesheet/overtime/pending",
    params(EntryQuery),
    responses(
        (
            status = 200,
            description = "Entries awaiting overtime approval",
            body = ApiResponse<EntryList>
        ),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Timesheet"
)]
pub async fn pending_overtime(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<EntryQuery>,
) -> AppResult<Json<ApiResponse<EntryList>>> {
    let resp = timesheet_service::pending_overtime(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/timesheet/overtime/approve-batch",
    request_body = BatchDecisionRequest,
    responses(
        (status = 200, description = "Approve several entries", body = ApiResponse<BatchResult>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Timesheet"
)]
pub async fn approve_batch(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BatchDecisionRequest>,
) -> AppResult<Json<ApiResponse<BatchResult>>> {
    let resp = timesheet_service::decide_batch(&state, &user, Decision::Approve, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/timesheet/overtime/reject-batch",
    request_body = BatchDecisionRequest,
    responses(
        (status = 200, description = "Reject several entries", body = ApiResponse<BatchResult>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Timesheet"
)]
pub async fn reject_batch(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BatchDecisionRequest>,
) -> AppResult<Json<ApiResponse<BatchResult>>> {
    let resp = timesheet_service::decide_batch(&state, &user, Decision::Reject, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/timesheet/summary",
    params(SummaryQuery),
    responses(
        (
            status = 200,
            description = "Per-employee totals for a period",
            body = ApiResponse<SummaryList>
        ),
        (status = 400, description = "Invalid range"),
    ),
    security(("bearer_auth" = [])),
    tag = "Timesheet"
)]
pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<ApiResponse<SummaryList>>> {
    let resp = timesheet_service::summary(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/timesheet/justifications",
    params(JustificationQuery),
    responses(
        (status = 200, description = "List justifications", body = ApiResponse<JustificationList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Timesheet"
)]
pub async fn list_justifications(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<JustificationQuery>,
) -> AppResult<Json<ApiResponse<JustificationList>>> {
    let resp = timesheet_service::list_justifications(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/timesheet/justifications",
    request_body = CreateJustificationRequest,
    responses(
        (status = 200, description = "Submit a justification", body = ApiResponse<Justification>),
        (status = 400, description = "Future date or inactive employee"),
    ),
    security(("bearer_auth" = [])),
    tag = "Timesheet"
)]
pub async fn create_justification(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateJustificationRequest>,
) -> AppResult<Json<ApiResponse<Justification>>> {
    let resp = timesheet_service::create_justification(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/timesheet/justifications/{id}/approve",
    params(("id" = Uuid, Path, description = "Justification ID")),
    responses(
        (status = 200, description = "Approve justification", body = ApiResponse<Justification>),
        (status = 400, description = "Already reviewed"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Timesheet"
)]
pub async fn approve_justification(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Justification>>> {
    let resp =
        timesheet_service::review_justification(&state, &user, id, Decision::Approve).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/timesheet/justifications/{id}/reject",
    params(("id" = Uuid, Path, description = "Justification ID")),
    responses(
        (status = 200, description = "Reject justification", body = ApiResponse<Justification>),
        (status = 400, description = "Already reviewed"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Timesheet"
)]
pub async fn reject_justification(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Justification>>> {
    let resp =
        timesheet_service::review_justification(&state, &user, id, Decision::Reject).await?;
    Ok(Json(resp))
}
