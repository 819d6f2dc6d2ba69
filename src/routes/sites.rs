use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::sites::{
        CraneList, CreateCraneRequest, CreateDocumentRequest, CreateLogbookEntryRequest,
        CreateSiteRequest, DocumentList, LogbookList, LogbookStats, SiteDetail, SiteList,
        UpdateLogbookEntryRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Crane, LogbookEntry, Site, SiteDocument},
    response::ApiResponse,
    routes::params::{LogbookQuery, SearchQuery, SiteQuery},
    services::site_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sites).post(create_site))
        .route("/{id}", get(get_site))
        .route("/{id}/cranes", get(list_cranes).post(create_crane))
        .route("/{id}/documents", get(list_documents).post(create_document))
        .route("/{id}/logbook", get(site_logbook))
}

pub fn crane_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/logbook", get(crane_logbook).post(create_logbook_entry))
        .route("/{id}/logbook/stats", get(logbook_stats))
}

pub fn logbook_router() -> Router<AppState> {
    Router::new().route("/{id}", put(update_logbook_entry).delete(delete_logbook_entry))
}

#[utoipa::path(
    get,
    path = "/api/sites",
    params(SiteQuery),
    responses((status = 200, description = "List sites", body = ApiResponse<SiteList>)),
    security(("bearer_auth" = [])),
    tag = "Sites"
)]
pub async fn list_sites(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<SiteQuery>,
) -> AppResult<Json<ApiResponse<SiteList>>> {
    let resp = site_service::list_sites(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sites",
    request_body = CreateSiteRequest,
    responses(
        (status = 200, description = "Create site", body = ApiResponse<Site>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sites"
)]
pub async fn create_site(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateSiteRequest>,
) -> AppResult<Json<ApiResponse<Site>>> {
    let resp = site_service::create_site(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/sites/{id}",
    params(("id" = Uuid, Path, description = "Site ID")),
    responses(
        (status = 200, description = "Site with counts", body = ApiResponse<SiteDetail>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sites"
)]
pub async fn get_site(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<SiteDetail>>> {
    let resp = site_service::get_site(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/sites/{id}/cranes",
    params(("id" = Uuid, Path, description = "Site ID"), SearchQuery),
    responses(
        (status = 200, description = "Cranes on the site", body = ApiResponse<CraneList>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sites"
)]
pub async fn list_cranes(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<CraneList>>> {
    let resp = site_service::list_cranes(&state, id, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sites/{id}/cranes",
    params(("id" = Uuid, Path, description = "Site ID")),
    request_body = CreateCraneRequest,
    responses(
        (status = 200, description = "Add crane to site", body = ApiResponse<Crane>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sites"
)]
pub async fn create_crane(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateCraneRequest>,
) -> AppResult<Json<ApiResponse<Crane>>> {
    let resp = site_service::create_crane(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/sites/{id}/documents",
    params(("id" = Uuid, Path, description = "Site ID"), SearchQuery),
    responses(
        (status = 200, description = "Site documents", body = ApiResponse<DocumentList>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sites"
)]
pub async fn list_documents(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<DocumentList>>> {
    let resp = site_service::list_documents(&state, id, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sites/{id}/documents",
    params(("id" = Uuid, Path, description = "Site ID")),
    request_body = CreateDocumentRequest,
    responses(
        (
            status = 200,
            description = "Register document metadata",
            body = ApiResponse<SiteDocument>
        ),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sites"
)]
pub async fn create_document(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateDocumentRequest>,
) -> AppResult<Json<ApiResponse<SiteDocument>>> {
    let resp = site_service::create_document(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/sites/{id}/logbook",
    params(("id" = Uuid, Path, description = "Site ID"), LogbookQuery),
    responses(
        (
            status = 200,
            description = "Logbook of every crane on the site",
            body = ApiResponse<LogbookList>
        ),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sites"
)]
pub async fn site_logbook(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<LogbookQuery>,
) -> AppResult<Json<ApiResponse<LogbookList>>> {
    let resp = site_service::site_logbook(&state, id, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/cranes/{id}/logbook",
    params(("id" = Uuid, Path, description = "Crane ID"), LogbookQuery),
    responses(
        (status = 200, description = "Crane logbook", body = ApiResponse<LogbookList>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Logbook"
)]
pub async fn crane_logbook(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<LogbookQuery>,
) -> AppResult<Json<ApiResponse<LogbookList>>> {
    let resp = site_service::crane_logbook(&state, id, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cranes/{id}/logbook",
    params(("id" = Uuid, Path, description = "Crane ID")),
    request_body = CreateLogbookEntryRequest,
    responses(
        (status = 200, description = "Add logbook entry", body = ApiResponse<LogbookEntry>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Logbook"
)]
pub async fn create_logbook_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateLogbookEntryRequest>,
) -> AppResult<Json<ApiResponse<LogbookEntry>>> {
    let resp = site_service::create_logbook_entry(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/cranes/{id}/logbook/stats",
    params(("id" = Uuid, Path, description = "Crane ID")),
    responses(
        (status = 200, description = "Counts by kind and status", body = ApiResponse<LogbookStats>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Logbook"
)]
pub async fn logbook_stats(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<LogbookStats>>> {
    let resp = site_service::crane_logbook_stats(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/logbook/{id}",
    params(("id" = Uuid, Path, description = "Logbook entry ID")),
    request_body = UpdateLogbookEntryRequest,
    responses(
        (status = 200, description = "Edit logbook entry", body = ApiResponse<LogbookEntry>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Logbook"
)]
pub async fn update_logbook_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLogbookEntryRequest>,
) -> AppResult<Json<ApiResponse<LogbookEntry>>> {
    let resp = site_service::update_logbook_entry(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/logbook/{id}",
    params(("id" = Uuid, Path, description = "Logbook entry ID")),
    responses(
        (status = 200, description = "Delete logbook entry"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Logbook"
)]
pub async fn delete_logbook_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = site_service::delete_logbook_entry(&state, &user, id).await?;
    Ok(Json(resp))
}
