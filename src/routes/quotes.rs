use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::quotes::{ComplementCatalog, QuoteDetail, QuoteList, QuotePreview, QuoteRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::QuoteQuery,
    services::quote_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_quotes).post(create_quote))
        .route("/preview", post(preview))
        .route("/complements", get(complements))
        .route("/{id}", get(get_quote).put(update_quote).delete(delete_quote))
}

#[utoipa::path(
    post,
    path = "/api/quotes/preview",
    request_body = QuoteRequest,
    responses(
        (
            status = 200,
            description = "Compute totals without saving",
            body = ApiResponse<QuotePreview>
        ),
        (status = 400, description = "Invalid lines"),
    ),
    security(("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn preview(
    _user: AuthUser,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<ApiResponse<QuotePreview>>> {
    let resp = quote_service::preview(payload)?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/quotes/complements",
    responses(
        (status = 200, description = "Complement catalog", body = ApiResponse<ComplementCatalog>),
    ),
    security(("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn complements(_user: AuthUser) -> Json<ApiResponse<ComplementCatalog>> {
    Json(quote_service::complement_catalog())
}

#[utoipa::path(
    get,
    path = "/api/quotes",
    params(QuoteQuery),
    responses(
        (status = 200, description = "List quotes", body = ApiResponse<QuoteList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn list_quotes(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<QuoteQuery>,
) -> AppResult<Json<ApiResponse<QuoteList>>> {
    let resp = quote_service::list_quotes(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/quotes",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Create quote", body = ApiResponse<QuoteDetail>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Duplicate quote number"),
    ),
    security(("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn create_quote(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<ApiResponse<QuoteDetail>>> {
    let resp = quote_service::create_quote(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/quotes/{id}",
    params(("id" = Uuid, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Quote with its lines", body = ApiResponse<QuoteDetail>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn get_quote(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<QuoteDetail>>> {
    let resp = quote_service::get_quote(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/quotes/{id}",
    params(("id" = Uuid, Path, description = "Quote ID")),
    request_body = QuoteRequest,
    responses(
        (
            status = 200,
            description = "Replace quote header and lines",
            body = ApiResponse<QuoteDetail>
        ),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn update_quote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<ApiResponse<QuoteDetail>>> {
    let resp = quote_service::update_quote(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/quotes/{id}",
    params(("id" = Uuid, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Delete quote"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Quotes"
)]
pub async fn delete_quote(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = quote_service::delete_quote(&state, &user, id).await?;
    Ok(Json(resp))
}
