use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::people::{ClientList, CreateClientRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Client,
    response::ApiResponse,
    routes::params::SearchQuery,
    services::client_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_clients).post(create_client))
}

#[utoipa::path(
    get,
    path = "/api/clients",
    params(SearchQuery),
    responses((status = 200, description = "List clients", body = ApiResponse<ClientList>)),
    security(("bearer_auth" = [])),
    tag = "Clients"
)]
pub async fn list_clients(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<ClientList>>> {
    let resp = client_service::list_clients(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/clients",
    request_body = CreateClientRequest,
    responses(
        (status = 200, description = "Create client", body = ApiResponse<Client>),
        (status = 409, description = "Duplicate CNPJ"),
    ),
    security(("bearer_auth" = [])),
    tag = "Clients"
)]
pub async fn create_client(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateClientRequest>,
) -> AppResult<Json<ApiResponse<Client>>> {
    let resp = client_service::create_client(&state, &user, payload).await?;
    Ok(Json(resp))
}
