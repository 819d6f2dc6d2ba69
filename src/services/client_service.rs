use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::people::{ClientList, CreateClientRequest},
    entity::clients::{ActiveModel as ClientActive, Column as ClientCol, Entity as Clients},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_approver},
    models::Client,
    response::{ApiResponse, Meta},
    routes::params::SearchQuery,
    state::AppState,
};

pub async fn create_client(
    state: &AppState,
    user: &AuthUser,
    payload: CreateClientRequest,
) -> AppResult<ApiResponse<Client>> {
    ensure_approver(user)?;
    payload.validate()?;
    if let Some(cnpj) = payload.cnpj.as_deref() {
        let taken = Clients::find()
            .filter(ClientCol::Cnpj.eq(cnpj))
            .one(&state.orm)
            .await?;
        if taken.is_some() {
            return Err(AppError::Conflict(format!("client with cnpj {cnpj} exists")));
        }
    }

    let client = ClientActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        cnpj: Set(payload.cnpj),
        email: Set(payload.email.map(|e| e.trim().to_lowercase())),
        phone: Set(payload.phone),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Client created",
        Client::from(client),
        Some(Meta::empty()),
    ))
}

pub async fn list_clients(
    state: &AppState,
    query: SearchQuery,
) -> AppResult<ApiResponse<ClientList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut finder = Clients::find().order_by_asc(ClientCol::Name);
    if let Some(q) = query.q.as_ref().filter(|q| !q.trim().is_empty()) {
        finder = finder.filter(Expr::col(ClientCol::Name).ilike(format!("%{}%", q.trim())));
    }

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Client::from)
        .collect();

    Ok(ApiResponse::success(
        "Clients",
        ClientList { items },
        Some(Meta::new(page, limit, total)),
    ))
}
