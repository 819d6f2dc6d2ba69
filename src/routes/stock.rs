use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::stock::{
        AlertSnapshot, CategoryList, CreateCategoryRequest, CreateMovementRequest,
        CreateProductRequest, MovementList, MovementResult, ProductList, UpdateCategoryRequest,
        UpdateProductRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Category, Product},
    response::ApiResponse,
    routes::params::{CategoryQuery, MovementQuery, ProductQuery},
    services::stock_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/movements", get(list_movements).post(create_movement))
        .route("/export", get(export_csv))
        .route("/alerts", get(alerts))
}

#[utoipa::path(
    get,
    path = "/api/stock/categories",
    params(CategoryQuery),
    responses(
        (status = 200, description = "List categories", body = ApiResponse<CategoryList>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = stock_service::list_categories(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stock/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 200, description = "Create category", body = ApiResponse<Category>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Duplicate name"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = stock_service::create_category(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stock/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Get category", body = ApiResponse<Category>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn get_category(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = stock_service::get_category(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/stock/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Update category", body = ApiResponse<Category>),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Duplicate name"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = stock_service::update_category(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/stock/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Delete category"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Category still has products"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = stock_service::delete_category(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stock/products",
    params(ProductQuery),
    responses(
        (
            status = 200,
            description = "List products with stock levels",
            body = ApiResponse<ProductList>
        ),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn list_products(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = stock_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stock/products",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = stock_service::create_product(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stock/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn get_product(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = stock_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/stock/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Update product", body = ApiResponse<Product>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = stock_service::update_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/stock/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Delete product"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = stock_service::delete_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stock/movements",
    request_body = CreateMovementRequest,
    responses(
        (status = 200, description = "Record a stock movement", body = ApiResponse<MovementResult>),
        (status = 400, description = "Insufficient stock or invalid quantity"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn create_movement(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMovementRequest>,
) -> AppResult<Json<ApiResponse<MovementResult>>> {
    let resp = stock_service::record_movement(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stock/movements",
    params(MovementQuery),
    responses(
        (status = 200, description = "List stock movements", body = ApiResponse<MovementList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn list_movements(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<MovementQuery>,
) -> AppResult<Json<ApiResponse<MovementList>>> {
    let resp = stock_service::list_movements(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stock/export",
    responses(
        (status = 200, description = "Products as CSV", content_type = "text/csv", body = String),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn export_csv(State(state): State<AppState>, _user: AuthUser) -> AppResult<Response> {
    let export = stock_service::export_csv(&state).await?;
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        export.filename
    ))
    .map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.body,
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/stock/alerts",
    responses(
        (
            status = 200,
            description = "Products at low or attention stock",
            body = ApiResponse<AlertSnapshot>
        ),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock"
)]
pub async fn alerts(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<AlertSnapshot>>> {
    let resp = stock_service::alerts(&state).await?;
    Ok(Json(resp))
}
