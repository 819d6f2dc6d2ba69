use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    domain::{
        csv,
        stock::{MovementType, apply_movement, stock_value},
    },
    dto::stock::{
        AlertSnapshot, CategoryList, CreateCategoryRequest, CreateMovementRequest,
        CreateProductRequest, MovementList, MovementResult, ProductList, UpdateCategoryRequest,
        UpdateProductRequest, check_bounds,
    },
    entity::{
        categories::{
            ActiveModel as CategoryActive, Column as CatCol, Entity as Categories,
            Model as CategoryModel,
        },
        products::{ActiveModel as ProductActive, Column as ProdCol, Entity as Products},
        stock_levels::{ActiveModel as LevelActive, Entity as StockLevels, Model as LevelModel},
        stock_movements::{
            ActiveModel as MovementActive, Column as MoveCol, Entity as StockMovements,
            Model as MovementModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_approver},
    models::{Category, Product, StockMovement},
    response::{ApiResponse, Meta},
    routes::params::{CategoryQuery, MovementQuery, ProductQuery},
    state::AppState,
};

pub async fn list_categories(
    state: &AppState,
    query: CategoryQuery,
) -> AppResult<ApiResponse<CategoryList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut finder = Categories::find().order_by_asc(CatCol::Name);
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        finder = finder.filter(CatCol::Status.eq(status.clone()));
    }

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();

    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

async fn ensure_unique_category_name(
    state: &AppState,
    name: &str,
    except: Option<Uuid>,
) -> AppResult<()> {
    let mut finder = Categories::find().filter(CatCol::Name.eq(name));
    if let Some(id) = except {
        finder = finder.filter(CatCol::Id.ne(id));
    }
    if finder.one(&state.orm).await?.is_some() {
        return Err(AppError::Conflict(format!("Category {name} already exists")));
    }
    Ok(())
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_approver(user)?;
    payload.validate()?;
    let name = payload.name.trim().to_string();
    ensure_unique_category_name(state, &name, None).await?;

    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(payload.description),
        status: Set(payload.status.unwrap_or_else(|| "Ativo".into())),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "category_create",
        "categories",
        serde_json::json!({ "category_id": category.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Category created",
        Category::from(category),
        Some(Meta::empty()),
    ))
}

async fn find_category(state: &AppState, id: Uuid) -> AppResult<CategoryModel> {
    Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn get_category(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Category>> {
    let category = find_category(state, id).await?;
    Ok(ApiResponse::success(
        "Category",
        Category::from(category),
        None,
    ))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_approver(user)?;
    payload.validate()?;
    let existing = find_category(state, id).await?;

    let mut active: CategoryActive = existing.into();
    if let Some(name) = payload.name {
        let name = name.trim().to_string();
        ensure_unique_category_name(state, &name, Some(id)).await?;
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    let category = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Category updated",
        Category::from(category),
        Some(Meta::empty()),
    ))
}

pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    find_category(state, id).await?;

    let in_use = Products::find()
        .filter(ProdCol::CategoryId.eq(id))
        .count(&state.orm)
        .await?;
    if in_use > 0 {
        return Err(AppError::Conflict(format!(
            "Category is used by {in_use} product(s)"
        )));
    }

    Categories::delete_by_id(id).exec(&state.orm).await?;
    audit::record(
        &state.pool,
        user.user_id,
        "category_delete",
        "categories",
        serde_json::json!({ "category_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Category deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search.trim());
        condition = condition.add(
            Condition::any()
                .add(Expr::col((Products, ProdCol::Name)).ilike(pattern.clone()))
                .add(Expr::col((Products, ProdCol::Description)).ilike(pattern)),
        );
    }
    if let Some(category_id) = query.category_id {
        condition = condition.add(ProdCol::CategoryId.eq(category_id));
    }
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(ProdCol::Status.eq(status.clone()));
    }
    if query.low_stock {
        // same threshold as the `Atenção` badge: available <= 1.5 * min
        condition = condition.add(Expr::cust(
            "COALESCE(stock_levels.available, 0) * 2 <= products.min_stock * 3",
        ));
    }

    let finder = Products::find()
        .find_also_related(StockLevels)
        .filter(condition)
        .order_by_asc(ProdCol::Name);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(product, level)| Product::from_parts(product, level))
        .collect();

    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let (product, level) = Products::find_by_id(id)
        .find_also_related(StockLevels)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success(
        "Product",
        Product::from_parts(product, level),
        None,
    ))
}

/// Product, its stock row and the opening `ENTRADA` are written together.
pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_approver(user)?;
    payload.validate()?;
    find_category(state, payload.category_id).await?;

    let initial = payload.initial_quantity.unwrap_or(0);
    let txn = state.orm.begin().await?;

    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        category_id: Set(payload.category_id),
        unit: Set(payload.unit),
        unit_price: Set(payload.unit_price),
        min_stock: Set(payload.min_stock),
        max_stock: Set(payload.max_stock),
        location: Set(payload.location),
        status: Set(payload.status.unwrap_or_else(|| "Ativo".into())),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let now = Utc::now();
    let level = LevelActive {
        product_id: Set(product.id),
        available: Set(initial),
        reserved: Set(0),
        total_value: Set(stock_value(initial, product.unit_price)),
        last_movement_at: Set((initial > 0).then(|| now.into())),
    }
    .insert(&txn)
    .await?;

    if initial > 0 {
        insert_movement(
            &txn,
            product.id,
            MovementType::Entrada,
            initial,
            (0, initial),
            "Estoque inicial".into(),
            None,
            None,
            Some(user.user_id),
        )
        .await?;
    }

    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id, "initial_quantity": initial }),
    )
    .await;
    state.stock_alerts.schedule_refresh(&state.orm);

    Ok(ApiResponse::success(
        "Product created",
        Product::from_parts(product, Some(level)),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_approver(user)?;
    payload.validate()?;
    let (existing, level) = Products::find_by_id(id)
        .find_also_related(StockLevels)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let min_stock = payload.min_stock.unwrap_or(existing.min_stock);
    let max_stock = payload.max_stock.or(existing.max_stock);
    check_bounds(min_stock, max_stock).map_err(|e| {
        AppError::BadRequest(e.message.map(|m| m.to_string()).unwrap_or_default())
    })?;
    if let Some(category_id) = payload.category_id {
        find_category(state, category_id).await?;
    }

    let price_changed = payload
        .unit_price
        .is_some_and(|price| price != existing.unit_price);

    let mut active: ProductActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(unit) = payload.unit {
        active.unit = Set(unit);
    }
    if let Some(unit_price) = payload.unit_price {
        active.unit_price = Set(unit_price);
    }
    active.min_stock = Set(min_stock);
    active.max_stock = Set(max_stock);
    if let Some(location) = payload.location {
        active.location = Set(Some(location));
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now().into());

    let txn = state.orm.begin().await?;
    let product = active.update(&txn).await?;
    let level = match level {
        Some(level) if price_changed => {
            let available = level.available;
            let mut level: LevelActive = level.into();
            level.total_value = Set(stock_value(available, product.unit_price));
            Some(level.update(&txn).await?)
        }
        other => other,
    };
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;
    state.stock_alerts.schedule_refresh(&state.orm);

    Ok(ApiResponse::success(
        "Product updated",
        Product::from_parts(product, level),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let res = Products::delete_by_id(id).exec(&state.orm).await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        user.user_id,
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;
    state.stock_alerts.schedule_refresh(&state.orm);

    Ok(ApiResponse::success(
        "Product deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

#[allow(clippy::too_many_arguments)]
async fn insert_movement(
    txn: &DatabaseTransaction,
    product_id: Uuid,
    kind: MovementType,
    quantity: i32,
    (before, after): (i32, i32),
    reason: String,
    notes: Option<String>,
    reference: Option<String>,
    responsible_id: Option<Uuid>,
) -> AppResult<MovementModel> {
    let movement = MovementActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id),
        movement_type: Set(kind.as_str().to_string()),
        quantity: Set(quantity),
        quantity_before: Set(before),
        quantity_after: Set(after),
        reason: Set(reason),
        notes: Set(notes),
        reference: Set(reference),
        responsible_id: Set(responsible_id),
        created_at: NotSet,
    }
    .insert(txn)
    .await?;
    Ok(movement)
}

/// Apply a movement under a row lock on the product's stock level.
pub async fn record_movement(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMovementRequest,
) -> AppResult<ApiResponse<MovementResult>> {
    payload.validate()?;
    let txn = state.orm.begin().await?;

    let product = Products::find_by_id(payload.product_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let level: Option<LevelModel> = StockLevels::find_by_id(product.id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;

    let before = level.as_ref().map(|l| l.available).unwrap_or(0);
    let after = apply_movement(before, payload.movement_type, payload.quantity)?;
    let now = Utc::now();

    let level = match level {
        Some(level) => {
            let mut active: LevelActive = level.into();
            active.available = Set(after);
            active.total_value = Set(stock_value(after, product.unit_price));
            active.last_movement_at = Set(Some(now.into()));
            active.update(&txn).await?
        }
        None => {
            LevelActive {
                product_id: Set(product.id),
                available: Set(after),
                reserved: Set(0),
                total_value: Set(stock_value(after, product.unit_price)),
                last_movement_at: Set(Some(now.into())),
            }
            .insert(&txn)
            .await?
        }
    };

    let movement = insert_movement(
        &txn,
        product.id,
        payload.movement_type,
        payload.quantity,
        (before, after),
        payload.reason,
        payload.notes,
        payload.reference,
        Some(user.user_id),
    )
    .await?;

    txn.commit().await?;

    tracing::debug!(
        product_id = %product.id,
        movement = payload.movement_type.as_str(),
        before,
        after,
        "stock movement recorded"
    );
    audit::record(
        &state.pool,
        user.user_id,
        "stock_movement",
        "stock_movements",
        serde_json::json!({
            "movement_id": movement.id,
            "product_id": product.id,
            "type": movement.movement_type,
            "before": before,
            "after": after,
        }),
    )
    .await;
    state.stock_alerts.schedule_refresh(&state.orm);

    Ok(ApiResponse::success(
        "Movement recorded",
        MovementResult {
            movement: StockMovement::from(movement),
            product: Product::from_parts(product, Some(level)),
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_movements(
    state: &AppState,
    query: MovementQuery,
) -> AppResult<ApiResponse<MovementList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    if let Some(product_id) = query.product_id {
        condition = condition.add(MoveCol::ProductId.eq(product_id));
    }
    if let Some(kind) = query.movement_type {
        condition = condition.add(MoveCol::MovementType.eq(kind.as_str()));
    }

    let finder = StockMovements::find()
        .filter(condition)
        .order_by_desc(MoveCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(StockMovement::from)
        .collect();

    Ok(ApiResponse::success(
        "Movements",
        MovementList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

const EXPORT_HEADER: &[&str] = &[
    "Nome",
    "Categoria",
    "Unidade",
    "Preço Unitário",
    "Estoque Mínimo",
    "Estoque Máximo",
    "Disponível",
    "Reservado",
    "Valor Total",
    "Situação",
    "Localização",
    "Status",
];

pub struct CsvExport {
    pub filename: String,
    pub body: String,
}

/// One header line plus one line per product.
pub async fn export_csv(state: &AppState) -> AppResult<CsvExport> {
    let categories: HashMap<Uuid, String> = Categories::find()
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let rows: Vec<Vec<String>> = Products::find()
        .find_also_related(StockLevels)
        .order_by_asc(ProdCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(product, level)| {
            let category = categories
                .get(&product.category_id)
                .cloned()
                .unwrap_or_default();
            let p = Product::from_parts(product, level);
            vec![
                p.name,
                category,
                p.unit,
                csv::format_centavos(p.unit_price),
                p.min_stock.to_string(),
                p.max_stock.map(|m| m.to_string()).unwrap_or_default(),
                p.stock.available.to_string(),
                p.stock.reserved.to_string(),
                csv::format_centavos(p.stock.total_value),
                p.stock.status.as_str().to_string(),
                p.location.unwrap_or_default(),
                p.status,
            ]
        })
        .collect();

    Ok(CsvExport {
        filename: format!("estoque_{}.csv", Utc::now().format("%Y-%m-%d")),
        body: csv::to_csv(EXPORT_HEADER, &rows),
    })
}

pub async fn alerts(state: &AppState) -> AppResult<ApiResponse<AlertSnapshot>> {
    let snapshot = state.stock_alerts.snapshot().await;
    let snapshot = if snapshot.computed_at.is_none() {
        state.stock_alerts.refresh(&state.orm).await?
    } else {
        snapshot
    };
    let total = snapshot.items.len() as i64;
    Ok(ApiResponse::success(
        "Stock alerts",
        snapshot,
        Some(Meta::new(1, total.max(1), total)),
    ))
}
