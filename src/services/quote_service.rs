use chrono::{Days, NaiveDate, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    domain::{
        catalog,
        pricing::{QuoteBreakdown, QuoteLines, price_quote},
    },
    dto::quotes::{
        ComplementCatalog, ComplementOption, QuoteDetail, QuoteList, QuotePreview, QuoteRequest,
    },
    entity::{
        clients::Entity as Clients,
        quote_fixed_values::{
            ActiveModel as FixedActive, Column as FixedCol, Entity as QuoteFixedValues,
        },
        quote_items::{ActiveModel as ItemActive, Column as ItemCol, Entity as QuoteItems},
        quote_monthly_costs::{
            ActiveModel as MonthlyActive, Column as MonthlyCol, Entity as QuoteMonthlyCosts,
        },
        quotes::{
            ActiveModel as QuoteActive, Column as QuoteCol, Entity as Quotes, Model as QuoteModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Quote, QuoteFixedValue, QuoteItem, QuoteMonthlyCost},
    response::{ApiResponse, Meta},
    routes::params::QuoteQuery,
    state::AppState,
};

pub const STATUS_DRAFT: &str = "rascunho";
pub const STATUS_SENT: &str = "enviado";

/// Quotes without an explicit validity date stay valid for this many days.
const DEFAULT_VALIDITY_DAYS: u64 = 30;

pub fn build_quote_number(id: Uuid, today: NaiveDate) -> String {
    let simple = id.simple().to_string();
    let short = &simple[..8];
    format!("ORC-{}-{}", today.format("%Y%m%d"), short.to_uppercase())
}

fn breakdown_for(payload: &QuoteRequest) -> AppResult<QuoteBreakdown> {
    let breakdown = price_quote(
        payload.kind,
        payload.lease_months_or_default(),
        QuoteLines {
            monthly_costs: &payload.monthly_costs,
            fixed_values: &payload.fixed_values,
            complements: &payload.complements,
        },
    )?;
    Ok(breakdown)
}

/// Price a quote without persisting anything.
pub fn preview(payload: QuoteRequest) -> AppResult<ApiResponse<QuotePreview>> {
    let breakdown = breakdown_for(&payload)?;
    Ok(ApiResponse::success(
        "Quote preview",
        QuotePreview {
            kind: payload.kind,
            breakdown,
        },
        Some(Meta::empty()),
    ))
}

pub fn complement_catalog() -> ApiResponse<ComplementCatalog> {
    let items: Vec<ComplementOption> = catalog::all()
        .iter()
        .map(|item| ComplementOption {
            sku: item.sku.to_string(),
            name: item.name.to_string(),
            pricing_mode: item.pricing_mode,
            unit: item.unit.to_string(),
            unit_price: item.unit_price,
            description: item.description.to_string(),
            item_type: if item.is_accessory() {
                "equipamento".into()
            } else {
                "servico".into()
            },
        })
        .collect();
    let total = items.len() as i64;
    ApiResponse::success(
        "Complements",
        ComplementCatalog { items },
        Some(Meta::new(1, total.max(1), total)),
    )
}

async fn validated(state: &AppState, payload: &QuoteRequest) -> AppResult<QuoteBreakdown> {
    payload.validate()?;
    let client_id = payload
        .client_id
        .ok_or_else(|| AppError::BadRequest("client is required".into()))?;
    if Clients::find_by_id(client_id).one(&state.orm).await?.is_none() {
        return Err(AppError::BadRequest(format!("client {client_id} not found")));
    }
    breakdown_for(payload)
}

async fn insert_lines(
    txn: &DatabaseTransaction,
    quote_id: Uuid,
    breakdown: &QuoteBreakdown,
) -> AppResult<()> {
    for line in &breakdown.monthly_costs {
        MonthlyActive {
            id: Set(Uuid::new_v4()),
            quote_id: Set(quote_id),
            cost_type: Set(line.cost_type.clone()),
            description: Set(line.description.clone()),
            monthly_value: Set(line.monthly_value),
            required: Set(line.required),
            total: Set(line.total),
        }
        .insert(txn)
        .await?;
    }
    for line in &breakdown.fixed_values {
        FixedActive {
            id: Set(Uuid::new_v4()),
            quote_id: Set(quote_id),
            value_type: Set(line.value_type.clone()),
            description: Set(line.description.clone()),
            quantity: Set(line.quantity),
            unit_value: Set(line.unit_value),
            total: Set(line.total),
        }
        .insert(txn)
        .await?;
    }
    for line in &breakdown.complements {
        ItemActive {
            id: Set(Uuid::new_v4()),
            quote_id: Set(quote_id),
            sku: Set(line.sku.clone()),
            name: Set(line.name.clone()),
            description: Set(Some(line.description.clone())),
            pricing_mode: Set(line.pricing_mode.as_str().to_string()),
            unit: Set(line.unit.clone()),
            item_type: Set(line.item_type.as_str().to_string()),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            total: Set(line.total),
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

async fn load_detail<C: sea_orm::ConnectionTrait>(
    conn: &C,
    quote: QuoteModel,
) -> AppResult<QuoteDetail> {
    let monthly_costs = QuoteMonthlyCosts::find()
        .filter(MonthlyCol::QuoteId.eq(quote.id))
        .all(conn)
        .await?
        .into_iter()
        .map(QuoteMonthlyCost::from)
        .collect();
    let fixed_values = QuoteFixedValues::find()
        .filter(FixedCol::QuoteId.eq(quote.id))
        .all(conn)
        .await?
        .into_iter()
        .map(QuoteFixedValue::from)
        .collect();
    let items = QuoteItems::find()
        .filter(ItemCol::QuoteId.eq(quote.id))
        .order_by_asc(ItemCol::Sku)
        .all(conn)
        .await?
        .into_iter()
        .map(QuoteItem::from)
        .collect();
    Ok(QuoteDetail {
        quote: Quote::from(quote),
        monthly_costs,
        fixed_values,
        items,
    })
}

pub async fn create_quote(
    state: &AppState,
    user: &AuthUser,
    payload: QuoteRequest,
) -> AppResult<ApiResponse<QuoteDetail>> {
    let breakdown = validated(state, &payload).await?;
    let today = Utc::now().date_naive();
    let id = Uuid::new_v4();
    let number = build_quote_number(id, today);

    if Quotes::find()
        .filter(QuoteCol::Number.eq(number.as_str()))
        .one(&state.orm)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!("Quote number {number} already exists")));
    }

    let valid_until = payload
        .valid_until
        .or_else(|| today.checked_add_days(Days::new(DEFAULT_VALIDITY_DAYS)))
        .unwrap_or(today);
    let status = if payload.send { STATUS_SENT } else { STATUS_DRAFT };

    let txn = state.orm.begin().await?;
    let quote = QuoteActive {
        id: Set(id),
        number: Set(number),
        kind: Set(payload.kind.as_str().to_string()),
        client_id: Set(payload.client_id.unwrap_or_default()),
        site_name: Set(payload.site_name),
        site_address: Set(payload.site_address),
        site_type: Set(payload.site_type),
        equipment: Set(payload.equipment),
        initial_height: Set(payload.initial_height),
        final_height: Set(payload.final_height),
        boom_length: Set(payload.boom_length),
        max_load: Set(payload.max_load),
        tip_load: Set(payload.tip_load),
        lease_months: Set(breakdown.lease_months),
        estimated_start: Set(payload.estimated_start),
        valid_until: Set(valid_until),
        payment_conditions: Set(payload.payment_conditions),
        notes: Set(payload.notes),
        total: Set(breakdown.grand_total),
        status: Set(status.to_string()),
        created_by: Set(Some(user.user_id)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;
    insert_lines(&txn, quote.id, &breakdown).await?;
    let detail = load_detail(&txn, quote).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "quote_create",
        "quotes",
        serde_json::json!({
            "quote_id": detail.quote.id,
            "number": detail.quote.number,
            "total": detail.quote.total,
            "status": detail.quote.status,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        if payload.send { "Quote sent" } else { "Draft saved" },
        detail,
        Some(Meta::empty()),
    ))
}

/// Replace the header and every line, then recompute the total.
pub async fn update_quote(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: QuoteRequest,
) -> AppResult<ApiResponse<QuoteDetail>> {
    let breakdown = validated(state, &payload).await?;

    let txn = state.orm.begin().await?;
    let existing = Quotes::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let valid_until = payload.valid_until.unwrap_or(existing.valid_until);

    let mut active: QuoteActive = existing.into();
    active.kind = Set(payload.kind.as_str().to_string());
    active.client_id = Set(payload.client_id.unwrap_or_default());
    active.site_name = Set(payload.site_name);
    active.site_address = Set(payload.site_address);
    active.site_type = Set(payload.site_type);
    active.equipment = Set(payload.equipment);
    active.initial_height = Set(payload.initial_height);
    active.final_height = Set(payload.final_height);
    active.boom_length = Set(payload.boom_length);
    active.max_load = Set(payload.max_load);
    active.tip_load = Set(payload.tip_load);
    active.lease_months = Set(breakdown.lease_months);
    active.estimated_start = Set(payload.estimated_start);
    active.valid_until = Set(valid_until);
    active.payment_conditions = Set(payload.payment_conditions);
    active.notes = Set(payload.notes);
    active.total = Set(breakdown.grand_total);
    active.status = Set(if payload.send { STATUS_SENT } else { STATUS_DRAFT }.to_string());
    active.updated_at = Set(Utc::now().into());
    let quote = active.update(&txn).await?;

    QuoteMonthlyCosts::delete_many()
        .filter(MonthlyCol::QuoteId.eq(id))
        .exec(&txn)
        .await?;
    QuoteFixedValues::delete_many()
        .filter(FixedCol::QuoteId.eq(id))
        .exec(&txn)
        .await?;
    QuoteItems::delete_many()
        .filter(ItemCol::QuoteId.eq(id))
        .exec(&txn)
        .await?;
    insert_lines(&txn, id, &breakdown).await?;
    let detail = load_detail(&txn, quote).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "quote_update",
        "quotes",
        serde_json::json!({ "quote_id": id, "total": detail.quote.total }),
    )
    .await;

    Ok(ApiResponse::success("Quote updated", detail, Some(Meta::empty())))
}

pub async fn list_quotes(
    state: &AppState,
    query: QuoteQuery,
) -> AppResult<ApiResponse<QuoteList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(QuoteCol::Status.eq(status.clone()));
    }
    if let Some(kind) = query.kind {
        condition = condition.add(QuoteCol::Kind.eq(kind.as_str()));
    }
    if let Some(client_id) = query.client_id {
        condition = condition.add(QuoteCol::ClientId.eq(client_id));
    }
    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        condition =
            condition.add(Expr::col(QuoteCol::Number).ilike(format!("%{}%", search.trim())));
    }

    let finder = Quotes::find()
        .filter(condition)
        .order_by_desc(QuoteCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Quote::from)
        .collect();

    Ok(ApiResponse::success(
        "Quotes",
        QuoteList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_quote(state: &AppState, id: Uuid) -> AppResult<ApiResponse<QuoteDetail>> {
    let quote = Quotes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let detail = load_detail(&state.orm, quote).await?;
    Ok(ApiResponse::success("Quote", detail, None))
}

pub async fn delete_quote(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let res = Quotes::delete_by_id(id).exec(&state.orm).await?;
    if res.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    audit::record(
        &state.pool,
        user.user_id,
        "quote_delete",
        "quotes",
        serde_json::json!({ "quote_id": id }),
    )
    .await;
    Ok(ApiResponse::success(
        "Quote deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_number_has_date_and_short_id() {
        let id = Uuid::parse_str("1b4e28ba-2fa1-11d2-883f-0016d3cca427").unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(build_quote_number(id, date), "ORC-20240307-1B4E28BA");
    }

    #[test]
    fn catalog_lists_every_item() {
        let resp = complement_catalog();
        let items = resp.data.unwrap().items;
        assert_eq!(items.len(), catalog::all().len());
        assert!(items.iter().any(|i| i.sku == "SERV-004" && i.item_type == "servico"));
    }
}
