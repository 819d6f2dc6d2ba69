use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::sites::{
        CountBy, CraneList, CreateCraneRequest, CreateDocumentRequest, CreateLogbookEntryRequest,
        CreateSiteRequest, DocumentList, LogbookList, LogbookStats, SiteDetail, SiteList,
        UpdateLogbookEntryRequest,
    },
    entity::{
        clients::Entity as Clients,
        cranes::{ActiveModel as CraneActive, Column as CraneCol, Entity as Cranes},
        employees::Entity as Employees,
        logbook_entries::{
            ActiveModel as LogbookActive, Column as LogCol, Entity as LogbookEntries,
        },
        site_documents::{ActiveModel as DocumentActive, Column as DocCol, Entity as Documents},
        sites::{ActiveModel as SiteActive, Column as SiteCol, Entity as Sites, Model as SiteModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_approver},
    models::{Crane, LogbookEntry, Site, SiteDocument},
    response::{ApiResponse, Meta},
    routes::params::{LogbookQuery, SearchQuery, SiteQuery},
    state::AppState,
};

async fn find_site(state: &AppState, id: Uuid) -> AppResult<SiteModel> {
    Sites::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn create_site(
    state: &AppState,
    user: &AuthUser,
    payload: CreateSiteRequest,
) -> AppResult<ApiResponse<Site>> {
    ensure_approver(user)?;
    payload.validate()?;
    if let Some(client_id) = payload.client_id {
        if Clients::find_by_id(client_id).one(&state.orm).await?.is_none() {
            return Err(AppError::BadRequest(format!("client {client_id} not found")));
        }
    }

    let site = SiteActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        client_id: Set(payload.client_id),
        address: Set(payload.address),
        city: Set(payload.city),
        state: Set(payload.state.map(|s| s.to_uppercase())),
        status: Set(payload.status.unwrap_or_else(|| "Ativa".into())),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "site_create",
        "sites",
        serde_json::json!({ "site_id": site.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Site created",
        Site::from(site),
        Some(Meta::empty()),
    ))
}

pub async fn list_sites(state: &AppState, query: SiteQuery) -> AppResult<ApiResponse<SiteList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    if let Some(q) = query.q.as_ref().filter(|q| !q.trim().is_empty()) {
        let pattern = format!("%{}%", q.trim());
        condition = condition.add(
            Condition::any()
                .add(Expr::col(SiteCol::Name).ilike(pattern.clone()))
                .add(Expr::col(SiteCol::City).ilike(pattern)),
        );
    }
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(SiteCol::Status.eq(status.clone()));
    }

    let finder = Sites::find().filter(condition).order_by_asc(SiteCol::Name);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Site::from)
        .collect();

    Ok(ApiResponse::success(
        "Sites",
        SiteList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

async fn crane_ids_of(state: &AppState, site_id: Uuid) -> AppResult<Vec<Uuid>> {
    Ok(Cranes::find()
        .select_only()
        .column(CraneCol::Id)
        .filter(CraneCol::SiteId.eq(site_id))
        .into_tuple::<Uuid>()
        .all(&state.orm)
        .await?)
}

pub async fn get_site(state: &AppState, id: Uuid) -> AppResult<ApiResponse<SiteDetail>> {
    let site = find_site(state, id).await?;
    let crane_ids = crane_ids_of(state, id).await?;
    let document_count = Documents::find()
        .filter(DocCol::SiteId.eq(id))
        .count(&state.orm)
        .await?;
    let logbook_count = if crane_ids.is_empty() {
        0
    } else {
        LogbookEntries::find()
            .filter(LogCol::CraneId.is_in(crane_ids.clone()))
            .count(&state.orm)
            .await?
    };

    Ok(ApiResponse::success(
        "Site",
        SiteDetail {
            site: Site::from(site),
            crane_count: crane_ids.len() as u64,
            document_count,
            logbook_count,
        },
        None,
    ))
}

pub async fn create_crane(
    state: &AppState,
    user: &AuthUser,
    site_id: Uuid,
    payload: CreateCraneRequest,
) -> AppResult<ApiResponse<Crane>> {
    ensure_approver(user)?;
    payload.validate()?;
    let site = find_site(state, site_id).await?;

    let crane = CraneActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        model: Set(payload.model),
        manufacturer: Set(payload.manufacturer),
        site_id: Set(Some(site.id)),
        status: Set(payload.status.unwrap_or_else(|| "Operacional".into())),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Crane created",
        Crane::from(crane),
        Some(Meta::empty()),
    ))
}

pub async fn list_cranes(
    state: &AppState,
    site_id: Uuid,
    query: SearchQuery,
) -> AppResult<ApiResponse<CraneList>> {
    find_site(state, site_id).await?;
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(CraneCol::SiteId.eq(site_id));
    if let Some(q) = query.q.as_ref().filter(|q| !q.trim().is_empty()) {
        condition = condition.add(Expr::col(CraneCol::Name).ilike(format!("%{}%", q.trim())));
    }
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(CraneCol::Status.eq(status.clone()));
    }

    let finder = Cranes::find().filter(condition).order_by_asc(CraneCol::Name);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Crane::from)
        .collect();

    Ok(ApiResponse::success(
        "Cranes",
        CraneList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn create_document(
    state: &AppState,
    user: &AuthUser,
    site_id: Uuid,
    payload: CreateDocumentRequest,
) -> AppResult<ApiResponse<SiteDocument>> {
    payload.validate()?;
    let site = find_site(state, site_id).await?;

    let document = DocumentActive {
        id: Set(Uuid::new_v4()),
        site_id: Set(site.id),
        title: Set(payload.title.trim().to_string()),
        kind: Set(payload.kind),
        storage_path: Set(payload.storage_path),
        uploaded_by: Set(Some(user.user_id)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "document_create",
        "site_documents",
        serde_json::json!({ "site_id": site_id, "document_id": document.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Document registered",
        SiteDocument::from(document),
        Some(Meta::empty()),
    ))
}

pub async fn list_documents(
    state: &AppState,
    site_id: Uuid,
    query: SearchQuery,
) -> AppResult<ApiResponse<DocumentList>> {
    find_site(state, site_id).await?;
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(DocCol::SiteId.eq(site_id));
    if let Some(q) = query.q.as_ref().filter(|q| !q.trim().is_empty()) {
        condition = condition.add(Expr::col(DocCol::Title).ilike(format!("%{}%", q.trim())));
    }

    let finder = Documents::find()
        .filter(condition)
        .order_by_desc(DocCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(SiteDocument::from)
        .collect();

    Ok(ApiResponse::success(
        "Documents",
        DocumentList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

fn logbook_condition(query: &LogbookQuery) -> Condition {
    let mut condition = Condition::all();
    if let Some(kind) = query.kind.as_ref().filter(|k| !k.is_empty()) {
        condition = condition.add(LogCol::Kind.eq(kind.clone()));
    }
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(LogCol::Status.eq(status.clone()));
    }
    if let Some(from) = query.from {
        condition = condition.add(LogCol::EntryDate.gte(from));
    }
    if let Some(to) = query.to {
        condition = condition.add(LogCol::EntryDate.lte(to));
    }
    condition
}

async fn page_logbook(
    state: &AppState,
    condition: Condition,
    query: &LogbookQuery,
) -> AppResult<ApiResponse<LogbookList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let finder = LogbookEntries::find()
        .filter(condition)
        .order_by_desc(LogCol::EntryDate)
        .order_by_desc(LogCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(LogbookEntry::from)
        .collect();

    Ok(ApiResponse::success(
        "Logbook entries",
        LogbookList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

/// Logbook entries of every crane on the site.
pub async fn site_logbook(
    state: &AppState,
    site_id: Uuid,
    query: LogbookQuery,
) -> AppResult<ApiResponse<LogbookList>> {
    find_site(state, site_id).await?;
    let crane_ids = crane_ids_of(state, site_id).await?;
    if crane_ids.is_empty() {
        let (page, limit, _) = query.pagination().normalize();
        return Ok(ApiResponse::success(
            "Logbook entries",
            LogbookList { items: Vec::new() },
            Some(Meta::new(page, limit, 0)),
        ));
    }
    let condition = logbook_condition(&query).add(LogCol::CraneId.is_in(crane_ids));
    page_logbook(state, condition, &query).await
}

pub async fn create_logbook_entry(
    state: &AppState,
    user: &AuthUser,
    crane_id: Uuid,
    payload: CreateLogbookEntryRequest,
) -> AppResult<ApiResponse<LogbookEntry>> {
    payload.validate()?;
    let crane = Cranes::find_by_id(crane_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    if let Some(employee_id) = payload.employee_id {
        if Employees::find_by_id(employee_id).one(&state.orm).await?.is_none() {
            return Err(AppError::BadRequest(format!("employee {employee_id} not found")));
        }
    }

    let entry = LogbookActive {
        id: Set(Uuid::new_v4()),
        crane_id: Set(crane.id),
        employee_id: Set(payload.employee_id),
        entry_date: Set(payload.entry_date),
        kind: Set(payload.kind),
        description: Set(payload.description.trim().to_string()),
        status: Set(payload.status.unwrap_or_else(|| "ok".into())),
        created_by: Set(Some(user.user_id)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if entry.status == "pendente" {
        tracing::info!(
            crane_id = %crane.id,
            entry_id = %entry.id,
            kind = %entry.kind,
            "pending logbook entry"
        );
    }

    Ok(ApiResponse::success(
        "Logbook entry created",
        LogbookEntry::from(entry),
        Some(Meta::empty()),
    ))
}

pub async fn crane_logbook(
    state: &AppState,
    crane_id: Uuid,
    query: LogbookQuery,
) -> AppResult<ApiResponse<LogbookList>> {
    Cranes::find_by_id(crane_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let condition = logbook_condition(&query).add(LogCol::CraneId.eq(crane_id));
    page_logbook(state, condition, &query).await
}

pub async fn update_logbook_entry(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateLogbookEntryRequest,
) -> AppResult<ApiResponse<LogbookEntry>> {
    payload.validate()?;
    let existing = LogbookEntries::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    if !user.is_approver() && existing.created_by != Some(user.user_id) {
        return Err(AppError::Forbidden);
    }

    let mut active: LogbookActive = existing.into();
    if let Some(employee_id) = payload.employee_id {
        active.employee_id = Set(Some(employee_id));
    }
    if let Some(entry_date) = payload.entry_date {
        active.entry_date = Set(entry_date);
    }
    if let Some(kind) = payload.kind {
        active.kind = Set(kind);
    }
    if let Some(description) = payload.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now().into());
    let entry = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Logbook entry updated",
        LogbookEntry::from(entry),
        Some(Meta::empty()),
    ))
}

pub async fn delete_logbook_entry(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_approver(user)?;
    let existing = LogbookEntries::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    existing.delete(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "logbook_delete",
        "logbook_entries",
        serde_json::json!({ "entry_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logbook entry deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

fn count_by(values: BTreeMap<String, i64>) -> Vec<CountBy> {
    values
        .into_iter()
        .map(|(key, count)| CountBy { key, count })
        .collect()
}

/// Build per-crane counts from `(kind, status, entry_date)` rows.
pub fn logbook_stats(crane_id: Uuid, rows: &[(String, String, NaiveDate)]) -> LogbookStats {
    let mut by_kind = BTreeMap::new();
    let mut by_status = BTreeMap::new();
    for (kind, status, _) in rows {
        *by_kind.entry(kind.clone()).or_insert(0) += 1;
        *by_status.entry(status.clone()).or_insert(0) += 1;
    }
    LogbookStats {
        crane_id,
        total: rows.len() as i64,
        by_kind: count_by(by_kind),
        by_status: count_by(by_status),
        last_entry_date: rows.iter().map(|(_, _, date)| *date).max(),
    }
}

pub async fn crane_logbook_stats(
    state: &AppState,
    crane_id: Uuid,
) -> AppResult<ApiResponse<LogbookStats>> {
    Cranes::find_by_id(crane_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let rows = LogbookEntries::find()
        .select_only()
        .column(LogCol::Kind)
        .column(LogCol::Status)
        .column(LogCol::EntryDate)
        .filter(LogCol::CraneId.eq(crane_id))
        .into_tuple::<(String, String, NaiveDate)>()
        .all(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Logbook stats",
        logbook_stats(crane_id, &rows),
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn stats_group_by_kind_and_status() {
        let crane = Uuid::new_v4();
        let rows = vec![
            ("checklist".to_string(), "ok".to_string(), day(3)),
            ("manutencao".to_string(), "pendente".to_string(), day(10)),
            ("checklist".to_string(), "ok".to_string(), day(7)),
        ];
        let stats = logbook_stats(crane, &rows);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.last_entry_date, Some(day(10)));
        assert_eq!(stats.by_kind[0].key, "checklist");
        assert_eq!(stats.by_kind[0].count, 2);
        assert_eq!(stats.by_status.len(), 2);
    }

    #[test]
    fn stats_of_empty_logbook() {
        let stats = logbook_stats(Uuid::nil(), &[]);
        assert_eq!(stats.total, 0);
        assert!(stats.by_kind.is_empty());
        assert_eq!(stats.last_entry_date, None);
    }
}
