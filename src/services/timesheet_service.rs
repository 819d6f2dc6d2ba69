use std::collections::BTreeMap;

use chrono::{Local, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{LockType, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    domain::timesheet::{
        self, ClockTimes, Decision, EntryStatus, JustificationStatus, PeriodSummary,
    },
    dto::timesheet::{
        BatchDecisionRequest, BatchOutcome, BatchResult, CreateJustificationRequest,
        DecisionRequest, EmployeeSummary, EntryList, JustificationList, PunchRequest,
        SummaryList, UpdateEntryRequest, UpsertEntryRequest,
    },
    entity::{
        employees::{Column as EmpCol, Entity as Employees, Model as EmployeeModel},
        justifications::{
            ActiveModel as JustActive, Column as JustCol, Entity as Justifications,
        },
        timesheet_entries::{
            ActiveModel as EntryActive, Column as EntryCol, Entity as TimesheetEntries,
            Model as EntryModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_approver},
    models::{Justification, TimesheetEntry},
    response::{ApiResponse, Meta},
    routes::params::{EntryQuery, JustificationQuery, SummaryQuery},
    state::AppState,
};

fn times_of(entry: &EntryModel) -> ClockTimes {
    ClockTimes {
        clock_in: entry.clock_in,
        lunch_out: entry.lunch_out,
        lunch_in: entry.lunch_in,
        clock_out: entry.clock_out,
    }
}

fn stored_status(entry: &EntryModel) -> AppResult<EntryStatus> {
    EntryStatus::parse(&entry.status).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "timesheet entry {} has unknown status {}",
            entry.id,
            entry.status
        ))
    })
}

async fn find_employee(state: &AppState, id: Uuid) -> AppResult<EmployeeModel> {
    Employees::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("employee {id} not found")))
}

/// Employees act on their own records; approvers on anyone's.
fn ensure_can_act_for(user: &AuthUser, employee: &EmployeeModel) -> AppResult<()> {
    if user.is_approver() || employee.user_id == Some(user.user_id) {
        return Ok(());
    }
    tracing::debug!(user_id = %user.user_id, employee_id = %employee.id, "timesheet access denied");
    Err(AppError::Forbidden)
}

async fn own_employee_id(state: &AppState, user: &AuthUser) -> AppResult<Option<Uuid>> {
    Ok(Employees::find()
        .filter(EmpCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .map(|e| e.id))
}

fn parse_marks(
    clock_in: Option<&str>,
    lunch_out: Option<&str>,
    lunch_in: Option<&str>,
    clock_out: Option<&str>,
) -> AppResult<ClockTimes> {
    let times = ClockTimes {
        clock_in: timesheet::parse_optional_clock(clock_in)?,
        lunch_out: timesheet::parse_optional_clock(lunch_out)?,
        lunch_in: timesheet::parse_optional_clock(lunch_in)?,
        clock_out: timesheet::parse_optional_clock(clock_out)?,
    };
    timesheet::validate_order(&times)?;
    Ok(times)
}

fn apply_times(active: &mut EntryActive, times: &ClockTimes, state: &AppState) {
    let day = timesheet::compute_day(times, &state.config.timesheet);
    active.clock_in = Set(times.clock_in);
    active.lunch_out = Set(times.lunch_out);
    active.lunch_in = Set(times.lunch_in);
    active.clock_out = Set(times.clock_out);
    active.worked_hours = Set(day.worked_hours);
    active.overtime_hours = Set(day.overtime_hours);
    active.status = Set(day.status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
}

/// Claim the `(employee, date)` row and lock it for the rest of `txn`.
///
/// A blank day is inserted when none exists; concurrent writers for the same day
/// queue on the row lock and then see each other's marks.
async fn lock_day(
    txn: &DatabaseTransaction,
    employee_id: Uuid,
    date: chrono::NaiveDate,
) -> AppResult<EntryModel> {
    let blank = EntryActive {
        id: Set(Uuid::new_v4()),
        employee_id: Set(employee_id),
        entry_date: Set(date),
        status: Set(EntryStatus::Falta.as_str().to_string()),
        ..Default::default()
    };
    TimesheetEntries::insert(blank)
        .on_conflict(
            OnConflict::columns([EntryCol::EmployeeId, EntryCol::EntryDate])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(txn)
        .await?;

    TimesheetEntries::find()
        .filter(
            Condition::all()
                .add(EntryCol::EmployeeId.eq(employee_id))
                .add(EntryCol::EntryDate.eq(date)),
        )
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or(AppError::NotFound)
}

/// Create or replace the day entry of an employee.
pub async fn upsert_entry(
    state: &AppState,
    user: &AuthUser,
    payload: UpsertEntryRequest,
) -> AppResult<ApiResponse<TimesheetEntry>> {
    payload.validate()?;
    let employee = find_employee(state, payload.employee_id).await?;
    ensure_can_act_for(user, &employee)?;

    let times = parse_marks(
        payload.clock_in.as_deref(),
        payload.lunch_out.as_deref(),
        payload.lunch_in.as_deref(),
        payload.clock_out.as_deref(),
    )?;

    let txn = state.orm.begin().await?;
    let day = lock_day(&txn, employee.id, payload.entry_date).await?;
    timesheet::ensure_editable(stored_status(&day)?)?;
    let mut active: EntryActive = day.into();
    apply_times(&mut active, &times, state);
    if payload.observations.is_some() {
        active.observations = Set(payload.observations);
    }
    let entry = active.update(&txn).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "timesheet_upsert",
        "timesheet_entries",
        serde_json::json!({ "entry_id": entry.id, "status": entry.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Entry saved",
        TimesheetEntry::from(entry),
        Some(Meta::empty()),
    ))
}

/// Record the next clock event of the day.
pub async fn punch(
    state: &AppState,
    user: &AuthUser,
    payload: PunchRequest,
) -> AppResult<ApiResponse<TimesheetEntry>> {
    let employee = find_employee(state, payload.employee_id).await?;
    ensure_can_act_for(user, &employee)?;
    if employee.status != "Ativo" {
        return Err(AppError::BadRequest("employee is not active".into()));
    }

    let now = Local::now();
    let date = payload.entry_date.unwrap_or_else(|| now.date_naive());
    let at = match payload.time.as_deref() {
        Some(raw) => timesheet::parse_clock(raw)?,
        None => timesheet::parse_clock(&now.format("%H:%M").to_string())?,
    };

    let txn = state.orm.begin().await?;
    let day = lock_day(&txn, employee.id, date).await?;
    timesheet::ensure_editable(stored_status(&day)?)?;
    let mut times = times_of(&day);
    let kind = timesheet::apply_punch(&mut times, at, payload.kind)?;
    let mut active: EntryActive = day.into();
    apply_times(&mut active, &times, state);
    let entry = active.update(&txn).await?;
    txn.commit().await?;
    tracing::debug!(employee_id = %employee.id, ?kind, %at, "punch recorded");

    Ok(ApiResponse::success(
        "Punch recorded",
        TimesheetEntry::from(entry),
        Some(Meta::empty()),
    ))
}

pub async fn update_entry(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateEntryRequest,
) -> AppResult<ApiResponse<TimesheetEntry>> {
    payload.validate()?;
    let existing = TimesheetEntries::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let employee = find_employee(state, existing.employee_id).await?;
    ensure_can_act_for(user, &employee)?;
    timesheet::ensure_editable(stored_status(&existing)?)?;

    let merge = |incoming: Option<String>,
                 current: Option<chrono::NaiveTime>|
     -> AppResult<Option<chrono::NaiveTime>> {
        match incoming {
            Some(raw) => Ok(timesheet::parse_optional_clock(Some(&raw))?),
            None => Ok(current),
        }
    };
    let times = ClockTimes {
        clock_in: merge(payload.clock_in, existing.clock_in)?,
        lunch_out: merge(payload.lunch_out, existing.lunch_out)?,
        lunch_in: merge(payload.lunch_in, existing.lunch_in)?,
        clock_out: merge(payload.clock_out, existing.clock_out)?,
    };
    timesheet::validate_order(&times)?;

    let mut active: EntryActive = existing.into();
    apply_times(&mut active, &times, state);
    if let Some(observations) = payload.observations {
        active.observations = Set(Some(observations));
    }
    let entry = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "timesheet_update",
        "timesheet_entries",
        serde_json::json!({ "entry_id": entry.id, "status": entry.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Entry updated",
        TimesheetEntry::from(entry),
        Some(Meta::empty()),
    ))
}

pub async fn list_entries(
    state: &AppState,
    user: &AuthUser,
    query: EntryQuery,
) -> AppResult<ApiResponse<EntryList>> {
    page_entries(state, user, query, Condition::all(), "Timesheet entries").await
}

async fn page_entries(
    state: &AppState,
    user: &AuthUser,
    query: EntryQuery,
    mut condition: Condition,
    message: &str,
) -> AppResult<ApiResponse<EntryList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let employee_filter = if user.is_approver() {
        query.employee_id
    } else {
        Some(own_employee_id(state, user).await?.ok_or(AppError::NotFound)?)
    };
    if let Some(employee_id) = employee_filter {
        condition = condition.add(EntryCol::EmployeeId.eq(employee_id));
    }
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(EntryCol::Status.eq(status.clone()));
    }
    if let Some(from) = query.from {
        condition = condition.add(EntryCol::EntryDate.gte(from));
    }
    if let Some(to) = query.to {
        condition = condition.add(EntryCol::EntryDate.lte(to));
    }

    let finder = TimesheetEntries::find()
        .filter(condition)
        .order_by_desc(EntryCol::EntryDate);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(TimesheetEntry::from)
        .collect();

    Ok(ApiResponse::success(
        message,
        EntryList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_entry(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<TimesheetEntry>> {
    let entry = TimesheetEntries::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let employee = find_employee(state, entry.employee_id).await?;
    ensure_can_act_for(user, &employee)?;
    Ok(ApiResponse::success(
        "Timesheet entry",
        TimesheetEntry::from(entry),
        None,
    ))
}

pub async fn pending_overtime(
    state: &AppState,
    user: &AuthUser,
    query: EntryQuery,
) -> AppResult<ApiResponse<EntryList>> {
    ensure_approver(user)?;
    let query = EntryQuery {
        status: Some(EntryStatus::PendenteAprovacao.as_str().to_string()),
        ..query
    };
    let overtime = Condition::all().add(EntryCol::OvertimeHours.gt(0.0));
    page_entries(state, user, query, overtime, "Pending overtime").await
}

/// Approve or reject the overtime of one entry.
pub async fn decide_overtime(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    decision: Decision,
    payload: DecisionRequest,
) -> AppResult<ApiResponse<TimesheetEntry>> {
    ensure_approver(user)?;
    payload.validate()?;
    let entry = apply_decision(state, user, id, decision, &payload.justification).await?;
    let message = match decision {
        Decision::Approve => "Overtime approved",
        Decision::Reject => "Overtime rejected",
    };
    Ok(ApiResponse::success(
        message,
        TimesheetEntry::from(entry),
        Some(Meta::empty()),
    ))
}

async fn apply_decision(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    decision: Decision,
    justification: &str,
) -> AppResult<EntryModel> {
    let existing = TimesheetEntries::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let status = stored_status(&existing)?;
    let next =
        timesheet::decide_overtime(status, existing.overtime_hours, decision, justification)?;
    let observations =
        timesheet::append_observation(existing.observations.as_deref(), decision, justification);

    let mut active: EntryActive = existing.into();
    active.status = Set(next.as_str().to_string());
    active.approved_by = Set(Some(user.user_id));
    active.approved_at = Set(Some(Utc::now().into()));
    active.observations = Set(Some(observations));
    active.updated_at = Set(Utc::now().into());
    let entry = active.update(&state.orm).await?;

    tracing::info!(
        entry_id = %entry.id,
        approver = %user.user_id,
        status = %entry.status,
        overtime_hours = entry.overtime_hours,
        "overtime decided"
    );
    audit::record(
        &state.pool,
        user.user_id,
        "overtime_decision",
        "timesheet_entries",
        serde_json::json!({ "entry_id": entry.id, "status": entry.status }),
    )
    .await;
    Ok(entry)
}

/// Same transition for several entries; failures are reported per id.
pub async fn decide_batch(
    state: &AppState,
    user: &AuthUser,
    decision: Decision,
    payload: BatchDecisionRequest,
) -> AppResult<ApiResponse<BatchResult>> {
    ensure_approver(user)?;
    payload.validate()?;

    let mut outcomes = Vec::with_capacity(payload.ids.len());
    for id in payload.ids {
        let outcome = match apply_decision(state, user, id, decision, &payload.justification).await
        {
            Ok(entry) => BatchOutcome {
                id,
                ok: true,
                status: Some(entry.status),
                error: None,
            },
            Err(err @ (AppError::NotFound | AppError::BadRequest(_))) => BatchOutcome {
                id,
                ok: false,
                status: None,
                error: Some(err.to_string()),
            },
            Err(err) => return Err(err),
        };
        outcomes.push(outcome);
    }

    let succeeded = outcomes.iter().filter(|o| o.ok).count();
    let failed = outcomes.len() - succeeded;
    Ok(ApiResponse::success(
        "Batch processed",
        BatchResult {
            succeeded,
            failed,
            outcomes,
        },
        Some(Meta::empty()),
    ))
}

/// Per-employee totals over a date range.
pub async fn summary(
    state: &AppState,
    user: &AuthUser,
    query: SummaryQuery,
) -> AppResult<ApiResponse<SummaryList>> {
    if query.to < query.from {
        return Err(AppError::BadRequest("`to` must not be earlier than `from`".into()));
    }
    let employee_filter = if user.is_approver() {
        query.employee_id
    } else {
        Some(own_employee_id(state, user).await?.ok_or(AppError::NotFound)?)
    };

    let mut condition = Condition::all()
        .add(EntryCol::EntryDate.gte(query.from))
        .add(EntryCol::EntryDate.lte(query.to));
    if let Some(employee_id) = employee_filter {
        condition = condition.add(EntryCol::EmployeeId.eq(employee_id));
    }

    let entries = TimesheetEntries::find()
        .filter(condition)
        .all(&state.orm)
        .await?;

    let mut totals: BTreeMap<Uuid, PeriodSummary> = BTreeMap::new();
    for entry in &entries {
        let status = stored_status(entry)?;
        totals
            .entry(entry.employee_id)
            .or_default()
            .add(entry.worked_hours, entry.overtime_hours, status);
    }

    let names: BTreeMap<Uuid, String> = Employees::find()
        .filter(EmpCol::Id.is_in(totals.keys().copied().collect::<Vec<_>>()))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|e| (e.id, e.name))
        .collect();

    let mut items: Vec<EmployeeSummary> = totals
        .into_iter()
        .map(|(employee_id, totals)| EmployeeSummary {
            employee_id,
            employee_name: names.get(&employee_id).cloned().unwrap_or_default(),
            from: query.from,
            to: query.to,
            totals,
        })
        .collect();
    items.sort_by(|a, b| a.employee_name.cmp(&b.employee_name));

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Timesheet summary",
        SummaryList { items },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

pub async fn create_justification(
    state: &AppState,
    user: &AuthUser,
    payload: CreateJustificationRequest,
) -> AppResult<ApiResponse<Justification>> {
    payload.validate()?;
    let employee = find_employee(state, payload.employee_id).await?;
    ensure_can_act_for(user, &employee)?;
    if employee.status != "Ativo" {
        return Err(AppError::BadRequest("employee is not active".into()));
    }
    timesheet::ensure_not_future(payload.entry_date, Local::now().date_naive())?;

    let justification = JustActive {
        id: Set(Uuid::new_v4()),
        employee_id: Set(employee.id),
        entry_date: Set(payload.entry_date),
        kind: Set(payload.kind.as_str().to_string()),
        reason: Set(payload.reason.trim().to_string()),
        status: Set(JustificationStatus::Pendente.as_str().to_string()),
        reviewed_by: Set(None),
        reviewed_at: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "justification_create",
        "justifications",
        serde_json::json!({ "justification_id": justification.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Justification created",
        Justification::from(justification),
        Some(Meta::empty()),
    ))
}

pub async fn list_justifications(
    state: &AppState,
    user: &AuthUser,
    query: JustificationQuery,
) -> AppResult<ApiResponse<JustificationList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();
    let employee_filter = if user.is_approver() {
        query.employee_id
    } else {
        Some(own_employee_id(state, user).await?.ok_or(AppError::NotFound)?)
    };
    if let Some(employee_id) = employee_filter {
        condition = condition.add(JustCol::EmployeeId.eq(employee_id));
    }
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(JustCol::Status.eq(status.clone()));
    }
    if let Some(from) = query.from {
        condition = condition.add(JustCol::EntryDate.gte(from));
    }
    if let Some(to) = query.to {
        condition = condition.add(JustCol::EntryDate.lte(to));
    }

    let finder = Justifications::find()
        .filter(condition)
        .order_by_desc(JustCol::EntryDate);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Justification::from)
        .collect();

    Ok(ApiResponse::success(
        "Justifications",
        JustificationList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn review_justification(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    decision: Decision,
) -> AppResult<ApiResponse<Justification>> {
    ensure_approver(user)?;
    let existing = Justifications::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let current = JustificationStatus::parse(&existing.status).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "justification {} has unknown status {}",
            existing.id,
            existing.status
        ))
    })?;
    let next = timesheet::review_justification(current, decision)?;

    let mut active: JustActive = existing.into();
    active.status = Set(next.as_str().to_string());
    active.reviewed_by = Set(Some(user.user_id));
    active.reviewed_at = Set(Some(Utc::now().into()));
    let justification = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "justification_review",
        "justifications",
        serde_json::json!({ "justification_id": id, "status": justification.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Justification reviewed",
        Justification::from(justification),
        Some(Meta::empty()),
    ))
}
