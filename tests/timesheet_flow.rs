mod common;

use chrono::{Duration, Local, NaiveDate};
use grua_ops_api::{
    domain::timesheet::{Decision, EntryStatus, JustificationKind},
    dto::timesheet::{
        BatchDecisionRequest, CreateJustificationRequest, DecisionRequest, PunchRequest,
        UpdateEntryRequest, UpsertEntryRequest,
    },
    entity::timesheet_entries::ActiveModel as TimesheetActive,
    error::AppError,
    middleware::auth::{AuthUser, Role},
    routes::params::{EntryQuery, SummaryQuery},
    services::timesheet_service,
    state::AppState,
};
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

async fn punch_at(
    state: &AppState,
    user: &AuthUser,
    employee_id: Uuid,
    date: NaiveDate,
    time: &str,
) -> Result<String, AppError> {
    let resp = timesheet_service::punch(
        state,
        user,
        PunchRequest {
            employee_id,
            entry_date: Some(date),
            time: Some(time.into()),
            kind: None,
        },
    )
    .await?;
    Ok(resp.data.unwrap().status)
}

// Punches -> overtime pending -> approval locks the day; batch, summary and justifications.
#[tokio::test]
async fn overtime_approval_and_justification_flow() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;
    let supervisor = common::create_user(&state, Role::Supervisor, "sup@grua.local").await?;
    let operator = common::create_user(&state, Role::Employee, "op@grua.local").await?;
    let other = common::create_user(&state, Role::Employee, "outro@grua.local").await?;
    let employee_id = common::create_employee(&state, Some(&operator), "João Pereira").await?;

    // Two punches landing together on a fresh day share one row.
    let fresh_day = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
    let (first, second) = tokio::join!(
        punch_at(&state, &operator, employee_id, fresh_day, "08:00"),
        punch_at(&state, &operator, employee_id, fresh_day, "08:00"),
    );
    assert_eq!(first?, EntryStatus::EmAndamento.as_str());
    assert_eq!(second?, EntryStatus::EmAndamento.as_str());

    let replace = |clock_out: &str| UpsertEntryRequest {
        employee_id,
        entry_date: NaiveDate::from_ymd_opt(2024, 4, 3).unwrap(),
        clock_in: Some("08:00".into()),
        lunch_out: Some("12:00".into()),
        lunch_in: Some("13:00".into()),
        clock_out: Some(clock_out.into()),
        observations: None,
    };
    let (a, b) = tokio::join!(
        timesheet_service::upsert_entry(&state, &operator, replace("17:00")),
        timesheet_service::upsert_entry(&state, &operator, replace("16:45")),
    );
    a?;
    b?;

    let april = timesheet_service::list_entries(
        &state,
        &supervisor,
        EntryQuery {
            employee_id: Some(employee_id),
            from: NaiveDate::from_ymd_opt(2024, 4, 1),
            to: NaiveDate::from_ymd_opt(2024, 4, 30),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(april.items.len(), 2);
    let punched = april
        .items
        .iter()
        .find(|e| e.entry_date == fresh_day)
        .expect("punched day");
    assert_eq!(punched.clock_in.as_deref(), Some("08:00"));
    assert_eq!(punched.lunch_out.as_deref(), Some("08:00"));

    // Another employee cannot punch for João.
    let denied = punch_at(&state, &other, employee_id, day(4), "08:00").await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    for time in ["08:00", "12:00", "13:00"] {
        punch_at(&state, &operator, employee_id, day(4), time).await?;
    }
    let status = punch_at(&state, &operator, employee_id, day(4), "19:00").await?;
    assert_eq!(status, EntryStatus::PendenteAprovacao.as_str());

    let closed = punch_at(&state, &operator, employee_id, day(4), "19:30").await;
    assert!(matches!(closed, Err(AppError::BadRequest(_))));

    let normal_day = timesheet_service::upsert_entry(
        &state,
        &operator,
        UpsertEntryRequest {
            employee_id,
            entry_date: day(5),
            clock_in: Some("08:00".into()),
            lunch_out: Some("12:00".into()),
            lunch_in: Some("13:00".into()),
            clock_out: Some("17:00".into()),
            observations: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(normal_day.worked_hours, 8.0);
    assert_eq!(normal_day.status, EntryStatus::Completo.as_str());

    // A pending day without overtime is not offered for a decision.
    TimesheetActive {
        id: Set(Uuid::new_v4()),
        employee_id: Set(employee_id),
        entry_date: Set(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()),
        status: Set(EntryStatus::PendenteAprovacao.as_str().into()),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;

    let pending_resp =
        timesheet_service::pending_overtime(&state, &supervisor, EntryQuery::default()).await?;
    assert_eq!(pending_resp.meta.as_ref().and_then(|m| m.total), Some(1));
    let pending = pending_resp.data.unwrap();
    assert_eq!(pending.items.len(), 1);
    let entry = &pending.items[0];
    assert_eq!(entry.overtime_hours, 2.0);

    let by_employee = timesheet_service::decide_overtime(
        &state,
        &operator,
        entry.id,
        Decision::Approve,
        DecisionRequest {
            justification: "eu mesmo".into(),
        },
    )
    .await;
    assert!(matches!(by_employee, Err(AppError::Forbidden)));

    let approved = timesheet_service::decide_overtime(
        &state,
        &supervisor,
        entry.id,
        Decision::Approve,
        DecisionRequest {
            justification: "Concretagem da laje".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(approved.status, EntryStatus::Aprovado.as_str());
    assert_eq!(approved.approved_by, Some(supervisor.user_id));
    assert!(
        approved
            .observations
            .as_deref()
            .unwrap_or_default()
            .contains("Concretagem da laje")
    );

    let locked = timesheet_service::update_entry(
        &state,
        &operator,
        entry.id,
        UpdateEntryRequest {
            clock_in: None,
            lunch_out: None,
            lunch_in: None,
            clock_out: Some("21:00".into()),
            observations: None,
        },
    )
    .await;
    assert!(matches!(locked, Err(AppError::BadRequest(_))));

    let batch = timesheet_service::decide_batch(
        &state,
        &supervisor,
        Decision::Reject,
        BatchDecisionRequest {
            ids: vec![entry.id, Uuid::new_v4()],
            justification: "Sem autorização".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(batch.succeeded, 0);
    assert_eq!(batch.failed, 2);

    let oversized = timesheet_service::decide_batch(
        &state,
        &supervisor,
        Decision::Approve,
        BatchDecisionRequest {
            ids: (0..51).map(|_| Uuid::new_v4()).collect(),
            justification: "Fechamento do mês".into(),
        },
    )
    .await;
    assert!(matches!(oversized, Err(AppError::BadRequest(_))));

    let summary = timesheet_service::summary(
        &state,
        &supervisor,
        SummaryQuery {
            employee_id: Some(employee_id),
            from: day(1),
            to: day(31),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(summary.items.len(), 1);
    let totals = &summary.items[0].totals;
    assert_eq!(totals.days_worked, 2);
    assert_eq!(totals.total_hours, 18.0);
    assert_eq!(totals.approved_overtime_hours, 2.0);

    let tomorrow = Local::now().date_naive() + Duration::days(1);
    let future = timesheet_service::create_justification(
        &state,
        &operator,
        CreateJustificationRequest {
            employee_id,
            entry_date: tomorrow,
            kind: JustificationKind::Falta,
            reason: "Consulta médica".into(),
        },
    )
    .await;
    assert!(matches!(future, Err(AppError::BadRequest(_))));

    let justification = timesheet_service::create_justification(
        &state,
        &operator,
        CreateJustificationRequest {
            employee_id,
            entry_date: day(6),
            kind: JustificationKind::Atraso,
            reason: "Trânsito interrompido".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(justification.status, "Pendente");

    let reviewed = timesheet_service::review_justification(
        &state,
        &supervisor,
        justification.id,
        Decision::Approve,
    )
    .await?
    .data
    .unwrap();
    assert_eq!(reviewed.status, "Aprovada");
    let again = timesheet_service::review_justification(
        &state,
        &supervisor,
        justification.id,
        Decision::Reject,
    )
    .await;
    assert!(matches!(again, Err(AppError::BadRequest(_))));

    Ok(())
}
