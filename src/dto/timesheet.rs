use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::timesheet::{JustificationKind, PeriodSummary, PunchKind},
    models::{Justification, TimesheetEntry},
};

/// Day entry with explicit `HH:MM` marks.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpsertEntryRequest {
    pub employee_id: Uuid,
    pub entry_date: NaiveDate,
    pub clock_in: Option<String>,
    pub lunch_out: Option<String>,
    pub lunch_in: Option<String>,
    pub clock_out: Option<String>,
    #[validate(length(max = 2000))]
    pub observations: Option<String>,
}

/// Partial edit; absent marks keep their stored value, empty strings clear them.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateEntryRequest {
    pub clock_in: Option<String>,
    pub lunch_out: Option<String>,
    pub lunch_in: Option<String>,
    pub clock_out: Option<String>,
    #[validate(length(max = 2000))]
    pub observations: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PunchRequest {
    pub employee_id: Uuid,
    /// Defaults to today.
    pub entry_date: Option<NaiveDate>,
    /// `HH:MM`; defaults to the current time.
    pub time: Option<String>,
    /// Force a specific event, e.g. `clock_out` to skip lunch.
    pub kind: Option<PunchKind>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DecisionRequest {
    #[validate(length(min = 1, message = "justification is required"))]
    pub justification: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct BatchDecisionRequest {
    #[validate(length(
        min = 1,
        max = 50,
        message = "between 1 and 50 entries per batch"
    ))]
    pub ids: Vec<Uuid>,
    #[validate(length(min = 1, message = "justification is required"))]
    pub justification: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchOutcome {
    pub id: Uuid,
    pub ok: bool,
    pub status: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchResult {
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<BatchOutcome>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct EntryList {
    #[schema(value_type = Vec<TimesheetEntry>)]
    pub items: Vec<TimesheetEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeSummary {
    pub employee_id: Uuid,
    pub employee_name: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(flatten)]
    pub totals: PeriodSummary,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct SummaryList {
    #[schema(value_type = Vec<EmployeeSummary>)]
    pub items: Vec<EmployeeSummary>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateJustificationRequest {
    pub employee_id: Uuid,
    pub entry_date: NaiveDate,
    pub kind: JustificationKind,
    #[validate(length(min = 1, max = 2000, message = "reason is required"))]
    pub reason: String,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct JustificationList {
    #[schema(value_type = Vec<Justification>)]
    pub items: Vec<Justification>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(n: usize) -> BatchDecisionRequest {
        BatchDecisionRequest {
            ids: (0..n).map(|_| Uuid::new_v4()).collect(),
            justification: "Fechamento do mês".into(),
        }
    }

    #[test]
    fn batch_size_is_capped() {
        assert!(batch(0).validate().is_err());
        assert!(batch(50).validate().is_ok());
        assert!(batch(51).validate().is_err());
    }
}
