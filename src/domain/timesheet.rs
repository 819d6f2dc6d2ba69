//! Day-entry hour computation and the overtime approval rules.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::TimesheetPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EntryStatus {
    #[serde(rename = "Falta")]
    Falta,
    #[serde(rename = "Em Andamento")]
    EmAndamento,
    #[serde(rename = "Atraso")]
    Atraso,
    #[serde(rename = "Pendente Aprovação")]
    PendenteAprovacao,
    #[serde(rename = "Incompleto")]
    Incompleto,
    #[serde(rename = "Completo")]
    Completo,
    #[serde(rename = "Aprovado")]
    Aprovado,
    #[serde(rename = "Rejeitado")]
    Rejeitado,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Falta => "Falta",
            EntryStatus::EmAndamento => "Em Andamento",
            EntryStatus::Atraso => "Atraso",
            EntryStatus::PendenteAprovacao => "Pendente Aprovação",
            EntryStatus::Incompleto => "Incompleto",
            EntryStatus::Completo => "Completo",
            EntryStatus::Aprovado => "Aprovado",
            EntryStatus::Rejeitado => "Rejeitado",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        [
            EntryStatus::Falta,
            EntryStatus::EmAndamento,
            EntryStatus::Atraso,
            EntryStatus::PendenteAprovacao,
            EntryStatus::Incompleto,
            EntryStatus::Completo,
            EntryStatus::Aprovado,
            EntryStatus::Rejeitado,
        ]
        .into_iter()
        .find(|status| status.as_str() == value)
    }

    /// Overtime decisions are final; their clock times are frozen.
    pub fn is_decided(&self) -> bool {
        matches!(self, EntryStatus::Aprovado | EntryStatus::Rejeitado)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockTimes {
    pub clock_in: Option<NaiveTime>,
    pub lunch_out: Option<NaiveTime>,
    pub lunch_in: Option<NaiveTime>,
    pub clock_out: Option<NaiveTime>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayComputation {
    pub worked_hours: f64,
    pub overtime_hours: f64,
    pub status: EntryStatus,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimesheetError {
    #[error("invalid time {0}, expected HH:MM")]
    InvalidTime(String),
    #[error("entry is {0} and has no overtime awaiting a decision")]
    NotPendingOvertime(&'static str),
    #[error("a justification is required")]
    MissingJustification,
    #[error("entry already decided as {0}; clock times are locked")]
    Locked(&'static str),
    #[error("all clock events for this day are already recorded")]
    DayClosed,
    #[error("{0} must not be earlier than {1}")]
    OutOfOrder(&'static str, &'static str),
    #[error("justification date {0} is in the future")]
    FutureDate(NaiveDate),
    #[error("justification is {0}, only pending ones can be reviewed")]
    AlreadyReviewed(&'static str),
}

/// Parse an `HH:MM` clock mark.
pub fn parse_clock(raw: &str) -> Result<NaiveTime, TimesheetError> {
    let trimmed = raw.trim();
    let valid_shape = trimmed.len() == 5 && trimmed.as_bytes()[2] == b':';
    if !valid_shape {
        return Err(TimesheetError::InvalidTime(raw.to_string()));
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .map_err(|_| TimesheetError::InvalidTime(raw.to_string()))
}

pub fn parse_optional_clock(raw: Option<&str>) -> Result<Option<NaiveTime>, TimesheetError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_clock(value).map(Some),
    }
}

fn minutes_between(from: NaiveTime, to: NaiveTime) -> i64 {
    (to - from).num_minutes()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Worked minutes: clock-out minus clock-in minus the lunch interval, floored at zero.
pub fn worked_minutes(times: &ClockTimes) -> i64 {
    let (Some(clock_in), Some(clock_out)) = (times.clock_in, times.clock_out) else {
        return 0;
    };
    let lunch = match (times.lunch_out, times.lunch_in) {
        (Some(out), Some(back)) => minutes_between(out, back),
        _ => 0,
    };
    (minutes_between(clock_in, clock_out) - lunch).max(0)
}

pub fn compute_day(times: &ClockTimes, policy: &TimesheetPolicy) -> DayComputation {
    let worked_hours = round2(worked_minutes(times) as f64 / 60.0);
    let overtime_hours = round2((worked_hours - policy.workday_hours).max(0.0));

    let status = match (times.clock_in, times.clock_out) {
        (None, _) => EntryStatus::Falta,
        (Some(_), None) => EntryStatus::EmAndamento,
        (Some(clock_in), Some(_)) => {
            let late = minutes_between(policy.expected_clock_in, clock_in)
                > policy.late_tolerance_minutes;
            if late {
                if overtime_hours > 0.0 {
                    EntryStatus::PendenteAprovacao
                } else {
                    EntryStatus::Atraso
                }
            } else if overtime_hours > 0.0 {
                EntryStatus::PendenteAprovacao
            } else if worked_hours < policy.min_complete_hours {
                EntryStatus::Incompleto
            } else {
                EntryStatus::Completo
            }
        }
    };

    DayComputation {
        worked_hours,
        overtime_hours,
        status,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PunchKind {
    ClockIn,
    LunchOut,
    LunchIn,
    ClockOut,
}

impl PunchKind {
    fn label(&self) -> &'static str {
        match self {
            PunchKind::ClockIn => "clock_in",
            PunchKind::LunchOut => "lunch_out",
            PunchKind::LunchIn => "lunch_in",
            PunchKind::ClockOut => "clock_out",
        }
    }
}

/// Next clock event expected for the day, in the order in → lunch out → lunch in → out.
pub fn next_punch(times: &ClockTimes) -> Option<PunchKind> {
    if times.clock_in.is_none() {
        Some(PunchKind::ClockIn)
    } else if times.lunch_out.is_none() && times.clock_out.is_none() {
        Some(PunchKind::LunchOut)
    } else if times.lunch_out.is_some() && times.lunch_in.is_none() && times.clock_out.is_none() {
        Some(PunchKind::LunchIn)
    } else if times.clock_out.is_none() {
        Some(PunchKind::ClockOut)
    } else {
        None
    }
}

/// Record a punch at `at`. `requested` may skip lunch by asking for clock-out directly.
pub fn apply_punch(
    times: &mut ClockTimes,
    at: NaiveTime,
    requested: Option<PunchKind>,
) -> Result<PunchKind, TimesheetError> {
    let expected = next_punch(times).ok_or(TimesheetError::DayClosed)?;
    let kind = match requested {
        Some(PunchKind::ClockOut) if times.clock_in.is_some() && times.clock_out.is_none() => {
            PunchKind::ClockOut
        }
        Some(kind) if kind != expected => {
            return Err(TimesheetError::OutOfOrder(kind.label(), expected.label()));
        }
        _ => expected,
    };

    let previous = [times.lunch_in, times.lunch_out, times.clock_in]
        .into_iter()
        .flatten()
        .next();
    if let Some(previous) = previous
        && at < previous
    {
        return Err(TimesheetError::OutOfOrder(kind.label(), "the previous punch"));
    }

    let slot = match kind {
        PunchKind::ClockIn => &mut times.clock_in,
        PunchKind::LunchOut => &mut times.lunch_out,
        PunchKind::LunchIn => &mut times.lunch_in,
        PunchKind::ClockOut => &mut times.clock_out,
    };
    *slot = Some(at);
    Ok(kind)
}

/// Check that explicitly entered marks follow the day's order.
pub fn validate_order(times: &ClockTimes) -> Result<(), TimesheetError> {
    let marks = [
        ("clock_in", times.clock_in),
        ("lunch_out", times.lunch_out),
        ("lunch_in", times.lunch_in),
        ("clock_out", times.clock_out),
    ];
    let mut last: Option<(&'static str, NaiveTime)> = None;
    for (label, mark) in marks {
        let Some(mark) = mark else { continue };
        if let Some((previous_label, previous)) = last
            && mark < previous
        {
            return Err(TimesheetError::OutOfOrder(label, previous_label));
        }
        last = Some((label, mark));
    }
    Ok(())
}

pub fn ensure_editable(status: EntryStatus) -> Result<(), TimesheetError> {
    if status.is_decided() {
        return Err(TimesheetError::Locked(status.as_str()));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

/// Decide on a pending overtime entry. Returns the new status.
pub fn decide_overtime(
    status: EntryStatus,
    overtime_hours: f64,
    decision: Decision,
    justification: &str,
) -> Result<EntryStatus, TimesheetError> {
    if status != EntryStatus::PendenteAprovacao || overtime_hours <= 0.0 {
        return Err(TimesheetError::NotPendingOvertime(status.as_str()));
    }
    if justification.trim().is_empty() {
        return Err(TimesheetError::MissingJustification);
    }
    Ok(match decision {
        Decision::Approve => EntryStatus::Aprovado,
        Decision::Reject => EntryStatus::Rejeitado,
    })
}

/// Append the decision note to the existing observations.
pub fn append_observation(existing: Option<&str>, decision: Decision, note: &str) -> String {
    let label = match decision {
        Decision::Approve => "Horas extras aprovadas",
        Decision::Reject => "Horas extras rejeitadas",
    };
    let line = format!("{label}: {}", note.trim());
    match existing.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => format!("{text}\n{line}"),
        None => line,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum JustificationKind {
    #[serde(rename = "Atraso")]
    Atraso,
    #[serde(rename = "Falta")]
    Falta,
    #[serde(rename = "Saída Antecipada")]
    SaidaAntecipada,
    #[serde(rename = "Ausência Parcial")]
    AusenciaParcial,
}

impl JustificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JustificationKind::Atraso => "Atraso",
            JustificationKind::Falta => "Falta",
            JustificationKind::SaidaAntecipada => "Saída Antecipada",
            JustificationKind::AusenciaParcial => "Ausência Parcial",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum JustificationStatus {
    Pendente,
    Aprovada,
    Rejeitada,
}

impl JustificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JustificationStatus::Pendente => "Pendente",
            JustificationStatus::Aprovada => "Aprovada",
            JustificationStatus::Rejeitada => "Rejeitada",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pendente" => Some(JustificationStatus::Pendente),
            "Aprovada" => Some(JustificationStatus::Aprovada),
            "Rejeitada" => Some(JustificationStatus::Rejeitada),
            _ => None,
        }
    }
}

pub fn ensure_not_future(date: NaiveDate, today: NaiveDate) -> Result<(), TimesheetError> {
    if date > today {
        return Err(TimesheetError::FutureDate(date));
    }
    Ok(())
}

pub fn review_justification(
    current: JustificationStatus,
    decision: Decision,
) -> Result<JustificationStatus, TimesheetError> {
    if current != JustificationStatus::Pendente {
        return Err(TimesheetError::AlreadyReviewed(current.as_str()));
    }
    Ok(match decision {
        Decision::Approve => JustificationStatus::Aprovada,
        Decision::Reject => JustificationStatus::Rejeitada,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct PeriodSummary {
    pub total_hours: f64,
    pub overtime_hours: f64,
    pub approved_overtime_hours: f64,
    pub days_worked: i64,
    pub late_count: i64,
    pub absence_count: i64,
    pub pending_approval: i64,
}

impl PeriodSummary {
    pub fn add(&mut self, worked_hours: f64, overtime_hours: f64, status: EntryStatus) {
        self.total_hours = round2(self.total_hours + worked_hours);
        self.overtime_hours = round2(self.overtime_hours + overtime_hours);
        if worked_hours > 0.0 {
            self.days_worked += 1;
        }
        match status {
            EntryStatus::Atraso => self.late_count += 1,
            EntryStatus::Falta => self.absence_count += 1,
            EntryStatus::PendenteAprovacao => self.pending_approval += 1,
            EntryStatus::Aprovado => {
                self.approved_overtime_hours =
                    round2(self.approved_overtime_hours + overtime_hours)
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(raw: &str) -> NaiveTime {
        parse_clock(raw).unwrap()
    }

    fn day(clock_in: &str, lunch_out: &str, lunch_in: &str, clock_out: &str) -> ClockTimes {
        ClockTimes {
            clock_in: Some(t(clock_in)),
            lunch_out: Some(t(lunch_out)),
            lunch_in: Some(t(lunch_in)),
            clock_out: Some(t(clock_out)),
        }
    }

    #[test]
    fn regular_day_is_complete() {
        let result = compute_day(
            &day("08:00", "12:00", "13:00", "17:00"),
            &TimesheetPolicy::default(),
        );
        assert_eq!(result.worked_hours, 8.0);
        assert_eq!(result.overtime_hours, 0.0);
        assert_eq!(result.status, EntryStatus::Completo);
    }

    #[test]
    fn long_day_awaits_overtime_approval() {
        let result = compute_day(
            &day("08:00", "12:00", "13:00", "19:00"),
            &TimesheetPolicy::default(),
        );
        assert_eq!(result.worked_hours, 10.0);
        assert_eq!(result.overtime_hours, 2.0);
        assert_eq!(result.status, EntryStatus::PendenteAprovacao);
    }

    #[test]
    fn late_arrival_without_overtime_is_late() {
        let result = compute_day(
            &day("08:30", "12:00", "13:00", "17:30"),
            &TimesheetPolicy::default(),
        );
        assert_eq!(result.worked_hours, 8.0);
        assert_eq!(result.status, EntryStatus::Atraso);
    }

    #[test]
    fn late_arrival_with_overtime_still_needs_approval() {
        let result = compute_day(
            &day("08:40", "12:00", "13:00", "19:00"),
            &TimesheetPolicy::default(),
        );
        assert_eq!(result.overtime_hours, 1.33);
        assert_eq!(result.status, EntryStatus::PendenteAprovacao);
    }

    #[test]
    fn tolerance_is_inclusive() {
        let result = compute_day(
            &day("08:15", "12:00", "13:00", "17:15"),
            &TimesheetPolicy::default(),
        );
        assert_eq!(result.status, EntryStatus::Completo);
    }

    #[test]
    fn missing_marks() {
        let policy = TimesheetPolicy::default();
        assert_eq!(compute_day(&ClockTimes::default(), &policy).status, EntryStatus::Falta);

        let open = ClockTimes {
            clock_in: Some(t("08:00")),
            ..ClockTimes::default()
        };
        let result = compute_day(&open, &policy);
        assert_eq!(result.status, EntryStatus::EmAndamento);
        assert_eq!(result.worked_hours, 0.0);
    }

    #[test]
    fn short_day_is_incomplete() {
        let result = compute_day(
            &day("08:00", "12:00", "13:00", "16:00"),
            &TimesheetPolicy::default(),
        );
        assert_eq!(result.worked_hours, 7.0);
        assert_eq!(result.status, EntryStatus::Incompleto);
    }

    #[test]
    fn lunch_needs_both_marks() {
        let times = ClockTimes {
            clock_in: Some(t("08:00")),
            lunch_out: Some(t("12:00")),
            lunch_in: None,
            clock_out: Some(t("16:00")),
        };
        assert_eq!(worked_minutes(&times), 8 * 60);
    }

    #[test]
    fn parse_clock_rejects_bad_input() {
        assert!(parse_clock("8:00").is_err());
        assert!(parse_clock("24:00").is_err());
        assert!(parse_clock("12:60").is_err());
        assert_eq!(parse_optional_clock(Some("  ")).unwrap(), None);
        assert_eq!(parse_clock("07:45").unwrap(), NaiveTime::from_hms_opt(7, 45, 0).unwrap());
    }

    #[test]
    fn only_pending_overtime_can_be_decided() {
        assert_eq!(
            decide_overtime(
                EntryStatus::PendenteAprovacao,
                2.0,
                Decision::Approve,
                "obra atrasada"
            ),
            Ok(EntryStatus::Aprovado)
        );
        assert_eq!(
            decide_overtime(
                EntryStatus::PendenteAprovacao,
                2.0,
                Decision::Reject,
                "sem autorização"
            ),
            Ok(EntryStatus::Rejeitado)
        );
        assert_eq!(
            decide_overtime(EntryStatus::PendenteAprovacao, 2.0, Decision::Approve, "  "),
            Err(TimesheetError::MissingJustification)
        );
        for status in [EntryStatus::Completo, EntryStatus::Aprovado, EntryStatus::Rejeitado] {
            assert!(decide_overtime(status, 2.0, Decision::Approve, "x").is_err());
        }
        assert!(
            decide_overtime(EntryStatus::PendenteAprovacao, 0.0, Decision::Approve, "x").is_err()
        );
    }

    #[test]
    fn decided_entries_are_locked() {
        assert!(ensure_editable(EntryStatus::Aprovado).is_err());
        assert!(ensure_editable(EntryStatus::Rejeitado).is_err());
        assert!(ensure_editable(EntryStatus::PendenteAprovacao).is_ok());
    }

    #[test]
    fn observations_accumulate() {
        let first = append_observation(None, Decision::Approve, "concretagem");
        assert_eq!(first, "Horas extras aprovadas: concretagem");
        let second = append_observation(Some(&first), Decision::Reject, "duplicado");
        assert_eq!(second.lines().count(), 2);
    }

    #[test]
    fn punches_follow_day_order() {
        let mut times = ClockTimes::default();
        assert_eq!(apply_punch(&mut times, t("08:00"), None), Ok(PunchKind::ClockIn));
        assert_eq!(
            apply_punch(&mut times, t("09:00"), Some(PunchKind::LunchIn)),
            Err(TimesheetError::OutOfOrder("lunch_in", "lunch_out"))
        );
        assert_eq!(apply_punch(&mut times, t("12:00"), None), Ok(PunchKind::LunchOut));
        assert!(apply_punch(&mut times, t("11:00"), None).is_err());
        assert_eq!(apply_punch(&mut times, t("13:00"), None), Ok(PunchKind::LunchIn));
        assert_eq!(apply_punch(&mut times, t("17:00"), None), Ok(PunchKind::ClockOut));
        assert_eq!(apply_punch(&mut times, t("18:00"), None), Err(TimesheetError::DayClosed));
    }

    #[test]
    fn clock_out_may_skip_lunch() {
        let mut times = ClockTimes::default();
        apply_punch(&mut times, t("08:00"), None).unwrap();
        assert_eq!(
            apply_punch(&mut times, t("12:00"), Some(PunchKind::ClockOut)),
            Ok(PunchKind::ClockOut)
        );
        assert_eq!(next_punch(&times), None);
    }

    #[test]
    fn explicit_marks_must_be_ordered() {
        assert!(validate_order(&day("08:00", "12:00", "13:00", "17:00")).is_ok());
        assert!(validate_order(&day("08:00", "13:00", "12:00", "17:00")).is_err());
    }

    #[test]
    fn justification_rules() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert!(ensure_not_future(today, today).is_ok());
        assert!(ensure_not_future(today.succ_opt().unwrap(), today).is_err());
        assert_eq!(
            review_justification(JustificationStatus::Pendente, Decision::Approve),
            Ok(JustificationStatus::Aprovada)
        );
        assert!(review_justification(JustificationStatus::Rejeitada, Decision::Approve).is_err());
    }

    #[test]
    fn summary_counts_by_status() {
        let mut summary = PeriodSummary::default();
        summary.add(8.0, 0.0, EntryStatus::Completo);
        summary.add(10.0, 2.0, EntryStatus::Aprovado);
        summary.add(8.0, 0.0, EntryStatus::Atraso);
        summary.add(0.0, 0.0, EntryStatus::Falta);

        assert_eq!(summary.total_hours, 26.0);
        assert_eq!(summary.overtime_hours, 2.0);
        assert_eq!(summary.approved_overtime_hours, 2.0);
        assert_eq!(summary.days_worked, 3);
        assert_eq!(summary.late_count, 1);
        assert_eq!(summary.absence_count, 1);
    }

    #[test]
    fn status_labels_round_trip() {
        assert_eq!(
            EntryStatus::parse("Pendente Aprovação"),
            Some(EntryStatus::PendenteAprovacao)
        );
        assert_eq!(EntryStatus::parse("pendente"), None);
    }
}
