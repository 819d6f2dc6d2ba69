use std::{env, time::Duration};

use anyhow::Context;
use chrono::NaiveTime;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub timesheet: TimesheetPolicy,
    pub stock_alert_debounce: Duration,
}

/// Working-day rules used to compute worked hours, overtime and entry status.
#[derive(Debug, Clone)]
pub struct TimesheetPolicy {
    pub workday_hours: f64,
    pub expected_clock_in: NaiveTime,
    pub late_tolerance_minutes: i64,
    pub min_complete_hours: f64,
}

impl Default for TimesheetPolicy {
    fn default() -> Self {
        Self {
            workday_hours: 8.0,
            expected_clock_in: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            late_tolerance_minutes: 15,
            min_complete_hours: 7.5,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);

        let defaults = TimesheetPolicy::default();
        let expected_clock_in = match env::var("EXPECTED_CLOCK_IN") {
            Ok(raw) => NaiveTime::parse_from_str(&raw, "%H:%M")
                .with_context(|| format!("EXPECTED_CLOCK_IN must be HH:MM, got {raw}"))?,
            Err(_) => defaults.expected_clock_in,
        };
        let timesheet = TimesheetPolicy {
            workday_hours: parse_or("WORKDAY_HOURS", defaults.workday_hours),
            expected_clock_in,
            late_tolerance_minutes: parse_or(
                "LATE_TOLERANCE_MINUTES",
                defaults.late_tolerance_minutes,
            ),
            min_complete_hours: parse_or("MIN_COMPLETE_HOURS", defaults.min_complete_hours),
        };

        let stock_alert_debounce =
            Duration::from_millis(parse_or("STOCK_ALERT_DEBOUNCE_MS", 500_u64));

        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            timesheet,
            stock_alert_debounce,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
