use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;

use super::types::{DashboardStats, RealTimeStats, StatsSource, TrendPoint};
use crate::core::shared::enums::{Department, Severity};
use crate::core::shared::models::DbTicket;
use crate::tickets::repository::{mean_resolution_hours, TicketRepository};

/// Reported as-is until classifications are checked against outcomes.
pub const PLACEHOLDER_CLASSIFICATION_ACCURACY: f64 = 94.5;

const SAMPLE_RESOLVED_SHARE: f64 = 0.73;
const SAMPLE_AVERAGE_RESOLUTION_HOURS: f64 = 2.4;

pub const MIN_TREND_DAYS: i64 = 1;
pub const MAX_TREND_DAYS: i64 = 90;
pub const DEFAULT_TREND_DAYS: i64 = 7;

pub fn get_stats(conn: &mut SqliteConnection) -> QueryResult<DashboardStats> {
    let mut repo = TicketRepository::new(conn);
    Ok(DashboardStats {
        total_tickets: repo.count_all()?,
        open_tickets: repo.count_open()?,
        resolved_tickets: repo.count_resolved()?,
        average_resolution_time: repo.average_resolution_hours()?,
        classification_accuracy: PLACEHOLDER_CLASSIFICATION_ACCURACY,
        department_distribution: repo.department_distribution()?,
        severity_distribution: repo.severity_distribution()?,
        data_source: StatsSource::Database,
    })
}

/// Shown when there are no tickets yet or the store cannot be read.
/// Both distributions sum to the same total.
pub fn sample_stats() -> DashboardStats {
    let department_distribution: BTreeMap<String, i64> = [
        (Department::Backend, 45),
        (Department::Frontend, 30),
        (Department::Database, 15),
        (Department::DevOps, 25),
        (Department::Security, 20),
        (Department::Api, 35),
    ]
    .into_iter()
    .map(|(d, n)| (d.as_str().to_string(), n))
    .collect();

    let severity_distribution: BTreeMap<String, i64> = [
        (Severity::Low, 65),
        (Severity::Medium, 50),
        (Severity::High, 35),
        (Severity::Critical, 20),
    ]
    .into_iter()
    .map(|(s, n)| (s.as_str().to_string(), n))
    .collect();

    let total_tickets: i64 = department_distribution.values().sum();
    let resolved_tickets = (total_tickets as f64 * SAMPLE_RESOLVED_SHARE).floor() as i64;

    DashboardStats {
        total_tickets,
        open_tickets: total_tickets - resolved_tickets,
        resolved_tickets,
        average_resolution_time: SAMPLE_AVERAGE_RESOLUTION_HOURS,
        classification_accuracy: PLACEHOLDER_CLASSIFICATION_ACCURACY,
        department_distribution,
        severity_distribution,
        data_source: StatsSource::Sample,
    }
}

pub fn get_real_time_stats(conn: &mut SqliteConnection) -> QueryResult<RealTimeStats> {
    let now = Utc::now();
    let midnight = now.date_naive().and_time(NaiveTime::MIN);

    let mut repo = TicketRepository::new(conn);
    let total = repo.count_all()?;
    let resolved = repo.count_resolved()?;

    Ok(RealTimeStats {
        timestamp: now,
        active_tickets: repo.count_open()?,
        tickets_today: repo.count_created_since(midnight)?,
        resolution_rate: resolution_rate(resolved, total),
    })
}

/// Percent with one decimal; 0.0 for an empty store.
pub fn resolution_rate(resolved: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (resolved as f64 / total as f64 * 1000.0).round() / 10.0
}

pub fn get_trends(conn: &mut SqliteConnection, days: i64) -> QueryResult<Vec<TrendPoint>> {
    let today = Utc::now().date_naive();
    let (start, end) = trend_window(today, days);

    let mut repo = TicketRepository::new(conn);
    let created = repo.list_by_date_range(start, end)?;
    let resolved = repo.list_resolved_between(start, end)?;
    Ok(build_trends(today, days, &created, &resolved))
}

fn trend_window(today: NaiveDate, days: i64) -> (NaiveDateTime, NaiveDateTime) {
    let first_day = today - Duration::days(days - 1);
    let start = first_day.and_time(NaiveTime::MIN);
    let end = (today + Duration::days(1)).and_time(NaiveTime::MIN) - Duration::microseconds(1);
    (start, end)
}

/// One point per day ending at `today`, oldest first. Resolution time for a
/// day covers the tickets resolved on that day.
pub fn build_trends(
    today: NaiveDate,
    days: i64,
    created: &[DbTicket],
    resolved: &[DbTicket],
) -> Vec<TrendPoint> {
    (0..days)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let tickets_created = created
                .iter()
                .filter(|t| t.created_at.date() == date)
                .count() as i64;
            let resolved_that_day: Vec<(NaiveDateTime, NaiveDateTime)> = resolved
                .iter()
                .filter_map(|t| t.resolved_at.map(|r| (t.created_at, r)))
                .filter(|(_, r)| r.date() == date)
                .collect();

            TrendPoint {
                date,
                tickets_created,
                tickets_resolved: resolved_that_day.len() as i64,
                average_resolution_time: mean_resolution_hours(&resolved_that_day),
            }
        })
        .collect()
}
