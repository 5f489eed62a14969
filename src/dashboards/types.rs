use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether the figures come from stored tickets or the built-in sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsSource {
    Database,
    Sample,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_tickets: i64,
    pub open_tickets: i64,
    pub resolved_tickets: i64,
    /// Hours.
    pub average_resolution_time: f64,
    /// Percent. Placeholder, not measured.
    pub classification_accuracy: f64,
    pub department_distribution: BTreeMap<String, i64>,
    pub severity_distribution: BTreeMap<String, i64>,
    pub data_source: StatsSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct RealTimeStats {
    pub timestamp: DateTime<Utc>,
    pub active_tickets: i64,
    pub tickets_today: i64,
    /// Percent of all tickets that are resolved or closed.
    pub resolution_rate: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendsQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub tickets_created: i64,
    pub tickets_resolved: i64,
    pub average_resolution_time: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendsResponse {
    pub trends: Vec<TrendPoint>,
    pub period_days: i64,
}
