pub mod service;
pub mod types;

use axum::{extract::State, routing::get, Json, Router};
use log::{info, warn};
use std::sync::Arc;

use crate::core::shared::error::{ApiError, AppQuery};
use crate::core::shared::state::AppState;
use crate::core::shared::utils::run_blocking;

use service::{DEFAULT_TREND_DAYS, MAX_TREND_DAYS, MIN_TREND_DAYS};
use types::{DashboardStats, RealTimeStats, TrendsQuery, TrendsResponse};

/// Falls back to the sample payload when the store is empty or unreadable.
pub async fn handle_get_stats(State(state): State<Arc<AppState>>) -> Json<DashboardStats> {
    let stats = match run_blocking(&state.conn, |conn| Ok(service::get_stats(conn)?)).await {
        Ok(stats) if stats.total_tickets > 0 => {
            info!("Dashboard stats from database: {} total tickets", stats.total_tickets);
            stats
        }
        Ok(_) => {
            warn!("No tickets found in database, returning sample stats");
            service::sample_stats()
        }
        Err(e) => {
            warn!("Error getting dashboard stats, returning sample stats: {e}");
            service::sample_stats()
        }
    };
    Json(stats)
}

pub async fn handle_get_real_time_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RealTimeStats>, ApiError> {
    let stats = run_blocking(&state.conn, |conn| Ok(service::get_real_time_stats(conn)?)).await?;
    Ok(Json(stats))
}

pub async fn handle_get_trends(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<TrendsQuery>,
) -> Result<Json<TrendsResponse>, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_TREND_DAYS);
    if !(MIN_TREND_DAYS..=MAX_TREND_DAYS).contains(&days) {
        return Err(ApiError::validation(
            "days",
            format!("days must be between {MIN_TREND_DAYS} and {MAX_TREND_DAYS}"),
        ));
    }

    let trends = run_blocking(&state.conn, move |conn| Ok(service::get_trends(conn, days)?)).await?;
    Ok(Json(TrendsResponse {
        trends,
        period_days: days,
    }))
}

pub fn configure_dashboards_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/dashboard/stats", get(handle_get_stats))
        .route("/api/dashboard/stats/real-time", get(handle_get_real_time_stats))
        .route("/api/dashboard/stats/trends", get(handle_get_trends))
}
