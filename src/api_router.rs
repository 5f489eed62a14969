//! Combines the per-module routers into the application router.

use axum::Router;
use std::sync::Arc;

use crate::core::shared::state::AppState;

pub fn configure_api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(crate::tickets::configure_tickets_routes())
        .merge(crate::classifications::configure_classifications_routes())
        .merge(crate::classifier::configure_classifier_routes())
        .merge(crate::reports::configure_reports_routes())
        .merge(crate::combined::configure_combined_routes())
        .merge(crate::dashboards::configure_dashboards_routes())
}

/// Full application without middleware layers.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(crate::main_module::configure_health_routes())
        .merge(configure_api_routes())
        .with_state(state)
}
