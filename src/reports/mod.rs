pub mod legacy;
pub mod service;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use log::{error, info, warn};
use std::sync::Arc;

use crate::classifier::ClassificationResult;
use crate::core::shared::error::{ApiError, AppJson};
use crate::core::shared::models::DbTicket;
use crate::core::shared::state::AppState;
use crate::core::shared::utils::run_blocking;

use legacy::LegacyForwarder;
use service::{
    create_ticket_from_report, ReportRequest, ReportResponse, CREATED_MESSAGE, FAILED_MESSAGE,
    MOCK_CREATED_MESSAGE,
};

/// Persists a report (and its classification) off the async workers.
pub async fn store_report(
    state: &AppState,
    report: ReportRequest,
    classification: Option<ClassificationResult>,
    message: &'static str,
) -> Result<(ReportResponse, DbTicket), ApiError> {
    run_blocking(&state.conn, move |conn| {
        Ok(create_ticket_from_report(
            conn,
            &report,
            classification.as_ref(),
            message,
        )?)
    })
    .await
}

async fn respond(
    state: &AppState,
    report: ReportRequest,
    message: &'static str,
) -> (StatusCode, Json<ReportResponse>) {
    match store_report(state, report, None, message).await {
        Ok((response, ticket)) => {
            info!("Ticket created from report with ID: {}", ticket.id);
            (StatusCode::OK, Json(response))
        }
        Err(e) => {
            error!("Error creating ticket from report: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ReportResponse::failed(FAILED_MESSAGE)),
            )
        }
    }
}

pub async fn create_report(
    State(state): State<Arc<AppState>>,
    AppJson(report): AppJson<ReportRequest>,
) -> Result<(StatusCode, Json<ReportResponse>), ApiError> {
    report.validate()?;
    info!("Creating ticket from report: {}", report.name);
    Ok(respond(&state, report, CREATED_MESSAGE).await)
}

pub async fn create_mock_report(
    State(state): State<Arc<AppState>>,
    AppJson(report): AppJson<ReportRequest>,
) -> Result<(StatusCode, Json<ReportResponse>), ApiError> {
    report.validate()?;
    info!("Creating mock ticket from report: {}", report.name);
    Ok(respond(&state, report, MOCK_CREATED_MESSAGE).await)
}

/// Deprecated: forwards to `TICKET_API_ENDPOINT` without storing anything.
pub async fn send_legacy_report(
    State(state): State<Arc<AppState>>,
    AppJson(report): AppJson<ReportRequest>,
) -> Result<Json<ReportResponse>, ApiError> {
    report.validate()?;
    warn!("Deprecated /api/reports/legacy called for report: {}", report.name);

    let forwarder = LegacyForwarder::new(&state.http_client, &state.config.ticket_api_endpoint);
    Ok(Json(forwarder.forward(&report).await))
}

pub fn configure_reports_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/reports", post(create_report))
        .route("/api/reports/mock", post(create_mock_report))
        .route("/api/reports/legacy", post(send_legacy_report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shared::test_utils::{test_config, test_pool, test_state};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_create_report() {
        let (_dir, state) = test_state();
        let app = configure_reports_routes().with_state(state);

        let (status, body) = post_json(
            app,
            "/api/reports",
            json!({"name": "Crash", "keywords": ["crash"], "description": "App crashes"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Ticket created successfully");
        assert!(body["ticket_id"].is_string());
    }

    #[tokio::test]
    async fn test_mock_report_message() {
        let (_dir, state) = test_state();
        let app = configure_reports_routes().with_state(state);

        let (_, body) = post_json(
            app,
            "/api/reports/mock",
            json!({"name": "Crash", "keywords": [], "description": "App crashes"}),
        )
        .await;

        assert_eq!(body["message"], "Mock ticket created successfully");
    }

    #[tokio::test]
    async fn test_store_failure_is_500_envelope() {
        let (_dir, pool) = test_pool();
        {
            use diesel::connection::SimpleConnection;
            let mut conn = pool.get().unwrap();
            conn.batch_execute("DROP TABLE classifications; DROP TABLE tickets;")
                .unwrap();
        }
        let state = Arc::new(AppState::new(pool, test_config()).unwrap());
        let app = configure_reports_routes().with_state(state);

        let (status, body) = post_json(
            app,
            "/api/reports",
            json!({"name": "Crash", "description": "App crashes"}),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"success": false, "message": "Failed to create ticket", "ticket_id": null})
        );
    }

    #[tokio::test]
    async fn test_empty_name_is_422() {
        let (_dir, state) = test_state();
        let app = configure_reports_routes().with_state(state);
        let (status, body) = post_json(
            app,
            "/api/reports",
            json!({"name": "", "description": "App crashes"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "name");
    }
}
