use axum::{extract::State, routing::post, Json, Router};
use log::info;
use serde::Serialize;
use std::sync::Arc;

use crate::classifier::{ClassificationResult, Classifier};
use crate::core::shared::error::{ApiError, AppJson};
use crate::core::shared::models::{db_ticket_to_ticket, Ticket};
use crate::core::shared::state::AppState;
use crate::reports::service::{ReportRequest, ReportResponse, CREATED_MESSAGE, MOCK_CREATED_MESSAGE};
use crate::reports::store_report;

#[derive(Debug, Serialize)]
pub struct ClassifyAndCreateResponse {
    pub success: bool,
    pub ticket: Ticket,
    pub classification: ClassificationResult,
    pub report_result: ReportResponse,
}

async fn classify_and_store(
    state: &AppState,
    classifier: &dyn Classifier,
    report: ReportRequest,
    message: &'static str,
) -> Result<ClassifyAndCreateResponse, ApiError> {
    let classification = classifier
        .classify(
            &report.description,
            report.error_message.as_deref(),
            report.context.as_deref(),
        )
        .await;

    let (report_result, ticket) = store_report(state, report, Some(classification.clone()), message)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to classify and create ticket: {e}")))?;

    info!(
        "Created ticket {} routed to {}/{}",
        ticket.id, classification.department, classification.severity
    );

    Ok(ClassifyAndCreateResponse {
        success: true,
        ticket: db_ticket_to_ticket(ticket),
        classification,
        report_result,
    })
}

pub async fn classify_and_create_ticket(
    State(state): State<Arc<AppState>>,
    AppJson(report): AppJson<ReportRequest>,
) -> Result<Json<ClassifyAndCreateResponse>, ApiError> {
    report.validate()?;
    let classifier = state.require_classifier()?;
    info!("Processing classify-and-create-ticket request for: {}", report.name);

    let response = classify_and_store(&state, classifier.as_ref(), report, CREATED_MESSAGE).await?;
    Ok(Json(response))
}

/// Same flow with the offline keyword classifier; no external calls.
pub async fn classify_and_create_ticket_mock(
    State(state): State<Arc<AppState>>,
    AppJson(report): AppJson<ReportRequest>,
) -> Result<Json<ClassifyAndCreateResponse>, ApiError> {
    report.validate()?;
    info!("Processing mock classify-and-create-ticket request for: {}", report.name);

    let classifier = state.mock_classifier.clone();
    let response =
        classify_and_store(&state, classifier.as_ref(), report, MOCK_CREATED_MESSAGE).await?;
    Ok(Json(response))
}

pub fn configure_combined_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/combined/classify-and-create-ticket",
            post(classify_and_create_ticket),
        )
        .route(
            "/api/combined/classify-and-create-ticket-mock",
            post(classify_and_create_ticket_mock),
        )
}
