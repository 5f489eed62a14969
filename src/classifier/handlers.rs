use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use log::info;
use serde::Deserialize;

use super::ClassificationResult;
use crate::core::shared::error::{ApiError, AppJson};
use crate::core::shared::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClassificationRequest {
    pub error_description: String,
    pub error_message: Option<String>,
    pub context: Option<String>,
}

pub async fn classify_error(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<ClassificationRequest>,
) -> Result<Json<ClassificationResult>, ApiError> {
    if req.error_description.trim().is_empty() {
        return Err(ApiError::validation(
            "error_description",
            "error_description must not be empty",
        ));
    }

    let classifier = state.require_classifier()?;
    let preview: String = req.error_description.chars().take(100).collect();
    info!("Classifying error: {preview}");

    let result = classifier
        .classify(
            &req.error_description,
            req.error_message.as_deref(),
            req.context.as_deref(),
        )
        .await;

    Ok(Json(result))
}

pub fn configure_classifier_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/classification", post(classify_error))
}
