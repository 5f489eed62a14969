//! Health, readiness and service info handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

use crate::core::shared::state::AppState;

pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let db_ok = state.conn.get().is_ok();

    let status = if db_ok { "healthy" } else { "degraded" };
    let code = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(serde_json::json!({
            "status": status,
            "services": {
                "database": db_ok,
                "report_service": db_ok,
                "classifier": state.classifier_available()
            }
        })),
    )
}

pub async fn readiness_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ready" }))
}

pub async fn liveness_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "alive" }))
}

pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Ticket Assistant API is running",
        "status": "healthy",
        "classifier_available": state.classifier_available(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn configure_health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .route("/health/live", get(liveness_check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shared::test_utils::test_state;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let (_dir, state) = test_state();
        let app = configure_health_routes().with_state(state);

        let (status, body) = get_json(app.clone(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["services"]["database"], true);
        assert_eq!(body["services"]["classifier"], false);

        let (_, body) = get_json(app.clone(), "/health/ready").await;
        assert_eq!(body["status"], "ready");
        let (_, body) = get_json(app.clone(), "/health/live").await;
        assert_eq!(body["status"], "alive");

        let (_, body) = get_json(app, "/").await;
        assert_eq!(body["classifier_available"], false);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
