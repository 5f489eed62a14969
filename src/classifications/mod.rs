pub mod storage;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::shared::error::{ApiError, AppJson, AppQuery};
use crate::core::shared::models::{
    db_classification_to_classification, encode_actions, Classification, ClassificationChangeset,
};
use crate::core::shared::pagination::{page_params, PageMeta};
use crate::core::shared::state::AppState;
use crate::core::shared::utils::run_blocking;
use crate::tickets::repository::TicketRepository;

use storage::{
    delete_classification, get_classification, insert_classification, list_classifications,
    list_for_ticket, update_classification,
};

#[derive(Debug, Deserialize)]
pub struct CreateClassificationRequest {
    pub ticket_id: String,
    pub confidence: f64,
    pub reasoning: String,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateClassificationRequest {
    pub confidence: Option<f64>,
    pub reasoning: Option<String>,
    pub suggested_actions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListClassificationsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub ticket_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClassificationListResponse {
    pub classifications: Vec<Classification>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct DeleteClassificationResponse {
    pub message: String,
    pub classification_id: String,
}

fn classification_not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Classification {id} not found"))
}

fn ticket_not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Ticket {id} not found"))
}

pub async fn list_all(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<ListClassificationsQuery>,
) -> Result<Json<ClassificationListResponse>, ApiError> {
    let (page, per_page) = page_params(query.page, query.per_page)?;
    let ticket_id = query.ticket_id;

    let (rows, total) = run_blocking(&state.conn, move |conn| {
        Ok(list_classifications(conn, ticket_id.as_deref(), page, per_page)?)
    })
    .await?;

    Ok(Json(ClassificationListResponse {
        classifications: rows
            .into_iter()
            .map(db_classification_to_classification)
            .collect(),
        meta: PageMeta::new(total, page, per_page),
    }))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateClassificationRequest>,
) -> Result<(StatusCode, Json<Classification>), ApiError> {
    let row = run_blocking(&state.conn, move |conn| {
        if TicketRepository::new(conn).get_by_id(&req.ticket_id)?.is_none() {
            return Err(ticket_not_found(&req.ticket_id));
        }
        Ok(insert_classification(
            conn,
            &req.ticket_id,
            req.confidence,
            &req.reasoning,
            &req.suggested_actions,
        )?)
    })
    .await?;

    log::info!("Stored classification {} for ticket {}", row.id, row.ticket_id);
    Ok((
        StatusCode::CREATED,
        Json(db_classification_to_classification(row)),
    ))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Classification>, ApiError> {
    let row = run_blocking(&state.conn, move |conn| {
        get_classification(conn, &id)?.ok_or_else(|| classification_not_found(&id))
    })
    .await?;

    Ok(Json(db_classification_to_classification(row)))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateClassificationRequest>,
) -> Result<Json<Classification>, ApiError> {
    let changes = ClassificationChangeset {
        confidence: req.confidence,
        reasoning: req.reasoning,
        suggested_actions: req.suggested_actions.as_deref().map(encode_actions),
    };

    let row = run_blocking(&state.conn, move |conn| {
        update_classification(conn, &id, &changes)?.ok_or_else(|| classification_not_found(&id))
    })
    .await?;

    Ok(Json(db_classification_to_classification(row)))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteClassificationResponse>, ApiError> {
    let classification_id = run_blocking(&state.conn, move |conn| {
        if delete_classification(conn, &id)? {
            Ok(id)
        } else {
            Err(classification_not_found(&id))
        }
    })
    .await?;

    Ok(Json(DeleteClassificationResponse {
        message: "Classification deleted successfully".to_string(),
        classification_id,
    }))
}

pub async fn by_ticket(
    State(state): State<Arc<AppState>>,
    Path(ticket_id): Path<String>,
) -> Result<Json<Vec<Classification>>, ApiError> {
    let rows = run_blocking(&state.conn, move |conn| {
        if TicketRepository::new(conn).get_by_id(&ticket_id)?.is_none() {
            return Err(ticket_not_found(&ticket_id));
        }
        Ok(list_for_ticket(conn, &ticket_id)?)
    })
    .await?;

    Ok(Json(
        rows.into_iter()
            .map(db_classification_to_classification)
            .collect(),
    ))
}

pub fn configure_classifications_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/classifications", get(list_all).post(create))
        .route(
            "/api/classifications/:id",
            get(get_one).put(update).delete(delete),
        )
        .route(
            "/api/classifications/by-ticket/:ticket_id",
            get(by_ticket),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shared::test_utils::test_state;
    use crate::tickets::configure_tickets_routes;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn app() -> (tempfile::TempDir, Router) {
        let (dir, state) = test_state();
        let router = configure_tickets_routes()
            .merge(configure_classifications_routes())
            .with_state(state);
        (dir, router)
    }

    #[tokio::test]
    async fn test_crud_and_cascade() {
        let (_dir, app) = app();
        let (_, ticket) = send(
            &app,
            "POST",
            "/api/tickets",
            Some(json!({"name": "DB slow", "description": "Queries take 30s"})),
        )
        .await;
        let ticket_id = ticket["id"].as_str().unwrap().to_string();

        let (status, created) = send(
            &app,
            "POST",
            "/api/classifications",
            Some(json!({
                "ticket_id": ticket_id,
                "confidence": 0.8,
                "reasoning": "Query planner regression",
                "suggested_actions": ["Add index"]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["suggested_actions"], json!(["Add index"]));
        let id = created["id"].as_str().unwrap().to_string();

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/api/classifications/{id}"),
            Some(json!({"confidence": 0.95})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["confidence"], 0.95);
        assert_eq!(updated["reasoning"], "Query planner regression");

        let (_, listed) = send(
            &app,
            "GET",
            &format!("/api/classifications/by-ticket/{ticket_id}"),
            None,
        )
        .await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        send(&app, "DELETE", &format!("/api/tickets/{ticket_id}"), None).await;
        let (status, _) = send(&app, "GET", &format!("/api/classifications/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(
            &app,
            "GET",
            &format!("/api/classifications/by-ticket/{ticket_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_for_missing_ticket_is_404() {
        let (_dir, app) = app();
        let (status, _) = send(
            &app,
            "POST",
            "/api/classifications",
            Some(json!({"ticket_id": "missing", "confidence": 0.5, "reasoning": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_response() {
        let (_dir, app) = app();
        let (_, ticket) = send(
            &app,
            "POST",
            "/api/tickets",
            Some(json!({"name": "n", "description": "d"})),
        )
        .await;
        let (_, created) = send(
            &app,
            "POST",
            "/api/classifications",
            Some(json!({"ticket_id": ticket["id"], "confidence": 0.5, "reasoning": "x"})),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let (status, body) = send(&app, "DELETE", &format!("/api/classifications/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Classification deleted successfully");
        assert_eq!(body["classification_id"], id);

        let (_, listing) = send(&app, "GET", "/api/classifications", None).await;
        assert_eq!(listing["total"], 0);
    }
}
