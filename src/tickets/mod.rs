pub mod repository;
pub mod types;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use log::info;
use std::sync::Arc;

use crate::classifications::storage::list_for_ticket;
use crate::core::shared::error::{ApiError, AppJson, AppQuery};
use crate::core::shared::models::{
    db_classification_to_classification, db_ticket_to_ticket, Classification, Ticket,
    TicketChangeset,
};
use crate::core::shared::pagination::{page_params, PageMeta};
use crate::core::shared::state::AppState;
use crate::core::shared::utils::run_blocking;

use repository::{NewTicket, TicketFilter, TicketRepository};
use types::{
    CreateTicketRequest, DeleteTicketResponse, ListTicketsQuery, StatusUpdateRequest,
    TicketListResponse, UpdateTicketRequest,
};

fn ticket_not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Ticket {id} not found"))
}

pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<ListTicketsQuery>,
) -> Result<Json<TicketListResponse>, ApiError> {
    let (page, per_page) = page_params(query.page, query.per_page)?;
    let filter = TicketFilter {
        status: query.status,
        department: query.department,
        severity: query.severity,
        assignee: query.assignee,
    };

    let (rows, total) = run_blocking(&state.conn, move |conn| {
        Ok(TicketRepository::new(conn).list(&filter, page, per_page)?)
    })
    .await?;

    Ok(Json(TicketListResponse {
        tickets: rows.into_iter().map(db_ticket_to_ticket).collect(),
        meta: PageMeta::new(total, page, per_page),
    }))
}

pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateTicketRequest>,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    req.validate()?;
    let new = NewTicket {
        name: req.name,
        description: req.description,
        error_message: req.error_message,
        department: req.department,
        severity: req.severity,
        assignee: req.assignee,
        screenshot_url: req.screenshot_url,
    };

    let row = run_blocking(&state.conn, move |conn| {
        Ok(TicketRepository::new(conn).create(new)?)
    })
    .await?;

    info!("Created ticket {} ({}/{})", row.id, row.department, row.severity);
    Ok((StatusCode::CREATED, Json(db_ticket_to_ticket(row))))
}

pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Ticket>, ApiError> {
    let row = run_blocking(&state.conn, move |conn| {
        TicketRepository::new(conn)
            .get_by_id(&id)?
            .ok_or_else(|| ticket_not_found(&id))
    })
    .await?;

    Ok(Json(db_ticket_to_ticket(row)))
}

pub async fn update_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateTicketRequest>,
) -> Result<Json<Ticket>, ApiError> {
    req.validate()?;
    let changes = TicketChangeset {
        name: req.name,
        description: req.description,
        error_message: req.error_message,
        department: req.department.map(|d| d.as_str().to_string()),
        severity: req.severity.map(|s| s.as_str().to_string()),
        status: req.status,
        assignee: req.assignee,
        screenshot_url: req.screenshot_url,
        ..Default::default()
    };

    let row = run_blocking(&state.conn, move |conn| {
        TicketRepository::new(conn)
            .update(&id, changes)?
            .ok_or_else(|| ticket_not_found(&id))
    })
    .await?;

    Ok(Json(db_ticket_to_ticket(row)))
}

pub async fn update_ticket_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    AppJson(req): AppJson<StatusUpdateRequest>,
) -> Result<Json<Ticket>, ApiError> {
    types::require_text("status", &req.status)?;

    let row = run_blocking(&state.conn, move |conn| {
        TicketRepository::new(conn)
            .update_status(&id, &req.status)?
            .ok_or_else(|| ticket_not_found(&id))
    })
    .await?;

    info!("Ticket {} moved to {}", row.id, row.status);
    Ok(Json(db_ticket_to_ticket(row)))
}

pub async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteTicketResponse>, ApiError> {
    let ticket_id = run_blocking(&state.conn, move |conn| {
        if TicketRepository::new(conn).delete(&id)? {
            Ok(id)
        } else {
            Err(ticket_not_found(&id))
        }
    })
    .await?;

    info!("Deleted ticket {ticket_id}");
    Ok(Json(DeleteTicketResponse {
        message: "Ticket deleted successfully".to_string(),
        ticket_id,
    }))
}

pub async fn get_ticket_classifications(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Classification>>, ApiError> {
    let rows = run_blocking(&state.conn, move |conn| {
        if TicketRepository::new(conn).get_by_id(&id)?.is_none() {
            return Err(ticket_not_found(&id));
        }
        Ok(list_for_ticket(conn, &id)?)
    })
    .await?;

    Ok(Json(
        rows.into_iter()
            .map(db_classification_to_classification)
            .collect(),
    ))
}

pub fn configure_tickets_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tickets", get(list_tickets).post(create_ticket))
        .route(
            "/api/tickets/:id",
            get(get_ticket).put(update_ticket).delete(delete_ticket),
        )
        .route("/api/tickets/:id/status", patch(update_ticket_status))
        .route(
            "/api/tickets/:id/classifications",
            get(get_ticket_classifications),
        )
}
