use diesel::prelude::*;
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

use crate::classifications::storage::insert_classification;
use crate::classifier::ClassificationResult;
use crate::core::shared::enums::{Department, Severity};
use crate::core::shared::error::ApiError;
use crate::core::shared::models::DbTicket;
use crate::tickets::repository::{NewTicket, TicketRepository};
use crate::tickets::types::require_text;

pub const CREATED_MESSAGE: &str = "Ticket created successfully";
pub const MOCK_CREATED_MESSAGE: &str = "Mock ticket created successfully";
pub const FAILED_MESSAGE: &str = "Failed to create ticket";

/// Free-text error report as submitted by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub description: String,
    pub error_message: Option<String>,
    pub screenshot_url: Option<String>,
    /// Extra context passed to the classifier only; never stored.
    pub context: Option<String>,
}

impl ReportRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("name", &self.name)?;
        require_text("description", &self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub success: bool,
    pub message: String,
    pub ticket_id: Option<String>,
}

impl ReportResponse {
    pub fn created(message: &str, ticket_id: String) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            ticket_id: Some(ticket_id),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            ticket_id: None,
        }
    }
}

/// Inserts the ticket (routed by `classification` when present, otherwise
/// general/medium) and its classification in one transaction.
pub fn create_ticket_from_report(
    conn: &mut SqliteConnection,
    report: &ReportRequest,
    classification: Option<&ClassificationResult>,
    message: &str,
) -> QueryResult<(ReportResponse, DbTicket)> {
    conn.transaction(|conn| {
        let (department, severity) = classification
            .map(|c| (c.department, c.severity))
            .unwrap_or((Department::General, Severity::Medium));

        let ticket = TicketRepository::new(conn).create(NewTicket {
            name: report.name.clone(),
            description: report.description.clone(),
            error_message: report.error_message.clone(),
            department,
            severity,
            assignee: None,
            screenshot_url: report.screenshot_url.clone(),
        })?;

        if let Some(c) = classification {
            insert_classification(
                conn,
                &ticket.id,
                c.confidence,
                &c.reasoning,
                &c.suggested_actions,
            )?;
        }

        Ok((ReportResponse::created(message, ticket.id.clone()), ticket))
    })
}
