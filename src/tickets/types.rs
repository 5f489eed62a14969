use serde::{Deserialize, Serialize};

use crate::core::shared::enums::{Department, Severity};
use crate::core::shared::error::ApiError;
use crate::core::shared::models::Ticket;
use crate::core::shared::pagination::PageMeta;

#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub name: String,
    pub description: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub department: Department,
    #[serde(default)]
    pub severity: Severity,
    pub assignee: Option<String>,
    pub screenshot_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTicketRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub error_message: Option<String>,
    pub department: Option<Department>,
    pub severity: Option<Severity>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub screenshot_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListTicketsQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
    pub department: Option<Department>,
    pub severity: Option<Severity>,
    pub assignee: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TicketListResponse {
    pub tickets: Vec<Ticket>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct DeleteTicketResponse {
    pub message: String,
    pub ticket_id: String,
}

pub fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(field, format!("{field} must not be empty")));
    }
    Ok(())
}

impl CreateTicketRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("name", &self.name)?;
        require_text("description", &self.description)
    }
}

impl UpdateTicketRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(description) = &self.description {
            require_text("description", description)?;
        }
        if let Some(status) = &self.status {
            require_text("status", status)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults_routing() {
        let req: CreateTicketRequest =
            serde_json::from_str(r#"{"name": "Crash", "description": "App crashes"}"#).unwrap();
        assert_eq!(req.department, Department::General);
        assert_eq!(req.severity, Severity::Medium);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_blank_fields_are_rejected() {
        let req: CreateTicketRequest =
            serde_json::from_str(r#"{"name": "  ", "description": "x"}"#).unwrap();
        assert!(matches!(
            req.validate(),
            Err(ApiError::Validation { field: Some(f), .. }) if f == "name"
        ));

        let update = UpdateTicketRequest {
            status: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_list_response_shape() {
        let body = serde_json::to_value(TicketListResponse {
            tickets: vec![],
            meta: PageMeta::new(0, 1, 10),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "tickets": [],
                "total": 0,
                "page": 1,
                "per_page": 10,
                "has_next": false,
                "has_prev": false
            })
        );
    }
}
