use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::{Department, Severity};
use super::schema::{classifications, tickets};

/// Row of the `tickets` table. Department and severity are kept as text so
/// a row written by an older build never fails to load.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbTicket {
    pub id: String,
    pub name: String,
    pub description: String,
    pub error_message: Option<String>,
    pub department: String,
    pub severity: String,
    pub status: String,
    pub assignee: Option<String>,
    pub screenshot_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub resolved_at: Option<NaiveDateTime>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = tickets)]
pub struct TicketChangeset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub error_message: Option<String>,
    pub department: Option<String>,
    pub severity: Option<String>,
    pub status: Option<String>,
    pub assignee: Option<String>,
    pub screenshot_url: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
    pub resolved_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = classifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbClassification {
    pub id: String,
    pub ticket_id: String,
    pub confidence: f64,
    pub reasoning: String,
    pub suggested_actions: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = classifications)]
pub struct ClassificationChangeset {
    pub confidence: Option<f64>,
    pub reasoning: Option<String>,
    pub suggested_actions: Option<String>,
}

/// Ticket as exposed over the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub name: String,
    pub description: String,
    pub error_message: Option<String>,
    pub department: Department,
    pub severity: Severity,
    pub status: String,
    pub assignee: Option<String>,
    pub screenshot_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Classification as exposed over the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub id: String,
    pub ticket_id: String,
    pub confidence: f64,
    pub reasoning: String,
    pub suggested_actions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

pub fn to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)
}

pub fn db_ticket_to_ticket(db: DbTicket) -> Ticket {
    let department: Department = db.department.parse().unwrap_or(Department::General);
    let severity: Severity = db.severity.parse().unwrap_or(Severity::Medium);

    Ticket {
        id: db.id,
        name: db.name,
        description: db.description,
        error_message: db.error_message,
        department,
        severity,
        status: db.status,
        assignee: db.assignee,
        screenshot_url: db.screenshot_url,
        created_at: to_utc(db.created_at),
        updated_at: to_utc(db.updated_at),
        resolved_at: db.resolved_at.map(to_utc),
    }
}

pub fn db_classification_to_classification(db: DbClassification) -> Classification {
    let suggested_actions: Vec<String> =
        serde_json::from_str(&db.suggested_actions).unwrap_or_default();

    Classification {
        id: db.id,
        ticket_id: db.ticket_id,
        confidence: db.confidence,
        reasoning: db.reasoning,
        suggested_actions,
        created_at: to_utc(db.created_at),
    }
}

pub fn encode_actions(actions: &[String]) -> String {
    serde_json::to_string(actions).unwrap_or_else(|_| "[]".to_string())
}
