//! Queries over the `tickets` table.
//!
//! Every method runs on a borrowed connection so callers can compose several
//! of them inside one diesel transaction.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Utc};
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use diesel::SqliteConnection;
use uuid::Uuid;

use crate::core::shared::enums::{
    is_terminal_status, Department, Severity, STATUS_OPEN, TERMINAL_STATUSES,
};
use crate::core::shared::models::{DbTicket, TicketChangeset};
use crate::core::shared::pagination::page_offset;
use crate::core::shared::schema::{classifications, tickets};
use crate::core::shared::utils::round2;

/// Fields a caller supplies for a new ticket; the rest are generated.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub name: String,
    pub description: String,
    pub error_message: Option<String>,
    pub department: Department,
    pub severity: Severity,
    pub assignee: Option<String>,
    pub screenshot_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub status: Option<String>,
    pub department: Option<Department>,
    pub severity: Option<Severity>,
    pub assignee: Option<String>,
}

pub struct TicketRepository<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> TicketRepository<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub fn count_all(&mut self) -> QueryResult<i64> {
        tickets::table.count().get_result(self.conn)
    }

    pub fn count_by_status(&mut self, status: &str) -> QueryResult<i64> {
        tickets::table
            .filter(tickets::status.eq(status))
            .count()
            .get_result(self.conn)
    }

    /// Anything not resolved or closed, including custom statuses.
    pub fn count_open(&mut self) -> QueryResult<i64> {
        tickets::table
            .filter(tickets::status.ne_all(TERMINAL_STATUSES))
            .count()
            .get_result(self.conn)
    }

    pub fn count_resolved(&mut self) -> QueryResult<i64> {
        tickets::table
            .filter(tickets::status.eq_any(TERMINAL_STATUSES))
            .count()
            .get_result(self.conn)
    }

    pub fn count_created_since(&mut self, since: NaiveDateTime) -> QueryResult<i64> {
        tickets::table
            .filter(tickets::created_at.ge(since))
            .count()
            .get_result(self.conn)
    }

    pub fn department_distribution(&mut self) -> QueryResult<BTreeMap<String, i64>> {
        let rows: Vec<(String, i64)> = tickets::table
            .group_by(tickets::department)
            .select((tickets::department, count_star()))
            .load(self.conn)?;
        Ok(rows.into_iter().collect())
    }

    pub fn severity_distribution(&mut self) -> QueryResult<BTreeMap<String, i64>> {
        let rows: Vec<(String, i64)> = tickets::table
            .group_by(tickets::severity)
            .select((tickets::severity, count_star()))
            .load(self.conn)?;
        Ok(rows.into_iter().collect())
    }

    /// Mean of `resolved_at - created_at` in hours over resolved rows,
    /// rounded to two decimals; 0.0 when nothing has been resolved.
    pub fn average_resolution_hours(&mut self) -> QueryResult<f64> {
        let rows: Vec<(NaiveDateTime, Option<NaiveDateTime>)> = tickets::table
            .filter(tickets::resolved_at.is_not_null())
            .select((tickets::created_at, tickets::resolved_at))
            .load(self.conn)?;

        let durations: Vec<(NaiveDateTime, NaiveDateTime)> = rows
            .into_iter()
            .filter_map(|(created, resolved)| resolved.map(|r| (created, r)))
            .collect();

        Ok(mean_resolution_hours(&durations))
    }

    pub fn get_by_id(&mut self, id: &str) -> QueryResult<Option<DbTicket>> {
        tickets::table
            .find(id)
            .select(DbTicket::as_select())
            .first(self.conn)
            .optional()
    }

    pub fn create(&mut self, new: NewTicket) -> QueryResult<DbTicket> {
        let now = Utc::now().naive_utc();
        let row = DbTicket {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            description: new.description,
            error_message: new.error_message,
            department: new.department.as_str().to_string(),
            severity: new.severity.as_str().to_string(),
            status: STATUS_OPEN.to_string(),
            assignee: new.assignee,
            screenshot_url: new.screenshot_url,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        };

        diesel::insert_into(tickets::table)
            .values(&row)
            .execute(self.conn)?;
        Ok(row)
    }

    /// Sets the status; `resolved_at` is stamped the first time the ticket
    /// reaches a terminal status and is never cleared afterwards.
    pub fn update_status(&mut self, id: &str, status: &str) -> QueryResult<Option<DbTicket>> {
        let changes = TicketChangeset {
            status: Some(status.to_string()),
            ..Default::default()
        };
        self.update(id, changes)
    }

    /// Applies the non-`None` fields of `changes`, bumping `updated_at`.
    pub fn update(
        &mut self,
        id: &str,
        mut changes: TicketChangeset,
    ) -> QueryResult<Option<DbTicket>> {
        let Some(current) = self.get_by_id(id)? else {
            return Ok(None);
        };

        let now = Utc::now().naive_utc();
        changes.updated_at = Some(now);
        changes.resolved_at = None;
        if let Some(status) = changes.status.as_deref() {
            if is_terminal_status(status) && current.resolved_at.is_none() {
                changes.resolved_at = Some(now);
            }
        }

        diesel::update(tickets::table.find(id))
            .set(&changes)
            .execute(self.conn)?;
        self.get_by_id(id)
    }

    /// Removes the ticket and its classifications. Returns false when the
    /// ticket does not exist.
    pub fn delete(&mut self, id: &str) -> QueryResult<bool> {
        self.conn.transaction(|conn| {
            diesel::delete(classifications::table.filter(classifications::ticket_id.eq(id)))
                .execute(conn)?;
            let deleted = diesel::delete(tickets::table.find(id)).execute(conn)?;
            Ok(deleted > 0)
        })
    }

    /// Tickets created within `[start, end]`, oldest first.
    pub fn list_by_date_range(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> QueryResult<Vec<DbTicket>> {
        tickets::table
            .filter(tickets::created_at.ge(start))
            .filter(tickets::created_at.le(end))
            .order(tickets::created_at.asc())
            .select(DbTicket::as_select())
            .load(self.conn)
    }

    /// Tickets whose `resolved_at` falls within `[start, end]`.
    pub fn list_resolved_between(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> QueryResult<Vec<DbTicket>> {
        tickets::table
            .filter(tickets::resolved_at.ge(start))
            .filter(tickets::resolved_at.le(end))
            .order(tickets::resolved_at.asc())
            .select(DbTicket::as_select())
            .load(self.conn)
    }

    /// One page of tickets matching `filter`, newest first, plus the total
    /// number of matches.
    pub fn list(
        &mut self,
        filter: &TicketFilter,
        page: i64,
        per_page: i64,
    ) -> QueryResult<(Vec<DbTicket>, i64)> {
        let total: i64 = filtered(filter).count().get_result(self.conn)?;
        let rows = filtered(filter)
            .order((tickets::created_at.desc(), tickets::id.desc()))
            .limit(per_page)
            .offset(page_offset(page, per_page))
            .load::<DbTicket>(self.conn)?;
        Ok((rows, total))
    }
}

fn filtered(filter: &TicketFilter) -> tickets::BoxedQuery<'static, Sqlite> {
    let mut query = tickets::table.into_boxed();
    if let Some(status) = &filter.status {
        query = query.filter(tickets::status.eq(status.clone()));
    }
    if let Some(department) = filter.department {
        query = query.filter(tickets::department.eq(department.as_str()));
    }
    if let Some(severity) = filter.severity {
        query = query.filter(tickets::severity.eq(severity.as_str()));
    }
    if let Some(assignee) = &filter.assignee {
        query = query.filter(tickets::assignee.eq(assignee.clone()));
    }
    query
}

pub fn mean_resolution_hours(pairs: &[(NaiveDateTime, NaiveDateTime)]) -> f64 {
    if pairs.is_empty() {
        return 0.0;
    }
    let total_hours: f64 = pairs
        .iter()
        .map(|(created, resolved)| (*resolved - *created).num_seconds() as f64 / 3600.0)
        .sum();
    round2(total_hours / pairs.len() as f64)
}
