use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use crate::core::shared::models::{encode_actions, ClassificationChangeset, DbClassification};
use crate::core::shared::pagination::page_offset;
use crate::core::shared::schema::classifications;

pub fn insert_classification(
    conn: &mut SqliteConnection,
    ticket_id: &str,
    confidence: f64,
    reasoning: &str,
    suggested_actions: &[String],
) -> QueryResult<DbClassification> {
    let row = DbClassification {
        id: Uuid::new_v4().to_string(),
        ticket_id: ticket_id.to_string(),
        confidence,
        reasoning: reasoning.to_string(),
        suggested_actions: encode_actions(suggested_actions),
        created_at: Utc::now().naive_utc(),
    };

    diesel::insert_into(classifications::table)
        .values(&row)
        .execute(conn)?;
    Ok(row)
}

pub fn get_classification(
    conn: &mut SqliteConnection,
    id: &str,
) -> QueryResult<Option<DbClassification>> {
    classifications::table
        .find(id)
        .select(DbClassification::as_select())
        .first(conn)
        .optional()
}

/// Newest first.
pub fn list_for_ticket(
    conn: &mut SqliteConnection,
    ticket_id: &str,
) -> QueryResult<Vec<DbClassification>> {
    classifications::table
        .filter(classifications::ticket_id.eq(ticket_id))
        .order((classifications::created_at.desc(), classifications::id.desc()))
        .select(DbClassification::as_select())
        .load(conn)
}

pub fn list_classifications(
    conn: &mut SqliteConnection,
    ticket_id: Option<&str>,
    page: i64,
    per_page: i64,
) -> QueryResult<(Vec<DbClassification>, i64)> {
    let mut count_query = classifications::table.into_boxed();
    let mut page_query = classifications::table.into_boxed();
    if let Some(ticket_id) = ticket_id {
        count_query = count_query.filter(classifications::ticket_id.eq(ticket_id.to_string()));
        page_query = page_query.filter(classifications::ticket_id.eq(ticket_id.to_string()));
    }

    let total: i64 = count_query.count().get_result(conn)?;
    let rows = page_query
        .order((classifications::created_at.desc(), classifications::id.desc()))
        .limit(per_page)
        .offset(page_offset(page, per_page))
        .load::<DbClassification>(conn)?;
    Ok((rows, total))
}

pub fn update_classification(
    conn: &mut SqliteConnection,
    id: &str,
    changes: &ClassificationChangeset,
) -> QueryResult<Option<DbClassification>> {
    if changes.confidence.is_none()
        && changes.reasoning.is_none()
        && changes.suggested_actions.is_none()
    {
        return get_classification(conn, id);
    }

    let updated = diesel::update(classifications::table.find(id))
        .set(changes)
        .execute(conn)?;
    if updated == 0 {
        return Ok(None);
    }
    get_classification(conn, id)
}

pub fn delete_classification(conn: &mut SqliteConnection, id: &str) -> QueryResult<bool> {
    let deleted = diesel::delete(classifications::table.find(id)).execute(conn)?;
    Ok(deleted > 0)
}
