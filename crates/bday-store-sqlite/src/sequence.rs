//! Sync-token bookkeeping for calendar containers.
//!
//! Every event mutation reads the container's token, logs the mutation under
//! `token + 1` and stores `token + 1` back. Callers run these steps on the
//! same transaction as the mutation itself; SQLite's single writer keeps two
//! mutations from incrementing the same stale value.

use bday_core::{change::ChangeOperation, event::CalendarId};
use rusqlite::Connection;

/// Current token of `calendar_id`. A NULL token counts as 0.
///
/// Fails with `QueryReturnedNoRows` when the container does not exist.
pub(crate) fn current_sync_token(
  conn: &Connection,
  calendar_id: CalendarId,
) -> rusqlite::Result<i64> {
  conn.query_row(
    "SELECT COALESCE(synctoken, 0) FROM calendars WHERE id = ?1",
    rusqlite::params![calendar_id.0],
    |row| row.get(0),
  )
}

/// Record one mutation of `uri` and advance the container's token.
/// Returns the token the mutation was logged under.
pub(crate) fn bump_sync_token(
  conn: &Connection,
  calendar_id: CalendarId,
  uri: &str,
  operation: ChangeOperation,
) -> rusqlite::Result<i64> {
  let token = current_sync_token(conn, calendar_id)? + 1;

  conn.execute(
    "INSERT INTO calendarchanges (uri, synctoken, calendarid, operation)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![uri, token, calendar_id.0, operation.code()],
  )?;
  conn.execute(
    "UPDATE calendars SET synctoken = ?1 WHERE id = ?2",
    rusqlite::params![token, calendar_id.0],
  )?;

  Ok(token)
}
