//! [`SqliteStore`], the SQLite implementation of [`CalendarStore`].

use std::{path::Path, time::Duration};

use bday_core::{
  birthday::{BIRTHDAY_MARKER, ContactRecord},
  change::{ChangeLogEntry, ChangeOperation, EventChange, SyncPlan, SyncReport},
  event::{CalendarEvent, CalendarHandle, CalendarId, CalendarSpec},
  store::{CalendarStore, StoredEvents},
};
use rusqlite::{Connection, OpenFlags, OptionalExtension as _, TransactionBehavior};

use crate::{
  Error, Result,
  encode::{RawChange, lenient_text},
  schema::SCHEMA,
  sequence::{bump_sync_token, current_sync_token},
};

/// Busy timeout applied by [`SqliteStore::open_in_memory`].
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(30);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Baïkal database opened for birthday sync.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open an existing database at `path`.
  ///
  /// The file is never created: a missing database is an error. Writers wait
  /// up to `busy_timeout` for a competing lock before failing.
  pub async fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
      | OpenFlags::SQLITE_OPEN_URI
      | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = tokio_rusqlite::Connection::open_with_flags(path, flags).await?;
    let store = Self { conn };
    store.configure(busy_timeout).await?;
    Ok(store)
  }

  /// Open an in-memory store with the schema installed. Used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.configure(DEFAULT_BUSY_TIMEOUT).await?;
    store.init_schema().await?;
    Ok(store)
  }

  async fn configure(&self, busy_timeout: Duration) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.busy_timeout(busy_timeout)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
          row.get::<_, String>(0)
        })?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Close the connection, waiting for queued work to finish.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }
}

// ─── Event table ─────────────────────────────────────────────────────────────

fn load_events(conn: &Connection, calendar_id: CalendarId) -> rusqlite::Result<StoredEvents> {
  let mut stmt = conn.prepare(
    "SELECT uri, calendardata FROM calendarobjects WHERE calendarid = ?1",
  )?;
  let events = stmt
    .query_map(rusqlite::params![calendar_id.0], |row| {
      Ok((lenient_text(row, 0)?, lenient_text(row, 1)?))
    })?
    .collect::<rusqlite::Result<StoredEvents>>()?;
  Ok(events)
}

fn insert_event(
  conn: &Connection,
  calendar_id: CalendarId,
  event: &CalendarEvent,
) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO calendarobjects (
       calendarid, uri, calendardata, lastmodified, etag, size,
       componenttype, firstoccurence, lastoccurence, uid
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'VEVENT', ?7, ?8, ?9)",
    rusqlite::params![
      calendar_id.0,
      event.uri,
      event.data,
      event.last_modified,
      event.etag,
      event.size,
      event.first_occurrence,
      event.last_occurrence,
      event.uid,
    ],
  )?;
  Ok(())
}

fn replace_event(
  conn: &Connection,
  calendar_id: CalendarId,
  event: &CalendarEvent,
) -> rusqlite::Result<()> {
  conn.execute(
    "UPDATE calendarobjects
     SET calendardata = ?1, lastmodified = ?2, etag = ?3, size = ?4,
         firstoccurence = ?5, lastoccurence = ?6, uid = ?7
     WHERE calendarid = ?8 AND uri = ?9",
    rusqlite::params![
      event.data,
      event.last_modified,
      event.etag,
      event.size,
      event.first_occurrence,
      event.last_occurrence,
      event.uid,
      calendar_id.0,
      event.uri,
    ],
  )?;
  Ok(())
}

fn delete_event(conn: &Connection, calendar_id: CalendarId, uri: &str) -> rusqlite::Result<()> {
  conn.execute(
    "DELETE FROM calendarobjects WHERE calendarid = ?1 AND uri = ?2",
    rusqlite::params![calendar_id.0, uri],
  )?;
  Ok(())
}

// ─── CalendarStore impl ──────────────────────────────────────────────────────

impl CalendarStore for SqliteStore {
  type Error = Error;

  async fn first_principal(&self, prefix: String) -> Result<Option<String>> {
    let uri: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT uri FROM principals
             WHERE substr(uri, 1, length(?1)) = ?1
             ORDER BY id
             LIMIT 1",
            rusqlite::params![prefix],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;
    Ok(uri)
  }

  async fn ensure_calendar(
    &self,
    principal_uri: String,
    spec: CalendarSpec,
  ) -> Result<CalendarHandle> {
    let handle = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<(i64, i64)> = tx
          .query_row(
            "SELECT ci.calendarid, COALESCE(c.synctoken, 0)
             FROM calendarinstances ci
             LEFT JOIN calendars c ON c.id = ci.calendarid
             WHERE ci.principaluri = ?1 AND ci.uri = ?2",
            rusqlite::params![principal_uri, spec.uri],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()?;

        if let Some((id, sync_token)) = existing {
          return Ok(CalendarHandle {
            id: CalendarId(id),
            sync_token,
            created: false,
          });
        }

        tx.execute(
          "INSERT INTO calendars (synctoken, components) VALUES (1, 'VEVENT')",
          [],
        )?;
        let id = tx.last_insert_rowid();
        tx.execute(
          "INSERT INTO calendarinstances
             (calendarid, principaluri, access, displayname, uri, description, transparent)
           VALUES (?1, ?2, 1, ?3, ?4, ?5, 0)",
          rusqlite::params![
            id,
            principal_uri,
            spec.display_name,
            spec.uri,
            spec.description,
          ],
        )?;
        tx.commit()?;

        Ok(CalendarHandle {
          id: CalendarId(id),
          sync_token: 1,
          created: true,
        })
      })
      .await?;
    Ok(handle)
  }

  async fn birthday_contacts(&self) -> Result<Vec<ContactRecord>> {
    let contacts = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT uri, carddata FROM cards
           WHERE carddata LIKE '%' || ?1 || '%'
           ORDER BY id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![BIRTHDAY_MARKER], |row| {
            Ok(ContactRecord {
              uri:       lenient_text(row, 0)?,
              card_data: lenient_text(row, 1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(contacts)
  }

  async fn reconcile<F>(&self, calendar_id: CalendarId, planner: F) -> Result<SyncReport>
  where
    F: FnOnce(&StoredEvents) -> SyncPlan + Send + 'static,
  {
    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Fails early when the container is gone.
        let mut report = SyncReport {
          sync_token: current_sync_token(&tx, calendar_id)?,
          ..SyncReport::default()
        };

        let existing = load_events(&tx, calendar_id)?;
        let plan = planner(&existing);
        report.unchanged = plan.unchanged;

        for change in &plan.changes {
          match change {
            EventChange::Create(event) => insert_event(&tx, calendar_id, event)?,
            EventChange::Update(event) => replace_event(&tx, calendar_id, event)?,
            EventChange::Delete(uri) => delete_event(&tx, calendar_id, uri)?,
          }
          report.sync_token =
            bump_sync_token(&tx, calendar_id, change.uri(), change.operation())?;

          match change.operation() {
            ChangeOperation::Created => report.created += 1,
            ChangeOperation::Updated => report.updated += 1,
            ChangeOperation::Deleted => report.deleted += 1,
          }
        }

        tx.commit()?;
        Ok(report)
      })
      .await?;
    Ok(report)
  }

  async fn sync_token(&self, calendar_id: CalendarId) -> Result<i64> {
    self
      .conn
      .call(move |conn| Ok(current_sync_token(conn, calendar_id).optional()?))
      .await?
      .ok_or(Error::CalendarMissing(calendar_id))
  }

  async fn changes_since(&self, calendar_id: CalendarId, since: i64) -> Result<Vec<ChangeLogEntry>> {
    let raws: Vec<RawChange> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT uri, synctoken, calendarid, operation FROM calendarchanges
           WHERE calendarid = ?1 AND synctoken > ?2
           ORDER BY synctoken, id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![calendar_id.0, since], RawChange::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawChange::into_entry).collect()
  }
}
