//! Row decoding helpers shared by the store queries.

use bday_core::{
  change::{ChangeLogEntry, ChangeOperation},
  event::CalendarId,
};
use rusqlite::{Row, types::ValueRef};

use crate::Result;

/// Read a `TEXT`-or-`BLOB` column as a string.
///
/// PHP writes `carddata` / `calendardata` as blobs; rows written by this
/// crate are text. Both decode the same way (UTF-8, lossy).
pub(crate) fn lenient_text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
  Ok(match row.get_ref(idx)? {
    ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
      String::from_utf8_lossy(bytes).into_owned()
    }
    ValueRef::Integer(i) => i.to_string(),
    ValueRef::Real(f) => f.to_string(),
    ValueRef::Null => String::new(),
  })
}

/// A `calendarchanges` row as read from the database.
pub(crate) struct RawChange {
  pub uri:         String,
  pub sync_token:  i64,
  pub calendar_id: i64,
  pub operation:   i64,
}

impl RawChange {
  pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uri:         lenient_text(row, 0)?,
      sync_token:  row.get(1)?,
      calendar_id: row.get(2)?,
      operation:   row.get(3)?,
    })
  }

  pub(crate) fn into_entry(self) -> Result<ChangeLogEntry> {
    Ok(ChangeLogEntry {
      uri:         self.uri,
      sync_token:  self.sync_token,
      calendar_id: CalendarId(self.calendar_id),
      operation:   ChangeOperation::from_code(self.operation)?,
    })
  }
}
