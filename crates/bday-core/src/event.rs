//! Calendar-side types: the generated event and its container.

use std::fmt;

/// Sentinel stored as `lastoccurence` for events that recur indefinitely.
pub const LAST_OCCURRENCE_UNBOUNDED: i64 = i32::MAX as i64;

/// Row id of a calendar container in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CalendarId(pub i64);

impl fmt::Display for CalendarId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// How the birthday container is registered for its principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSpec {
  /// Well-known collection name the container is looked up by.
  pub uri:          String,
  pub display_name: String,
  pub description:  String,
}

impl Default for CalendarSpec {
  fn default() -> Self {
    Self {
      uri:          "birthdays".to_string(),
      display_name: "Birthdays".to_string(),
      description:  "Auto-generated birthday calendar".to_string(),
    }
  }
}

/// A located (or freshly created) container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarHandle {
  pub id:         CalendarId,
  pub sync_token: i64,
  /// `true` when this run created the container.
  pub created:    bool,
}

/// A fully materialised birthday event, ready to be written as one
/// `calendarobjects` row.
///
/// Derived deterministically from the contact; never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
  /// Stable identity derived from the contact's uri.
  pub uid:              String,
  /// Storage key: `uid + ".ics"`.
  pub uri:              String,
  /// Canonical iCalendar document (CRLF line endings).
  pub data:             String,
  /// Hex SHA-256 of `data`.
  pub etag:             String,
  /// Byte length of `data`.
  pub size:             i64,
  /// Epoch seconds of the first occurrence at UTC midnight.
  pub first_occurrence: i64,
  pub last_occurrence:  i64,
  /// Epoch seconds of the run that generated this document.
  pub last_modified:    i64,
}
