//! Change-log vocabulary and the reconciliation plan.

use crate::{
  Error, Result,
  event::{CalendarEvent, CalendarId},
};

/// Kind of mutation recorded in the change log. The discriminants are the
/// codes stored in `calendarchanges.operation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeOperation {
  Created = 1,
  Updated = 2,
  Deleted = 3,
}

impl ChangeOperation {
  pub fn code(self) -> i64 { self as i64 }

  pub fn from_code(code: i64) -> Result<Self> {
    match code {
      1 => Ok(Self::Created),
      2 => Ok(Self::Updated),
      3 => Ok(Self::Deleted),
      other => Err(Error::UnknownOperation(other)),
    }
  }
}

/// One append-only change-log row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeLogEntry {
  pub uri:         String,
  pub sync_token:  i64,
  pub calendar_id: CalendarId,
  pub operation:   ChangeOperation,
}

/// A single mutation against the event table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventChange {
  Create(CalendarEvent),
  Update(CalendarEvent),
  /// Delete the event stored under this uri.
  Delete(String),
}

impl EventChange {
  pub fn uri(&self) -> &str {
    match self {
      EventChange::Create(e) | EventChange::Update(e) => &e.uri,
      EventChange::Delete(uri) => uri,
    }
  }

  pub fn operation(&self) -> ChangeOperation {
    match self {
      EventChange::Create(_) => ChangeOperation::Created,
      EventChange::Update(_) => ChangeOperation::Updated,
      EventChange::Delete(_) => ChangeOperation::Deleted,
    }
  }
}

/// Minimal set of changes that brings a container in line with the derived
/// events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
  pub changes:   Vec<EventChange>,
  /// Derived events already stored with equivalent content.
  pub unchanged: usize,
}

impl SyncPlan {
  pub fn count(&self, op: ChangeOperation) -> usize {
    self.changes.iter().filter(|c| c.operation() == op).count()
  }
}

/// Outcome of an applied plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
  pub created:    usize,
  pub updated:    usize,
  pub unchanged:  usize,
  pub deleted:    usize,
  /// Container sync token after commit.
  pub sync_token: i64,
}

impl SyncReport {
  /// Birthdays handled this run: every valid birthday, deletes excluded.
  pub fn processed(&self) -> usize {
    self.created + self.updated + self.unchanged
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn operation_codes_match_change_log() {
    assert_eq!(ChangeOperation::Created.code(), 1);
    assert_eq!(ChangeOperation::Updated.code(), 2);
    assert_eq!(ChangeOperation::Deleted.code(), 3);
    assert_eq!(ChangeOperation::from_code(2).unwrap(), ChangeOperation::Updated);
    assert!(matches!(
      ChangeOperation::from_code(7),
      Err(Error::UnknownOperation(7))
    ));
  }

  #[test]
  fn processed_excludes_deletes() {
    let report = SyncReport {
      created:    2,
      updated:    1,
      unchanged:  4,
      deleted:    3,
      sync_token: 10,
    };
    assert_eq!(report.processed(), 7);
  }
}
