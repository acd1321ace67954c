//! The `CalendarStore` trait: the one narrow interface to the data store.
//!
//! Implemented by storage backends (e.g. `bday-store-sqlite`). The reconciler
//! in `bday-sync` depends on this abstraction, not on any concrete backend.

use std::{collections::BTreeMap, future::Future};

use crate::{
  birthday::ContactRecord,
  change::{ChangeLogEntry, SyncPlan, SyncReport},
  event::{CalendarHandle, CalendarId, CalendarSpec},
};

/// Events currently stored in a container: event uri → document text.
pub type StoredEvents = BTreeMap<String, String>;

/// Abstraction over the store holding principals, contacts and calendars.
///
/// Contacts are read-only. Every mutation of the event table goes through
/// [`CalendarStore::reconcile`], which applies a whole plan atomically and
/// pairs each change with exactly one change-log row and one sync-token
/// increment.
pub trait CalendarStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Uri of the first principal whose uri starts with `prefix`, if any.
  fn first_principal(
    &self,
    prefix: String,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  /// Find the container named `spec.uri` for `principal_uri`, creating and
  /// registering it (sync token 1) when it does not exist yet.
  fn ensure_calendar(
    &self,
    principal_uri: String,
    spec: CalendarSpec,
  ) -> impl Future<Output = Result<CalendarHandle, Self::Error>> + Send + '_;

  /// Contacts whose raw text mentions the birthday marker at all.
  fn birthday_contacts(
    &self,
  ) -> impl Future<Output = Result<Vec<ContactRecord>, Self::Error>> + Send + '_;

  /// In one transaction: load the container's stored events, hand them to
  /// `planner`, apply the returned plan with its change-log entries and
  /// sync-token increments, then commit. Nothing is written on failure.
  fn reconcile<F>(
    &self,
    calendar_id: CalendarId,
    planner: F,
  ) -> impl Future<Output = Result<SyncReport, Self::Error>> + Send + '_
  where
    F: FnOnce(&StoredEvents) -> SyncPlan + Send + 'static;

  /// Current sync token of a container.
  fn sync_token(
    &self,
    calendar_id: CalendarId,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Change-log rows with a token greater than `since`, oldest first.
  fn changes_since(
    &self,
    calendar_id: CalendarId,
    since: i64,
  ) -> impl Future<Output = Result<Vec<ChangeLogEntry>, Self::Error>> + Send + '_;
}
