//! Derived events vs. stored events → minimal change set.

use std::collections::HashSet;

use bday_core::{
  change::{EventChange, SyncPlan},
  event::CalendarEvent,
  store::StoredEvents,
};

/// Compute the changes that make the stored container match `desired`.
///
/// - key absent → create
/// - key present, equivalent content → skip
/// - key present, content differs → update
/// - stored key not derivable any more → delete
///
/// `desired` must not repeat a key; see [`crate::derive_events`].
pub fn plan(existing: &StoredEvents, desired: Vec<CalendarEvent>) -> SyncPlan {
  let mut touched: HashSet<String> = HashSet::with_capacity(desired.len());
  let mut plan = SyncPlan::default();

  for event in desired {
    touched.insert(event.uri.clone());
    match existing.get(&event.uri) {
      Some(stored) if bday_ical::is_equivalent(stored, &event.data) => {
        plan.unchanged += 1;
      }
      Some(_) => {
        tracing::debug!(event = %event.uri, "birthday changed");
        plan.changes.push(EventChange::Update(event));
      }
      None => {
        tracing::debug!(event = %event.uri, "new birthday");
        plan.changes.push(EventChange::Create(event));
      }
    }
  }

  for uri in existing.keys().filter(|uri| !touched.contains(*uri)) {
    tracing::debug!(event = %uri, "stale birthday");
    plan.changes.push(EventChange::Delete(uri.clone()));
  }

  plan
}
