//! Contacts → birthday events.

use std::collections::HashSet;

use bday_core::{birthday::ContactRecord, event::CalendarEvent};
use chrono::{DateTime, Utc};

/// Materialise one event per contact with a usable birthday.
///
/// Contacts without one are skipped. If two contacts map to the same event
/// key, the first one wins.
pub fn derive_events(contacts: &[ContactRecord], now: DateTime<Utc>) -> Vec<CalendarEvent> {
  let mut seen: HashSet<String> = HashSet::new();
  let mut events = Vec::with_capacity(contacts.len());

  for contact in contacts {
    let Some(birthday) = bday_vcard::extract_birthday(&contact.card_data) else {
      tracing::debug!(contact = %contact.uri, "no usable birthday");
      continue;
    };
    let name = bday_vcard::extract_name(&contact.card_data);
    let event = bday_ical::materialize(&contact.uri, &name, &birthday, now);

    if !seen.insert(event.uri.clone()) {
      tracing::warn!(contact = %contact.uri, event = %event.uri, "duplicate event key, skipping");
      continue;
    }
    events.push(event);
  }

  events
}
