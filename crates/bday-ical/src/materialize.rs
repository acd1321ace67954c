//! Birthday → iCalendar 2.0 document.
//!
//! Produces CRLF line endings and folds at 75 octets per RFC 5545 §3.1.

use bday_core::{
  birthday::ParsedBirthday,
  event::{CalendarEvent, LAST_OCCURRENCE_UNBOUNDED},
};
use chrono::{DateTime, NaiveTime, Utc};
use sha2::{Digest, Sha256};

pub const PRODID: &str = "-//Baikal//Birthday Sync//EN";

/// Prefix hashed together with the contact uri to form the event UID.
pub const UID_NAMESPACE: &str = "baikal-birthday-";

/// Alarm offset relative to the (midnight) start of the event.
pub const REMINDER_TRIGGER: &str = "-PT4H";

const UID_DOMAIN: &str = "@baikal-birthday";

// ─── Identity ────────────────────────────────────────────────────────────────

/// Stable event UID for a contact: the first 32 hex digits of
/// `SHA-256("baikal-birthday-" + contact_uri)`.
///
/// Depends on the uri only, so edits to the card keep the same identity.
pub fn make_uid(contact_uri: &str) -> String {
  let digest = Sha256::digest(format!("{UID_NAMESPACE}{contact_uri}").as_bytes());
  let mut uid = hex::encode(digest);
  uid.truncate(32);
  uid
}

/// Storage key of the event with `uid`.
pub fn event_uri(uid: &str) -> String {
  format!("{uid}.ics")
}

/// Hex SHA-256 of the UTF-8 document text.
pub fn content_etag(data: &str) -> String {
  hex::encode(Sha256::digest(data.as_bytes()))
}

// ─── RFC 5545 text helpers ───────────────────────────────────────────────────

/// Emit `s` as one logical line, folding at 75 octets with CRLF + SP continuation.
fn fold_line(s: &str) -> String {
  if s.len() <= 75 {
    return format!("{s}\r\n");
  }

  let mut result = String::new();
  let total = s.len();
  let mut pos = 0usize;
  let mut first = true;

  while pos < total {
    let limit = if first { 75 } else { 74 };
    let end = if pos + limit >= total {
      total
    } else {
      // Walk back to the nearest valid UTF-8 char boundary
      let mut e = pos + limit;
      while e > pos && !s.is_char_boundary(e) {
        e -= 1;
      }
      if e == pos { pos + 1 } else { e }
    };

    if !first {
      result.push(' ');
    }
    result.push_str(&s[pos..end]);
    result.push_str("\r\n");
    pos = end;
    first = false;
  }

  result
}

/// Escape a TEXT value: `\`, `;`, `,`, newline.
fn escape_text(s: &str) -> String {
  s.replace('\\', "\\\\")
    .replace(';', "\\;")
    .replace(',', "\\,")
    .replace('\n', "\\n")
}

// ─── Document ────────────────────────────────────────────────────────────────

/// Build the event for the contact stored under `contact_uri`.
///
/// Everything but the three timestamp properties (and `last_modified`) is a
/// pure function of `(contact_uri, name, birthday)`.
pub fn materialize(
  contact_uri: &str,
  name: &str,
  birthday: &ParsedBirthday,
  now: DateTime<Utc>,
) -> CalendarEvent {
  let uid = make_uid(contact_uri);
  let start = birthday.origin();
  let end = start.succ_opt().unwrap_or(start);
  let stamp = now.format("%Y%m%dT%H%M%SZ").to_string();

  let lines = [
    "BEGIN:VCALENDAR".to_string(),
    "VERSION:2.0".to_string(),
    format!("PRODID:{PRODID}"),
    "BEGIN:VEVENT".to_string(),
    format!("UID:{uid}{UID_DOMAIN}"),
    format!("DTSTAMP:{stamp}"),
    format!("CREATED:{stamp}"),
    format!("LAST-MODIFIED:{stamp}"),
    format!("DTSTART;VALUE=DATE:{}", start.format("%Y%m%d")),
    format!("DTEND;VALUE=DATE:{}", end.format("%Y%m%d")),
    format!("SUMMARY:{}'s Birthday", escape_text(name)),
    "RRULE:FREQ=YEARLY".to_string(),
    "TRANSP:TRANSPARENT".to_string(),
    "CLASS:PUBLIC".to_string(),
    "CATEGORIES:Birthday".to_string(),
    "BEGIN:VALARM".to_string(),
    "ACTION:DISPLAY".to_string(),
    "DESCRIPTION:Birthday reminder".to_string(),
    format!("TRIGGER:{REMINDER_TRIGGER}"),
    "END:VALARM".to_string(),
    "END:VEVENT".to_string(),
    "END:VCALENDAR".to_string(),
  ];
  let data: String = lines.iter().map(|l| fold_line(l)).collect();

  CalendarEvent {
    uri: event_uri(&uid),
    uid,
    etag: content_etag(&data),
    size: data.len() as i64,
    first_occurrence: start.and_time(NaiveTime::MIN).and_utc().timestamp(),
    last_occurrence: LAST_OCCURRENCE_UNBOUNDED,
    last_modified: now.timestamp(),
    data,
  }
}
