//! iCalendar side of the birthday sync.
//!
//! [`materialize`] turns a parsed birthday into the canonical calendar
//! document stored for it; [`is_equivalent`] decides whether a stored
//! document needs rewriting. Pure synchronous; no database dependencies.

mod compare;
mod materialize;

pub use compare::{DYNAMIC_PROPERTIES, is_equivalent, stable_lines};
pub use materialize::{
  PRODID, REMINDER_TRIGGER, UID_NAMESPACE, content_etag, event_uri, make_uid,
  materialize,
};
