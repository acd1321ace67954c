//! Birthday calendar reconciliation for Baïkal.
//!
//! Reads every contact carrying a `BDAY`, derives one yearly all-day event
//! per birthday, and brings a per-principal "birthdays" calendar in line with
//! that set, backed by any [`CalendarStore`](bday_core::store::CalendarStore).

pub mod config;
pub mod derive;
pub mod diff;
pub mod error;
mod run;

pub use config::SyncConfig;
pub use derive::derive_events;
pub use error::{Error, Result};
pub use run::{SyncOutcome, run};
