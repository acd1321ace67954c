//! Error type for `bday-store-sqlite`.

use bday_core::event::CalendarId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] bday_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("calendar not found: {0}")]
  CalendarMissing(CalendarId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
