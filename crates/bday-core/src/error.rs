//! Error types for `bday-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown change operation code: {0}")]
  UnknownOperation(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
