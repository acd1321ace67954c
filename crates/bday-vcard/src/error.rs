//! Error types for the birthday extractor.
//!
//! These are reasons for "no birthday found"; the public extractor never
//! surfaces them as failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed content-line: {0}")]
  MalformedContentLine(String),

  #[error("invalid BDAY date: {value}")]
  InvalidDate { value: String },

  #[error("unsupported BDAY value shape: {value}")]
  UnsupportedShape { value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
