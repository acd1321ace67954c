//! Error types for the reconciler.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No principal to sync for; nothing was written.
  #[error("no principal found with prefix {0:?}")]
  NoPrincipal(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
