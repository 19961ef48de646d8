//! Error type for `csdb-store-sqlite`.

use csdb_core::store::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] csdb_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A stored value could not be decoded into its domain type.
  #[error("decode error: {0}")]
  Decode(String),
}

impl DomainError for Error {
  fn into_domain(self) -> Result<csdb_core::Error, Self> {
    match self {
      Error::Core(e) => Ok(e),
      other => Err(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
