//! Error types for `csdb-core`.

use thiserror::Error;

use crate::{
  record::RecordKind,
  relationship::{Dependent, RelationshipKind},
  validate::ValidationErrors,
};

#[derive(Debug, Error)]
pub enum Error {
  /// One or more fields failed validation; nothing was written.
  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("{} {id} not found", .kind.label())]
  RecordNotFound { kind: RecordKind, id: i64 },

  #[error("{} relationship {id} not found", .kind.as_ref())]
  RelationshipNotFound { kind: RelationshipKind, id: i64 },

  #[error("{} history entry {id} not found", .kind.label())]
  HistoryNotFound { kind: RecordKind, id: i64 },

  #[error("select list entry {0} not found")]
  SelectEntryNotFound(i64),

  #[error("finding aid {0} not found")]
  FindingAidNotFound(i64),

  /// Deletion blocked by relationship rows that still reference the record.
  #[error(
    "cannot delete {} {id}: referenced by {} relationship(s)",
    .kind.label(),
    .dependents.len()
  )]
  Restricted {
    kind:       RecordKind,
    id:         i64,
    dependents: Vec<Dependent>,
  },

  /// Deletion of a relationship type blocked by rows that still use it.
  #[error(
    "cannot delete select list entry {id}: type of {} relationship(s)",
    .dependents.len()
  )]
  TypeInUse {
    id:         i64,
    dependents: Vec<Dependent>,
  },

  #[error("{} records have no history", .0.label())]
  HistoryUnsupported(RecordKind),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl From<ValidationErrors> for Error {
  fn from(errors: ValidationErrors) -> Self { Self::Validation(errors) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
