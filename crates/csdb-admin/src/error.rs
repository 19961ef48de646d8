//! Admin error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use csdb_core::{relationship::Dependent, store::DomainError, validate::ValidationErrors};
use serde_json::json;
use thiserror::Error;

/// An error returned by an admin handler.
#[derive(Debug, Error)]
pub enum AdminError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  /// A delete blocked by rows that still reference the target.
  #[error("conflict: {message}")]
  Conflict {
    message:    String,
    dependents: Vec<Dependent>,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AdminError {
  /// Map a backend error onto a status, recovering the domain error when the
  /// backend carries one.
  pub fn from_store<E: DomainError>(err: E) -> Self {
    match err.into_domain() {
      Ok(domain) => domain.into(),
      Err(other) => AdminError::Store(Box::new(other)),
    }
  }
}

impl From<csdb_core::Error> for AdminError {
  fn from(err: csdb_core::Error) -> Self {
    use csdb_core::Error as E;
    match err {
      E::Validation(errors) => AdminError::Validation(errors),
      E::Restricted { ref dependents, .. } | E::TypeInUse { ref dependents, .. } => {
        AdminError::Conflict {
          dependents: dependents.clone(),
          message:    err.to_string(),
        }
      }
      E::Serialization(e) => AdminError::BadRequest(e.to_string()),
      e @ (E::RecordNotFound { .. }
      | E::RelationshipNotFound { .. }
      | E::HistoryNotFound { .. }
      | E::SelectEntryNotFound(_)
      | E::FindingAidNotFound(_)
      | E::HistoryUnsupported(_)) => AdminError::NotFound(e.to_string()),
    }
  }
}

impl IntoResponse for AdminError {
  fn into_response(self) -> Response {
    match self {
      AdminError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      AdminError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      AdminError::Validation(fields) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Please correct the errors below.", "fields": fields })),
      )
        .into_response(),
      AdminError::Conflict { message, dependents } => (
        StatusCode::CONFLICT,
        Json(json!({ "error": message, "dependents": dependents })),
      )
        .into_response(),
      AdminError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": e.to_string() })),
        )
          .into_response()
      }
    }
  }
}

pub type Result<T, E = AdminError> = std::result::Result<T, E>;
