//! Handlers for the history inline of entities and persons.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/admin/{kind}/{id}/history` | Entries of one owner, 404 if it is missing |
//! | `POST`   | `/admin/{kind}/{id}/history` | Body: `{"name":…,"date_start":…,"date_end":…,"notes":…}` |
//! | `DELETE` | `/admin/{kind}/{id}/history/{history_id}` | 404 unless owned by `{id}` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use csdb_core::{
  history::{HistoryEntry, StoredHistoryEntry},
  store::CatalogueStore,
};

use super::record_kind;
use crate::{AppState, error::AdminError};

/// `GET /admin/{kind}/{id}/history`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Path((kind, owner_id)): Path<(String, i64)>,
) -> Result<Json<Vec<StoredHistoryEntry>>, AdminError>
where
  S: CatalogueStore,
{
  let kind = record_kind(&kind)?;
  let entries = state
    .store
    .history_for(kind, owner_id)
    .await
    .map_err(AdminError::from_store)?;
  Ok(Json(entries))
}

/// `POST /admin/{kind}/{id}/history`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Path((kind, owner_id)): Path<(String, i64)>,
  Json(entry): Json<HistoryEntry>,
) -> Result<impl IntoResponse, AdminError>
where
  S: CatalogueStore,
{
  let kind = record_kind(&kind)?;
  let stored = state
    .store
    .add_history(kind, owner_id, entry)
    .await
    .map_err(AdminError::from_store)?;
  Ok((StatusCode::CREATED, Json(stored)))
}

/// `DELETE /admin/{kind}/{id}/history/{history_id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path((kind, owner_id, history_id)): Path<(String, i64, i64)>,
) -> Result<StatusCode, AdminError>
where
  S: CatalogueStore,
{
  let kind = record_kind(&kind)?;
  state
    .store
    .delete_history(kind, owner_id, history_id)
    .await
    .map_err(AdminError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
