//! Handlers for `/admin/relationships/{rel}` endpoints.
//!
//! `{rel}` is a relationship kind such as `entity_and_event`. Bodies carry
//! `left_id`, `right_id`, optional `type_id`, `date_start`, `date_end` and
//! `notes`.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use csdb_core::{
  relationship::{Relationship, StoredRelationship},
  store::CatalogueStore,
};

use super::relationship_kind;
use crate::{AppState, error::AdminError};

/// `POST /admin/relationships/{rel}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Path(rel): Path<String>,
  Json(relationship): Json<Relationship>,
) -> Result<impl IntoResponse, AdminError>
where
  S: CatalogueStore,
{
  let kind = relationship_kind(&rel)?;
  let stored = state
    .store
    .create_relationship(kind, relationship)
    .await
    .map_err(AdminError::from_store)?;
  Ok((StatusCode::CREATED, Json(stored)))
}

/// `GET /admin/relationships/{rel}/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path((rel, id)): Path<(String, i64)>,
) -> Result<Json<StoredRelationship>, AdminError>
where
  S: CatalogueStore,
{
  let kind = relationship_kind(&rel)?;
  state
    .store
    .get_relationship(kind, id)
    .await
    .map_err(AdminError::from_store)?
    .map(Json)
    .ok_or_else(|| AdminError::NotFound(format!("{rel} relationship {id} not found")))
}

/// `PUT /admin/relationships/{rel}/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path((rel, id)): Path<(String, i64)>,
  Json(relationship): Json<Relationship>,
) -> Result<Json<StoredRelationship>, AdminError>
where
  S: CatalogueStore,
{
  let kind = relationship_kind(&rel)?;
  let stored = state
    .store
    .update_relationship(kind, id, relationship)
    .await
    .map_err(AdminError::from_store)?;
  Ok(Json(stored))
}

/// `DELETE /admin/relationships/{rel}/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path((rel, id)): Path<(String, i64)>,
) -> Result<StatusCode, AdminError>
where
  S: CatalogueStore,
{
  let kind = relationship_kind(&rel)?;
  state
    .store
    .delete_relationship(kind, id)
    .await
    .map_err(AdminError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
