//! Handlers for `/admin/finding-aids` endpoints, backing the finding aid
//! lookup on the item form.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/admin/finding-aids` | `?q=` search terms, `?p=` one-based page |
//! | `POST`   | `/admin/finding-aids` | Body: `{"name":…,"admin_notes":…}` |
//! | `GET`    | `/admin/finding-aids/{id}` | |
//! | `PUT`    | `/admin/finding-aids/{id}` | Body: every field |
//! | `DELETE` | `/admin/finding-aids/{id}` | Citing items are kept, uncited |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use csdb_core::{
  finding_aid::{FindingAid, StoredFindingAid},
  store::{CatalogueStore, ListQuery, Page},
};
use serde::Serialize;

use super::records::ListParams;
use crate::{AppState, error::AdminError};

#[derive(Debug, Serialize)]
pub struct FindingAidList {
  pub search: Option<String>,
  #[serde(flatten)]
  pub page:   Page<StoredFindingAid>,
}

/// `GET /admin/finding-aids[?q=<terms>][&p=<page>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<FindingAidList>, AdminError>
where
  S: CatalogueStore,
{
  let query = ListQuery {
    search: params.q.filter(|q| !q.trim().is_empty()),
    page:   params.p.as_deref().and_then(|p| p.parse().ok()).unwrap_or(1),
  };
  let page = state
    .store
    .list_finding_aids(&query, state.config.page_size)
    .await
    .map_err(AdminError::from_store)?;
  Ok(Json(FindingAidList { search: query.search, page }))
}

/// `POST /admin/finding-aids`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(aid): Json<FindingAid>,
) -> Result<impl IntoResponse, AdminError>
where
  S: CatalogueStore,
{
  let stored = state
    .store
    .add_finding_aid(aid)
    .await
    .map_err(AdminError::from_store)?;
  Ok((StatusCode::CREATED, Json(stored)))
}

/// `GET /admin/finding-aids/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<StoredFindingAid>, AdminError>
where
  S: CatalogueStore,
{
  state
    .store
    .get_finding_aid(id)
    .await
    .map_err(AdminError::from_store)?
    .map(Json)
    .ok_or_else(|| AdminError::NotFound(format!("finding aid {id} not found")))
}

/// `PUT /admin/finding-aids/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Json(aid): Json<FindingAid>,
) -> Result<Json<StoredFindingAid>, AdminError>
where
  S: CatalogueStore,
{
  let stored = state
    .store
    .update_finding_aid(id, aid)
    .await
    .map_err(AdminError::from_store)?;
  Ok(Json(stored))
}

/// `DELETE /admin/finding-aids/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, AdminError>
where
  S: CatalogueStore,
{
  state
    .store
    .delete_finding_aid(id)
    .await
    .map_err(AdminError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
