//! Handlers for `/admin/select-lists/{list}` endpoints, backing the
//! "add related" shortcuts next to autocomplete fields.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use csdb_core::{
  select_list::{SelectListEntry, SelectListKind},
  store::CatalogueStore,
};
use serde::{Deserialize, Serialize};

use super::select_list;
use crate::{AppState, error::AdminError};

#[derive(Debug, Serialize)]
pub struct EntryList {
  pub list:    SelectListKind,
  pub label:   &'static str,
  pub entries: Vec<SelectListEntry>,
}

#[derive(Debug, Deserialize)]
pub struct NameBody {
  pub name: String,
}

/// Fetch entry `id`, treating an entry of another list as missing.
async fn entry_in<S>(
  state: &AppState<S>,
  list: SelectListKind,
  id: i64,
) -> Result<SelectListEntry, AdminError>
where
  S: CatalogueStore,
{
  state
    .store
    .get_select_entry(id)
    .await
    .map_err(AdminError::from_store)?
    .filter(|entry| entry.list == list)
    .ok_or_else(|| AdminError::NotFound(format!("{} entry {id} not found", list.label())))
}

/// `GET /admin/select-lists/{list}`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Path(list): Path<String>,
) -> Result<Json<EntryList>, AdminError>
where
  S: CatalogueStore,
{
  let list = select_list(&list)?;
  let entries = state
    .store
    .list_select_entries(list)
    .await
    .map_err(AdminError::from_store)?;
  Ok(Json(EntryList { list, label: list.label(), entries }))
}

/// `POST /admin/select-lists/{list}`, body: `{"name":"…"}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Path(list): Path<String>,
  Json(body): Json<NameBody>,
) -> Result<impl IntoResponse, AdminError>
where
  S: CatalogueStore,
{
  let list = select_list(&list)?;
  let entry = state
    .store
    .add_select_entry(list, body.name)
    .await
    .map_err(AdminError::from_store)?;
  Ok((StatusCode::CREATED, Json(entry)))
}

/// `GET /admin/select-lists/{list}/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path((list, id)): Path<(String, i64)>,
) -> Result<Json<SelectListEntry>, AdminError>
where
  S: CatalogueStore,
{
  let list = select_list(&list)?;
  Ok(Json(entry_in(&state, list, id).await?))
}

/// `PUT /admin/select-lists/{list}/{id}`, body: `{"name":"…"}`
pub async fn rename<S>(
  State(state): State<AppState<S>>,
  Path((list, id)): Path<(String, i64)>,
  Json(body): Json<NameBody>,
) -> Result<Json<SelectListEntry>, AdminError>
where
  S: CatalogueStore,
{
  let list = select_list(&list)?;
  entry_in(&state, list, id).await?;
  let entry = state
    .store
    .rename_select_entry(id, body.name)
    .await
    .map_err(AdminError::from_store)?;
  Ok(Json(entry))
}

/// `DELETE /admin/select-lists/{list}/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path((list, id)): Path<(String, i64)>,
) -> Result<StatusCode, AdminError>
where
  S: CatalogueStore,
{
  let list = select_list(&list)?;
  entry_in(&state, list, id).await?;
  state
    .store
    .delete_select_entry(id)
    .await
    .map_err(AdminError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
