//! Handlers for `/admin/{kind}` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/admin/{kind}` | `?q=` search terms, `?p=` one-based page |
//! | `POST`   | `/admin/{kind}` | Body: the record's fields |
//! | `GET`    | `/admin/{kind}/add` | Creation form, `?obj_id=` to use a record as template |
//! | `GET`    | `/admin/{kind}/{id}` | Record with inline relationships and history |
//! | `PUT`    | `/admin/{kind}/{id}` | Body: every field of the record |
//! | `DELETE` | `/admin/{kind}/{id}` | 409 while relationships reference it |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use csdb_core::{
  record::{Record, RecordData, RecordKind, RecordSummary},
  select_list::SelectListKind,
  store::{CatalogueStore, ListQuery, Page, RecordView},
  view::{FieldSpec, Inline, ViewConfig},
};
use serde::{Deserialize, Serialize};

use super::record_kind;
use crate::{AppState, error::AdminError};

/// The widget layout shared by the add and edit pages.
#[derive(Debug, Serialize)]
pub struct FormLayout {
  pub fields:      &'static [FieldSpec],
  pub inlines:     Vec<Inline>,
  pub add_related: Vec<SelectListKind>,
}

impl From<&ViewConfig> for FormLayout {
  fn from(view: &ViewConfig) -> Self {
    Self {
      fields:      view.fields,
      inlines:     view.inlines.clone(),
      add_related: view.add_related(),
    }
  }
}

fn parse_body(kind: RecordKind, body: serde_json::Value) -> Result<RecordData, AdminError> {
  RecordData::from_parts(kind, body).map_err(|e| AdminError::BadRequest(e.to_string()))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub q: Option<String>,
  /// Kept as text so a malformed page falls back to the first one.
  pub p: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListPage {
  pub kind:    RecordKind,
  pub columns: &'static [&'static str],
  pub search:  Option<String>,
  #[serde(flatten)]
  pub page:    Page<RecordSummary>,
}

/// `GET /admin/{kind}[?q=<terms>][&p=<page>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Path(kind): Path<String>,
  Query(params): Query<ListParams>,
) -> Result<Json<ListPage>, AdminError>
where
  S: CatalogueStore,
{
  let kind = record_kind(&kind)?;
  let view = state.views.get(kind);
  let query = ListQuery {
    search: params.q.clone().filter(|q| !q.trim().is_empty()),
    page:   params.p.as_deref().and_then(|p| p.parse().ok()).unwrap_or(1),
  };

  let page = state
    .store
    .list_records(view, &query)
    .await
    .map_err(AdminError::from_store)?;

  Ok(Json(ListPage {
    kind,
    columns: view.list_display,
    search: query.search,
    page,
  }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /admin/{kind}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Path(kind): Path<String>,
  Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, AdminError>
where
  S: CatalogueStore,
{
  let kind = record_kind(&kind)?;
  let data = parse_body(kind, body)?;
  let record = state
    .store
    .create_record(data)
    .await
    .map_err(AdminError::from_store)?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Add form ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddParams {
  /// Record to copy. Unparseable or unknown ids give a blank form.
  pub obj_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddForm {
  pub kind:    RecordKind,
  pub initial: RecordData,
  #[serde(flatten)]
  pub layout:  FormLayout,
}

/// `GET /admin/{kind}/add[?obj_id=<id>]`
pub async fn add_form<S>(
  State(state): State<AppState<S>>,
  Path(kind): Path<String>,
  Query(params): Query<AddParams>,
) -> Result<Json<AddForm>, AdminError>
where
  S: CatalogueStore,
{
  let kind = record_kind(&kind)?;
  let source = params.obj_id.as_deref().and_then(|id| id.trim().parse().ok());
  let initial = state
    .store
    .template(kind, source)
    .await
    .map_err(AdminError::from_store)?;

  Ok(Json(AddForm {
    kind,
    initial,
    layout: state.views.get(kind).into(),
  }))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct EditPage {
  #[serde(flatten)]
  pub view:   RecordView,
  #[serde(flatten)]
  pub layout: FormLayout,
}

/// `GET /admin/{kind}/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path((kind, id)): Path<(String, i64)>,
) -> Result<Json<EditPage>, AdminError>
where
  S: CatalogueStore,
{
  let kind = record_kind(&kind)?;
  let view = state
    .store
    .record_view(kind, id)
    .await
    .map_err(AdminError::from_store)?
    .ok_or_else(|| AdminError::NotFound(format!("{} {id} not found", kind.label())))?;

  Ok(Json(EditPage {
    view,
    layout: state.views.get(kind).into(),
  }))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /admin/{kind}/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path((kind, id)): Path<(String, i64)>,
  Json(body): Json<serde_json::Value>,
) -> Result<Json<Record>, AdminError>
where
  S: CatalogueStore,
{
  let kind = record_kind(&kind)?;
  let data = parse_body(kind, body)?;
  let record = state
    .store
    .update_record(id, data)
    .await
    .map_err(AdminError::from_store)?;
  Ok(Json(record))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /admin/{kind}/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Path((kind, id)): Path<(String, i64)>,
) -> Result<StatusCode, AdminError>
where
  S: CatalogueStore,
{
  let kind = record_kind(&kind)?;
  state
    .store
    .delete_record(kind, id)
    .await
    .map_err(AdminError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
