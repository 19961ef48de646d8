//! `GET /admin/`: the dashboard landing page.

use axum::{Json, extract::State};
use csdb_core::{record::RecordKind, store::CatalogueStore};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct NavEntry {
  pub kind:  RecordKind,
  pub label: &'static str,
  pub url:   String,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
  pub site_header: String,
  pub navigation:  Vec<NavEntry>,
}

/// Site header plus one navigation entry per record kind. Select lists are
/// reached from the forms that use them.
pub async fn handler<S>(State(state): State<AppState<S>>) -> Json<Dashboard>
where
  S: CatalogueStore,
{
  let navigation = state
    .views
    .navigation()
    .into_iter()
    .map(|kind| NavEntry {
      kind,
      label: kind.label_plural(),
      url: format!("/admin/{}", kind.label_plural()),
    })
    .collect();

  Json(Dashboard {
    site_header: state.views.site_header.clone(),
    navigation,
  })
}
