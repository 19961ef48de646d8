//! JSON admin surface for the cultural studies catalogue.
//!
//! Exposes an axum [`Router`] backed by any
//! [`CatalogueStore`]. Record kinds, select lists and
//! relationship kinds appear in paths by their snake_case names
//! (`/admin/entities`, `/admin/select-lists/entity_type`,
//! `/admin/relationships/entity_and_event`). Finding aids live under
//! `/admin/finding-aids`.

pub mod error;
pub mod handlers;

pub use error::AdminError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post},
};
use csdb_core::{store::CatalogueStore, view::ViewRegistry};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{finding_aids, history, index, records, relationships, select_lists};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `config.toml` and `CSDB_*`
/// environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
  pub host:        String,
  pub port:        u16,
  pub store_path:  PathBuf,
  pub site_header: String,
  pub page_size:   usize,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: CatalogueStore> {
  pub store:  Arc<S>,
  pub config: Arc<AdminConfig>,
  pub views:  Arc<ViewRegistry>,
}

impl<S: CatalogueStore> AppState<S> {
  /// Assemble the view registry from `config` once, at startup.
  pub fn new(store: S, config: AdminConfig) -> Self {
    let views = ViewRegistry::new(config.site_header.clone(), config.page_size);
    Self {
      store:  Arc::new(store),
      config: Arc::new(config),
      views:  Arc::new(views),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the admin [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CatalogueStore + Clone + 'static,
{
  Router::new()
    .route("/admin/", get(index::handler::<S>))
    // Select lists
    .route(
      "/admin/select-lists/{list}",
      get(select_lists::list::<S>).post(select_lists::create::<S>),
    )
    .route(
      "/admin/select-lists/{list}/{id}",
      get(select_lists::get_one::<S>)
        .put(select_lists::rename::<S>)
        .delete(select_lists::delete_one::<S>),
    )
    // Finding aids
    .route(
      "/admin/finding-aids",
      get(finding_aids::list::<S>).post(finding_aids::create::<S>),
    )
    .route(
      "/admin/finding-aids/{id}",
      get(finding_aids::get_one::<S>)
        .put(finding_aids::update::<S>)
        .delete(finding_aids::delete_one::<S>),
    )
    // Relationships
    .route("/admin/relationships/{rel}", post(relationships::create::<S>))
    .route(
      "/admin/relationships/{rel}/{id}",
      get(relationships::get_one::<S>)
        .put(relationships::update::<S>)
        .delete(relationships::delete_one::<S>),
    )
    // Records
    .route("/admin/{kind}", get(records::list::<S>).post(records::create::<S>))
    .route("/admin/{kind}/add", get(records::add_form::<S>))
    .route(
      "/admin/{kind}/{id}",
      get(records::get_one::<S>)
        .put(records::update::<S>)
        .delete(records::delete_one::<S>),
    )
    // History
    .route(
      "/admin/{kind}/{id}/history",
      get(history::list::<S>).post(history::create::<S>),
    )
    .route(
      "/admin/{kind}/{id}/history/{history_id}",
      delete(history::delete_one::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
