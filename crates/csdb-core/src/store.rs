//! The `CatalogueStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `csdb-store-sqlite`).
//! The admin layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use serde::Serialize;

use crate::{
  finding_aid::{FindingAid, StoredFindingAid},
  history::{HistoryEntry, StoredHistoryEntry},
  record::{Record, RecordData, RecordKind, RecordSummary},
  relationship::{Relationship, RelationshipKind, RelationshipView, StoredRelationship},
  select_list::{SelectListEntry, SelectListKind},
  view::ViewConfig,
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`CatalogueStore::list_records`].
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
  /// Substring matched against the view's search fields.
  pub search: Option<String>,
  /// One-based page number; out-of-range pages are clamped.
  pub page:   usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
  pub items:     Vec<T>,
  pub page:      usize,
  pub page_size: usize,
  pub total:     usize,
  pub num_pages: usize,
}

impl<T> Page<T> {
  pub fn num_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
  }

  /// Clamp a requested one-based page into `1..=num_pages`.
  pub fn clamp(requested: usize, total: usize, page_size: usize) -> usize {
    requested.clamp(1, Self::num_pages(total, page_size))
  }
}

/// A record's edit page: the record itself plus everything shown inline.
#[derive(Debug, Clone, Serialize)]
pub struct RecordView {
  pub record:          Record,
  pub display_name:    String,
  pub classifications: Vec<SelectListEntry>,
  pub relationships:   Vec<RelationshipView>,
  pub history:         Vec<StoredHistoryEntry>,
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Lets callers recover the domain error carried by a backend error, so the
/// admin layer can tell "not found" from "database down".
pub trait DomainError: std::error::Error + Send + Sync + Sized + 'static {
  fn into_domain(self) -> Result<crate::Error, Self>;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a catalogue store backend.
///
/// Every write validates its input first and runs as a single transaction.
/// Concurrent writers are last-write-wins.
pub trait CatalogueStore: Send + Sync {
  type Error: DomainError;

  // ── Select lists ──────────────────────────────────────────────────────

  fn add_select_entry(
    &self,
    list: SelectListKind,
    name: String,
  ) -> impl Future<Output = Result<SelectListEntry, Self::Error>> + Send + '_;

  fn get_select_entry(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<SelectListEntry>, Self::Error>> + Send + '_;

  fn rename_select_entry(
    &self,
    id: i64,
    name: String,
  ) -> impl Future<Output = Result<SelectListEntry, Self::Error>> + Send + '_;

  /// Delete an entry. Classifications drop it and relationship types
  /// referring to it become unset, except where the pair restricts the
  /// delete; then it fails with [`TypeInUse`](crate::Error::TypeInUse).
  fn delete_select_entry(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All entries of `list`, by upper-cased name, then by id.
  fn list_select_entries(
    &self,
    list: SelectListKind,
  ) -> impl Future<Output = Result<Vec<SelectListEntry>, Self::Error>> + Send + '_;

  // ── Finding aids ──────────────────────────────────────────────────────

  fn add_finding_aid(
    &self,
    aid: FindingAid,
  ) -> impl Future<Output = Result<StoredFindingAid, Self::Error>> + Send + '_;

  fn get_finding_aid(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<StoredFindingAid>, Self::Error>> + Send + '_;

  fn update_finding_aid(
    &self,
    id: i64,
    aid: FindingAid,
  ) -> impl Future<Output = Result<StoredFindingAid, Self::Error>> + Send + '_;

  /// Delete a finding aid. Items citing it keep existing, uncited.
  fn delete_finding_aid(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Finding aids by name, searched on name and notes.
  fn list_finding_aids<'a>(
    &'a self,
    query: &'a ListQuery,
    page_size: usize,
  ) -> impl Future<Output = Result<Page<StoredFindingAid>, Self::Error>> + Send + 'a;

  // ── Records ───────────────────────────────────────────────────────────

  fn create_record(
    &self,
    data: RecordData,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + '_;

  fn get_record(
    &self,
    kind: RecordKind,
    id: i64,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;

  /// Overwrite every field of an existing record, classifications included.
  fn update_record(
    &self,
    id: i64,
    data: RecordData,
  ) -> impl Future<Output = Result<Record, Self::Error>> + Send + '_;

  /// Delete a record and its history. Fails with
  /// [`Restricted`](crate::Error::Restricted) while relationships reference
  /// it.
  fn delete_record(
    &self,
    kind: RecordKind,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_records<'a>(
    &'a self,
    view: &'a ViewConfig,
    query: &'a ListQuery,
  ) -> impl Future<Output = Result<Page<RecordSummary>, Self::Error>> + Send + 'a;

  /// Materialise the edit page for a record. Returns `None` if not found.
  fn record_view(
    &self,
    kind: RecordKind,
    id: i64,
  ) -> impl Future<Output = Result<Option<RecordView>, Self::Error>> + Send + '_;

  /// A creation form pre-filled from record `source`, without its id,
  /// relationships or history. A missing or absent source yields a blank
  /// form.
  fn template(
    &self,
    kind: RecordKind,
    source: Option<i64>,
  ) -> impl Future<Output = Result<RecordData, Self::Error>> + Send + '_ {
    async move {
      let Some(id) = source else {
        return Ok::<_, Self::Error>(RecordData::blank(kind));
      };
      Ok(
        self
          .get_record(kind, id)
          .await?
          .map(|record| record.data)
          .unwrap_or_else(|| RecordData::blank(kind)),
      )
    }
  }

  // ── Relationships ─────────────────────────────────────────────────────

  fn create_relationship(
    &self,
    kind: RelationshipKind,
    relationship: Relationship,
  ) -> impl Future<Output = Result<StoredRelationship, Self::Error>> + Send + '_;

  fn get_relationship(
    &self,
    kind: RelationshipKind,
    id: i64,
  ) -> impl Future<Output = Result<Option<StoredRelationship>, Self::Error>> + Send + '_;

  fn update_relationship(
    &self,
    kind: RelationshipKind,
    id: i64,
    relationship: Relationship,
  ) -> impl Future<Output = Result<StoredRelationship, Self::Error>> + Send + '_;

  fn delete_relationship(
    &self,
    kind: RelationshipKind,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Every relationship with record `id` on either side.
  fn relationships_for(
    &self,
    kind: RecordKind,
    id: i64,
  ) -> impl Future<Output = Result<Vec<RelationshipView>, Self::Error>> + Send + '_;

  // ── History ───────────────────────────────────────────────────────────

  fn add_history(
    &self,
    kind: RecordKind,
    owner_id: i64,
    entry: HistoryEntry,
  ) -> impl Future<Output = Result<StoredHistoryEntry, Self::Error>> + Send + '_;

  /// Delete entry `id` of owner `owner_id`. An entry of another owner is
  /// reported as not found.
  fn delete_history(
    &self,
    kind: RecordKind,
    owner_id: i64,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// History of `owner_id`. Fails with
  /// [`RecordNotFound`](crate::Error::RecordNotFound) if the owner is absent.
  fn history_for(
    &self,
    kind: RecordKind,
    owner_id: i64,
  ) -> impl Future<Output = Result<Vec<StoredHistoryEntry>, Self::Error>> + Send + '_;
}
