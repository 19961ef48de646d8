//! The SQLite implementation of [`CatalogueStore`].

use std::path::Path;

use chrono::Utc;
use csdb_core::{
  finding_aid::{FindingAid, StoredFindingAid},
  history::{HistoryEntry, StoredHistoryEntry},
  record::{Record, RecordData, RecordKind, RecordSummary},
  relationship::{Relationship, RelationshipKind, RelationshipView, StoredRelationship},
  select_list::{SelectListEntry, SelectListKind, sort_entries, validate_name},
  store::{CatalogueStore, ListQuery, Page, RecordView},
  validate::ValidationErrors,
  view::ViewConfig,
};

use crate::{
  Error, Result,
  encode::{encode_dt, encode_fuzzy, history_table, record_columns, relationship_table},
  queries::{self, ListPlan},
  schema::schema,
};

/// Outcome of a closure that may reject its input after looking at the
/// database. The outer error is the connection; the inner one is domain.
type Checked<T> = std::result::Result<T, csdb_core::Error>;

fn invalid(errors: ValidationErrors) -> Error { Error::Core(errors.into()) }

// ─── Store ───────────────────────────────────────────────────────────────────

/// A catalogue store backed by a single SQLite file.
///
/// Clones share one connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a private in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    let ddl = schema();
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&ddl)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn display_name(&self, kind: RecordKind, id: i64) -> Result<String> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(queries::display_name(conn, kind, id)?))
        .await?,
    )
  }

  async fn classification_entries(
    &self,
    kind: RecordKind,
    id: i64,
  ) -> Result<Vec<SelectListEntry>> {
    let raw = self
      .conn
      .call(move |conn| Ok(queries::classification_entries(conn, kind, id)?))
      .await?;
    raw.into_iter().map(|e| e.into_entry()).collect()
  }

  fn history_table(kind: RecordKind) -> Result<&'static str> {
    history_table(kind).ok_or(Error::Core(csdb_core::Error::HistoryUnsupported(kind)))
  }
}

// ─── CatalogueStore impl ─────────────────────────────────────────────────────

impl CatalogueStore for SqliteStore {
  type Error = Error;

  // ── Select lists ──────────────────────────────────────────────────────────

  async fn add_select_entry(
    &self,
    list: SelectListKind,
    name: String,
  ) -> Result<SelectListEntry> {
    validate_name(&name).map_err(invalid)?;

    let list_str = list.as_ref().to_owned();
    let stored_name = name.clone();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO select_list_entries (list, name) VALUES (?1, ?2)",
          rusqlite::params![list_str, stored_name],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(list = list.as_ref(), id, "added select list entry");
    Ok(SelectListEntry { id, list, name })
  }

  async fn get_select_entry(&self, id: i64) -> Result<Option<SelectListEntry>> {
    let raw = self
      .conn
      .call(move |conn| Ok(queries::read_select_entry(conn, id)?))
      .await?;
    raw.map(|e| e.into_entry()).transpose()
  }

  async fn rename_select_entry(&self, id: i64, name: String) -> Result<SelectListEntry> {
    validate_name(&name).map_err(invalid)?;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE select_list_entries SET name = ?1 WHERE id = ?2",
          rusqlite::params![name, id],
        )?)
      })
      .await?;
    if changed == 0 {
      return Err(csdb_core::Error::SelectEntryNotFound(id).into());
    }

    self
      .get_select_entry(id)
      .await?
      .ok_or(Error::Core(csdb_core::Error::SelectEntryNotFound(id)))
  }

  async fn delete_select_entry(&self, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let dependents = queries::type_dependents(&tx, id)?;
        if !dependents.is_empty() {
          return Ok(Checked::Err(csdb_core::Error::TypeInUse { id, dependents }));
        }

        // Classifications cascade; other relationship types are unset.
        let changed = tx.execute("DELETE FROM select_list_entries WHERE id = ?1", [id])?;
        if changed == 0 {
          return Ok(Checked::Err(csdb_core::Error::SelectEntryNotFound(id)));
        }
        tx.commit()?;
        Ok(Checked::Ok(()))
      })
      .await??;

    tracing::debug!(id, "deleted select list entry");
    Ok(())
  }

  async fn list_select_entries(&self, list: SelectListKind) -> Result<Vec<SelectListEntry>> {
    let list_str = list.as_ref().to_owned();
    let raw = self
      .conn
      .call(move |conn| Ok(queries::read_select_entries(conn, &list_str)?))
      .await?;

    let mut entries = raw
      .into_iter()
      .map(|e| e.into_entry())
      .collect::<Result<Vec<_>>>()?;
    // upper() only folds ASCII; settle the rest here.
    sort_entries(&mut entries);
    Ok(entries)
  }

  // ── Finding aids ──────────────────────────────────────────────────────────

  async fn add_finding_aid(&self, aid: FindingAid) -> Result<StoredFindingAid> {
    aid.validate().map_err(invalid)?;
    let now = encode_dt(Utc::now());

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut errors = ValidationErrors::new();
        queries::check_unique_finding_aid(&tx, &aid.name, None, &mut errors)?;
        if !errors.is_empty() {
          return Ok(Checked::Err(errors.into()));
        }

        tx.execute(
          "INSERT INTO finding_aids (name, admin_notes, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?3)",
          rusqlite::params![aid.name, aid.admin_notes, now],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Checked::Ok(id))
      })
      .await??;

    tracing::info!(id, "added finding aid");
    self
      .get_finding_aid(id)
      .await?
      .ok_or(Error::Core(csdb_core::Error::FindingAidNotFound(id)))
  }

  async fn get_finding_aid(&self, id: i64) -> Result<Option<StoredFindingAid>> {
    let raw = self
      .conn
      .call(move |conn| Ok(queries::read_finding_aid(conn, id)?))
      .await?;
    raw.map(|a| a.into_stored()).transpose()
  }

  async fn update_finding_aid(&self, id: i64, aid: FindingAid) -> Result<StoredFindingAid> {
    aid.validate().map_err(invalid)?;
    let now = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if queries::read_finding_aid(&tx, id)?.is_none() {
          return Ok(Checked::Err(csdb_core::Error::FindingAidNotFound(id)));
        }

        let mut errors = ValidationErrors::new();
        queries::check_unique_finding_aid(&tx, &aid.name, Some(id), &mut errors)?;
        if !errors.is_empty() {
          return Ok(Checked::Err(errors.into()));
        }

        tx.execute(
          "UPDATE finding_aids SET name = ?1, admin_notes = ?2, updated_at = ?3
           WHERE id = ?4",
          rusqlite::params![aid.name, aid.admin_notes, now, id],
        )?;
        tx.commit()?;
        Ok(Checked::Ok(()))
      })
      .await??;

    tracing::info!(id, "updated finding aid");
    self
      .get_finding_aid(id)
      .await?
      .ok_or(Error::Core(csdb_core::Error::FindingAidNotFound(id)))
  }

  async fn delete_finding_aid(&self, id: i64) -> Result<()> {
    let changed = self
      .conn
      .call(move |conn| {
        // Citing items fall back to NULL.
        Ok(conn.execute("DELETE FROM finding_aids WHERE id = ?1", [id])?)
      })
      .await?;
    if changed == 0 {
      return Err(csdb_core::Error::FindingAidNotFound(id).into());
    }
    tracing::info!(id, "deleted finding aid");
    Ok(())
  }

  async fn list_finding_aids<'a>(
    &'a self,
    query: &'a ListQuery,
    page_size: usize,
  ) -> Result<Page<StoredFindingAid>> {
    let page_size = page_size.max(1);
    let requested = query.page;
    let terms: Vec<String> = query
      .search
      .as_deref()
      .unwrap_or_default()
      .split_whitespace()
      .map(str::to_owned)
      .collect();

    let (total, page, raw) = self
      .conn
      .call(move |conn| {
        Ok(queries::list_finding_aids(conn, &terms, requested, page_size)?)
      })
      .await?;

    Ok(Page {
      items: raw
        .into_iter()
        .map(|a| a.into_stored())
        .collect::<Result<Vec<_>>>()?,
      page,
      page_size,
      total,
      num_pages: Page::<StoredFindingAid>::num_pages(total, page_size),
    })
  }

  // ── Records ───────────────────────────────────────────────────────────────

  async fn create_record(&self, data: RecordData) -> Result<Record> {
    data.validate().map_err(invalid)?;

    let kind = data.kind();
    let columns = record_columns(&data)?;
    let now = encode_dt(Utc::now());

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let mut errors = ValidationErrors::new();
        if let Some(name) = data.name() {
          queries::check_unique_name(&tx, kind, name, None, &mut errors)?;
        }
        queries::check_classifications(&tx, &data, &mut errors)?;
        queries::check_finding_aid(&tx, &data, &mut errors)?;
        if !errors.is_empty() {
          return Ok(Checked::Err(errors.into()));
        }

        let id = queries::insert_record(&tx, kind, columns, &now)?;
        queries::write_classifications(&tx, id, &data)?;
        tx.commit()?;
        Ok(Checked::Ok(id))
      })
      .await??;

    tracing::info!(kind = kind.as_ref(), id, "created record");
    self
      .get_record(kind, id)
      .await?
      .ok_or(Error::Core(csdb_core::Error::RecordNotFound { kind, id }))
  }

  async fn get_record(&self, kind: RecordKind, id: i64) -> Result<Option<Record>> {
    let raw = self
      .conn
      .call(move |conn| Ok(queries::read_record(conn, kind, id)?))
      .await?;
    raw.map(|r| r.into_record()).transpose()
  }

  async fn update_record(&self, id: i64, data: RecordData) -> Result<Record> {
    data.validate().map_err(invalid)?;

    let kind = data.kind();
    let columns = record_columns(&data)?;
    let now = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !queries::record_exists(&tx, kind, id)? {
          return Ok(Checked::Err(csdb_core::Error::RecordNotFound { kind, id }));
        }

        let mut errors = ValidationErrors::new();
        if let Some(name) = data.name() {
          queries::check_unique_name(&tx, kind, name, Some(id), &mut errors)?;
        }
        queries::check_classifications(&tx, &data, &mut errors)?;
        queries::check_finding_aid(&tx, &data, &mut errors)?;
        if !errors.is_empty() {
          return Ok(Checked::Err(errors.into()));
        }

        queries::update_record(&tx, kind, id, columns, &now)?;
        queries::write_classifications(&tx, id, &data)?;
        tx.commit()?;
        Ok(Checked::Ok(()))
      })
      .await??;

    tracing::info!(kind = kind.as_ref(), id, "updated record");
    self
      .get_record(kind, id)
      .await?
      .ok_or(Error::Core(csdb_core::Error::RecordNotFound { kind, id }))
  }

  async fn delete_record(&self, kind: RecordKind, id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !queries::record_exists(&tx, kind, id)? {
          return Ok(Checked::Err(csdb_core::Error::RecordNotFound { kind, id }));
        }

        let dependents = queries::dependents(&tx, kind, id)?;
        if !dependents.is_empty() {
          return Ok(Checked::Err(csdb_core::Error::Restricted { kind, id, dependents }));
        }

        // History and classification rows cascade.
        let table = crate::encode::record_table(kind);
        tx.execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])?;
        tx.commit()?;
        Ok(Checked::Ok(()))
      })
      .await??;

    tracing::info!(kind = kind.as_ref(), id, "deleted record");
    Ok(())
  }

  async fn list_records<'a>(
    &'a self,
    view: &'a ViewConfig,
    query: &'a ListQuery,
  ) -> Result<Page<RecordSummary>> {
    let plan = ListPlan {
      kind:          view.kind,
      list_display:  view.list_display,
      search_fields: view.search_fields,
      ordering:      view.ordering,
      page_size:     view.page_size.max(1),
      page:          query.page,
      terms:         query
        .search
        .as_deref()
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_owned)
        .collect(),
    };
    let page_size = plan.page_size;

    let rows = self
      .conn
      .call(move |conn| Ok(queries::list_rows(conn, &plan)?))
      .await?;

    Ok(Page {
      items: rows
        .rows
        .into_iter()
        .map(|(id, columns)| RecordSummary { id, columns })
        .collect(),
      page: rows.page,
      page_size,
      total: rows.total,
      num_pages: Page::<RecordSummary>::num_pages(rows.total, page_size),
    })
  }

  async fn record_view(&self, kind: RecordKind, id: i64) -> Result<Option<RecordView>> {
    let Some(record) = self.get_record(kind, id).await? else {
      return Ok(None);
    };

    let display_name = self.display_name(kind, id).await?;
    let classifications = self.classification_entries(kind, id).await?;
    let relationships = self.relationships_for(kind, id).await?;
    let history = if kind.has_history() {
      self.history_for(kind, id).await?
    } else {
      Vec::new()
    };

    Ok(Some(RecordView {
      record,
      display_name,
      classifications,
      relationships,
      history,
    }))
  }

  // ── Relationships ─────────────────────────────────────────────────────────

  async fn create_relationship(
    &self,
    kind: RelationshipKind,
    relationship: Relationship,
  ) -> Result<StoredRelationship> {
    relationship.validate().map_err(invalid)?;

    let start = encode_fuzzy(&relationship.dates.start)?;
    let end = encode_fuzzy(&relationship.dates.end)?;
    let now = encode_dt(Utc::now());

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut errors = ValidationErrors::new();
        let (left, right) = kind.endpoints();
        queries::check_endpoint(&tx, left, relationship.left_id, "left_id", &mut errors)?;
        queries::check_endpoint(&tx, right, relationship.right_id, "right_id", &mut errors)?;
        queries::check_type(&tx, kind.type_list(), relationship.type_id, &mut errors)?;
        if !errors.is_empty() {
          return Ok(Checked::Err(errors.into()));
        }

        tx.execute(
          &format!(
            "INSERT INTO {} (
               left_id, right_id, type_id, date_start, date_end, notes,
               created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            relationship_table(kind)
          ),
          rusqlite::params![
            relationship.left_id,
            relationship.right_id,
            relationship.type_id,
            start,
            end,
            relationship.notes,
            now,
          ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Checked::Ok(id))
      })
      .await??;

    tracing::info!(kind = kind.as_ref(), id, "created relationship");
    self
      .get_relationship(kind, id)
      .await?
      .ok_or(Error::Core(csdb_core::Error::RelationshipNotFound { kind, id }))
  }

  async fn get_relationship(
    &self,
    kind: RelationshipKind,
    id: i64,
  ) -> Result<Option<StoredRelationship>> {
    let raw = self
      .conn
      .call(move |conn| Ok(queries::read_relationship(conn, kind, id)?))
      .await?;
    raw.map(|r| r.into_stored(kind)).transpose()
  }

  async fn update_relationship(
    &self,
    kind: RelationshipKind,
    id: i64,
    relationship: Relationship,
  ) -> Result<StoredRelationship> {
    relationship.validate().map_err(invalid)?;

    let start = encode_fuzzy(&relationship.dates.start)?;
    let end = encode_fuzzy(&relationship.dates.end)?;
    let now = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if queries::read_relationship(&tx, kind, id)?.is_none() {
          return Ok(Checked::Err(csdb_core::Error::RelationshipNotFound { kind, id }));
        }

        let mut errors = ValidationErrors::new();
        let (left, right) = kind.endpoints();
        queries::check_endpoint(&tx, left, relationship.left_id, "left_id", &mut errors)?;
        queries::check_endpoint(&tx, right, relationship.right_id, "right_id", &mut errors)?;
        queries::check_type(&tx, kind.type_list(), relationship.type_id, &mut errors)?;
        if !errors.is_empty() {
          return Ok(Checked::Err(errors.into()));
        }

        tx.execute(
          &format!(
            "UPDATE {} SET
               left_id = ?1, right_id = ?2, type_id = ?3,
               date_start = ?4, date_end = ?5, notes = ?6, updated_at = ?7
             WHERE id = ?8",
            relationship_table(kind)
          ),
          rusqlite::params![
            relationship.left_id,
            relationship.right_id,
            relationship.type_id,
            start,
            end,
            relationship.notes,
            now,
            id,
          ],
        )?;
        tx.commit()?;
        Ok(Checked::Ok(()))
      })
      .await??;

    tracing::info!(kind = kind.as_ref(), id, "updated relationship");
    self
      .get_relationship(kind, id)
      .await?
      .ok_or(Error::Core(csdb_core::Error::RelationshipNotFound { kind, id }))
  }

  async fn delete_relationship(&self, kind: RelationshipKind, id: i64) -> Result<()> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("DELETE FROM {} WHERE id = ?1", relationship_table(kind)),
          [id],
        )?)
      })
      .await?;
    if changed == 0 {
      return Err(csdb_core::Error::RelationshipNotFound { kind, id }.into());
    }
    tracing::info!(kind = kind.as_ref(), id, "deleted relationship");
    Ok(())
  }

  async fn relationships_for(
    &self,
    kind: RecordKind,
    id: i64,
  ) -> Result<Vec<RelationshipView>> {
    let raw = self
      .conn
      .call(move |conn| Ok(queries::relationship_views(conn, kind, id)?))
      .await?;
    raw.into_iter().map(|v| v.into_view()).collect()
  }

  // ── History ───────────────────────────────────────────────────────────────

  async fn add_history(
    &self,
    kind: RecordKind,
    owner_id: i64,
    entry: HistoryEntry,
  ) -> Result<StoredHistoryEntry> {
    let table = Self::history_table(kind)?;
    entry.validate().map_err(invalid)?;

    let start = encode_fuzzy(&entry.dates.start)?;
    let end = encode_fuzzy(&entry.dates.end)?;
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !queries::record_exists(&tx, kind, owner_id)? {
          return Ok(Checked::Err(csdb_core::Error::RecordNotFound { kind, id: owner_id }));
        }

        let mut errors = ValidationErrors::new();
        queries::check_unique_history(&tx, table, kind, owner_id, &entry.name, &mut errors)?;
        if !errors.is_empty() {
          return Ok(Checked::Err(errors.into()));
        }

        tx.execute(
          &format!(
            "INSERT INTO {table} (owner_id, name, date_start, date_end, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
          ),
          rusqlite::params![owner_id, entry.name, start, end, entry.notes, now],
        )?;
        let id = tx.last_insert_rowid();
        let raw = queries::read_history_entry(&tx, table, id)?;
        tx.commit()?;
        Ok(Checked::Ok(raw))
      })
      .await??;

    let stored = raw
      .ok_or(Error::Decode("history entry vanished after insert".to_owned()))?
      .into_stored(kind)?;
    tracing::info!(kind = kind.as_ref(), owner_id, id = stored.id, "added history entry");
    Ok(stored)
  }

  async fn delete_history(&self, kind: RecordKind, owner_id: i64, id: i64) -> Result<()> {
    let table = Self::history_table(kind)?;
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("DELETE FROM {table} WHERE id = ?1 AND owner_id = ?2"),
          [id, owner_id],
        )?)
      })
      .await?;
    if changed == 0 {
      return Err(csdb_core::Error::HistoryNotFound { kind, id }.into());
    }
    tracing::info!(kind = kind.as_ref(), owner_id, id, "deleted history entry");
    Ok(())
  }

  async fn history_for(
    &self,
    kind: RecordKind,
    owner_id: i64,
  ) -> Result<Vec<StoredHistoryEntry>> {
    let table = Self::history_table(kind)?;
    let raw = self
      .conn
      .call(move |conn| {
        if !queries::record_exists(conn, kind, owner_id)? {
          return Ok(Checked::Err(csdb_core::Error::RecordNotFound { kind, id: owner_id }));
        }
        Ok(Checked::Ok(queries::read_history(conn, table, owner_id)?))
      })
      .await??;
    raw.into_iter().map(|h| h.into_stored(kind)).collect()
  }
}
