//! Synchronous query helpers. Every function here runs on the database
//! thread inside a `tokio_rusqlite` closure and returns raw rows; decoding
//! into domain types happens back on the async side.

use std::collections::HashMap;

use csdb_core::{
  record::{Person, RecordData, RecordKind},
  relationship::{Dependent, RecordRef, RelationshipKind, Side},
  select_list::SelectListKind,
  validate::ValidationErrors,
};
use rusqlite::{Connection, OptionalExtension as _, types::Value};
use strum::IntoEnumIterator;

use crate::encode::{
  RawFindingAid, RawHistory, RawRecord, RawRelationship, RawRelationshipView,
  RawRow, RawSelectEntry, classification_table, record_table, relationship_table,
};

pub const INVALID_CHOICE: &str =
  "Select a valid choice. That choice is not one of the available choices.";

fn invalid_choice(id: i64) -> String {
  format!("Select a valid choice. {id} is not one of the available choices.")
}

fn capitalized(label: &str) -> String {
  let mut chars = label.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

// ─── Existence and uniqueness ────────────────────────────────────────────────

pub fn record_exists(
  conn: &Connection,
  kind: RecordKind,
  id: i64,
) -> rusqlite::Result<bool> {
  let sql = format!("SELECT 1 FROM {} WHERE id = ?1", record_table(kind));
  Ok(conn.query_row(&sql, [id], |_| Ok(())).optional()?.is_some())
}

/// Record a field error if another `kind` record already carries `name`.
pub fn check_unique_name(
  conn: &Connection,
  kind: RecordKind,
  name: &str,
  exclude: Option<i64>,
  errors: &mut ValidationErrors,
) -> rusqlite::Result<()> {
  let sql = format!(
    "SELECT 1 FROM {} WHERE name = ?1 AND id IS NOT ?2",
    record_table(kind)
  );
  let taken = conn
    .query_row(&sql, rusqlite::params![name, exclude], |_| Ok(()))
    .optional()?
    .is_some();
  if taken {
    errors.add(
      "name",
      format!("{} with this Name already exists.", capitalized(kind.label())),
    );
  }
  Ok(())
}

/// Record a field error if `owner_id` already has a history entry `name`.
pub fn check_unique_history(
  conn: &Connection,
  table: &str,
  kind: RecordKind,
  owner_id: i64,
  name: &str,
  errors: &mut ValidationErrors,
) -> rusqlite::Result<()> {
  let sql = format!("SELECT 1 FROM {table} WHERE owner_id = ?1 AND name = ?2");
  let taken = conn
    .query_row(&sql, rusqlite::params![owner_id, name], |_| Ok(()))
    .optional()?
    .is_some();
  if taken {
    let label = capitalized(kind.label());
    errors.add(
      "name",
      format!("{label} history with this {label} and Name already exists."),
    );
  }
  Ok(())
}

fn entry_list(conn: &Connection, id: i64) -> rusqlite::Result<Option<String>> {
  conn
    .query_row(
      "SELECT list FROM select_list_entries WHERE id = ?1",
      [id],
      |r| r.get(0),
    )
    .optional()
}

/// Every classification id must name an entry of the attribute's own list.
pub fn check_classifications(
  conn: &Connection,
  data: &RecordData,
  errors: &mut ValidationErrors,
) -> rusqlite::Result<()> {
  for c in data.classifications() {
    for &id in c.ids {
      if entry_list(conn, id)?.as_deref() != Some(c.list.as_ref()) {
        errors.add(c.field, invalid_choice(id));
      }
    }
  }
  Ok(())
}

/// A relationship type must belong to the pair's type list.
pub fn check_type(
  conn: &Connection,
  list: SelectListKind,
  type_id: Option<i64>,
  errors: &mut ValidationErrors,
) -> rusqlite::Result<()> {
  if let Some(id) = type_id
    && entry_list(conn, id)?.as_deref() != Some(list.as_ref())
  {
    errors.add("type_id", INVALID_CHOICE);
  }
  Ok(())
}

/// An item's finding aid must exist.
pub fn check_finding_aid(
  conn: &Connection,
  data: &RecordData,
  errors: &mut ValidationErrors,
) -> rusqlite::Result<()> {
  if let RecordData::Item(item) = data
    && let Some(id) = item.finding_aid
    && read_finding_aid(conn, id)?.is_none()
  {
    errors.add("finding_aid", invalid_choice(id));
  }
  Ok(())
}

pub fn check_endpoint(
  conn: &Connection,
  kind: RecordKind,
  id: i64,
  field: &str,
  errors: &mut ValidationErrors,
) -> rusqlite::Result<()> {
  if !record_exists(conn, kind, id)? {
    errors.add(field, INVALID_CHOICE);
  }
  Ok(())
}

// ─── Records ─────────────────────────────────────────────────────────────────

pub fn insert_record(
  conn: &Connection,
  kind: RecordKind,
  columns: Vec<(&'static str, Value)>,
  now: &str,
) -> rusqlite::Result<i64> {
  let (mut names, mut values): (Vec<&str>, Vec<Value>) = columns.into_iter().unzip();
  names.extend(["created_at", "updated_at"]);
  values.extend([Value::Text(now.to_owned()), Value::Text(now.to_owned())]);

  let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{i}")).collect();
  let sql = format!(
    "INSERT INTO {} ({}) VALUES ({})",
    record_table(kind),
    names.join(", "),
    placeholders.join(", ")
  );
  conn.execute(&sql, rusqlite::params_from_iter(values))?;
  Ok(conn.last_insert_rowid())
}

/// Overwrite every scalar column. Returns the number of rows changed.
pub fn update_record(
  conn: &Connection,
  kind: RecordKind,
  id: i64,
  columns: Vec<(&'static str, Value)>,
  now: &str,
) -> rusqlite::Result<usize> {
  let (mut names, mut values): (Vec<&str>, Vec<Value>) = columns.into_iter().unzip();
  names.push("updated_at");
  values.push(Value::Text(now.to_owned()));
  values.push(Value::Integer(id));

  let assignments: Vec<String> = names
    .iter()
    .enumerate()
    .map(|(i, name)| format!("{name} = ?{}", i + 1))
    .collect();
  let sql = format!(
    "UPDATE {} SET {} WHERE id = ?{}",
    record_table(kind),
    assignments.join(", "),
    names.len() + 1
  );
  conn.execute(&sql, rusqlite::params_from_iter(values))
}

/// Replace the record's classification rows with the ids in `data`,
/// preserving their order.
pub fn write_classifications(
  conn: &Connection,
  id: i64,
  data: &RecordData,
) -> rusqlite::Result<()> {
  let table = classification_table(data.kind());
  conn.execute(&format!("DELETE FROM {table} WHERE owner_id = ?1"), [id])?;

  let mut insert = conn.prepare(&format!(
    "INSERT OR IGNORE INTO {table} (owner_id, entry_id) VALUES (?1, ?2)"
  ))?;
  for c in data.classifications() {
    for &entry_id in c.ids {
      insert.execute([id, entry_id])?;
    }
  }
  Ok(())
}

/// Entries classifying record `id`, in the order they were attached.
pub fn classification_entries(
  conn: &Connection,
  kind: RecordKind,
  id: i64,
) -> rusqlite::Result<Vec<RawSelectEntry>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT e.id, e.list, e.name
     FROM {} c JOIN select_list_entries e ON e.id = c.entry_id
     WHERE c.owner_id = ?1
     ORDER BY c.rowid",
    classification_table(kind)
  ))?;
  stmt
    .query_map([id], |r| {
      Ok(RawSelectEntry { id: r.get(0)?, list: r.get(1)?, name: r.get(2)? })
    })?
    .collect()
}

pub fn read_record(
  conn: &Connection,
  kind: RecordKind,
  id: i64,
) -> rusqlite::Result<Option<RawRecord>> {
  let mut stmt =
    conn.prepare(&format!("SELECT * FROM {} WHERE id = ?1", record_table(kind)))?;
  let names: Vec<String> = stmt.column_names().into_iter().map(str::to_owned).collect();

  let row = stmt
    .query_row([id], |r| {
      let mut map = HashMap::with_capacity(names.len());
      for (i, name) in names.iter().enumerate() {
        map.insert(name.clone(), r.get::<_, Value>(i)?);
      }
      Ok(RawRow(map))
    })
    .optional()?;

  let Some(row) = row else { return Ok(None) };
  let classifications = classification_entries(conn, kind, id)?
    .into_iter()
    .map(|e| (e.id, e.list))
    .collect();
  Ok(Some(RawRecord { kind, row, classifications }))
}

/// The label a record is shown under in relationship listings and headings.
pub fn display_name(
  conn: &Connection,
  kind: RecordKind,
  id: i64,
) -> rusqlite::Result<String> {
  if kind != RecordKind::Person {
    let sql = format!("SELECT name FROM {} WHERE id = ?1", record_table(kind));
    let name: Option<String> = conn.query_row(&sql, [id], |r| r.get(0)).optional()?;
    return Ok(name.unwrap_or_default());
  }

  let names: Option<(Option<String>, Option<String>)> = conn
    .query_row(
      "SELECT first_name, last_name FROM persons WHERE id = ?1",
      [id],
      |r| Ok((r.get(0)?, r.get(1)?)),
    )
    .optional()?;
  let (first_name, last_name) = names.unwrap_or_default();
  let titles: Vec<String> = classification_entries(conn, kind, id)?
    .into_iter()
    .map(|e| e.name)
    .collect();

  let person = Person { first_name, last_name, ..Person::default() };
  Ok(person.full_name(&titles, Some(id)))
}

/// Relationship rows that still reference record `id`.
pub fn dependents(
  conn: &Connection,
  kind: RecordKind,
  id: i64,
) -> rusqlite::Result<Vec<Dependent>> {
  let mut found = Vec::new();
  for rel in RelationshipKind::involving(kind) {
    let (left, right) = rel.endpoints();
    let condition = match (left == kind, right == kind) {
      (true, true) => "left_id = ?1 OR right_id = ?1",
      (true, false) => "left_id = ?1",
      _ => "right_id = ?1",
    };
    let mut stmt = conn.prepare(&format!(
      "SELECT id FROM {} WHERE {condition} ORDER BY id",
      relationship_table(rel)
    ))?;
    let ids = stmt.query_map([id], |r| r.get::<_, i64>(0))?;
    for rel_id in ids {
      found.push(Dependent { kind: rel, id: rel_id? });
    }
  }
  Ok(found)
}

// ─── Select lists ────────────────────────────────────────────────────────────

/// Relationship rows whose type is entry `id`, for the kinds that restrict
/// deleting it.
pub fn type_dependents(conn: &Connection, id: i64) -> rusqlite::Result<Vec<Dependent>> {
  let mut found = Vec::new();
  for rel in RelationshipKind::iter().filter(|r| r.type_restricts_delete()) {
    let mut stmt = conn.prepare(&format!(
      "SELECT id FROM {} WHERE type_id = ?1 ORDER BY id",
      relationship_table(rel)
    ))?;
    let ids = stmt.query_map([id], |r| r.get::<_, i64>(0))?;
    for rel_id in ids {
      found.push(Dependent { kind: rel, id: rel_id? });
    }
  }
  Ok(found)
}

pub fn read_select_entry(
  conn: &Connection,
  id: i64,
) -> rusqlite::Result<Option<RawSelectEntry>> {
  conn
    .query_row(
      "SELECT id, list, name FROM select_list_entries WHERE id = ?1",
      [id],
      |r| Ok(RawSelectEntry { id: r.get(0)?, list: r.get(1)?, name: r.get(2)? }),
    )
    .optional()
}

pub fn read_select_entries(
  conn: &Connection,
  list: &str,
) -> rusqlite::Result<Vec<RawSelectEntry>> {
  let mut stmt = conn.prepare(
    "SELECT id, list, name FROM select_list_entries
     WHERE list = ?1
     ORDER BY upper(name), id",
  )?;
  stmt
    .query_map([list], |r| {
      Ok(RawSelectEntry { id: r.get(0)?, list: r.get(1)?, name: r.get(2)? })
    })?
    .collect()
}

// ─── Finding aids ────────────────────────────────────────────────────────────

const FINDING_AID_SEARCH: &[&str] = &["name", "admin_notes"];

fn finding_aid_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawFindingAid> {
  Ok(RawFindingAid {
    id:          r.get(0)?,
    name:        r.get(1)?,
    admin_notes: r.get(2)?,
    created_at:  r.get(3)?,
    updated_at:  r.get(4)?,
  })
}

pub fn read_finding_aid(
  conn: &Connection,
  id: i64,
) -> rusqlite::Result<Option<RawFindingAid>> {
  conn
    .query_row(
      "SELECT id, name, admin_notes, created_at, updated_at
       FROM finding_aids WHERE id = ?1",
      [id],
      finding_aid_row,
    )
    .optional()
}

/// Record a field error if another finding aid already carries `name`.
pub fn check_unique_finding_aid(
  conn: &Connection,
  name: &str,
  exclude: Option<i64>,
  errors: &mut ValidationErrors,
) -> rusqlite::Result<()> {
  let taken = conn
    .query_row(
      "SELECT 1 FROM finding_aids WHERE name = ?1 AND id IS NOT ?2",
      rusqlite::params![name, exclude],
      |_| Ok(()),
    )
    .optional()?
    .is_some();
  if taken {
    errors.add("name", "Finding aid with this Name already exists.");
  }
  Ok(())
}

/// One page of finding aids by name, plus the match count and clamped page.
pub fn list_finding_aids(
  conn: &Connection,
  terms: &[String],
  page: usize,
  page_size: usize,
) -> rusqlite::Result<(usize, usize, Vec<RawFindingAid>)> {
  let (filter, params) = search_clause(terms, FINDING_AID_SEARCH);

  let total: i64 = conn.query_row(
    &format!("SELECT COUNT(*) FROM finding_aids{filter}"),
    rusqlite::params_from_iter(params.iter()),
    |r| r.get(0),
  )?;
  let total = usize::try_from(total).unwrap_or_default();
  let page = csdb_core::store::Page::<()>::clamp(page, total, page_size);

  let mut stmt = conn.prepare(&format!(
    "SELECT id, name, admin_notes, created_at, updated_at
     FROM finding_aids{filter}
     ORDER BY name COLLATE NOCASE, id
     LIMIT {page_size} OFFSET {}",
    (page - 1) * page_size
  ))?;
  let rows = stmt
    .query_map(rusqlite::params_from_iter(params.iter()), finding_aid_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok((total, page, rows))
}

// ─── Relationships ───────────────────────────────────────────────────────────

pub fn read_relationship(
  conn: &Connection,
  kind: RelationshipKind,
  id: i64,
) -> rusqlite::Result<Option<RawRelationship>> {
  let sql = format!(
    "SELECT id, left_id, right_id, type_id, date_start, date_end, notes,
            created_at, updated_at
     FROM {} WHERE id = ?1",
    relationship_table(kind)
  );
  conn
    .query_row(&sql, [id], |r| {
      Ok(RawRelationship {
        id:         r.get(0)?,
        left_id:    r.get(1)?,
        right_id:   r.get(2)?,
        type_id:    r.get(3)?,
        date_start: r.get(4)?,
        date_end:   r.get(5)?,
        notes:      r.get(6)?,
        created_at: r.get(7)?,
        updated_at: r.get(8)?,
      })
    })
    .optional()
}

/// Every relationship touching record `id`, grouped by relationship kind and
/// side, each carrying the other endpoint's display name.
pub fn relationship_views(
  conn: &Connection,
  kind: RecordKind,
  id: i64,
) -> rusqlite::Result<Vec<RawRelationshipView>> {
  let mut views = Vec::new();
  for rel in RelationshipKind::involving(kind) {
    let (left, right) = rel.endpoints();
    let sides = [
      (Side::Left, left, "left_id", right, "right_id"),
      (Side::Right, right, "right_id", left, "left_id"),
    ];
    for (side, own_kind, own_col, other_kind, other_col) in sides {
      if own_kind != kind {
        continue;
      }
      let mut stmt = conn.prepare(&format!(
        "SELECT r.id, r.{other_col}, t.name, r.date_start, r.date_end, r.notes
         FROM {} r LEFT JOIN select_list_entries t ON t.id = r.type_id
         WHERE r.{own_col} = ?1
         ORDER BY r.id",
        relationship_table(rel)
      ))?;
      let rows: Vec<(i64, i64, Option<String>, Option<String>, Option<String>, Option<String>)> =
        stmt
          .query_map([id], |r| {
            Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?, r.get(5)?))
          })?
          .collect::<rusqlite::Result<_>>()?;

      for (rel_id, other_id, type_name, date_start, date_end, notes) in rows {
        views.push(RawRelationshipView {
          kind: rel,
          side,
          other: RecordRef {
            kind:         other_kind,
            id:           other_id,
            display_name: display_name(conn, other_kind, other_id)?,
          },
          type_name,
          id: rel_id,
          date_start,
          date_end,
          notes,
        });
      }
    }
  }
  Ok(views)
}

// ─── History ─────────────────────────────────────────────────────────────────

fn history_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawHistory> {
  Ok(RawHistory {
    id:         r.get(0)?,
    owner_id:   r.get(1)?,
    name:       r.get(2)?,
    date_start: r.get(3)?,
    date_end:   r.get(4)?,
    notes:      r.get(5)?,
    created_at: r.get(6)?,
  })
}

pub fn read_history_entry(
  conn: &Connection,
  table: &str,
  id: i64,
) -> rusqlite::Result<Option<RawHistory>> {
  conn
    .query_row(
      &format!(
        "SELECT id, owner_id, name, date_start, date_end, notes, created_at
         FROM {table} WHERE id = ?1"
      ),
      [id],
      history_row,
    )
    .optional()
}

pub fn read_history(
  conn: &Connection,
  table: &str,
  owner_id: i64,
) -> rusqlite::Result<Vec<RawHistory>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT id, owner_id, name, date_start, date_end, notes, created_at
     FROM {table} WHERE owner_id = ?1
     ORDER BY id"
  ))?;
  stmt.query_map([owner_id], history_row)?.collect()
}

// ─── List views ──────────────────────────────────────────────────────────────

/// Everything the list query needs, detached from the borrowed view config.
pub struct ListPlan {
  pub kind:          RecordKind,
  pub list_display:  &'static [&'static str],
  pub search_fields: &'static [&'static str],
  pub ordering:      &'static [&'static str],
  pub page_size:     usize,
  pub page:          usize,
  pub terms:         Vec<String>,
}

/// One page of `(id, display columns)` rows plus the total match count and
/// the clamped page number.
pub struct ListRows {
  pub total: usize,
  pub page:  usize,
  pub rows:  Vec<(i64, Vec<Option<String>>)>,
}

fn like_pattern(term: &str) -> String {
  let mut escaped = String::with_capacity(term.len() + 2);
  escaped.push('%');
  for c in term.chars() {
    if matches!(c, '\\' | '%' | '_') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped.push('%');
  escaped
}

/// Each whitespace-separated term must match at least one search field.
fn search_clause(terms: &[String], fields: &[&str]) -> (String, Vec<String>) {
  if terms.is_empty() || fields.is_empty() {
    return (String::new(), Vec::new());
  }
  let clauses: Vec<String> = (1..=terms.len())
    .map(|n| {
      let any: Vec<String> = fields
        .iter()
        .map(|f| format!("{f} LIKE ?{n} ESCAPE '\\'"))
        .collect();
      format!("({})", any.join(" OR "))
    })
    .collect();
  let params = terms.iter().map(|t| like_pattern(t)).collect();
  (format!(" WHERE {}", clauses.join(" AND ")), params)
}

pub fn list_rows(conn: &Connection, plan: &ListPlan) -> rusqlite::Result<ListRows> {
  let table = record_table(plan.kind);
  let (filter, params) = search_clause(&plan.terms, plan.search_fields);

  let total: i64 = conn.query_row(
    &format!("SELECT COUNT(*) FROM {table}{filter}"),
    rusqlite::params_from_iter(params.iter()),
    |r| r.get(0),
  )?;
  let total = usize::try_from(total).unwrap_or_default();
  let page = csdb_core::store::Page::<()>::clamp(plan.page, total, plan.page_size);

  let mut order: Vec<String> =
    plan.ordering.iter().map(|c| format!("{c} COLLATE NOCASE")).collect();
  order.push("id".to_owned());

  let sql = format!(
    "SELECT id, {} FROM {table}{filter} ORDER BY {} LIMIT {} OFFSET {}",
    plan.list_display.join(", "),
    order.join(", "),
    plan.page_size,
    (page - 1) * plan.page_size,
  );
  let width = plan.list_display.len();
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map(rusqlite::params_from_iter(params.iter()), |r| {
      let id: i64 = r.get(0)?;
      let columns = (1..=width)
        .map(|i| r.get::<_, Option<String>>(i))
        .collect::<rusqlite::Result<Vec<_>>>()?;
      Ok((id, columns))
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(ListRows { total, page, rows })
}
