//! SQL schema for the catalogue SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

use csdb_core::relationship::RelationshipKind;
use strum::IntoEnumIterator;

use crate::encode::{record_table, relationship_table};

/// Records, vocabularies, finding aids, classifications and history;
/// idempotent thanks to
/// `CREATE TABLE IF NOT EXISTS`.
const BASE_SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Every vocabulary shares one table, discriminated by `list`.
-- Names may repeat within a list.
CREATE TABLE IF NOT EXISTS select_list_entries (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    list  TEXT NOT NULL,   -- SelectListKind discriminant
    name  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS entities (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT,
    name                 TEXT NOT NULL UNIQUE,
    date                 TEXT,   -- JSON-encoded FuzzyDate or NULL
    location             TEXT,
    location_coordinates TEXT,
    description          TEXT,
    admin_notes          TEXT,
    created_at           TEXT NOT NULL,
    updated_at           TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS events (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    date_start  TEXT,
    date_end    TEXT,
    description TEXT,
    admin_notes TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS finding_aids (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    admin_notes TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS items (
    id                           INTEGER PRIMARY KEY AUTOINCREMENT,
    name                         TEXT NOT NULL UNIQUE,
    finding_aid                  INTEGER REFERENCES finding_aids(id) ON DELETE SET NULL,
    description                  TEXT,
    sponsorship                  TEXT,
    publication_status           INTEGER NOT NULL DEFAULT 0,
    created_date                 TEXT,
    created_location             TEXT,
    created_location_coordinates TEXT,
    holding_location             TEXT,
    holding_location_coordinates TEXT,
    admin_notes                  TEXT,
    created_at                   TEXT NOT NULL,
    updated_at                   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS persons (
    id                         INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name                 TEXT,
    last_name                  TEXT,
    other_names                TEXT,
    birth_date                 TEXT,
    birth_location             TEXT,
    birth_location_coordinates TEXT,
    death_date                 TEXT,
    death_location             TEXT,
    death_location_coordinates TEXT,
    description                TEXT,
    admin_notes                TEXT,
    created_at                 TEXT NOT NULL,
    updated_at                 TEXT NOT NULL
);

-- Multi-valued select-list attributes. The attribute is implied by the
-- entry's list.
CREATE TABLE IF NOT EXISTS entity_classifications (
    owner_id INTEGER NOT NULL REFERENCES entities(id) ON DELETE CASCADE,
    entry_id INTEGER NOT NULL REFERENCES select_list_entries(id) ON DELETE CASCADE,
    PRIMARY KEY (owner_id, entry_id)
);

CREATE TABLE IF NOT EXISTS event_classifications (
    owner_id INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
    entry_id INTEGER NOT NULL REFERENCES select_list_entries(id) ON DELETE CASCADE,
    PRIMARY KEY (owner_id, entry_id)
);

CREATE TABLE IF NOT EXISTS item_classifications (
    owner_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
    entry_id INTEGER NOT NULL REFERENCES select_list_entries(id) ON DELETE CASCADE,
    PRIMARY KEY (owner_id, entry_id)
);

CREATE TABLE IF NOT EXISTS person_classifications (
    owner_id INTEGER NOT NULL REFERENCES persons(id) ON DELETE CASCADE,
    entry_id INTEGER NOT NULL REFERENCES select_list_entries(id) ON DELETE CASCADE,
    PRIMARY KEY (owner_id, entry_id)
);

-- Superseded names. Unique per owner, not across the table.
CREATE TABLE IF NOT EXISTS entity_history (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id   INTEGER NOT NULL REFERENCES entities(id) ON DELETE CASCADE,
    name       TEXT NOT NULL,
    date_start TEXT,
    date_end   TEXT,
    notes      TEXT,
    created_at TEXT NOT NULL,
    UNIQUE (owner_id, name)
);

CREATE TABLE IF NOT EXISTS person_history (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id   INTEGER NOT NULL REFERENCES persons(id) ON DELETE CASCADE,
    name       TEXT NOT NULL,
    date_start TEXT,
    date_end   TEXT,
    notes      TEXT,
    created_at TEXT NOT NULL,
    UNIQUE (owner_id, name)
);

CREATE INDEX IF NOT EXISTS select_list_entries_list_idx ON select_list_entries(list);
";

/// DDL for one relationship table. Endpoints restrict deletion; the type
/// either restricts too or falls back to NULL, per relationship kind.
fn relationship_ddl(kind: RelationshipKind) -> String {
  let table = relationship_table(kind);
  let (left, right) = kind.endpoints();
  let (left, right) = (record_table(left), record_table(right));
  let on_type_delete = if kind.type_restricts_delete() { "RESTRICT" } else { "SET NULL" };
  format!(
    "
CREATE TABLE IF NOT EXISTS {table} (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    left_id    INTEGER NOT NULL REFERENCES {left}(id) ON DELETE RESTRICT,
    right_id   INTEGER NOT NULL REFERENCES {right}(id) ON DELETE RESTRICT,
    type_id    INTEGER REFERENCES select_list_entries(id) ON DELETE {on_type_delete},
    date_start TEXT,
    date_end   TEXT,
    notes      TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS {table}_left_idx  ON {table}(left_id);
CREATE INDEX IF NOT EXISTS {table}_right_idx ON {table}(right_id);
"
  )
}

/// Full schema DDL.
pub fn schema() -> String {
  let mut sql = BASE_SCHEMA.to_owned();
  for kind in RelationshipKind::iter() {
    sql.push_str(&relationship_ddl(kind));
  }
  sql.push_str("\nPRAGMA user_version = 1;\n");
  sql
}
