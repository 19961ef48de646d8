//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Fuzzy dates are stored as
//! compact JSON, or NULL when empty. Enum discriminants are stored as their
//! snake_case names.

use std::{collections::HashMap, str::FromStr};

use chrono::{DateTime, Utc};
use csdb_core::{
  finding_aid::{FindingAid, StoredFindingAid},
  fuzzy_date::FuzzyDate,
  history::{HistoryEntry, StoredHistoryEntry},
  record::{Entity, Event, Item, Person, Record, RecordData, RecordKind},
  relationship::{
    RecordRef, Relationship, RelationshipKind, RelationshipView, Side,
    StoredRelationship,
  },
  select_list::{SelectListEntry, SelectListKind},
};
use rusqlite::types::Value;

use crate::{Error, Result};

// ─── Table names ─────────────────────────────────────────────────────────────

pub fn record_table(kind: RecordKind) -> &'static str {
  match kind {
    RecordKind::Entity => "entities",
    RecordKind::Event => "events",
    RecordKind::Item => "items",
    RecordKind::Person => "persons",
  }
}

pub fn classification_table(kind: RecordKind) -> &'static str {
  match kind {
    RecordKind::Entity => "entity_classifications",
    RecordKind::Event => "event_classifications",
    RecordKind::Item => "item_classifications",
    RecordKind::Person => "person_classifications",
  }
}

pub fn history_table(kind: RecordKind) -> Option<&'static str> {
  match kind {
    RecordKind::Entity => Some("entity_history"),
    RecordKind::Person => Some("person_history"),
    RecordKind::Event | RecordKind::Item => None,
  }
}

pub fn relationship_table(kind: RelationshipKind) -> &'static str {
  match kind {
    RelationshipKind::EntityAndEntity => "rel_entity_and_entity",
    RelationshipKind::EntityAndEvent => "rel_entity_and_event",
    RelationshipKind::EntityAndItem => "rel_entity_and_item",
    RelationshipKind::EntityAndPerson => "rel_entity_and_person",
    RelationshipKind::EventAndItem => "rel_event_and_item",
    RelationshipKind::EventAndPerson => "rel_event_and_person",
    RelationshipKind::ItemAndItem => "rel_item_and_item",
    RelationshipKind::ItemAndPerson => "rel_item_and_person",
  }
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(e.to_string()))
}

// ─── FuzzyDate ───────────────────────────────────────────────────────────────

pub fn encode_fuzzy(d: &FuzzyDate) -> Result<Option<String>> {
  if d.is_empty() {
    return Ok(None);
  }
  Ok(Some(serde_json::to_string(d)?))
}

pub fn decode_fuzzy(s: Option<&str>) -> Result<FuzzyDate> {
  match s {
    Some(s) => Ok(serde_json::from_str(s)?),
    None => Ok(FuzzyDate::default()),
  }
}

// ─── SelectListKind ──────────────────────────────────────────────────────────

pub fn decode_select_list(s: &str) -> Result<SelectListKind> {
  SelectListKind::from_str(s)
    .map_err(|_| Error::Decode(format!("unknown select list: {s:?}")))
}

// ─── Record columns ──────────────────────────────────────────────────────────

fn text(value: &Option<String>) -> Value {
  match value {
    Some(s) => Value::Text(s.clone()),
    None => Value::Null,
  }
}

fn fuzzy(value: &FuzzyDate) -> Result<Value> {
  Ok(encode_fuzzy(value)?.map_or(Value::Null, Value::Text))
}

/// Scalar column values for a record, excluding id, timestamps and
/// classifications.
pub fn record_columns(data: &RecordData) -> Result<Vec<(&'static str, Value)>> {
  Ok(match data {
    RecordData::Entity(e) => vec![
      ("name", Value::Text(e.name.clone())),
      ("date", fuzzy(&e.date)?),
      ("location", text(&e.location)),
      ("location_coordinates", text(&e.location_coordinates)),
      ("description", text(&e.description)),
      ("admin_notes", text(&e.admin_notes)),
    ],
    RecordData::Event(e) => vec![
      ("name", Value::Text(e.name.clone())),
      ("date_start", fuzzy(&e.date_start)?),
      ("date_end", fuzzy(&e.date_end)?),
      ("description", text(&e.description)),
      ("admin_notes", text(&e.admin_notes)),
    ],
    RecordData::Item(i) => vec![
      ("name", Value::Text(i.name.clone())),
      ("finding_aid", i.finding_aid.map_or(Value::Null, Value::Integer)),
      ("description", text(&i.description)),
      ("sponsorship", text(&i.sponsorship)),
      ("publication_status", Value::Integer(i64::from(i.publication_status))),
      ("created_date", fuzzy(&i.created_date)?),
      ("created_location", text(&i.created_location)),
      ("created_location_coordinates", text(&i.created_location_coordinates)),
      ("holding_location", text(&i.holding_location)),
      ("holding_location_coordinates", text(&i.holding_location_coordinates)),
      ("admin_notes", text(&i.admin_notes)),
    ],
    RecordData::Person(p) => vec![
      ("first_name", text(&p.first_name)),
      ("last_name", text(&p.last_name)),
      ("other_names", text(&p.other_names)),
      ("birth_date", fuzzy(&p.birth_date)?),
      ("birth_location", text(&p.birth_location)),
      ("birth_location_coordinates", text(&p.birth_location_coordinates)),
      ("death_date", fuzzy(&p.death_date)?),
      ("death_location", text(&p.death_location)),
      ("death_location_coordinates", text(&p.death_location_coordinates)),
      ("description", text(&p.description)),
      ("admin_notes", text(&p.admin_notes)),
    ],
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// A row read by column name, decoded after leaving the database thread.
#[derive(Debug, Default)]
pub struct RawRow(pub HashMap<String, Value>);

impl RawRow {
  fn take(&mut self, column: &str) -> Value {
    self.0.remove(column).unwrap_or(Value::Null)
  }

  pub fn text(&mut self, column: &str) -> Result<Option<String>> {
    match self.take(column) {
      Value::Text(s) => Ok(Some(s)),
      Value::Null => Ok(None),
      other => Err(Error::Decode(format!(
        "column {column}: expected text, got {:?}",
        other.data_type()
      ))),
    }
  }

  pub fn required_text(&mut self, column: &str) -> Result<String> {
    self
      .text(column)?
      .ok_or_else(|| Error::Decode(format!("column {column} is NULL")))
  }

  pub fn integer(&mut self, column: &str) -> Result<i64> {
    match self.take(column) {
      Value::Integer(i) => Ok(i),
      other => Err(Error::Decode(format!(
        "column {column}: expected integer, got {:?}",
        other.data_type()
      ))),
    }
  }

  pub fn optional_integer(&mut self, column: &str) -> Result<Option<i64>> {
    match self.take(column) {
      Value::Integer(i) => Ok(Some(i)),
      Value::Null => Ok(None),
      other => Err(Error::Decode(format!(
        "column {column}: expected integer, got {:?}",
        other.data_type()
      ))),
    }
  }

  pub fn boolean(&mut self, column: &str) -> Result<bool> {
    Ok(self.integer(column)? != 0)
  }

  pub fn fuzzy(&mut self, column: &str) -> Result<FuzzyDate> {
    decode_fuzzy(self.text(column)?.as_deref())
  }

  pub fn datetime(&mut self, column: &str) -> Result<DateTime<Utc>> {
    decode_dt(&self.required_text(column)?)
  }
}

/// A record row plus its classification entries, in insertion order.
pub struct RawRecord {
  pub kind:            RecordKind,
  pub row:             RawRow,
  /// `(entry_id, list)` pairs.
  pub classifications: Vec<(i64, String)>,
}

impl RawRecord {
  pub fn into_record(mut self) -> Result<Record> {
    let r = &mut self.row;
    let mut data = match self.kind {
      RecordKind::Entity => RecordData::Entity(Entity {
        name: r.required_text("name")?,
        types: Vec::new(),
        date: r.fuzzy("date")?,
        location: r.text("location")?,
        location_coordinates: r.text("location_coordinates")?,
        description: r.text("description")?,
        admin_notes: r.text("admin_notes")?,
      }),
      RecordKind::Event => RecordData::Event(Event {
        name: r.required_text("name")?,
        date_start: r.fuzzy("date_start")?,
        date_end: r.fuzzy("date_end")?,
        description: r.text("description")?,
        admin_notes: r.text("admin_notes")?,
        ..Event::default()
      }),
      RecordKind::Item => RecordData::Item(Item {
        name: r.required_text("name")?,
        finding_aid: r.optional_integer("finding_aid")?,
        description: r.text("description")?,
        sponsorship: r.text("sponsorship")?,
        publication_status: r.boolean("publication_status")?,
        created_date: r.fuzzy("created_date")?,
        created_location: r.text("created_location")?,
        created_location_coordinates: r.text("created_location_coordinates")?,
        holding_location: r.text("holding_location")?,
        holding_location_coordinates: r.text("holding_location_coordinates")?,
        admin_notes: r.text("admin_notes")?,
        ..Item::default()
      }),
      RecordKind::Person => RecordData::Person(Person {
        first_name: r.text("first_name")?,
        last_name: r.text("last_name")?,
        other_names: r.text("other_names")?,
        birth_date: r.fuzzy("birth_date")?,
        birth_location: r.text("birth_location")?,
        birth_location_coordinates: r.text("birth_location_coordinates")?,
        death_date: r.fuzzy("death_date")?,
        death_location: r.text("death_location")?,
        death_location_coordinates: r.text("death_location_coordinates")?,
        description: r.text("description")?,
        admin_notes: r.text("admin_notes")?,
        ..Person::default()
      }),
    };

    for (entry_id, list) in self.classifications {
      let list = decode_select_list(&list)?;
      // Entries of a list this kind has no attribute for are ignored.
      if let Some(ids) = data.classification_mut(list) {
        ids.push(entry_id);
      }
    }

    Ok(Record {
      id: r.integer("id")?,
      created_at: r.datetime("created_at")?,
      updated_at: r.datetime("updated_at")?,
      data,
    })
  }
}

/// Raw strings read directly from a `select_list_entries` row.
pub struct RawSelectEntry {
  pub id:   i64,
  pub list: String,
  pub name: String,
}

impl RawSelectEntry {
  pub fn into_entry(self) -> Result<SelectListEntry> {
    Ok(SelectListEntry {
      id:   self.id,
      list: decode_select_list(&self.list)?,
      name: self.name,
    })
  }
}

/// Raw values read from a `finding_aids` row.
pub struct RawFindingAid {
  pub id:          i64,
  pub name:        String,
  pub admin_notes: Option<String>,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawFindingAid {
  pub fn into_stored(self) -> Result<StoredFindingAid> {
    Ok(StoredFindingAid {
      id:         self.id,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      aid:        FindingAid { name: self.name, admin_notes: self.admin_notes },
    })
  }
}

/// Raw values read from a relationship table row.
pub struct RawRelationship {
  pub id:         i64,
  pub left_id:    i64,
  pub right_id:   i64,
  pub type_id:    Option<i64>,
  pub date_start: Option<String>,
  pub date_end:   Option<String>,
  pub notes:      Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawRelationship {
  pub fn into_stored(self, kind: RelationshipKind) -> Result<StoredRelationship> {
    let mut relationship = Relationship::new(self.left_id, self.right_id);
    relationship.type_id = self.type_id;
    relationship.dates.start = decode_fuzzy(self.date_start.as_deref())?;
    relationship.dates.end = decode_fuzzy(self.date_end.as_deref())?;
    relationship.notes = self.notes;

    Ok(StoredRelationship {
      id: self.id,
      kind,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      relationship,
    })
  }
}

/// A relationship row as seen from one endpoint, with the other endpoint's
/// display name already resolved.
pub struct RawRelationshipView {
  pub kind:       RelationshipKind,
  pub side:       Side,
  pub other:      RecordRef,
  pub type_name:  Option<String>,
  pub id:         i64,
  pub date_start: Option<String>,
  pub date_end:   Option<String>,
  pub notes:      Option<String>,
}

impl RawRelationshipView {
  pub fn into_view(self) -> Result<RelationshipView> {
    let mut view = RelationshipView {
      id:        self.id,
      kind:      self.kind,
      side:      self.side,
      other:     self.other,
      type_name: self.type_name,
      dates:     Default::default(),
      notes:     self.notes,
    };
    view.dates.start = decode_fuzzy(self.date_start.as_deref())?;
    view.dates.end = decode_fuzzy(self.date_end.as_deref())?;
    Ok(view)
  }
}

/// Raw values read from a history table row.
pub struct RawHistory {
  pub id:         i64,
  pub owner_id:   i64,
  pub name:       String,
  pub date_start: Option<String>,
  pub date_end:   Option<String>,
  pub notes:      Option<String>,
  pub created_at: String,
}

impl RawHistory {
  pub fn into_stored(self, owner_kind: RecordKind) -> Result<StoredHistoryEntry> {
    let mut entry = HistoryEntry::new(self.name);
    entry.dates.start = decode_fuzzy(self.date_start.as_deref())?;
    entry.dates.end = decode_fuzzy(self.date_end.as_deref())?;
    entry.notes = self.notes;

    Ok(StoredHistoryEntry {
      id: self.id,
      owner_kind,
      owner_id: self.owner_id,
      created_at: decode_dt(&self.created_at)?,
      entry,
    })
  }
}
