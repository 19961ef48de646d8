//! Select lists: small closed vocabularies used to classify records and
//! relationships.
//!
//! Entries are referenced, never embedded. They are not part of the primary
//! navigation; the admin surface exposes them as "add related" shortcuts from
//! whichever form references them.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::validate::{LONG_TEXT_MAX, ValidationErrors};

/// One variant per vocabulary table.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  AsRefStr,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SelectListKind {
  EntityType,
  EventActivity,
  EventType,
  ItemMedia,
  ItemType,
  Language,
  Location,
  PersonTitle,
  RelEntityAndEntityType,
  RelEntityAndEventType,
  RelEntityAndItemType,
  RelEntityAndPersonType,
  RelEventAndItemType,
  RelEventAndPersonType,
  RelItemAndItemType,
  RelItemAndPersonType,
}

impl SelectListKind {
  /// Human-readable label shown next to "add related" shortcuts.
  pub fn label(self) -> &'static str {
    match self {
      Self::EntityType => "entity type",
      Self::EventActivity => "event activity",
      Self::EventType => "event type",
      Self::ItemMedia => "item media",
      Self::ItemType => "item type",
      Self::Language => "language",
      Self::Location => "location",
      Self::PersonTitle => "person title",
      Self::RelEntityAndEntityType => "entity and entity relationship type",
      Self::RelEntityAndEventType => "entity and event relationship type",
      Self::RelEntityAndItemType => "entity and item relationship type",
      Self::RelEntityAndPersonType => "entity and person relationship type",
      Self::RelEventAndItemType => "event and item relationship type",
      Self::RelEventAndPersonType => "event and person relationship type",
      Self::RelItemAndItemType => "item and item relationship type",
      Self::RelItemAndPersonType => "item and person relationship type",
    }
  }
}

/// A stored vocabulary entry. Names are not unique within a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectListEntry {
  pub id:   i64,
  pub list: SelectListKind,
  pub name: String,
}

/// Listing order: upper-cased name, ties broken by ascending id. Folding to
/// upper case puts `_`, `^` and `[` after every letter.
pub fn listing_order(a: &SelectListEntry, b: &SelectListEntry) -> Ordering {
  a.name
    .to_uppercase()
    .cmp(&b.name.to_uppercase())
    .then(a.id.cmp(&b.id))
}

/// Sort `entries` in place into listing order.
pub fn sort_entries(entries: &mut [SelectListEntry]) {
  entries.sort_by(listing_order);
}

/// Validate a proposed entry name.
pub fn validate_name(name: &str) -> Result<(), ValidationErrors> {
  let mut errors = ValidationErrors::new();
  errors.require("name", name);
  errors.max_len("name", Some(name), LONG_TEXT_MAX);
  errors.into_result()
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use strum::IntoEnumIterator;

  use super::*;

  fn entry(id: i64, name: &str) -> SelectListEntry {
    SelectListEntry { id, list: SelectListKind::Language, name: name.into() }
  }

  #[test]
  fn orders_case_insensitively_then_by_id() {
    let mut entries = vec![
      entry(4, "french"),
      entry(2, "English"),
      entry(3, "English"),
      entry(1, "german"),
      entry(5, "english"),
    ];
    sort_entries(&mut entries);
    let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, [2, 3, 5, 4, 1]);
  }

  #[test]
  fn punctuation_sorts_after_letters() {
    let mut entries = vec![entry(1, "_archive"), entry(2, "Alpha"), entry(3, "zulu")];
    sort_entries(&mut entries);
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Alpha", "zulu", "_archive"]);
  }

  #[test]
  fn names_round_trip_through_strum_and_serde() {
    for kind in SelectListKind::iter() {
      let parsed = SelectListKind::from_str(kind.as_ref()).unwrap();
      assert_eq!(parsed, kind);
      let json = serde_json::to_value(kind).unwrap();
      assert_eq!(json, serde_json::Value::String(kind.as_ref().to_owned()));
    }
    assert_eq!(
      SelectListKind::RelEntityAndEventType.as_ref(),
      "rel_entity_and_event_type"
    );
  }

  #[test]
  fn blank_names_are_rejected() {
    assert!(validate_name("").is_err());
    assert!(validate_name("publisher").is_ok());
  }
}
