//! Catalogue records: the four kinds researchers create and link together.
//!
//! Each kind is a plain field struct. The same struct is used for a creation
//! form, an update, and the payload of a stored [`Record`]; identity and
//! timestamps live on the envelope only, which is what makes "use as
//! template" a plain copy of the payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::{
  Result,
  fuzzy_date::{FuzzyDate, YearBounds},
  select_list::SelectListKind,
  validate::{SHORT_TEXT_MAX, ValidationErrors},
};

// ─── Kind ────────────────────────────────────────────────────────────────────

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
pub enum RecordKind {
  Entity,
  Event,
  Item,
  Person,
}

impl RecordKind {
  pub fn label(self) -> &'static str {
    match self {
      Self::Entity => "entity",
      Self::Event => "event",
      Self::Item => "item",
      Self::Person => "person",
    }
  }

  pub fn label_plural(self) -> &'static str {
    match self {
      Self::Entity => "entities",
      Self::Event => "events",
      Self::Item => "items",
      Self::Person => "persons",
    }
  }

  /// Whether records of this kind keep a history ledger.
  pub fn has_history(self) -> bool {
    matches!(self, Self::Entity | Self::Person)
  }
}

// ─── Field structs ───────────────────────────────────────────────────────────

/// A collection of people: a publisher, a university, a department, a
/// seminar or working group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entity {
  pub name:                 String,
  pub types:                Vec<i64>,
  pub date:                 FuzzyDate,
  pub location:             Option<String>,
  /// Opaque "lat,lng" produced by the geocoding widget from `location`.
  pub location_coordinates: Option<String>,
  pub description:          Option<String>,
  pub admin_notes:          Option<String>,
}

/// A meeting, conference, seminar and the like.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
  pub name:        String,
  pub types:       Vec<i64>,
  pub activities:  Vec<i64>,
  pub languages:   Vec<i64>,
  pub locations:   Vec<i64>,
  pub date_start:  FuzzyDate,
  pub date_end:    FuzzyDate,
  pub description: Option<String>,
  pub admin_notes: Option<String>,
}

/// An object or document within a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
  pub name:                         String,
  /// The finding aid this item was catalogued from.
  pub finding_aid:                  Option<i64>,
  pub types:                        Vec<i64>,
  pub media:                        Vec<i64>,
  pub languages:                    Vec<i64>,
  pub description:                  Option<String>,
  pub sponsorship:                  Option<String>,
  pub publication_status:           bool,
  pub created_date:                 FuzzyDate,
  pub created_location:             Option<String>,
  pub created_location_coordinates: Option<String>,
  pub holding_location:             Option<String>,
  pub holding_location_coordinates: Option<String>,
  pub admin_notes:                  Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
  pub titles:                     Vec<i64>,
  pub first_name:                 Option<String>,
  pub last_name:                  Option<String>,
  pub other_names:                Option<String>,
  pub birth_date:                 FuzzyDate,
  pub birth_location:             Option<String>,
  pub birth_location_coordinates: Option<String>,
  pub death_date:                 FuzzyDate,
  pub death_location:             Option<String>,
  pub death_location_coordinates: Option<String>,
  pub description:                Option<String>,
  pub admin_notes:                Option<String>,
}

impl Person {
  /// Titles, first name and last name joined by spaces, or a placeholder
  /// naming the id when all are blank.
  pub fn full_name(&self, titles: &[String], id: Option<i64>) -> String {
    let names: Vec<&str> = titles
      .iter()
      .map(String::as_str)
      .chain(self.first_name.as_deref())
      .chain(self.last_name.as_deref())
      .map(str::trim)
      .filter(|n| !n.is_empty())
      .collect();

    if !names.is_empty() {
      return names.join(" ");
    }
    match id {
      Some(id) => format!("(no name, ID: {id})"),
      None => "(no name)".to_owned(),
    }
  }
}

// ─── Classification fields ───────────────────────────────────────────────────

/// A multi-valued select-list attribute of a record.
#[derive(Debug, Clone, Copy)]
pub struct Classification<'a> {
  pub field: &'static str,
  pub list:  SelectListKind,
  pub ids:   &'a [i64],
}

// ─── RecordData ──────────────────────────────────────────────────────────────

/// The typed payload of a record. The variant doubles as the record kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum RecordData {
  Entity(Entity),
  Event(Event),
  Item(Item),
  Person(Person),
}

impl RecordData {
  pub fn kind(&self) -> RecordKind {
    match self {
      Self::Entity(_) => RecordKind::Entity,
      Self::Event(_) => RecordKind::Event,
      Self::Item(_) => RecordKind::Item,
      Self::Person(_) => RecordKind::Person,
    }
  }

  /// An empty creation form for `kind`.
  pub fn blank(kind: RecordKind) -> Self {
    match kind {
      RecordKind::Entity => Self::Entity(Entity::default()),
      RecordKind::Event => Self::Event(Event::default()),
      RecordKind::Item => Self::Item(Item::default()),
      RecordKind::Person => Self::Person(Person::default()),
    }
  }

  /// Deserialise the untagged payload of a `kind` record, as submitted by a
  /// form.
  pub fn from_parts(kind: RecordKind, data: serde_json::Value) -> Result<Self> {
    let wrapped = serde_json::json!({ "kind": kind.as_ref(), "data": data });
    Ok(serde_json::from_value(wrapped)?)
  }

  /// The unique name, for the kinds that have one.
  pub fn name(&self) -> Option<&str> {
    match self {
      Self::Entity(e) => Some(&e.name),
      Self::Event(e) => Some(&e.name),
      Self::Item(i) => Some(&i.name),
      Self::Person(_) => None,
    }
  }

  pub fn classifications(&self) -> Vec<Classification<'_>> {
    use SelectListKind as L;
    fn c<'a>(
      field: &'static str,
      list: SelectListKind,
      ids: &'a [i64],
    ) -> Classification<'a> {
      Classification { field, list, ids }
    }
    match self {
      Self::Entity(e) => vec![c("types", L::EntityType, &e.types)],
      Self::Event(e) => vec![
        c("types", L::EventType, &e.types),
        c("activities", L::EventActivity, &e.activities),
        c("languages", L::Language, &e.languages),
        c("locations", L::Location, &e.locations),
      ],
      Self::Item(i) => vec![
        c("types", L::ItemType, &i.types),
        c("media", L::ItemMedia, &i.media),
        c("languages", L::Language, &i.languages),
      ],
      Self::Person(p) => vec![c("titles", L::PersonTitle, &p.titles)],
    }
  }

  /// Mutable access to the attribute backed by `list`, if this kind has one.
  pub fn classification_mut(
    &mut self,
    list: SelectListKind,
  ) -> Option<&mut Vec<i64>> {
    use SelectListKind as L;
    match (self, list) {
      (Self::Entity(e), L::EntityType) => Some(&mut e.types),
      (Self::Event(e), L::EventType) => Some(&mut e.types),
      (Self::Event(e), L::EventActivity) => Some(&mut e.activities),
      (Self::Event(e), L::Language) => Some(&mut e.languages),
      (Self::Event(e), L::Location) => Some(&mut e.locations),
      (Self::Item(i), L::ItemType) => Some(&mut i.types),
      (Self::Item(i), L::ItemMedia) => Some(&mut i.media),
      (Self::Item(i), L::Language) => Some(&mut i.languages),
      (Self::Person(p), L::PersonTitle) => Some(&mut p.titles),
      _ => None,
    }
  }

  /// Field-level validation. Select-list membership is checked by the store,
  /// which can see the entries.
  pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
    fn short(errors: &mut ValidationErrors, field: &str, value: &Option<String>) {
      errors.max_len(field, value.as_deref(), SHORT_TEXT_MAX);
    }

    let mut errors = ValidationErrors::new();

    if let Some(name) = self.name() {
      errors.require("name", name);
      errors.max_len("name", Some(name), SHORT_TEXT_MAX);
    }

    match self {
      Self::Entity(e) => {
        short(&mut errors, "location", &e.location);
        short(&mut errors, "location_coordinates", &e.location_coordinates);
        e.date.validate("date", YearBounds::CATALOGUE, &mut errors);
      }
      Self::Event(e) => {
        e.date_start.validate("date_start", YearBounds::CATALOGUE, &mut errors);
        e.date_end.validate("date_end", YearBounds::CATALOGUE, &mut errors);
      }
      Self::Item(i) => {
        short(&mut errors, "created_location", &i.created_location);
        short(&mut errors, "created_location_coordinates", &i.created_location_coordinates);
        short(&mut errors, "holding_location", &i.holding_location);
        short(&mut errors, "holding_location_coordinates", &i.holding_location_coordinates);
        i.created_date
          .validate("created_date", YearBounds::ITEM_CREATED, &mut errors);
      }
      Self::Person(p) => {
        short(&mut errors, "first_name", &p.first_name);
        short(&mut errors, "last_name", &p.last_name);
        short(&mut errors, "other_names", &p.other_names);
        short(&mut errors, "birth_location", &p.birth_location);
        short(&mut errors, "birth_location_coordinates", &p.birth_location_coordinates);
        short(&mut errors, "death_location", &p.death_location);
        short(&mut errors, "death_location_coordinates", &p.death_location_coordinates);
        p.birth_date
          .validate("birth_date", YearBounds::PERSON_LIFE, &mut errors);
        p.death_date
          .validate("death_date", YearBounds::PERSON_LIFE, &mut errors);
      }
    }

    errors.into_result()
  }
}

// ─── Stored record ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
  pub id:         i64,
  /// Server-assigned; never changes after creation.
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  #[serde(flatten)]
  pub data:       RecordData,
}

impl Record {
  pub fn kind(&self) -> RecordKind { self.data.kind() }
}

/// One row of a list view: the id plus the configured display columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSummary {
  pub id:      i64,
  pub columns: Vec<Option<String>>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn person_full_name_joins_present_parts() {
    let person = Person {
      first_name: Some("Ada".into()),
      last_name: Some("Lovelace".into()),
      ..Person::default()
    };
    assert_eq!(person.full_name(&[], Some(1)), "Ada Lovelace");
    assert_eq!(
      person.full_name(&["Countess".to_owned()], Some(1)),
      "Countess Ada Lovelace"
    );
  }

  #[test]
  fn person_without_names_falls_back_to_id() {
    let person = Person { first_name: Some("  ".into()), ..Person::default() };
    assert_eq!(person.full_name(&[], Some(42)), "(no name, ID: 42)");
  }

  #[test]
  fn from_parts_reads_untagged_payload() {
    let data = RecordData::from_parts(
      RecordKind::Person,
      serde_json::json!({ "first_name": "Ada", "birth_date": { "year": 1815 } }),
    )
    .unwrap();
    let RecordData::Person(person) = data else { panic!("expected person") };
    assert_eq!(person.first_name.as_deref(), Some("Ada"));
    assert_eq!(person.birth_date, FuzzyDate::year(1815));
  }

  #[test]
  fn validation_reports_offending_fields() {
    let data = RecordData::Person(Person {
      birth_date: FuzzyDate { month: Some(13), ..FuzzyDate::year(1700) },
      ..Person::default()
    });
    let errors = data.validate().unwrap_err();
    assert!(errors.field("birth_date_year").is_some());
    assert!(errors.field("birth_date_month").is_some());

    let unnamed = RecordData::blank(RecordKind::Entity);
    assert!(unnamed.validate().unwrap_err().field("name").is_some());
  }

  #[test]
  fn every_coordinates_field_is_length_checked() {
    let long = Some("9".repeat(SHORT_TEXT_MAX + 1));
    let item = RecordData::Item(Item {
      name: "Map".into(),
      created_location_coordinates: long.clone(),
      holding_location_coordinates: long.clone(),
      ..Item::default()
    });
    let errors = item.validate().unwrap_err();
    assert!(errors.field("created_location_coordinates").is_some());
    assert!(errors.field("holding_location_coordinates").is_some());

    let person = RecordData::Person(Person {
      birth_location_coordinates: long.clone(),
      death_location_coordinates: long,
      ..Person::default()
    });
    let errors = person.validate().unwrap_err();
    assert!(errors.field("birth_location_coordinates").is_some());
    assert!(errors.field("death_location_coordinates").is_some());
  }

  #[test]
  fn classification_fields_follow_kind() {
    let mut data = RecordData::blank(RecordKind::Item);
    let lists: Vec<SelectListKind> =
      data.classifications().iter().map(|c| c.list).collect();
    assert_eq!(
      lists,
      [SelectListKind::ItemType, SelectListKind::ItemMedia, SelectListKind::Language]
    );
    data.classification_mut(SelectListKind::ItemMedia).unwrap().push(7);
    assert!(data.classification_mut(SelectListKind::EntityType).is_none());
    let RecordData::Item(item) = data else { unreachable!() };
    assert_eq!(item.media, [7]);
  }

  #[test]
  fn record_serialises_with_kind_tag() {
    let record = Record {
      id:         3,
      created_at: Utc::now(),
      updated_at: Utc::now(),
      data:       RecordData::Entity(Entity { name: "Institute X".into(), ..Entity::default() }),
    };
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["kind"], "entity");
    assert_eq!(json["data"]["name"], "Institute X");
  }
}
