//! The relationship ledger: many-to-many facts linking two catalogue records.
//!
//! Both endpoints are required and restrict deletion of the records they
//! point at. The same pair may be related any number of times, with the same
//! or different types and overlapping spans.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

use crate::{
  fuzzy_date::{DateSpan, YearBounds},
  record::RecordKind,
  select_list::SelectListKind,
  validate::ValidationErrors,
};

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
pub enum RelationshipKind {
  EntityAndEntity,
  EntityAndEvent,
  EntityAndItem,
  EntityAndPerson,
  EventAndItem,
  EventAndPerson,
  ItemAndItem,
  ItemAndPerson,
}

impl RelationshipKind {
  /// `(left, right)` endpoint kinds.
  pub fn endpoints(self) -> (RecordKind, RecordKind) {
    use RecordKind as K;
    match self {
      Self::EntityAndEntity => (K::Entity, K::Entity),
      Self::EntityAndEvent => (K::Entity, K::Event),
      Self::EntityAndItem => (K::Entity, K::Item),
      Self::EntityAndPerson => (K::Entity, K::Person),
      Self::EventAndItem => (K::Event, K::Item),
      Self::EventAndPerson => (K::Event, K::Person),
      Self::ItemAndItem => (K::Item, K::Item),
      Self::ItemAndPerson => (K::Item, K::Person),
    }
  }

  /// The select list that classifies this pair.
  pub fn type_list(self) -> SelectListKind {
    use SelectListKind as L;
    match self {
      Self::EntityAndEntity => L::RelEntityAndEntityType,
      Self::EntityAndEvent => L::RelEntityAndEventType,
      Self::EntityAndItem => L::RelEntityAndItemType,
      Self::EntityAndPerson => L::RelEntityAndPersonType,
      Self::EventAndItem => L::RelEventAndItemType,
      Self::EventAndPerson => L::RelEventAndPersonType,
      Self::ItemAndItem => L::RelItemAndItemType,
      Self::ItemAndPerson => L::RelItemAndPersonType,
    }
  }

  /// Whether a type entry still in use by this pair may not be deleted.
  /// Otherwise deleting the entry unsets the type.
  pub fn type_restricts_delete(self) -> bool { matches!(self, Self::ItemAndPerson) }

  pub fn involves(self, kind: RecordKind) -> bool {
    let (left, right) = self.endpoints();
    left == kind || right == kind
  }

  /// Every relationship kind with `kind` on at least one side.
  pub fn involving(kind: RecordKind) -> impl Iterator<Item = Self> {
    Self::iter().filter(move |r| r.involves(kind))
  }
}

// ─── Entry ───────────────────────────────────────────────────────────────────

/// A relationship row as submitted by a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
  pub left_id:  i64,
  pub right_id: i64,
  #[serde(default)]
  pub type_id:  Option<i64>,
  #[serde(flatten)]
  pub dates:    DateSpan,
  #[serde(default)]
  pub notes:    Option<String>,
}

impl Relationship {
  pub fn new(left_id: i64, right_id: i64) -> Self {
    Self { left_id, right_id, ..Self::default() }
  }

  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    self.dates.validate(YearBounds::CATALOGUE, &mut errors);
    errors.into_result()
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRelationship {
  pub id:           i64,
  pub kind:         RelationshipKind,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
  #[serde(flatten)]
  pub relationship: Relationship,
}

// ─── Views ───────────────────────────────────────────────────────────────────

/// Which side of a relationship the viewing record sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
  Left,
  Right,
}

/// A reference to a catalogue record together with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
  pub kind:         RecordKind,
  pub id:           i64,
  pub display_name: String,
}

/// A relationship as listed inline on one of its endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipView {
  pub id:        i64,
  pub kind:      RelationshipKind,
  pub side:      Side,
  pub other:     RecordRef,
  pub type_name: Option<String>,
  #[serde(flatten)]
  pub dates:     DateSpan,
  pub notes:     Option<String>,
}

/// A relationship row that blocks deletion of one of its endpoints or of
/// its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependent {
  pub kind: RelationshipKind,
  pub id:   i64,
}
