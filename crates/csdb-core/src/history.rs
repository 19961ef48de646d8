//! The history ledger: superseded names of entities and persons, each valid
//! over a span of fuzzy dates.
//!
//! Entries belong to their owner and are deleted with it. A name may appear
//! once per owner; two owners may share a historical name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  fuzzy_date::{DateSpan, YearBounds},
  record::RecordKind,
  validate::{SHORT_TEXT_MAX, ValidationErrors},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
  pub name:  String,
  #[serde(flatten)]
  pub dates: DateSpan,
  #[serde(default)]
  pub notes: Option<String>,
}

impl HistoryEntry {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }

  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.require("name", &self.name);
    errors.max_len("name", Some(&self.name), SHORT_TEXT_MAX);
    self.dates.validate(YearBounds::CATALOGUE, &mut errors);
    errors.into_result()
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredHistoryEntry {
  pub id:         i64,
  pub owner_kind: RecordKind,
  pub owner_id:   i64,
  pub created_at: DateTime<Utc>,
  #[serde(flatten)]
  pub entry:      HistoryEntry,
}
