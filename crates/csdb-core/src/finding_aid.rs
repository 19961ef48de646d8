//! Finding aids: the source documents items are catalogued from.
//!
//! An item may cite one finding aid. Deleting the finding aid leaves the
//! item in place with the citation cleared.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::{SHORT_TEXT_MAX, ValidationErrors};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindingAid {
  /// Unique across finding aids.
  pub name:        String,
  pub admin_notes: Option<String>,
}

impl FindingAid {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }

  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.require("name", &self.name);
    errors.max_len("name", Some(&self.name), SHORT_TEXT_MAX);
    errors.into_result()
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFindingAid {
  pub id:         i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  #[serde(flatten)]
  pub aid:        FindingAid,
}
