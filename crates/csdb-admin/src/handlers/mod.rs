//! Admin endpoint handlers, one module per resource.

pub mod finding_aids;
pub mod history;
pub mod index;
pub mod records;
pub mod relationships;
pub mod select_lists;

use std::str::FromStr;

use csdb_core::{
  record::RecordKind, relationship::RelationshipKind, select_list::SelectListKind,
};
use strum::IntoEnumIterator;

use crate::error::AdminError;

/// Resolve a plural record-kind path segment such as `entities`.
pub(crate) fn record_kind(segment: &str) -> Result<RecordKind, AdminError> {
  RecordKind::iter()
    .find(|k| k.label_plural() == segment)
    .ok_or_else(|| AdminError::NotFound(format!("unknown record kind: {segment}")))
}

pub(crate) fn select_list(segment: &str) -> Result<SelectListKind, AdminError> {
  SelectListKind::from_str(segment)
    .map_err(|_| AdminError::NotFound(format!("unknown select list: {segment}")))
}

pub(crate) fn relationship_kind(segment: &str) -> Result<RelationshipKind, AdminError> {
  RelationshipKind::from_str(segment)
    .map_err(|_| AdminError::NotFound(format!("unknown relationship kind: {segment}")))
}
