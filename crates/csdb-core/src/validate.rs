//! Field-level validation errors, reported against the offending form field.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;

/// Maximum length of short text columns (names, locations).
pub const SHORT_TEXT_MAX: usize = 255;

/// Maximum length of select-list names and fuzzy date details.
pub const LONG_TEXT_MAX: usize = 1000;

/// Errors keyed by field name. Each field may collect several messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
  pub fn new() -> Self { Self::default() }

  pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.entry(field.into()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Messages recorded against `field`, if any.
  pub fn field(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }

  pub fn fields(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  /// `Ok(())` when nothing was recorded.
  pub fn into_result(self) -> Result<(), Self> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }

  /// A required text field must be present and not blank.
  pub fn require(&mut self, field: &str, value: &str) {
    if value.trim().is_empty() {
      self.add(field, "This field is required.");
    }
  }

  /// Length limit on an optional text field, counted in characters.
  pub fn max_len(&mut self, field: &str, value: Option<&str>, max: usize) {
    if let Some(v) = value
      && v.chars().count() > max
    {
      self.add(
        field,
        format!("Ensure this value has at most {max} characters."),
      );
    }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      for message in messages {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{field}: {message}")?;
        first = false;
      }
    }
    Ok(())
  }
}
