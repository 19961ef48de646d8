//! Partial historical dates.
//!
//! A [`FuzzyDate`] may be completely unknown, a full day, a bare year, a year
//! range, or any mix of those, optionally annotated with free text such as
//! "circa". Every sub-field is validated against its own bound only; no
//! combination of in-bound values is ever rejected.

use std::fmt;

use chrono::Month;
use serde::{Deserialize, Serialize};

use crate::validate::{LONG_TEXT_MAX, ValidationErrors};

// ─── Bounds ──────────────────────────────────────────────────────────────────

/// Inclusive year bounds, applied to `year`, `range_from` and `range_to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearBounds {
  pub min: i32,
  pub max: i32,
}

impl YearBounds {
  /// Person birth and death dates.
  pub const PERSON_LIFE: Self = Self { min: 1800, max: 2030 };
  /// Entity and event dates, relationship and history spans.
  pub const CATALOGUE: Self = Self { min: 1850, max: 2030 };
  /// Item creation dates.
  pub const ITEM_CREATED: Self = Self { min: 1900, max: 2030 };

  pub fn contains(self, year: i32) -> bool {
    (self.min..=self.max).contains(&year)
  }
}

// ─── Value ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyDate {
  pub year:       Option<i32>,
  pub month:      Option<i32>,
  pub day:        Option<i32>,
  /// Lower end of an uncertain span, used when the exact year is unknown.
  pub range_from: Option<i32>,
  pub range_to:   Option<i32>,
  /// Free-text qualifier, e.g. "circa" or "unknown precise date".
  pub details:    Option<String>,
}

impl FuzzyDate {
  /// A bare year.
  pub fn year(year: i32) -> Self {
    Self { year: Some(year), ..Self::default() }
  }

  /// A full calendar day.
  pub fn ymd(year: i32, month: i32, day: i32) -> Self {
    Self {
      year: Some(year),
      month: Some(month),
      day: Some(day),
      ..Self::default()
    }
  }

  /// An uncertain span of years.
  pub fn range(from: i32, to: i32) -> Self {
    Self {
      range_from: Some(from),
      range_to: Some(to),
      ..Self::default()
    }
  }

  pub fn with_details(mut self, details: impl Into<String>) -> Self {
    self.details = Some(details.into());
    self
  }

  /// `true` when no sub-field carries a value.
  pub fn is_empty(&self) -> bool {
    self.year.is_none()
      && self.month.is_none()
      && self.day.is_none()
      && self.range_from.is_none()
      && self.range_to.is_none()
      && self.details.as_deref().is_none_or(|d| d.trim().is_empty())
  }

  /// Best-effort year used for chronological sorting.
  pub fn sort_year(&self) -> Option<i32> {
    self.year.or(self.range_from).or(self.range_to)
  }

  /// Check every sub-field against its bound, recording failures under
  /// `"<prefix>_<subfield>"`.
  pub fn validate(
    &self,
    prefix: &str,
    bounds: YearBounds,
    errors: &mut ValidationErrors,
  ) {
    let years = [
      ("year", self.year),
      ("range_from", self.range_from),
      ("range_to", self.range_to),
    ];
    for (name, value) in years {
      if let Some(y) = value
        && !bounds.contains(y)
      {
        errors.add(
          format!("{prefix}_{name}"),
          format!(
            "Ensure this value is between {} and {}.",
            bounds.min, bounds.max
          ),
        );
      }
    }

    if let Some(m) = self.month
      && !(1..=12).contains(&m)
    {
      errors.add(
        format!("{prefix}_month"),
        "Ensure this value is between 1 and 12.",
      );
    }

    if let Some(d) = self.day
      && !(1..=31).contains(&d)
    {
      errors.add(
        format!("{prefix}_day"),
        "Ensure this value is between 1 and 31.",
      );
    }

    errors.max_len(
      &format!("{prefix}_details"),
      self.details.as_deref(),
      LONG_TEXT_MAX,
    );
  }

  fn exact_part(&self) -> Option<String> {
    let mut pieces = Vec::new();
    if let Some(d) = self.day {
      pieces.push(if self.month.is_some() {
        d.to_string()
      } else {
        format!("day {d}")
      });
    }
    if let Some(m) = self.month {
      pieces.push(
        u8::try_from(m)
          .ok()
          .and_then(|m| Month::try_from(m).ok())
          .map(|month| month.name().to_owned())
          .unwrap_or_else(|| format!("month {m}")),
      );
    }
    if let Some(y) = self.year {
      pieces.push(y.to_string());
    }
    (!pieces.is_empty()).then(|| pieces.join(" "))
  }

  fn range_part(&self) -> Option<String> {
    match (self.range_from, self.range_to) {
      (Some(from), Some(to)) => Some(format!("{from}-{to}")),
      (Some(from), None) => Some(format!("from {from}")),
      (None, Some(to)) => Some(format!("until {to}")),
      (None, None) => None,
    }
  }
}

/// Renders whichever sub-fields are populated; an empty value renders as "".
impl fmt::Display for FuzzyDate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let parts: Vec<String> =
      [self.exact_part(), self.range_part()].into_iter().flatten().collect();
    let details = self
      .details
      .as_deref()
      .map(str::trim)
      .filter(|d| !d.is_empty());

    match (parts.is_empty(), details) {
      (true, Some(d)) => f.write_str(d),
      (true, None) => Ok(()),
      (false, Some(d)) => write!(f, "{} ({d})", parts.join("; ")),
      (false, None) => f.write_str(&parts.join("; ")),
    }
  }
}

// ─── Span ────────────────────────────────────────────────────────────────────

/// A start/end pair describing when something held.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateSpan {
  #[serde(rename = "date_start")]
  pub start: FuzzyDate,
  #[serde(rename = "date_end")]
  pub end:   FuzzyDate,
}

impl DateSpan {
  pub fn validate(&self, bounds: YearBounds, errors: &mut ValidationErrors) {
    self.start.validate("date_start", bounds, errors);
    self.end.validate("date_end", bounds, errors);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn errors_for(date: &FuzzyDate, bounds: YearBounds) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    date.validate("date", bounds, &mut errors);
    errors
  }

  #[test]
  fn month_and_day_bounds() {
    let bad = FuzzyDate { month: Some(13), day: Some(0), ..FuzzyDate::year(1900) };
    let errors = errors_for(&bad, YearBounds::CATALOGUE);
    assert!(errors.field("date_month").is_some());
    assert!(errors.field("date_day").is_some());
    assert!(errors.field("date_year").is_none());

    let edge = FuzzyDate::ymd(1900, 12, 31);
    assert!(errors_for(&edge, YearBounds::CATALOGUE).is_empty());
    let edge = FuzzyDate::ymd(1900, 1, 1);
    assert!(errors_for(&edge, YearBounds::CATALOGUE).is_empty());
  }

  #[test]
  fn year_bounds_depend_on_context() {
    let date = FuzzyDate::year(1820);
    assert!(errors_for(&date, YearBounds::PERSON_LIFE).is_empty());
    assert!(errors_for(&date, YearBounds::CATALOGUE).field("date_year").is_some());

    let late = FuzzyDate::year(2031);
    assert!(errors_for(&late, YearBounds::PERSON_LIFE).field("date_year").is_some());
  }

  #[test]
  fn range_ends_are_checked_independently() {
    let date = FuzzyDate::range(1700, 2040);
    let errors = errors_for(&date, YearBounds::CATALOGUE);
    assert!(errors.field("date_range_from").is_some());
    assert!(errors.field("date_range_to").is_some());
  }

  #[test]
  fn any_in_bound_combination_is_accepted() {
    // Exact date and range together, reversed range, day 31 in a 30-day month.
    let date = FuzzyDate {
      year:       Some(1900),
      month:      Some(4),
      day:        Some(31),
      range_from: Some(1950),
      range_to:   Some(1900),
      details:    Some("circa".into()),
    };
    assert!(errors_for(&date, YearBounds::CATALOGUE).is_empty());
  }

  #[test]
  fn renders_populated_subset() {
    assert_eq!(FuzzyDate::default().to_string(), "");
    assert_eq!(FuzzyDate::year(1851).to_string(), "1851");
    assert_eq!(FuzzyDate::ymd(1851, 3, 7).to_string(), "7 March 1851");
    assert_eq!(
      FuzzyDate { month: Some(3), ..FuzzyDate::year(1851) }.to_string(),
      "March 1851"
    );
    assert_eq!(
      FuzzyDate { day: Some(7), month: Some(3), ..Default::default() }.to_string(),
      "7 March"
    );
    assert_eq!(FuzzyDate::range(1850, 1860).to_string(), "1850-1860");
    assert_eq!(
      FuzzyDate { range_from: Some(1850), ..Default::default() }.to_string(),
      "from 1850"
    );
    assert_eq!(
      FuzzyDate { range_to: Some(1860), ..Default::default() }.to_string(),
      "until 1860"
    );
  }

  #[test]
  fn renders_details_and_mixed_parts() {
    let date = FuzzyDate { range_from: Some(1850), range_to: Some(1860), ..FuzzyDate::year(1855) }
      .with_details("circa");
    assert_eq!(date.to_string(), "1855; 1850-1860 (circa)");

    let only_details = FuzzyDate::default().with_details("unknown precise date");
    assert_eq!(only_details.to_string(), "unknown precise date");
    assert!(!only_details.is_empty());
  }

  #[test]
  fn sort_year_falls_back_to_range() {
    assert_eq!(FuzzyDate::year(1900).sort_year(), Some(1900));
    assert_eq!(FuzzyDate::range(1880, 1890).sort_year(), Some(1880));
    assert_eq!(
      FuzzyDate { range_to: Some(1890), ..Default::default() }.sort_year(),
      Some(1890)
    );
    assert_eq!(FuzzyDate::default().sort_year(), None);
  }

  #[test]
  fn deserialises_partial_json() {
    let date: FuzzyDate = serde_json::from_str(r#"{"year":1901}"#).unwrap();
    assert_eq!(date, FuzzyDate::year(1901));
  }
}
