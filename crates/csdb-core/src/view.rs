//! Admin view configuration, declared statically per record kind and
//! assembled once at startup.
//!
//! A [`ViewConfig`] carries everything a generic list/edit handler needs:
//! page size, list columns, search fields, ordering, the field → widget table
//! and the inline sub-forms shown on the detail page.

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::{
  fuzzy_date::YearBounds,
  record::RecordKind,
  relationship::RelationshipKind,
  select_list::SelectListKind,
};

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const DEFAULT_SITE_HEADER: &str = "Cultural Studies: Admin Dashboard";

// ─── Widgets ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
  Text,
  TextArea,
  Checkbox,
  FuzzyDate { bounds: YearBounds },
  /// Free-text place name fed to the geocoder.
  Location,
  /// Map coordinates derived from the named location field.
  Coordinates { based_on: &'static str },
  /// Search-as-you-type over a select list, many values allowed.
  Autocomplete { list: SelectListKind },
  /// Search-as-you-type over another admin resource, one value.
  AutocompleteOne { resource: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
  pub name:   &'static str,
  #[serde(flatten)]
  pub widget: Widget,
}

const fn field(name: &'static str, widget: Widget) -> FieldSpec {
  FieldSpec { name, widget }
}

const fn autocomplete(name: &'static str, list: SelectListKind) -> FieldSpec {
  field(name, Widget::Autocomplete { list })
}

const fn date(name: &'static str, bounds: YearBounds) -> FieldSpec {
  field(name, Widget::FuzzyDate { bounds })
}

const fn coordinates(name: &'static str, based_on: &'static str) -> FieldSpec {
  field(name, Widget::Coordinates { based_on })
}

const ENTITY_FIELDS: &[FieldSpec] = &[
  field("name", Widget::Text),
  autocomplete("types", SelectListKind::EntityType),
  date("date", YearBounds::CATALOGUE),
  field("location", Widget::Location),
  coordinates("location_coordinates", "location"),
  field("description", Widget::TextArea),
  field("admin_notes", Widget::TextArea),
];

const EVENT_FIELDS: &[FieldSpec] = &[
  field("name", Widget::Text),
  autocomplete("types", SelectListKind::EventType),
  autocomplete("activities", SelectListKind::EventActivity),
  autocomplete("languages", SelectListKind::Language),
  autocomplete("locations", SelectListKind::Location),
  date("date_start", YearBounds::CATALOGUE),
  date("date_end", YearBounds::CATALOGUE),
  field("description", Widget::TextArea),
  field("admin_notes", Widget::TextArea),
];

const ITEM_FIELDS: &[FieldSpec] = &[
  field("name", Widget::Text),
  field("finding_aid", Widget::AutocompleteOne { resource: "finding-aids" }),
  autocomplete("types", SelectListKind::ItemType),
  autocomplete("media", SelectListKind::ItemMedia),
  autocomplete("languages", SelectListKind::Language),
  field("description", Widget::TextArea),
  field("sponsorship", Widget::TextArea),
  field("publication_status", Widget::Checkbox),
  date("created_date", YearBounds::ITEM_CREATED),
  field("created_location", Widget::Location),
  coordinates("created_location_coordinates", "created_location"),
  field("holding_location", Widget::Location),
  coordinates("holding_location_coordinates", "holding_location"),
  field("admin_notes", Widget::TextArea),
];

const PERSON_FIELDS: &[FieldSpec] = &[
  autocomplete("titles", SelectListKind::PersonTitle),
  field("first_name", Widget::Text),
  field("last_name", Widget::Text),
  field("other_names", Widget::Text),
  date("birth_date", YearBounds::PERSON_LIFE),
  field("birth_location", Widget::Location),
  coordinates("birth_location_coordinates", "birth_location"),
  date("death_date", YearBounds::PERSON_LIFE),
  field("death_location", Widget::Location),
  coordinates("death_location_coordinates", "death_location"),
  field("description", Widget::TextArea),
  field("admin_notes", Widget::TextArea),
];

// ─── Inlines ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "inline", rename_all = "snake_case")]
pub enum Inline {
  Relationship { kind: RelationshipKind },
  History,
}

// ─── ViewConfig ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ViewConfig {
  pub kind:          RecordKind,
  pub page_size:     usize,
  /// Column names shown in the list view, in order.
  pub list_display:  &'static [&'static str],
  /// Text columns matched by the list-view search box.
  pub search_fields: &'static [&'static str],
  /// Sort columns, compared case-insensitively; id breaks ties.
  pub ordering:      &'static [&'static str],
  pub fields:        &'static [FieldSpec],
  pub inlines:       Vec<Inline>,
}

impl ViewConfig {
  fn new(kind: RecordKind, page_size: usize) -> Self {
    let (list_display, search_fields, ordering, fields): (
      &'static [&'static str],
      &'static [&'static str],
      &'static [&'static str],
      &'static [FieldSpec],
    ) = match kind {
      RecordKind::Entity => (
        &["name", "location"],
        &["name", "location", "description", "admin_notes"],
        &["name"],
        ENTITY_FIELDS,
      ),
      RecordKind::Event => (
        &["name"],
        &["name", "description", "admin_notes"],
        &["name"],
        EVENT_FIELDS,
      ),
      RecordKind::Item => (
        &["name", "holding_location"],
        &[
          "name",
          "description",
          "sponsorship",
          "created_location",
          "holding_location",
          "admin_notes",
        ],
        &["name"],
        ITEM_FIELDS,
      ),
      RecordKind::Person => (
        &["first_name", "last_name"],
        &[
          "first_name",
          "last_name",
          "other_names",
          "birth_location",
          "death_location",
          "admin_notes",
        ],
        &["last_name", "first_name"],
        PERSON_FIELDS,
      ),
    };

    let mut inlines: Vec<Inline> = RelationshipKind::involving(kind)
      .map(|kind| Inline::Relationship { kind })
      .collect();
    if kind.has_history() {
      inlines.push(Inline::History);
    }

    Self {
      kind,
      page_size,
      list_display,
      search_fields,
      ordering,
      fields,
      inlines,
    }
  }

  /// Select lists reachable through "add related" shortcuts on this kind's
  /// edit page: its own autocomplete fields, then its inline relationship
  /// types.
  pub fn add_related(&self) -> Vec<SelectListKind> {
    let own = self.fields.iter().filter_map(|f| match f.widget {
      Widget::Autocomplete { list } => Some(list),
      _ => None,
    });
    let inline = self.inlines.iter().filter_map(|i| match i {
      Inline::Relationship { kind } => Some(kind.type_list()),
      Inline::History => None,
    });

    let mut lists = Vec::new();
    for list in own.chain(inline) {
      if !lists.contains(&list) {
        lists.push(list);
      }
    }
    lists
  }
}

// ─── Registry ────────────────────────────────────────────────────────────────

/// Startup configuration for the whole admin surface.
#[derive(Debug, Clone, Serialize)]
pub struct ViewRegistry {
  pub site_header: String,
  entity:          ViewConfig,
  event:           ViewConfig,
  item:            ViewConfig,
  person:          ViewConfig,
}

impl ViewRegistry {
  pub fn new(site_header: impl Into<String>, page_size: usize) -> Self {
    let page_size = page_size.max(1);
    Self {
      site_header: site_header.into(),
      entity:      ViewConfig::new(RecordKind::Entity, page_size),
      event:       ViewConfig::new(RecordKind::Event, page_size),
      item:        ViewConfig::new(RecordKind::Item, page_size),
      person:      ViewConfig::new(RecordKind::Person, page_size),
    }
  }

  pub fn get(&self, kind: RecordKind) -> &ViewConfig {
    match kind {
      RecordKind::Entity => &self.entity,
      RecordKind::Event => &self.event,
      RecordKind::Item => &self.item,
      RecordKind::Person => &self.person,
    }
  }

  /// Primary navigation: record kinds only. Select lists are reached through
  /// the forms that reference them.
  pub fn navigation(&self) -> Vec<RecordKind> { RecordKind::iter().collect() }
}

impl Default for ViewRegistry {
  fn default() -> Self { Self::new(DEFAULT_SITE_HEADER, DEFAULT_PAGE_SIZE) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_to_fifty_per_page() {
    let views = ViewRegistry::default();
    assert!(RecordKind::iter().all(|k| views.get(k).page_size == 50));
    assert_eq!(views.site_header, DEFAULT_SITE_HEADER);
  }

  #[test]
  fn inlines_cover_every_relationship_and_history() {
    let views = ViewRegistry::default();
    let entity = views.get(RecordKind::Entity);
    assert_eq!(entity.inlines.len(), 5);
    assert_eq!(entity.inlines.last(), Some(&Inline::History));

    let event = views.get(RecordKind::Event);
    assert!(!event.inlines.contains(&Inline::History));
    assert_eq!(event.inlines.len(), 3);
  }

  #[test]
  fn add_related_lists_autocompletes_then_relationship_types() {
    let views = ViewRegistry::default();
    let lists = views.get(RecordKind::Person).add_related();
    assert_eq!(lists[0], SelectListKind::PersonTitle);
    assert!(lists.contains(&SelectListKind::RelItemAndPersonType));
    assert!(!lists.contains(&SelectListKind::EntityType));
  }

  #[test]
  fn items_look_up_their_finding_aid() {
    let views = ViewRegistry::default();
    let spec = views
      .get(RecordKind::Item)
      .fields
      .iter()
      .find(|f| f.name == "finding_aid")
      .unwrap();
    assert_eq!(spec.widget, Widget::AutocompleteOne { resource: "finding-aids" });
    let json = serde_json::to_value(spec).unwrap();
    assert_eq!(json["widget"], "autocomplete_one");
  }

  #[test]
  fn navigation_excludes_select_lists() {
    let views = ViewRegistry::default();
    assert_eq!(views.navigation().len(), 4);
  }

  #[test]
  fn widget_table_matches_record_fields() {
    let views = ViewRegistry::default();
    for kind in RecordKind::iter() {
      let blank = serde_json::to_value(crate::record::RecordData::blank(kind)).unwrap();
      let data = blank["data"].as_object().unwrap();
      let config = views.get(kind);
      for spec in config.fields {
        assert!(data.contains_key(spec.name), "{kind:?} lacks {}", spec.name);
      }
      assert_eq!(config.fields.len(), data.len(), "{kind:?} has unmapped fields");
    }
  }
}
