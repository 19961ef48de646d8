//! Integration tests for `SqliteStore` against an in-memory database.

use csdb_core::{
  finding_aid::FindingAid,
  fuzzy_date::FuzzyDate,
  history::HistoryEntry,
  record::{Entity, Event, Item, Person, RecordData, RecordKind},
  relationship::{Relationship, RelationshipKind, Side},
  select_list::SelectListKind,
  store::{CatalogueStore, DomainError, ListQuery},
  view::ViewRegistry,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn entity(name: &str) -> RecordData {
  RecordData::Entity(Entity { name: name.into(), ..Entity::default() })
}

fn event(name: &str) -> RecordData {
  RecordData::Event(Event { name: name.into(), ..Event::default() })
}

fn item(name: &str) -> RecordData {
  RecordData::Item(Item { name: name.into(), ..Item::default() })
}

fn person(first: &str, last: &str) -> RecordData {
  RecordData::Person(Person {
    first_name: Some(first.into()),
    last_name: Some(last.into()),
    ..Person::default()
  })
}

fn domain(err: Error) -> csdb_core::Error {
  err.into_domain().expect("domain error")
}

fn field_errors(err: Error, field: &str) -> Vec<String> {
  match domain(err) {
    csdb_core::Error::Validation(errors) => {
      errors.field(field).map(<[String]>::to_vec).unwrap_or_default()
    }
    other => panic!("expected validation error, got {other:?}"),
  }
}

// ─── Select lists ────────────────────────────────────────────────────────────

#[tokio::test]
async fn select_entries_list_case_insensitively_then_by_id() {
  let s = store().await;
  let list = SelectListKind::EntityType;
  let b = s.add_select_entry(list, "beta".into()).await.unwrap();
  let a1 = s.add_select_entry(list, "Alpha".into()).await.unwrap();
  let a2 = s.add_select_entry(list, "alpha".into()).await.unwrap();
  s.add_select_entry(SelectListKind::EventType, "Aardvark".into()).await.unwrap();

  let ids: Vec<i64> = s
    .list_select_entries(list)
    .await
    .unwrap()
    .into_iter()
    .map(|e| e.id)
    .collect();
  assert_eq!(ids, [a1.id, a2.id, b.id]);
}

#[tokio::test]
async fn select_entries_fold_to_upper_case() {
  let s = store().await;
  let list = SelectListKind::Language;
  s.add_select_entry(list, "_archive".into()).await.unwrap();
  s.add_select_entry(list, "Alpha".into()).await.unwrap();
  s.add_select_entry(list, "[draft]".into()).await.unwrap();

  let names: Vec<String> = s
    .list_select_entries(list)
    .await
    .unwrap()
    .into_iter()
    .map(|e| e.name)
    .collect();
  assert_eq!(names, ["Alpha", "[draft]", "_archive"]);
}

#[tokio::test]
async fn select_entry_names_are_required() {
  let s = store().await;
  let err = s
    .add_select_entry(SelectListKind::Language, "   ".into())
    .await
    .unwrap_err();
  assert_eq!(field_errors(err, "name"), ["This field is required."]);
}

#[tokio::test]
async fn rename_and_delete_select_entry() {
  let s = store().await;
  let entry = s.add_select_entry(SelectListKind::Language, "Frnech".into()).await.unwrap();
  let renamed = s.rename_select_entry(entry.id, "French".into()).await.unwrap();
  assert_eq!(renamed.name, "French");
  assert_eq!(renamed.list, SelectListKind::Language);

  s.delete_select_entry(entry.id).await.unwrap();
  assert!(s.get_select_entry(entry.id).await.unwrap().is_none());
  assert!(matches!(
    domain(s.delete_select_entry(entry.id).await.unwrap_err()),
    csdb_core::Error::SelectEntryNotFound(_)
  ));
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_record_with_classifications() {
  let s = store().await;
  let french = s.add_select_entry(SelectListKind::Language, "French".into()).await.unwrap();
  let poster = s.add_select_entry(SelectListKind::ItemType, "Poster".into()).await.unwrap();

  let data = RecordData::Item(Item {
    name: "Strike poster".into(),
    types: vec![poster.id],
    languages: vec![french.id],
    publication_status: true,
    created_date: FuzzyDate::ymd(1968, 5, 13).with_details("printed overnight"),
    holding_location: Some("Paris".into()),
    ..Item::default()
  });
  let created = s.create_record(data.clone()).await.unwrap();
  assert_eq!(created.data, data);

  let fetched = s.get_record(RecordKind::Item, created.id).await.unwrap().unwrap();
  assert_eq!(fetched.data, data);
  assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn missing_record_is_none() {
  let s = store().await;
  assert!(s.get_record(RecordKind::Entity, 999_999).await.unwrap().is_none());
}

#[tokio::test]
async fn out_of_range_dates_are_rejected() {
  let s = store().await;
  let mut data = entity("Too early");
  if let RecordData::Entity(e) = &mut data {
    e.date = FuzzyDate::year(1849);
  }
  let err = s.create_record(data).await.unwrap_err();
  assert!(!field_errors(err, "date_year").is_empty());

  let data = RecordData::Person(Person {
    birth_date: FuzzyDate { day: Some(32), ..FuzzyDate::year(1815) },
    ..Person::default()
  });
  let err = s.create_record(data).await.unwrap_err();
  assert!(!field_errors(err, "birth_date_day").is_empty());
}

#[tokio::test]
async fn exact_and_range_may_coexist() {
  let s = store().await;
  let date = FuzzyDate { year: Some(1855), ..FuzzyDate::range(1850, 1860) };
  let mut data = entity("Circle");
  if let RecordData::Entity(e) = &mut data {
    e.date = date.clone();
  }
  let created = s.create_record(data).await.unwrap();
  let RecordData::Entity(e) = created.data else { panic!("expected entity") };
  assert_eq!(e.date, date);
}

#[tokio::test]
async fn duplicate_names_are_rejected_per_kind() {
  let s = store().await;
  s.create_record(entity("Institute X")).await.unwrap();
  let err = s.create_record(entity("Institute X")).await.unwrap_err();
  assert_eq!(field_errors(err, "name"), ["Entity with this Name already exists."]);

  // Names are unique within a kind only.
  s.create_record(event("Institute X")).await.unwrap();
}

#[tokio::test]
async fn update_keeps_own_name_and_replaces_classifications() {
  let s = store().await;
  let uni = s.add_select_entry(SelectListKind::EntityType, "University".into()).await.unwrap();
  let dept = s.add_select_entry(SelectListKind::EntityType, "Department".into()).await.unwrap();

  let mut data = entity("Centre");
  if let RecordData::Entity(e) = &mut data {
    e.types = vec![uni.id];
  }
  let created = s.create_record(data.clone()).await.unwrap();

  if let RecordData::Entity(e) = &mut data {
    e.types = vec![dept.id];
    e.description = Some("Birmingham".into());
  }
  let updated = s.update_record(created.id, data.clone()).await.unwrap();
  assert_eq!(updated.data, data);
  assert!(updated.updated_at >= created.updated_at);
  assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn update_missing_record_is_not_found() {
  let s = store().await;
  let err = s.update_record(42, entity("Nowhere")).await.unwrap_err();
  assert!(matches!(domain(err), csdb_core::Error::RecordNotFound { id: 42, .. }));
}

#[tokio::test]
async fn classification_from_wrong_list_is_rejected() {
  let s = store().await;
  let title = s.add_select_entry(SelectListKind::PersonTitle, "Dr".into()).await.unwrap();
  let mut data = entity("Misfiled");
  if let RecordData::Entity(e) = &mut data {
    e.types = vec![title.id, 777];
  }
  let err = s.create_record(data).await.unwrap_err();
  let messages = field_errors(err, "types");
  assert_eq!(messages.len(), 2);
  assert!(messages[1].contains("777"));
}

#[tokio::test]
async fn deleting_a_select_entry_drops_it_from_records() {
  let s = store().await;
  let dr = s.add_select_entry(SelectListKind::PersonTitle, "Dr".into()).await.unwrap();
  let mut data = person("Stuart", "Hall");
  if let RecordData::Person(p) = &mut data {
    p.titles = vec![dr.id];
  }
  let created = s.create_record(data).await.unwrap();

  s.delete_select_entry(dr.id).await.unwrap();
  let fetched = s.get_record(RecordKind::Person, created.id).await.unwrap().unwrap();
  let RecordData::Person(p) = fetched.data else { panic!("expected person") };
  assert!(p.titles.is_empty());
}

// ─── Template ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn template_copies_source_fields() {
  let s = store().await;
  let mut data = person("Ada", "Lovelace");
  if let RecordData::Person(p) = &mut data {
    p.birth_date = FuzzyDate::ymd(1815, 12, 10);
  }
  let source = s.create_record(data.clone()).await.unwrap();

  let template = s.template(RecordKind::Person, Some(source.id)).await.unwrap();
  assert_eq!(template, data);
}

#[tokio::test]
async fn template_of_missing_source_is_blank() {
  let s = store().await;
  let template = s.template(RecordKind::Entity, Some(999_999)).await.unwrap();
  assert_eq!(template, RecordData::blank(RecordKind::Entity));
  let template = s.template(RecordKind::Item, None).await.unwrap();
  assert_eq!(template, RecordData::blank(RecordKind::Item));
}

#[tokio::test]
async fn saving_an_unedited_named_template_collides() {
  let s = store().await;
  let source = s.create_record(event("Conference Y")).await.unwrap();
  let template = s.template(RecordKind::Event, Some(source.id)).await.unwrap();
  let err = s.create_record(template).await.unwrap_err();
  assert!(!field_errors(err, "name").is_empty());
}

// ─── Relationships ───────────────────────────────────────────────────────────

#[tokio::test]
async fn organiser_relationship_shows_on_both_records() {
  let s = store().await;
  let organiser = s
    .add_select_entry(SelectListKind::RelEntityAndEventType, "organiser".into())
    .await
    .unwrap();
  let institute = s.create_record(entity("Institute X")).await.unwrap();
  let conference = s.create_record(event("Conference Y")).await.unwrap();

  let mut rel = Relationship::new(institute.id, conference.id);
  rel.type_id = Some(organiser.id);
  rel.dates.start = FuzzyDate::year(1964);
  let stored = s
    .create_relationship(RelationshipKind::EntityAndEvent, rel.clone())
    .await
    .unwrap();
  assert_eq!(stored.relationship, rel);

  let on_entity = s.relationships_for(RecordKind::Entity, institute.id).await.unwrap();
  assert_eq!(on_entity.len(), 1);
  assert_eq!(on_entity[0].side, Side::Left);
  assert_eq!(on_entity[0].other.display_name, "Conference Y");
  assert_eq!(on_entity[0].type_name.as_deref(), Some("organiser"));

  let on_event = s.relationships_for(RecordKind::Event, conference.id).await.unwrap();
  assert_eq!(on_event.len(), 1);
  assert_eq!(on_event[0].side, Side::Right);
  assert_eq!(on_event[0].other.display_name, "Institute X");
}

#[tokio::test]
async fn relationship_endpoints_and_type_are_checked() {
  let s = store().await;
  let wrong = s.add_select_entry(SelectListKind::EntityType, "Publisher".into()).await.unwrap();
  let institute = s.create_record(entity("Institute X")).await.unwrap();

  let mut rel = Relationship::new(institute.id, 999_999);
  rel.type_id = Some(wrong.id);
  let err = s
    .create_relationship(RelationshipKind::EntityAndEvent, rel)
    .await
    .unwrap_err();
  let csdb_core::Error::Validation(errors) = domain(err) else {
    panic!("expected validation error");
  };
  assert!(errors.field("right_id").is_some());
  assert!(errors.field("type_id").is_some());
  assert!(errors.field("left_id").is_none());
}

#[tokio::test]
async fn referenced_records_cannot_be_deleted() {
  let s = store().await;
  let institute = s.create_record(entity("Institute X")).await.unwrap();
  let conference = s.create_record(event("Conference Y")).await.unwrap();
  let stored = s
    .create_relationship(
      RelationshipKind::EntityAndEvent,
      Relationship::new(institute.id, conference.id),
    )
    .await
    .unwrap();

  let err = s.delete_record(RecordKind::Entity, institute.id).await.unwrap_err();
  match domain(err) {
    csdb_core::Error::Restricted { dependents, .. } => {
      assert_eq!(dependents.len(), 1);
      assert_eq!(dependents[0].id, stored.id);
      assert_eq!(dependents[0].kind, RelationshipKind::EntityAndEvent);
    }
    other => panic!("expected restricted, got {other:?}"),
  }
  assert!(s.get_record(RecordKind::Entity, institute.id).await.unwrap().is_some());

  s.delete_relationship(RelationshipKind::EntityAndEvent, stored.id).await.unwrap();
  s.delete_record(RecordKind::Entity, institute.id).await.unwrap();
  assert!(s.get_record(RecordKind::Entity, institute.id).await.unwrap().is_none());
}

#[tokio::test]
async fn self_relationship_restricts_both_ends() {
  let s = store().await;
  let a = s.create_record(item("Draft")).await.unwrap();
  let b = s.create_record(item("Final")).await.unwrap();
  s.create_relationship(RelationshipKind::ItemAndItem, Relationship::new(a.id, b.id))
    .await
    .unwrap();

  for id in [a.id, b.id] {
    let err = s.delete_record(RecordKind::Item, id).await.unwrap_err();
    assert!(matches!(domain(err), csdb_core::Error::Restricted { .. }));
  }
}

#[tokio::test]
async fn deleting_a_type_entry_unsets_relationship_type() {
  let s = store().await;
  let director = s
    .add_select_entry(SelectListKind::RelEntityAndPersonType, "director".into())
    .await
    .unwrap();
  let centre = s.create_record(entity("CCCS")).await.unwrap();
  let hall = s.create_record(person("Stuart", "Hall")).await.unwrap();
  let mut rel = Relationship::new(centre.id, hall.id);
  rel.type_id = Some(director.id);
  let stored = s
    .create_relationship(RelationshipKind::EntityAndPerson, rel)
    .await
    .unwrap();

  s.delete_select_entry(director.id).await.unwrap();
  let fetched = s
    .get_relationship(RelationshipKind::EntityAndPerson, stored.id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.relationship.type_id, None);
}

#[tokio::test]
async fn item_and_person_type_in_use_cannot_be_deleted() {
  let s = store().await;
  let author = s
    .add_select_entry(SelectListKind::RelItemAndPersonType, "author".into())
    .await
    .unwrap();
  let book = s.create_record(item("Book")).await.unwrap();
  let writer = s.create_record(person("Raymond", "Williams")).await.unwrap();
  let mut rel = Relationship::new(book.id, writer.id);
  rel.type_id = Some(author.id);
  let stored = s
    .create_relationship(RelationshipKind::ItemAndPerson, rel)
    .await
    .unwrap();

  let err = s.delete_select_entry(author.id).await.unwrap_err();
  match domain(err) {
    csdb_core::Error::TypeInUse { id, dependents } => {
      assert_eq!(id, author.id);
      assert_eq!(dependents.len(), 1);
      assert_eq!(dependents[0].kind, RelationshipKind::ItemAndPerson);
      assert_eq!(dependents[0].id, stored.id);
    }
    other => panic!("expected type in use, got {other:?}"),
  }
  assert!(s.get_select_entry(author.id).await.unwrap().is_some());

  s.delete_relationship(RelationshipKind::ItemAndPerson, stored.id).await.unwrap();
  s.delete_select_entry(author.id).await.unwrap();
}

#[tokio::test]
async fn update_relationship_overwrites_fields() {
  let s = store().await;
  let a = s.create_record(entity("A")).await.unwrap();
  let b = s.create_record(entity("B")).await.unwrap();
  let stored = s
    .create_relationship(RelationshipKind::EntityAndEntity, Relationship::new(a.id, b.id))
    .await
    .unwrap();

  let mut rel = Relationship::new(b.id, a.id);
  rel.notes = Some("merged".into());
  let updated = s
    .update_relationship(RelationshipKind::EntityAndEntity, stored.id, rel.clone())
    .await
    .unwrap();
  assert_eq!(updated.relationship, rel);

  let err = s
    .update_relationship(RelationshipKind::EntityAndEntity, 999, rel)
    .await
    .unwrap_err();
  assert!(matches!(domain(err), csdb_core::Error::RelationshipNotFound { .. }));
}

// ─── History ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn history_is_deleted_with_its_owner() {
  let s = store().await;
  let centre = s.create_record(entity("CCCS")).await.unwrap();
  let mut entry = HistoryEntry::new("Centre for Contemporary Cultural Studies");
  entry.dates.start = FuzzyDate::year(1964);
  let stored = s.add_history(RecordKind::Entity, centre.id, entry.clone()).await.unwrap();
  assert_eq!(stored.entry, entry);

  s.delete_record(RecordKind::Entity, centre.id).await.unwrap();
  let err = s
    .delete_history(RecordKind::Entity, centre.id, stored.id)
    .await
    .unwrap_err();
  assert!(matches!(domain(err), csdb_core::Error::HistoryNotFound { .. }));
}

#[tokio::test]
async fn history_of_a_missing_owner_is_not_found() {
  let s = store().await;
  let err = s.history_for(RecordKind::Entity, 999_999).await.unwrap_err();
  assert!(matches!(
    domain(err),
    csdb_core::Error::RecordNotFound { kind: RecordKind::Entity, id: 999_999 }
  ));

  let centre = s.create_record(entity("CCCS")).await.unwrap();
  assert!(s.history_for(RecordKind::Entity, centre.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn history_is_only_deleted_through_its_owner() {
  let s = store().await;
  let a = s.create_record(person("Richard", "Hoggart")).await.unwrap();
  let b = s.create_record(person("Stuart", "Hall")).await.unwrap();
  let entry = s
    .add_history(RecordKind::Person, a.id, HistoryEntry::new("R. Hoggart"))
    .await
    .unwrap();

  let err = s.delete_history(RecordKind::Person, b.id, entry.id).await.unwrap_err();
  assert!(matches!(domain(err), csdb_core::Error::HistoryNotFound { .. }));
  assert_eq!(s.history_for(RecordKind::Person, a.id).await.unwrap().len(), 1);

  s.delete_history(RecordKind::Person, a.id, entry.id).await.unwrap();
  assert!(s.history_for(RecordKind::Person, a.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn history_names_are_unique_per_owner() {
  let s = store().await;
  let a = s.create_record(person("Ada", "Lovelace")).await.unwrap();
  let b = s.create_record(person("Ada", "Byron")).await.unwrap();

  s.add_history(RecordKind::Person, a.id, HistoryEntry::new("Ada Byron")).await.unwrap();
  s.add_history(RecordKind::Person, b.id, HistoryEntry::new("Ada Byron")).await.unwrap();
  let err = s
    .add_history(RecordKind::Person, a.id, HistoryEntry::new("Ada Byron"))
    .await
    .unwrap_err();
  assert!(!field_errors(err, "name").is_empty());
}

#[tokio::test]
async fn events_and_items_have_no_history() {
  let s = store().await;
  let conference = s.create_record(event("Conference Y")).await.unwrap();
  let err = s
    .add_history(RecordKind::Event, conference.id, HistoryEntry::new("Old name"))
    .await
    .unwrap_err();
  assert!(matches!(domain(err), csdb_core::Error::HistoryUnsupported(RecordKind::Event)));
}

// ─── Finding aids ────────────────────────────────────────────────────────────

#[tokio::test]
async fn finding_aid_crud_and_unique_names() {
  let s = store().await;
  let aid = s.add_finding_aid(FindingAid::new("CCCS papers")).await.unwrap();
  assert_eq!(aid.aid.name, "CCCS papers");

  let err = s.add_finding_aid(FindingAid::new("CCCS papers")).await.unwrap_err();
  assert_eq!(field_errors(err, "name"), ["Finding aid with this Name already exists."]);

  let mut edited = aid.aid.clone();
  edited.admin_notes = Some("boxes 1-12".into());
  let updated = s.update_finding_aid(aid.id, edited.clone()).await.unwrap();
  assert_eq!(updated.aid, edited);
  assert_eq!(updated.created_at, aid.created_at);

  let err = s.update_finding_aid(999_999, edited).await.unwrap_err();
  assert!(matches!(domain(err), csdb_core::Error::FindingAidNotFound(999_999)));
}

#[tokio::test]
async fn deleting_a_finding_aid_uncites_its_items() {
  let s = store().await;
  let aid = s.add_finding_aid(FindingAid::new("Hall archive")).await.unwrap();
  let data = RecordData::Item(Item {
    name: "Encoding/Decoding draft".into(),
    finding_aid: Some(aid.id),
    ..Item::default()
  });
  let created = s.create_record(data).await.unwrap();
  let RecordData::Item(stored) = &created.data else { panic!("expected item") };
  assert_eq!(stored.finding_aid, Some(aid.id));

  s.delete_finding_aid(aid.id).await.unwrap();
  let fetched = s.get_record(RecordKind::Item, created.id).await.unwrap().unwrap();
  let RecordData::Item(item) = fetched.data else { panic!("expected item") };
  assert_eq!(item.finding_aid, None);
  assert!(matches!(
    domain(s.delete_finding_aid(aid.id).await.unwrap_err()),
    csdb_core::Error::FindingAidNotFound(_)
  ));
}

#[tokio::test]
async fn item_citing_a_missing_finding_aid_is_rejected() {
  let s = store().await;
  let data = RecordData::Item(Item {
    name: "Orphan".into(),
    finding_aid: Some(999_999),
    ..Item::default()
  });
  let err = s.create_record(data).await.unwrap_err();
  assert_eq!(
    field_errors(err, "finding_aid"),
    ["Select a valid choice. 999999 is not one of the available choices."]
  );
}

#[tokio::test]
async fn finding_aids_list_by_name_with_search() {
  let s = store().await;
  for name in ["zine box", "Annual reports", "Birmingham posters"] {
    s.add_finding_aid(FindingAid::new(name)).await.unwrap();
  }

  let page = s.list_finding_aids(&ListQuery::default(), 2).await.unwrap();
  assert_eq!(page.total, 3);
  assert_eq!(page.num_pages, 2);
  let names: Vec<&str> = page.items.iter().map(|a| a.aid.name.as_str()).collect();
  assert_eq!(names, ["Annual reports", "Birmingham posters"]);

  let query = ListQuery { search: Some("box".into()), page: 5 };
  let page = s.list_finding_aids(&query, 2).await.unwrap();
  assert_eq!(page.page, 1);
  assert_eq!(page.items.len(), 1);
  assert_eq!(page.items[0].aid.name, "zine box");
}

// ─── Views ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_view_collects_inlines() {
  let s = store().await;
  let dr = s.add_select_entry(SelectListKind::PersonTitle, "Dr".into()).await.unwrap();
  let mut data = person("Stuart", "Hall");
  if let RecordData::Person(p) = &mut data {
    p.titles = vec![dr.id];
  }
  let hall = s.create_record(data).await.unwrap();
  let centre = s.create_record(entity("CCCS")).await.unwrap();
  s.create_relationship(
    RelationshipKind::EntityAndPerson,
    Relationship::new(centre.id, hall.id),
  )
  .await
  .unwrap();
  s.add_history(RecordKind::Person, hall.id, HistoryEntry::new("S. Hall")).await.unwrap();

  let view = s.record_view(RecordKind::Person, hall.id).await.unwrap().unwrap();
  assert_eq!(view.display_name, "Dr Stuart Hall");
  assert_eq!(view.classifications.len(), 1);
  assert_eq!(view.relationships.len(), 1);
  assert_eq!(view.relationships[0].other.display_name, "CCCS");
  assert_eq!(view.history.len(), 1);

  let on_centre = s.relationships_for(RecordKind::Entity, centre.id).await.unwrap();
  assert_eq!(on_centre[0].other.display_name, "Dr Stuart Hall");
}

#[tokio::test]
async fn nameless_person_displays_id() {
  let s = store().await;
  let nobody = s.create_record(RecordData::blank(RecordKind::Person)).await.unwrap();
  let view = s.record_view(RecordKind::Person, nobody.id).await.unwrap().unwrap();
  assert_eq!(view.display_name, format!("(no name, ID: {})", nobody.id));
}

#[tokio::test]
async fn list_records_pages_and_orders() {
  let s = store().await;
  let views = ViewRegistry::new("Test", 2);
  for name in ["charlie", "Bravo", "alpha"] {
    s.create_record(entity(name)).await.unwrap();
  }

  let view = views.get(RecordKind::Entity);
  let first = s
    .list_records(view, &ListQuery { search: None, page: 1 })
    .await
    .unwrap();
  assert_eq!(first.total, 3);
  assert_eq!(first.num_pages, 2);
  let names: Vec<_> = first.items.iter().map(|r| r.columns[0].clone().unwrap()).collect();
  assert_eq!(names, ["alpha", "Bravo"]);

  let clamped = s
    .list_records(view, &ListQuery { search: None, page: 9 })
    .await
    .unwrap();
  assert_eq!(clamped.page, 2);
  assert_eq!(clamped.items.len(), 1);
}

#[tokio::test]
async fn list_records_search_matches_every_term() {
  let s = store().await;
  let views = ViewRegistry::default();
  let mut data = person("Raymond", "Williams");
  if let RecordData::Person(p) = &mut data {
    p.birth_location = Some("Llanfihangel Crucorney".into());
  }
  s.create_record(data).await.unwrap();
  s.create_record(person("Richard", "Hoggart")).await.unwrap();

  let view = views.get(RecordKind::Person);
  let hits = s
    .list_records(view, &ListQuery { search: Some("williams crucorney".into()), page: 1 })
    .await
    .unwrap();
  assert_eq!(hits.total, 1);
  assert_eq!(hits.items[0].columns[1].as_deref(), Some("Williams"));

  let none = s
    .list_records(view, &ListQuery { search: Some("hoggart crucorney".into()), page: 1 })
    .await
    .unwrap();
  assert_eq!(none.total, 0);
  assert_eq!(none.page, 1);
}
