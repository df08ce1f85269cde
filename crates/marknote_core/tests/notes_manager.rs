use chrono::{Duration, TimeZone, Utc};
use marknote_core::{
    KeyValueStore, ManualClock, MemoryStore, Note, NotePatch, NotesManager, DEFAULT_NOTE_TITLE,
    NOTES_STORAGE_KEY,
};

fn manager_at_epoch() -> (NotesManager<MemoryStore, ManualClock>, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    let manager = NotesManager::with_clock(MemoryStore::new(), clock.clone());
    (manager, clock)
}

fn stored_notes(manager: &NotesManager<MemoryStore, ManualClock>) -> Vec<Note> {
    let raw = manager
        .store()
        .backend()
        .get(NOTES_STORAGE_KEY)
        .unwrap()
        .expect("collection should be persisted");
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn create_note_inserts_defaults_at_head_and_activates() {
    let (mut manager, clock) = manager_at_epoch();
    let first = manager.create_note();
    clock.advance(Duration::seconds(1));
    let second = manager.create_note();

    assert_eq!(second.title, DEFAULT_NOTE_TITLE);
    assert!(second.content.is_empty());
    assert!(second.tags.is_empty());
    assert_eq!(manager.notes()[0].id, second.id);
    assert_eq!(manager.notes()[1].id, first.id);
    assert_eq!(manager.active_note_id(), Some(second.id.as_str()));
    assert_eq!(stored_notes(&manager), manager.notes().to_vec());
}

#[test]
fn ids_stay_unique_when_created_in_the_same_millisecond() {
    let (mut manager, _clock) = manager_at_epoch();
    let a = manager.create_note();
    let b = manager.create_note();
    let c = manager.create_note();
    assert_ne!(a.id, b.id);
    assert_ne!(b.id, c.id);
    assert_ne!(a.id, c.id);
    let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    assert_eq!(a.id, expected.timestamp_millis().to_string());
}

#[test]
fn update_note_merges_fields_and_refreshes_updated_at() {
    let (mut manager, clock) = manager_at_epoch();
    let created = manager.create_note();
    clock.advance(Duration::minutes(5));

    let updated = manager
        .update_note(
            &created.id,
            NotePatch {
                title: Some("Project Plan".to_string()),
                content: Some("# Goals".to_string()),
                tags: None,
            },
        )
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Project Plan");
    assert_eq!(updated.content, "# Goals");
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.updated_at, created.created_at + Duration::minutes(5));
    assert_eq!(stored_notes(&manager)[0].title, "Project Plan");
}

#[test]
fn update_unknown_note_is_a_noop() {
    let (mut manager, _clock) = manager_at_epoch();
    manager.create_note();
    let before = manager.notes().to_vec();
    assert!(manager.update_note("missing", NotePatch::title("x")).is_none());
    assert_eq!(manager.notes(), before.as_slice());
}

#[test]
fn deleting_last_active_note_clears_selection() {
    let (mut manager, _clock) = manager_at_epoch();
    let only = manager.create_note();
    assert!(manager.delete_note(&only.id));
    assert!(manager.active_note_id().is_none());
    assert!(manager.active_note().is_none());
    assert!(stored_notes(&manager).is_empty());
}

#[test]
fn deleting_active_note_selects_new_head() {
    let (mut manager, clock) = manager_at_epoch();
    let oldest = manager.create_note();
    clock.advance(Duration::seconds(1));
    let middle = manager.create_note();
    clock.advance(Duration::seconds(1));
    let newest = manager.create_note();

    assert!(manager.delete_note(&newest.id));
    assert_eq!(manager.active_note_id(), Some(middle.id.as_str()));

    manager.set_active_note(&oldest.id);
    assert!(manager.delete_note(&middle.id));
    assert_eq!(manager.active_note_id(), Some(oldest.id.as_str()));
    assert!(!manager.delete_note(&middle.id));
}

#[test]
fn add_tag_is_idempotent_and_case_sensitive() {
    let (mut manager, _clock) = manager_at_epoch();
    let note = manager.create_note();

    assert!(manager.add_tag_to_note(&note.id, "work"));
    assert!(!manager.add_tag_to_note(&note.id, "work"));
    assert!(manager.add_tag_to_note(&note.id, "Work"));
    assert!(!manager.add_tag_to_note(&note.id, "   "));
    assert!(!manager.add_tag_to_note("missing", "work"));

    assert_eq!(manager.note(&note.id).unwrap().tags, vec!["work", "Work"]);
}

#[test]
fn remove_tag_drops_exact_match_and_touches_note() {
    let (mut manager, clock) = manager_at_epoch();
    let note = manager.create_note();
    manager.add_tag_to_note(&note.id, "a");
    manager.add_tag_to_note(&note.id, "b");
    clock.advance(Duration::seconds(10));

    assert!(manager.remove_tag_from_note(&note.id, "a"));
    let stored = manager.note(&note.id).unwrap();
    assert_eq!(stored.tags, vec!["b"]);
    assert_eq!(stored.updated_at, note.created_at + Duration::seconds(10));
    assert!(!manager.remove_tag_from_note("missing", "b"));
}

#[test]
fn add_and_remove_tag_trim_alike() {
    let (mut manager, _clock) = manager_at_epoch();
    let note = manager.create_note();

    assert!(manager.add_tag_to_note(&note.id, " work"));
    assert_eq!(manager.note(&note.id).unwrap().tags, vec!["work"]);

    assert!(manager.remove_tag_from_note(&note.id, " work "));
    assert!(manager.note(&note.id).unwrap().tags.is_empty());
    assert_eq!(stored_notes(&manager)[0].tags, Vec::<String>::new());
}

#[test]
fn all_tags_tracks_collection_changes() {
    let (mut manager, clock) = manager_at_epoch();
    let first = manager.create_note();
    clock.advance(Duration::seconds(1));
    let second = manager.create_note();
    manager.add_tag_to_note(&first.id, "zeta");
    manager.add_tag_to_note(&second.id, "alpha");
    manager.add_tag_to_note(&second.id, "zeta");
    assert_eq!(manager.all_tags(), vec!["alpha", "zeta"]);

    manager.delete_note(&second.id);
    assert_eq!(manager.all_tags(), vec!["zeta"]);
}

#[test]
fn filtered_notes_combine_search_and_tag_selection() {
    let (mut manager, clock) = manager_at_epoch();
    let n1 = manager.create_note();
    clock.advance(Duration::seconds(1));
    let n2 = manager.create_note();
    manager.update_note(&n1.id, NotePatch::title("Project Plan"));
    manager.update_note(&n2.id, NotePatch::title("Project Budget"));
    manager.add_tag_to_note(&n1.id, "a");
    manager.add_tag_to_note(&n2.id, "a");
    manager.add_tag_to_note(&n2.id, "b");

    manager.toggle_tag_filter("a");
    manager.toggle_tag_filter("b");
    let ids: Vec<&str> = manager.filtered_notes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec![n2.id.as_str()]);

    manager.clear_tag_filters();
    manager.set_search_query("PLAN");
    let ids: Vec<&str> = manager.filtered_notes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec![n1.id.as_str()]);
}

#[test]
fn filter_changes_are_not_persisted() {
    let (mut manager, _clock) = manager_at_epoch();
    manager.create_note();
    let before = manager.store().backend().get(NOTES_STORAGE_KEY).unwrap();
    manager.set_search_query("anything");
    manager.toggle_tag_filter("x");
    let after = manager.store().backend().get(NOTES_STORAGE_KEY).unwrap();
    assert_eq!(before, after);
    assert_eq!(manager.store().backend().len(), 1);
}

#[test]
fn manager_restores_collection_and_selects_head() {
    let (mut manager, clock) = manager_at_epoch();
    manager.create_note();
    clock.advance(Duration::seconds(1));
    let head = manager.create_note();
    let backend = manager.into_store().into_backend();

    let reloaded = NotesManager::new(backend);
    assert_eq!(reloaded.notes().len(), 2);
    assert_eq!(reloaded.active_note_id(), Some(head.id.as_str()));
}

#[test]
fn malformed_stored_collection_starts_empty() {
    let mut backend = MemoryStore::new();
    backend.set(NOTES_STORAGE_KEY, "[{\"id\": 1}").unwrap();
    let manager = NotesManager::new(backend);
    assert!(manager.notes().is_empty());
    assert!(manager.active_note().is_none());
}

#[test]
fn failed_save_keeps_in_memory_state() {
    let mut manager = NotesManager::new(MemoryStore::with_quota(16));
    let note = manager.create_note();
    assert!(!manager.is_persisted());
    assert_eq!(manager.notes().len(), 1);
    assert_eq!(manager.active_note().unwrap().id, note.id);
    assert!(manager.store().backend().get(NOTES_STORAGE_KEY).unwrap().is_none());
}
