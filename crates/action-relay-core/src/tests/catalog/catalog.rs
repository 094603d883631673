use crate::{
    Action, ActionCatalog, ActionId, ActionKind, ActionSpec, CatalogStore, MediaKey,
    MemoryCatalogStore, RelayError, StoredCatalog, tests::support::memory_catalog,
};

/// WHAT: Ids are assigned from 1 and strictly increase
/// WHY: Remotes press buttons by id, so ids must be unique
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_catalog_when_adding_actions_then_ids_start_at_one_and_increase() {
    // Given: An empty catalog
    let (mut catalog, _store) = memory_catalog();

    // When: Adding three actions
    let ids: Vec<ActionId> = ["a", "b", "c"]
        .into_iter()
        .map(|name| catalog.add(ActionSpec::process(name, "true", "")).unwrap())
        .collect();

    // Then: Ids are 1, 2, 3
    assert_eq!(ids, vec![ActionId(1), ActionId(2), ActionId(3)]);
}

/// WHAT: Removing the newest action does not free its id
/// WHY: A stale remote could otherwise press a recycled id
#[test]
#[allow(clippy::unwrap_used)]
fn given_removed_action_when_adding_again_then_id_not_reused() {
    // Given: Catalog with ids 1..=3 and the last one removed
    let (mut catalog, _store) = memory_catalog();
    for name in ["a", "b", "c"] {
        catalog.add(ActionSpec::process(name, "true", "")).unwrap();
    }
    catalog.remove(2);

    // When: Adding another action
    let id = catalog.add(ActionSpec::process("d", "true", "")).unwrap();

    // Then: It gets a fresh id
    assert_eq!(id, ActionId(4));
}

/// WHAT: The id counter survives a save/load cycle
/// WHY: Ids must stay unique across restarts
#[test]
#[allow(clippy::unwrap_used)]
fn given_saved_catalog_when_reopened_then_ids_continue_from_counter() {
    // Given: A catalog that handed out ids 1 and 2, then removed 2
    let store = MemoryCatalogStore::new();
    let mut catalog = ActionCatalog::new(Box::new(store.clone()));
    catalog.add(ActionSpec::process("a", "true", "")).unwrap();
    catalog.add(ActionSpec::process("b", "true", "")).unwrap();
    catalog.remove(1);

    // When: Reopening from the same store and adding
    let mut reopened = ActionCatalog::open(Box::new(store)).unwrap();
    let id = reopened.add(ActionSpec::process("c", "true", "")).unwrap();

    // Then: The new id is 3
    assert_eq!(id, ActionId(3));
    assert_eq!(reopened.list().len(), 2);
}

/// WHAT: Every mutation is written through to the store
/// WHY: Edits must survive a crash without an explicit save
#[test]
#[allow(clippy::unwrap_used)]
fn given_catalog_when_adding_then_store_holds_new_action_and_counter() {
    // Given: An empty catalog
    let (mut catalog, store) = memory_catalog();

    // When: Adding an action
    let id = catalog.add(ActionSpec::media("Next", MediaKey::Next)).unwrap();

    // Then: The store snapshot contains it and the advanced counter
    let snapshot = store.snapshot().unwrap();
    assert_eq!(snapshot.actions.len(), 1);
    assert_eq!(snapshot.actions[0].id, id);
    assert_eq!(snapshot.next_id, ActionId(2));
}

/// WHAT: Update replaces fields but keeps the id
/// WHY: Ids are immutable after creation
#[test]
#[allow(clippy::unwrap_used)]
fn given_action_when_updating_then_fields_change_and_id_stays() {
    // Given: A catalog with one process action
    let (mut catalog, store) = memory_catalog();
    let id = catalog.add(ActionSpec::process("Term", "xterm", "")).unwrap();

    // When: Updating it into a shortcut
    let updated = catalog.update(0, ActionSpec::shortcut("Copy", "Ctrl+C").with_icon("qrc:/copy"));

    // Then: Same id, new fields, persisted
    assert!(updated);
    let action = catalog.get(id).unwrap();
    assert_eq!(action.name, "Copy");
    assert_eq!(action.kind, ActionKind::Shortcut);
    assert_eq!(action.shortcut, "Ctrl+C");
    assert_eq!(action.icon, "qrc:/copy");
    assert_eq!(store.snapshot().unwrap().actions[0].name, "Copy");
}

/// WHAT: Out-of-range update is a silent no-op
/// WHY: Editors may hold stale positions; nothing should change or notify
#[test]
#[allow(clippy::unwrap_used)]
fn given_out_of_range_position_when_updating_then_catalog_unchanged() {
    // Given: A catalog with two actions
    let (mut catalog, store) = memory_catalog();
    catalog.add(ActionSpec::process("a", "true", "")).unwrap();
    catalog.add(ActionSpec::process("b", "true", "")).unwrap();
    let before = catalog.list().to_vec();
    let revision = catalog.revision();
    let saved = store.snapshot().unwrap();

    // When: Updating position 2
    let updated = catalog.update(2, ActionSpec::process("z", "false", ""));

    // Then: Nothing changed, nothing persisted, no revision bump
    assert!(!updated);
    assert_eq!(catalog.list(), before.as_slice());
    assert_eq!(catalog.revision(), revision);
    assert_eq!(store.snapshot().unwrap(), saved);
}

/// WHAT: Out-of-range remove is a silent no-op
/// WHY: Same contract as update
#[test]
#[allow(clippy::unwrap_used)]
fn given_out_of_range_position_when_removing_then_catalog_unchanged() {
    // Given: A catalog with one action
    let (mut catalog, _store) = memory_catalog();
    catalog.add(ActionSpec::process("a", "true", "")).unwrap();
    let revision = catalog.revision();

    // When: Removing position 1 and a huge position
    let first = catalog.remove(1);
    let second = catalog.remove(usize::MAX);

    // Then: Both are ignored
    assert!(first.is_none());
    assert!(second.is_none());
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.revision(), revision);
}

/// WHAT: Lookup is by id, independent of position
/// WHY: Removing an earlier entry shifts positions but not ids
#[test]
#[allow(clippy::unwrap_used)]
fn given_earlier_action_removed_when_getting_by_id_then_later_action_found() {
    // Given: Three actions, first removed
    let (mut catalog, _store) = memory_catalog();
    catalog.add(ActionSpec::process("a", "true", "")).unwrap();
    catalog.add(ActionSpec::process("b", "true", "")).unwrap();
    let c = catalog.add(ActionSpec::process("c", "true", "")).unwrap();
    catalog.remove(0);

    // When: Looking up the third action by id
    let action = catalog.get(c).unwrap();

    // Then: It is found at its new position
    assert_eq!(action.name, "c");
    assert_eq!(catalog.position_of(c), Some(1));
    assert!(catalog.get(ActionId(1)).is_none());
}

/// WHAT: Load replaces the in-memory catalog wholesale
/// WHY: Load is a reset, not a merge
#[test]
#[allow(clippy::unwrap_used)]
fn given_populated_catalog_when_loading_then_contents_replaced() {
    // Given: A catalog with local edits and a store holding other data
    let (mut catalog, store) = memory_catalog();
    catalog.add(ActionSpec::process("local", "true", "")).unwrap();
    let stored = StoredCatalog {
        actions: vec![Action::new(ActionId(7), ActionSpec::media("Mute", MediaKey::Mute))],
        next_id: ActionId(8),
    };
    store.save(&stored.actions, stored.next_id).unwrap();

    // When: Loading
    catalog.load().unwrap();

    // Then: Only the stored action remains and the counter follows the store
    assert_eq!(catalog.list(), stored.actions.as_slice());
    assert_eq!(catalog.next_id(), ActionId(8));
}

/// WHAT: A never-written store loads as an empty catalog
/// WHY: First run must not fail
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_store_when_opening_then_catalog_empty_with_first_id() {
    // Given/When: Opening a fresh store
    let catalog = ActionCatalog::open(Box::new(MemoryCatalogStore::new())).unwrap();

    // Then: Empty, next id 1
    assert!(catalog.is_empty());
    assert_eq!(catalog.next_id(), ActionId::FIRST);
}

/// WHAT: Arguments split on any whitespace without quoting
/// WHY: Matches the naive argv contract
#[test]
fn given_arguments_with_extra_whitespace_when_splitting_then_tokens_only() {
    // Given: Arguments with repeated spaces and a tab
    let action = Action::new(
        ActionId(1),
        ActionSpec::process("x", "cmd", "  --flag \"a b\"\tvalue  "),
    );

    // When: Splitting
    let argv = action.argv();

    // Then: Naive tokens, quotes untouched
    assert_eq!(argv, vec!["--flag", "\"a", "b\"", "value"]);
}

/// WHAT: The last id is never handed out twice
/// WHY: Two actions sharing an id would both fire on one press
#[test]
#[allow(clippy::unwrap_used)]
fn given_counter_at_top_of_id_space_when_adding_then_refused_without_duplicate() {
    // Given: A stored catalog one id away from exhaustion
    let store = MemoryCatalogStore::with_catalog(StoredCatalog {
        actions: Vec::new(),
        next_id: ActionId(u32::MAX - 1),
    });
    let mut catalog = ActionCatalog::open(Box::new(store.clone())).unwrap();

    // When: Adding twice
    let first = catalog.add(ActionSpec::process("a", "true", ""));
    let second = catalog.add(ActionSpec::process("b", "true", ""));

    // Then: One id assigned, the second add refused, nothing duplicated
    assert_eq!(first.unwrap(), ActionId(u32::MAX - 1));
    assert!(matches!(second, Err(RelayError::Storage { .. })));
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.next_id(), ActionId(u32::MAX));
    assert_eq!(store.snapshot().unwrap().actions.len(), 1);
}
