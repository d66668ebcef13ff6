//! Scenarios every store backend must satisfy identically.

use lazytodo_core::{
    is_list_complete, total_count, undone_count, ListId, SessionState, SessionTodoStore,
    SqliteTodoStore, StoreError, TodoStore,
};

/// Runs `scenario` against a fresh session store and a fresh SQLite store.
fn for_each_backend(scenario: impl Fn(&str, &mut dyn TodoStore)) {
    let mut session = SessionState::new();
    let mut session_store = SessionTodoStore::new(&mut session);
    scenario("session", &mut session_store);

    let mut sqlite_store = SqliteTodoStore::open_in_memory().unwrap();
    scenario("sqlite", &mut sqlite_store);
}

#[test]
fn added_list_appears_exactly_once() {
    for_each_backend(|backend, store| {
        let id = store.add_list("Groceries").unwrap();

        let lists = store.all_lists().unwrap();
        let named: Vec<_> = lists.iter().filter(|l| l.name == "Groceries").collect();
        assert_eq!(named.len(), 1, "{backend}");
        assert_eq!(named[0].id, id, "{backend}");
        assert!(named[0].todos.is_empty(), "{backend}");
    });
}

#[test]
fn all_lists_keeps_insertion_order_with_todos_populated() {
    for_each_backend(|backend, store| {
        let first = store.add_list("Work").unwrap();
        let second = store.add_list("Home").unwrap();
        store.add_todo(second, "Laundry").unwrap();
        store.add_todo(first, "Report").unwrap();
        store.add_todo(first, "Email").unwrap();

        let lists = store.all_lists().unwrap();
        let names: Vec<_> = lists.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Work", "Home"], "{backend}");

        let work: Vec<_> = lists[0].todos.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(work, ["Report", "Email"], "{backend}");
        assert_eq!(lists[1].todos.len(), 1, "{backend}");
    });
}

#[test]
fn find_list_reports_missing_list_as_none() {
    for_each_backend(|backend, store| {
        assert!(store.find_list(42).unwrap().is_none(), "{backend}");

        let id = store.add_list("Chores").unwrap();
        let found = store.find_list(id).unwrap().unwrap();
        assert_eq!(found.name, "Chores", "{backend}");
    });
}

#[test]
fn todo_ids_start_at_one_per_list() {
    for_each_backend(|backend, store| {
        let a = store.add_list("A").unwrap();
        let b = store.add_list("B").unwrap();

        assert_eq!(store.add_todo(a, "one").unwrap(), 1, "{backend}");
        assert_eq!(store.add_todo(a, "two").unwrap(), 2, "{backend}");
        assert_eq!(store.add_todo(b, "first of b").unwrap(), 1, "{backend}");

        let todo = store.find_list(a).unwrap().unwrap();
        assert!(todo.todos.iter().all(|t| !t.completed), "{backend}");
    });
}

#[test]
fn deleted_ids_are_not_reissued() {
    for_each_backend(|backend, store| {
        let first = store.add_list("First").unwrap();
        let second = store.add_list("Second").unwrap();
        store.delete_list(second).unwrap();
        let third = store.add_list("Third").unwrap();
        assert!(third > second, "{backend}");

        store.add_todo(first, "a").unwrap();
        let b = store.add_todo(first, "b").unwrap();
        store.delete_todo(first, b).unwrap();
        let c = store.add_todo(first, "c").unwrap();
        assert_eq!(c, b + 1, "{backend}");
    });
}

#[test]
fn delete_list_removes_its_todos() {
    for_each_backend(|backend, store| {
        let keep = store.add_list("Keep").unwrap();
        let doomed = store.add_list("Doomed").unwrap();
        store.add_todo(keep, "stay").unwrap();
        store.add_todo(doomed, "go").unwrap();
        store.add_todo(doomed, "also go").unwrap();

        store.delete_list(doomed).unwrap();

        assert!(store.find_list(doomed).unwrap().is_none(), "{backend}");
        let lists = store.all_lists().unwrap();
        assert_eq!(lists.len(), 1, "{backend}");
        assert!(
            lists
                .iter()
                .flat_map(|l| l.todos.iter())
                .all(|t| t.name == "stay"),
            "{backend}"
        );
    });
}

#[test]
fn rename_list_changes_name_in_place() {
    for_each_backend(|backend, store| {
        let id = store.add_list("Old").unwrap();
        store.add_todo(id, "keep me").unwrap();

        store.rename_list(id, "New").unwrap();

        let list = store.find_list(id).unwrap().unwrap();
        assert_eq!(list.name, "New", "{backend}");
        assert_eq!(list.todos.len(), 1, "{backend}");
    });
}

#[test]
fn duplicate_names_are_not_rejected_by_the_store() {
    for_each_backend(|backend, store| {
        store.add_list("Twin").unwrap();
        store.add_list("Twin").unwrap();
        assert_eq!(store.all_lists().unwrap().len(), 2, "{backend}");
    });
}

#[test]
fn groceries_scenario_tracks_completion() {
    for_each_backend(|backend, store| {
        let id = store.add_list("Groceries").unwrap();
        let milk = store.add_todo(id, "Milk").unwrap();
        store.add_todo(id, "Eggs").unwrap();
        assert_eq!(milk, 1, "{backend}");

        store.set_todo_completed(id, milk, true).unwrap();

        let list = store.find_list(id).unwrap().unwrap();
        assert_eq!(undone_count(&list), 1, "{backend}");
        assert_eq!(total_count(&list), 2, "{backend}");
        assert!(!is_list_complete(&list), "{backend}");
    });
}

#[test]
fn set_todo_completed_can_toggle_back() {
    for_each_backend(|backend, store| {
        let id = store.add_list("Toggle").unwrap();
        let todo = store.add_todo(id, "flip").unwrap();

        store.set_todo_completed(id, todo, true).unwrap();
        store.set_todo_completed(id, todo, true).unwrap();
        store.set_todo_completed(id, todo, false).unwrap();

        let list = store.find_list(id).unwrap().unwrap();
        assert!(!list.todo(todo).unwrap().completed, "{backend}");
    });
}

#[test]
fn complete_all_todos_marks_every_todo() {
    for_each_backend(|backend, store| {
        let id = store.add_list("Trip").unwrap();
        let passport = store.add_todo(id, "Passport").unwrap();
        store.add_todo(id, "Tickets").unwrap();
        store.add_todo(id, "Charger").unwrap();
        store.set_todo_completed(id, passport, true).unwrap();

        store.complete_all_todos(id).unwrap();

        let list = store.find_list(id).unwrap().unwrap();
        assert_eq!(list.todos.len(), 3, "{backend}");
        assert!(list.todos.iter().all(|t| t.completed), "{backend}");
        assert!(is_list_complete(&list), "{backend}");
    });
}

#[test]
fn complete_all_on_empty_list_keeps_it_incomplete() {
    for_each_backend(|backend, store| {
        let id = store.add_list("Empty").unwrap();
        store.complete_all_todos(id).unwrap();

        let list = store.find_list(id).unwrap().unwrap();
        assert!(!is_list_complete(&list), "{backend}");
    });
}

#[test]
fn missing_list_is_reported_uniformly() {
    for_each_backend(|backend, store| {
        let results = [
            store.delete_list(7).unwrap_err(),
            store.rename_list(7, "x").unwrap_err(),
            store.add_todo(7, "x").unwrap_err(),
            store.delete_todo(7, 1).unwrap_err(),
            store.set_todo_completed(7, 1, true).unwrap_err(),
            store.complete_all_todos(7).unwrap_err(),
        ];
        for err in results {
            assert!(
                matches!(err, StoreError::ListNotFound(7)),
                "{backend}: unexpected {err}"
            );
        }
        assert!(store.all_lists().unwrap().is_empty(), "{backend}");
    });
}

#[test]
fn missing_todo_is_reported_and_list_untouched() {
    for_each_backend(|backend, store| {
        let id = store.add_list("Solo").unwrap();
        store.add_todo(id, "only").unwrap();

        let delete_err = store.delete_todo(id, 9).unwrap_err();
        assert!(
            matches!(delete_err, StoreError::TodoNotFound { list_id, todo_id: 9 } if list_id == id),
            "{backend}"
        );
        let mark_err = store.set_todo_completed(id, 9, true).unwrap_err();
        assert!(mark_err.is_not_found(), "{backend}");

        let list = store.find_list(id).unwrap().unwrap();
        assert_eq!(list.todos.len(), 1, "{backend}");
        assert!(!list.todos[0].completed, "{backend}");
    });
}

/// Expects both id allocators of `store` to be exhausted by `full_list`.
fn assert_ids_exhausted(backend: &str, store: &mut dyn TodoStore, full_list: ListId) {
    let before = store.all_lists().unwrap();

    let list_err = store.add_list("Next").unwrap_err();
    assert!(
        matches!(list_err, StoreError::IdSpaceExhausted { list_id: None }),
        "{backend}: unexpected {list_err}"
    );
    let todo_err = store.add_todo(full_list, "Next").unwrap_err();
    assert!(
        matches!(todo_err, StoreError::IdSpaceExhausted { list_id: Some(id) } if id == full_list),
        "{backend}: unexpected {todo_err}"
    );

    assert_eq!(store.all_lists().unwrap(), before, "{backend}");
}

#[test]
fn exhausted_id_space_is_reported_without_wrapping() {
    let payload = format!(
        r#"{{"lists":[{{"id":{max},"name":"Last","todos":[{{"id":{max},"name":"Final","completed":false}}]}}]}}"#,
        max = i64::MAX
    );
    let mut session = SessionState::from_json(&payload).unwrap();
    let mut session_store = SessionTodoStore::new(&mut session);
    assert_ids_exhausted("session", &mut session_store, i64::MAX);

    let mut sqlite_store = SqliteTodoStore::open_in_memory().unwrap();
    sqlite_store
        .connection()
        .execute(
            "INSERT INTO lists (id, name, next_item_id) VALUES (?1, 'Last', ?1);",
            [i64::MAX],
        )
        .unwrap();
    assert_ids_exhausted("sqlite", &mut sqlite_store, i64::MAX);
}

#[test]
fn ids_up_to_the_last_value_are_still_issued() {
    let payload = format!(
        r#"{{"lists":[{{"id":{},"name":"Almost","todos":[]}}]}}"#,
        i64::MAX - 1
    );
    let mut session = SessionState::from_json(&payload).unwrap();
    let mut store = SessionTodoStore::new(&mut session);

    assert_eq!(store.add_list("Last").unwrap(), i64::MAX);
    assert!(store.add_list("Beyond").is_err());
}
