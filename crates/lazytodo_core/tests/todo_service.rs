use lazytodo_core::{
    SessionState, SessionTodoStore, SqliteTodoStore, StoreError, TodoService, TodoServiceError,
    ValidationErrorKind,
};

fn sqlite_service() -> TodoService<SqliteTodoStore> {
    TodoService::new(SqliteTodoStore::open_in_memory().unwrap())
}

#[test]
fn create_list_trims_and_rejects_duplicates() {
    let mut service = sqlite_service();

    let id = service.create_list("  Groceries  ").unwrap();
    assert_eq!(service.load_list(id).unwrap().name, "Groceries");

    let err = service.create_list("Groceries").unwrap_err();
    assert!(matches!(
        err,
        TodoServiceError::Validation(ref v) if v.kind() == ValidationErrorKind::Uniqueness
    ));
    assert_eq!(service.lists().unwrap().len(), 1);
}

#[test]
fn create_list_rejects_blank_name_without_writing() {
    let mut service = sqlite_service();

    let err = service.create_list("   ").unwrap_err();
    assert!(matches!(
        err,
        TodoServiceError::Validation(ref v) if v.kind() == ValidationErrorKind::Length
    ));
    assert!(service.lists().unwrap().is_empty());
}

#[test]
fn rename_list_allows_keeping_its_own_name_but_not_anothers() {
    let mut service = sqlite_service();
    let work = service.create_list("Work").unwrap();
    service.create_list("Home").unwrap();

    service.rename_list(work, "Work").unwrap();
    let err = service.rename_list(work, "Home").unwrap_err();
    assert!(matches!(err, TodoServiceError::Validation(_)));

    service.rename_list(work, "Office").unwrap();
    assert_eq!(service.load_list(work).unwrap().name, "Office");
}

#[test]
fn missing_list_surfaces_user_facing_not_found() {
    let mut service = sqlite_service();

    let err = service.load_list(3).unwrap_err();
    assert!(matches!(err, TodoServiceError::ListNotFound(3)));
    assert_eq!(err.to_string(), "The specified list was not found.");

    assert!(matches!(
        service.add_todo(3, "Milk"),
        Err(TodoServiceError::ListNotFound(3))
    ));
    assert!(matches!(
        service.rename_list(3, "Anything"),
        Err(TodoServiceError::ListNotFound(3))
    ));
    assert!(matches!(
        service.delete_list(3),
        Err(TodoServiceError::ListNotFound(3))
    ));
}

#[test]
fn add_todo_validates_text() {
    let mut service = sqlite_service();
    let id = service.create_list("Groceries").unwrap();

    let err = service.add_todo(id, &"x".repeat(101)).unwrap_err();
    assert!(matches!(err, TodoServiceError::Validation(_)));
    assert!(service.load_list(id).unwrap().todos.is_empty());

    assert_eq!(service.add_todo(id, " Milk ").unwrap(), 1);
    assert_eq!(service.load_list(id).unwrap().todos[0].name, "Milk");
}

#[test]
fn missing_todo_surfaces_todo_not_found() {
    let mut service = sqlite_service();
    let id = service.create_list("Groceries").unwrap();

    let err = service.set_todo_completed(id, 4, true).unwrap_err();
    assert!(matches!(
        err,
        TodoServiceError::TodoNotFound { todo_id: 4, .. }
    ));
}

#[test]
fn views_are_ordered_incomplete_first() {
    let mut session = SessionState::new();
    let mut service = TodoService::new(SessionTodoStore::new(&mut session));

    let done = service.create_list("Done").unwrap();
    service.add_todo(done, "finished").unwrap();
    service.complete_all_todos(done).unwrap();
    let open = service.create_list("Open").unwrap();
    let first = service.add_todo(open, "first").unwrap();
    service.add_todo(open, "second").unwrap();
    service.set_todo_completed(open, first, true).unwrap();

    let names: Vec<_> = service
        .list_summaries()
        .unwrap()
        .into_iter()
        .map(|summary| (summary.name, summary.undone, summary.complete))
        .collect();
    assert_eq!(
        names,
        [
            ("Open".to_string(), 1, false),
            ("Done".to_string(), 0, true)
        ]
    );

    let todos: Vec<_> = service
        .load_list(open)
        .unwrap()
        .todos
        .into_iter()
        .map(|todo| todo.name)
        .collect();
    assert_eq!(todos, ["second", "first"]);
}

#[test]
fn delete_todo_and_list_through_service() {
    let mut service = sqlite_service();
    let id = service.create_list("Temp").unwrap();
    let todo = service.add_todo(id, "gone soon").unwrap();

    service.delete_todo(id, todo).unwrap();
    assert!(service.load_list(id).unwrap().todos.is_empty());

    service.delete_list(id).unwrap();
    assert!(service.lists().unwrap().is_empty());
}

#[test]
fn listing_failures_come_back_as_service_errors() {
    let store = SqliteTodoStore::open_in_memory().unwrap();
    store
        .connection()
        .execute_batch(
            "PRAGMA ignore_check_constraints = ON;
             INSERT INTO lists (id, name) VALUES (1, 'Broken');
             INSERT INTO items (id, name, list_id, completed) VALUES (1, 'bad', 1, 9);",
        )
        .unwrap();
    let service = TodoService::new(store);

    let lists_err: TodoServiceError = service.lists().unwrap_err();
    assert!(matches!(
        lists_err,
        TodoServiceError::Store(StoreError::InvalidData(_))
    ));
    let summaries_err: TodoServiceError = service.list_summaries().unwrap_err();
    assert!(matches!(
        summaries_err,
        TodoServiceError::Store(StoreError::InvalidData(_))
    ));
}

#[test]
fn exhausted_todo_ids_surface_as_store_errors() {
    let mut service = sqlite_service();
    let id = service.create_list("Full").unwrap();
    let store = service.into_store();
    store
        .connection()
        .execute(
            "UPDATE lists SET next_item_id = ?1 WHERE id = ?2;",
            [i64::MAX, id],
        )
        .unwrap();
    let mut service = TodoService::new(store);

    let err = service.add_todo(id, "Overflow").unwrap_err();
    assert!(matches!(
        err,
        TodoServiceError::Store(StoreError::IdSpaceExhausted { list_id: Some(_) })
    ));
    assert!(service.load_list(id).unwrap().todos.is_empty());
}
