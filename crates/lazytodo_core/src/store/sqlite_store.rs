//! SQLite-backed (persistent) todo store.
//!
//! # Responsibility
//! - Map the store contract onto the `lists` / `items` tables.
//! - Log every write statement with its parameters.
//!
//! # Invariants
//! - The store owns one connection; dropping the store closes it.
//! - List ids come from `AUTOINCREMENT` and todo ids from
//!   `lists.next_item_id`, so deleted ids are never reissued.
//! - Check-then-mutate sequences run inside one `IMMEDIATE` transaction.
//! - Multi-query reads run inside one read transaction.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{open_db_in_memory, open_location, DbLocation};
use crate::model::todo_list::{ListId, Todo, TodoId, TodoList};
use crate::store::{StoreError, StoreResult, TodoStore};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;
use std::fmt::Debug;

const INSERT_LIST_SQL: &str = "INSERT INTO lists (name) VALUES (?1);";
const DELETE_LIST_SQL: &str = "DELETE FROM lists WHERE id = ?1;";
const DELETE_LIST_ITEMS_SQL: &str = "DELETE FROM items WHERE list_id = ?1;";
const RENAME_LIST_SQL: &str = "UPDATE lists SET name = ?1 WHERE id = ?2;";
const INSERT_ITEM_SQL: &str =
    "INSERT INTO items (id, name, list_id, completed) VALUES (?1, ?2, ?3, 0);";
const BUMP_ITEM_ID_SQL: &str = "UPDATE lists SET next_item_id = ?1 WHERE id = ?2;";
const DELETE_ITEM_SQL: &str = "DELETE FROM items WHERE list_id = ?1 AND id = ?2;";
const MARK_ITEM_SQL: &str = "UPDATE items SET completed = ?1 WHERE list_id = ?2 AND id = ?3;";
const COMPLETE_ALL_SQL: &str = "UPDATE items SET completed = 1 WHERE list_id = ?1;";

/// Todo store holding one migrated SQLite connection.
pub struct SqliteTodoStore {
    conn: Connection,
}

impl SqliteTodoStore {
    /// Wraps a migrated connection after checking its schema.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        ensure_store_connection_ready(&conn)?;
        debug!("event=store_open module=store backend=sqlite status=ok");
        Ok(Self { conn })
    }

    /// Opens (and migrates) the database at `location`.
    pub fn open(location: &DbLocation) -> StoreResult<Self> {
        info!("event=store_open module=store backend=sqlite location={location}");
        Self::try_new(open_location(location)?)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Underlying connection, for inspection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Closes the connection, surfacing any close failure.
    pub fn close(self) -> StoreResult<()> {
        self.conn.close().map_err(|(_, err)| StoreError::from(err))?;
        debug!("event=store_close module=store backend=sqlite status=ok");
        Ok(())
    }

    fn write_tx(&mut self) -> StoreResult<Transaction<'_>> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }
}

impl TodoStore for SqliteTodoStore {
    fn all_lists(&self) -> StoreResult<Vec<TodoList>> {
        let tx = self.conn.unchecked_transaction()?;
        let lists = load_all_lists(&tx)?;
        tx.commit()?;
        Ok(lists)
    }

    fn find_list(&self, id: ListId) -> StoreResult<Option<TodoList>> {
        let tx = self.conn.unchecked_transaction()?;
        let list = load_list(&tx, id)?;
        tx.commit()?;
        Ok(list)
    }

    fn add_list(&mut self, name: &str) -> StoreResult<ListId> {
        let tx = self.write_tx()?;
        // AUTOINCREMENT issues max(sequence, max rowid) + 1.
        let highest: ListId = tx.query_row(
            "SELECT MAX(
                COALESCE((SELECT seq FROM sqlite_sequence WHERE name = 'lists'), 0),
                COALESCE((SELECT MAX(id) FROM lists), 0)
             );",
            [],
            |row| row.get(0),
        )?;
        if highest.checked_add(1).is_none() {
            return Err(StoreError::IdSpaceExhausted { list_id: None });
        }

        log_write(INSERT_LIST_SQL, (name,));
        tx.execute(INSERT_LIST_SQL, [name])?;
        let list_id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(list_id)
    }

    fn delete_list(&mut self, id: ListId) -> StoreResult<()> {
        let tx = self.write_tx()?;
        ensure_list_exists(&tx, id)?;

        // Cascade explicitly; connections opened elsewhere may lack foreign_keys=ON.
        log_write(DELETE_LIST_ITEMS_SQL, (id,));
        tx.execute(DELETE_LIST_ITEMS_SQL, [id])?;
        log_write(DELETE_LIST_SQL, (id,));
        tx.execute(DELETE_LIST_SQL, [id])?;

        tx.commit()?;
        Ok(())
    }

    fn rename_list(&mut self, id: ListId, new_name: &str) -> StoreResult<()> {
        log_write(RENAME_LIST_SQL, (new_name, id));
        let changed = self.conn.execute(RENAME_LIST_SQL, params![new_name, id])?;
        if changed == 0 {
            return Err(StoreError::ListNotFound(id));
        }
        Ok(())
    }

    fn add_todo(&mut self, list_id: ListId, text: &str) -> StoreResult<TodoId> {
        let tx = self.write_tx()?;
        let todo_id: TodoId = tx
            .query_row(
                "SELECT next_item_id FROM lists WHERE id = ?1;",
                [list_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(StoreError::ListNotFound(list_id))?;
        let next_item_id = todo_id
            .checked_add(1)
            .ok_or(StoreError::IdSpaceExhausted {
                list_id: Some(list_id),
            })?;

        log_write(INSERT_ITEM_SQL, (todo_id, text, list_id));
        tx.execute(INSERT_ITEM_SQL, params![todo_id, text, list_id])?;
        log_write(BUMP_ITEM_ID_SQL, (next_item_id, list_id));
        tx.execute(BUMP_ITEM_ID_SQL, params![next_item_id, list_id])?;
        tx.commit()?;

        Ok(todo_id)
    }

    fn delete_todo(&mut self, list_id: ListId, todo_id: TodoId) -> StoreResult<()> {
        let tx = self.write_tx()?;
        ensure_list_exists(&tx, list_id)?;

        log_write(DELETE_ITEM_SQL, (list_id, todo_id));
        let changed = tx.execute(DELETE_ITEM_SQL, [list_id, todo_id])?;
        if changed == 0 {
            return Err(StoreError::TodoNotFound { list_id, todo_id });
        }

        tx.commit()?;
        Ok(())
    }

    fn set_todo_completed(
        &mut self,
        list_id: ListId,
        todo_id: TodoId,
        completed: bool,
    ) -> StoreResult<()> {
        let tx = self.write_tx()?;
        ensure_list_exists(&tx, list_id)?;

        log_write(MARK_ITEM_SQL, (completed, list_id, todo_id));
        let changed = tx.execute(
            MARK_ITEM_SQL,
            params![bool_to_int(completed), list_id, todo_id],
        )?;
        if changed == 0 {
            return Err(StoreError::TodoNotFound { list_id, todo_id });
        }

        tx.commit()?;
        Ok(())
    }

    fn complete_all_todos(&mut self, list_id: ListId) -> StoreResult<()> {
        let tx = self.write_tx()?;
        ensure_list_exists(&tx, list_id)?;

        log_write(COMPLETE_ALL_SQL, (list_id,));
        tx.execute(COMPLETE_ALL_SQL, [list_id])?;

        tx.commit()?;
        Ok(())
    }
}

fn log_write(sql: &str, params: impl Debug) {
    debug!("event=db_write module=store sql=\"{sql}\" params={params:?}");
}

fn load_all_lists(conn: &Connection) -> StoreResult<Vec<TodoList>> {
    let mut stmt = conn.prepare("SELECT id, name FROM lists ORDER BY id ASC;")?;
    let mut rows = stmt.query([])?;
    let mut lists = Vec::new();
    while let Some(row) = rows.next()? {
        lists.push(parse_list_row(row)?);
    }

    let mut stmt = conn.prepare(
        "SELECT id, name, list_id, completed
         FROM items
         ORDER BY list_id ASC, id ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut todos_by_list: HashMap<ListId, Vec<Todo>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let list_id: ListId = row.get("list_id")?;
        todos_by_list
            .entry(list_id)
            .or_default()
            .push(parse_item_row(row)?);
    }

    for list in &mut lists {
        list.todos = todos_by_list.remove(&list.id).unwrap_or_default();
    }

    Ok(lists)
}

fn load_list(conn: &Connection, id: ListId) -> StoreResult<Option<TodoList>> {
    let list = conn
        .query_row("SELECT id, name FROM lists WHERE id = ?1;", [id], |row| {
            Ok((row.get::<_, ListId>("id")?, row.get::<_, String>("name")?))
        })
        .optional()?;

    let Some((list_id, name)) = list else {
        return Ok(None);
    };

    let mut list = TodoList::new(list_id, name);
    list.todos = load_items(conn, list_id)?;
    Ok(Some(list))
}

fn load_items(conn: &Connection, list_id: ListId) -> StoreResult<Vec<Todo>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, completed
         FROM items
         WHERE list_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([list_id])?;
    let mut todos = Vec::new();
    while let Some(row) = rows.next()? {
        todos.push(parse_item_row(row)?);
    }
    Ok(todos)
}

fn ensure_list_exists(tx: &Transaction<'_>, list_id: ListId) -> StoreResult<()> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM lists WHERE id = ?1);",
        [list_id],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(StoreError::ListNotFound(list_id))
    }
}

fn parse_list_row(row: &Row<'_>) -> StoreResult<TodoList> {
    Ok(TodoList::new(row.get("id")?, row.get::<_, String>("name")?))
}

fn parse_item_row(row: &Row<'_>) -> StoreResult<Todo> {
    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid completed value `{other}` in items.completed"
            )));
        }
    };

    Ok(Todo {
        id: row.get("id")?,
        name: row.get("name")?,
        completed,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_store_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let required: [(&'static str, &[&'static str]); 2] = [
        ("lists", &["id", "name", "next_item_id"]),
        ("items", &["id", "name", "list_id", "completed"]),
    ];
    for (table, columns) in required {
        if !table_exists(conn, table)? {
            return Err(StoreError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(StoreError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
