// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task operations.

use rusqlite::{params, OptionalExtension};
use tracing::info;
use worktrack_core::types::Outcome;
use worktrack_core::WorktrackError;

use crate::database::{map_tr_err, Database};
use crate::models::{Attributes, Task, TaskAssignment};
use crate::queries::{attributes_from_sql, attributes_to_sql, status_from_sql, task_not_found};

const SELECT_TASK: &str = "SELECT k.task_id, k.task_needs, k.created_at,
        w.work_id, w.status, w.completed, t.tool_id
 FROM tasks k
 LEFT JOIN work w ON w.work_id = k.work_id
 LEFT JOIN tools t ON t.work_id = w.work_id";

fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let needs: String = row.get(1)?;
    let work_id: Option<i64> = row.get(3)?;
    let assignment = match work_id {
        Some(work_id) => {
            let status: String = row.get(4)?;
            Some(TaskAssignment {
                work_id,
                status: status_from_sql(4, &status)?,
                completed: row.get(5)?,
                tool_id: row.get(6)?,
            })
        }
        None => None,
    };
    Ok(Task {
        task_id: row.get(0)?,
        task_needs: attributes_from_sql(1, &needs)?,
        created_at: row.get(2)?,
        assignment,
    })
}

pub(crate) fn select_task(
    conn: &rusqlite::Connection,
    task_id: &str,
) -> rusqlite::Result<Option<Task>> {
    conn.query_row(
        &format!("{SELECT_TASK} WHERE k.task_id = ?1"),
        params![task_id],
        task_from_row,
    )
    .optional()
}

fn select_tasks(conn: &rusqlite::Connection, filter: &str) -> rusqlite::Result<Vec<Task>> {
    let mut stmt = conn.prepare(&format!("{SELECT_TASK} {filter} ORDER BY k.rowid"))?;
    let rows = stmt.query_map([], task_from_row)?;
    rows.collect()
}

/// Register a new task.
pub async fn create_task(
    db: &Database,
    task_id: &str,
    needs: &Attributes,
) -> Result<Outcome, WorktrackError> {
    let id = task_id.to_string();
    let needs = needs.clone();
    let inserted = db
        .connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM tasks WHERE task_id = ?1)",
                params![id],
                |row| row.get(0),
            )?;
            if exists {
                return Ok(false);
            }
            conn.execute(
                "INSERT INTO tasks (task_id, task_needs) VALUES (?1, ?2)",
                params![id, attributes_to_sql(&needs)?],
            )?;
            Ok(true)
        })
        .await
        .map_err(map_tr_err)?;

    if !inserted {
        return Err(WorktrackError::AlreadyExists(format!(
            "Task '{task_id}' already exists"
        )));
    }
    info!(task_id, "task created");
    Ok(Outcome::ok(format!("Task {task_id} created successfully")))
}

/// Remove a task.
pub async fn delete_task(db: &Database, task_id: &str) -> Result<Outcome, WorktrackError> {
    let id = task_id.to_string();
    let deleted = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute("DELETE FROM tasks WHERE task_id = ?1", params![id])
        })
        .await
        .map_err(map_tr_err)?;

    if deleted == 0 {
        return Err(task_not_found(task_id));
    }
    info!(task_id, "task deleted");
    Ok(Outcome::ok(format!("Task {task_id} deleted successfully")))
}

/// Remove every task.
pub async fn delete_all_tasks(db: &Database) -> Result<Outcome, WorktrackError> {
    let deleted = db
        .connection()
        .call(|conn| -> Result<usize, rusqlite::Error> { conn.execute("DELETE FROM tasks", []) })
        .await
        .map_err(map_tr_err)?;
    info!(count = deleted, "all tasks deleted");
    Ok(Outcome::ok(format!("{deleted} tasks were deleted")))
}

pub async fn list_tasks(db: &Database) -> Result<Vec<Task>, WorktrackError> {
    db.connection()
        .call(|conn| -> Result<Vec<Task>, rusqlite::Error> { select_tasks(conn, "") })
        .await
        .map_err(map_tr_err)
}

pub async fn get_task(db: &Database, task_id: &str) -> Result<Task, WorktrackError> {
    let id = task_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Task>, rusqlite::Error> { select_task(conn, &id) })
        .await
        .map_err(map_tr_err)?
        .ok_or_else(|| task_not_found(task_id))
}

/// List tasks with no work link.
pub async fn list_available_tasks(db: &Database) -> Result<Vec<Task>, WorktrackError> {
    db.connection()
        .call(|conn| -> Result<Vec<Task>, rusqlite::Error> {
            select_tasks(conn, "WHERE k.work_id IS NULL")
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use worktrack_core::types::WorkStatus;

    use super::*;
    use crate::queries::test_support::{attrs, empty, setup_db};
    use crate::queries::tools::create_tool;
    use crate::queries::work::create_work;

    #[tokio::test]
    async fn create_and_get_task() {
        let (db, _dir) = setup_db().await;
        let outcome = create_task(&db, "Task-10-A-5000", &attrs(json!({"need1": "y"})))
            .await
            .unwrap();
        assert_eq!(outcome.message, "Task Task-10-A-5000 created successfully");

        let task = get_task(&db, "Task-10-A-5000").await.unwrap();
        assert_eq!(task.task_needs, attrs(json!({"need1": "y"})));
        assert!(task.is_available());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_task_is_rejected() {
        let (db, _dir) = setup_db().await;
        create_task(&db, "k1", &empty()).await.unwrap();
        let err = create_task(&db, "k1", &empty()).await.unwrap_err();
        assert!(matches!(err, WorktrackError::AlreadyExists(ref m) if m == "Task 'k1' already exists"));
    }

    #[tokio::test]
    async fn missing_task_is_not_found() {
        let (db, _dir) = setup_db().await;
        assert!(matches!(
            get_task(&db, "ghost").await,
            Err(WorktrackError::NotFound(ref m)) if m == "Task 'ghost' does not exist"
        ));
        assert!(matches!(
            delete_task(&db, "ghost").await,
            Err(WorktrackError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn linked_task_is_not_available() {
        let (db, _dir) = setup_db().await;
        create_tool(&db, "t1", &empty()).await.unwrap();
        create_task(&db, "k1", &empty()).await.unwrap();
        create_task(&db, "k2", &empty()).await.unwrap();
        let work = create_work(&db, "t1", "k1").await.unwrap();

        let available = list_available_tasks(&db).await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].task_id, "k2");

        let task = get_task(&db, "k1").await.unwrap();
        let assignment = task.assignment.expect("task should be assigned");
        assert_eq!(assignment.work_id, work.work_id);
        assert_eq!(assignment.status, WorkStatus::New);
        assert_eq!(assignment.tool_id.as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn delete_one_and_all() {
        let (db, _dir) = setup_db().await;
        create_task(&db, "k1", &empty()).await.unwrap();
        create_task(&db, "k2", &empty()).await.unwrap();

        let outcome = delete_task(&db, "k1").await.unwrap();
        assert_eq!(outcome.message, "Task k1 deleted successfully");

        let outcome = delete_all_tasks(&db).await.unwrap();
        assert_eq!(outcome.message, "1 tasks were deleted");
        assert!(list_tasks(&db).await.unwrap().is_empty());
    }
}
