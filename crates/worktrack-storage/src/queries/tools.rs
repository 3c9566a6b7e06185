// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool operations.
//!
//! Tool reads resolve the current assignment through `work` and the task
//! linked to the same work item.

use rusqlite::{params, OptionalExtension};
use tracing::info;
use worktrack_core::types::{Outcome, WorkStatus};
use worktrack_core::WorktrackError;

use crate::database::{map_tr_err, Database};
use crate::models::{Attributes, Tool, ToolAssignment, WorkDetail};
use crate::queries::{
    attributes_from_sql, attributes_to_sql, now_timestamp, status_from_sql, tool_not_found, work,
};

const SELECT_TOOL: &str = "SELECT t.tool_id, t.tool_skills, t.enabled, t.ready_since, t.created_at,
        w.work_id, w.status, w.completed, k.task_id
 FROM tools t
 LEFT JOIN work w ON w.work_id = t.work_id
 LEFT JOIN tasks k ON k.work_id = w.work_id";

fn tool_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Tool> {
    let skills: String = row.get(1)?;
    let work_id: Option<i64> = row.get(5)?;
    let assignment = match work_id {
        Some(work_id) => {
            let status: String = row.get(6)?;
            Some(ToolAssignment {
                work_id,
                status: status_from_sql(6, &status)?,
                completed: row.get(7)?,
                task_id: row.get(8)?,
            })
        }
        None => None,
    };
    Ok(Tool {
        tool_id: row.get(0)?,
        tool_skills: attributes_from_sql(1, &skills)?,
        enabled: row.get(2)?,
        ready_since: row.get(3)?,
        created_at: row.get(4)?,
        assignment,
    })
}

/// Load one tool with its assignment view.
pub(crate) fn select_tool(
    conn: &rusqlite::Connection,
    tool_id: &str,
) -> rusqlite::Result<Option<Tool>> {
    conn.query_row(
        &format!("{SELECT_TOOL} WHERE t.tool_id = ?1"),
        params![tool_id],
        tool_from_row,
    )
    .optional()
}

fn select_tools(conn: &rusqlite::Connection, filter: &str) -> rusqlite::Result<Vec<Tool>> {
    let mut stmt = conn.prepare(&format!("{SELECT_TOOL} {filter} ORDER BY t.rowid"))?;
    let rows = stmt.query_map([], tool_from_row)?;
    rows.collect()
}

/// Register a new tool. Tools start enabled and not ready.
pub async fn create_tool(
    db: &Database,
    tool_id: &str,
    skills: &Attributes,
) -> Result<Outcome, WorktrackError> {
    let id = tool_id.to_string();
    let skills = skills.clone();
    let inserted = db
        .connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM tools WHERE tool_id = ?1)",
                params![id],
                |row| row.get(0),
            )?;
            if exists {
                return Ok(false);
            }
            conn.execute(
                "INSERT INTO tools (tool_id, tool_skills) VALUES (?1, ?2)",
                params![id, attributes_to_sql(&skills)?],
            )?;
            Ok(true)
        })
        .await
        .map_err(map_tr_err)?;

    if !inserted {
        return Err(WorktrackError::AlreadyExists(format!(
            "Tool '{tool_id}' already exists"
        )));
    }
    info!(tool_id, "tool created");
    Ok(Outcome::ok(format!("Tool {tool_id} created successfully")))
}

/// Mark a tool ready to accept work.
///
/// Refused with a soft failure while the tool is linked to work that has
/// progressed past `new`.
pub async fn mark_tool_ready(db: &Database, tool_id: &str) -> Result<Outcome, WorktrackError> {
    let id = tool_id.to_string();
    let ready_since = now_timestamp();
    let result = db
        .connection()
        .call(move |conn| -> Result<Option<Option<i64>>, rusqlite::Error> {
            let Some(tool) = select_tool(conn, &id)? else {
                return Ok(None);
            };
            if let Some(assignment) = &tool.assignment {
                if assignment.status != WorkStatus::New {
                    return Ok(Some(Some(assignment.work_id)));
                }
            }
            conn.execute(
                "UPDATE tools SET ready_since = ?1 WHERE tool_id = ?2",
                params![ready_since, id],
            )?;
            Ok(Some(None))
        })
        .await
        .map_err(map_tr_err)?;

    match result {
        None => Err(tool_not_found(tool_id)),
        Some(Some(work_id)) => Ok(Outcome::failed(format!(
            "Tool '{tool_id}' is assigned to active work item '{work_id}'"
        ))),
        Some(None) => {
            info!(tool_id, "tool marked ready");
            Ok(Outcome::ok(format!("Tool {tool_id} is set as ready")))
        }
    }
}

/// Enable or disable a tool.
pub async fn set_tool_enabled(
    db: &Database,
    tool_id: &str,
    enabled: bool,
) -> Result<Outcome, WorktrackError> {
    let id = tool_id.to_string();
    let changed = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE tools SET enabled = ?1 WHERE tool_id = ?2",
                params![enabled, id],
            )
        })
        .await
        .map_err(map_tr_err)?;

    if changed == 0 {
        return Err(tool_not_found(tool_id));
    }
    let state = if enabled { "enabled" } else { "disabled" };
    info!(tool_id, enabled, "tool enablement changed");
    Ok(Outcome::ok(format!("Tool {tool_id} is {state}")))
}

/// Remove a tool. Linked work keeps running without a tool.
pub async fn delete_tool(db: &Database, tool_id: &str) -> Result<Outcome, WorktrackError> {
    let id = tool_id.to_string();
    let deleted = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute("DELETE FROM tools WHERE tool_id = ?1", params![id])
        })
        .await
        .map_err(map_tr_err)?;

    if deleted == 0 {
        return Err(tool_not_found(tool_id));
    }
    info!(tool_id, "tool deleted");
    Ok(Outcome::ok(format!("Tool {tool_id} deleted successfully")))
}

/// Remove every tool.
pub async fn delete_all_tools(db: &Database) -> Result<Outcome, WorktrackError> {
    let deleted = db
        .connection()
        .call(|conn| -> Result<usize, rusqlite::Error> { conn.execute("DELETE FROM tools", []) })
        .await
        .map_err(map_tr_err)?;
    info!(count = deleted, "all tools deleted");
    Ok(Outcome::ok(format!("{deleted} tools were deleted")))
}

/// List all tools in registration order.
pub async fn list_tools(db: &Database) -> Result<Vec<Tool>, WorktrackError> {
    db.connection()
        .call(|conn| -> Result<Vec<Tool>, rusqlite::Error> { select_tools(conn, "") })
        .await
        .map_err(map_tr_err)
}

/// Get a tool by id.
pub async fn get_tool(db: &Database, tool_id: &str) -> Result<Tool, WorktrackError> {
    let id = tool_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Tool>, rusqlite::Error> { select_tool(conn, &id) })
        .await
        .map_err(map_tr_err)?
        .ok_or_else(|| tool_not_found(tool_id))
}

/// List tools with no work link that have been marked ready.
pub async fn list_available_tools(db: &Database) -> Result<Vec<Tool>, WorktrackError> {
    db.connection()
        .call(|conn| -> Result<Vec<Tool>, rusqlite::Error> {
            select_tools(
                conn,
                "WHERE t.work_id IS NULL AND t.ready_since IS NOT NULL",
            )
        })
        .await
        .map_err(map_tr_err)
}

/// The work item a tool is linked to, if any.
pub async fn get_work_for_tool(
    db: &Database,
    tool_id: &str,
) -> Result<Option<WorkDetail>, WorktrackError> {
    let id = tool_id.to_string();
    let found = db
        .connection()
        .call(
            move |conn| -> Result<Option<Option<WorkDetail>>, rusqlite::Error> {
                let Some(tool) = select_tool(conn, &id)? else {
                    return Ok(None);
                };
                match tool.work_id() {
                    Some(work_id) => Ok(Some(work::select_work_detail(conn, work_id)?)),
                    None => Ok(Some(None)),
                }
            },
        )
        .await
        .map_err(map_tr_err)?;
    found.ok_or_else(|| tool_not_found(tool_id))
}
