// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Work lifecycle operations: creation, listing, and finalization.
//!
//! Finalization runs as a single transaction: the terminal report, status
//! change, tool/task release, archive snapshot, and removal of the work row
//! either all happen or none do.

use rusqlite::{params, OptionalExtension};
use tracing::{debug, info};
use worktrack_core::types::Outcome;
use worktrack_core::WorktrackError;

use crate::database::{map_tr_err, Database};
use crate::models::{Archive, ArchivedReport, Attributes, Work, WorkDetail, WorkFilter, WorkStatus};
use crate::queries::{
    archive, now_timestamp, optional_attributes_from_sql, reports, status_from_sql,
    task_not_found, tool_not_found, work_not_found,
};

const SELECT_WORK: &str = "SELECT w.work_id, w.status, w.completed, w.created_at,
        t.tool_id, k.task_id, t.tool_skills, k.task_needs
 FROM work w
 LEFT JOIN tools t ON t.work_id = w.work_id
 LEFT JOIN tasks k ON k.work_id = w.work_id";

fn detail_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<WorkDetail> {
    let status: String = row.get(1)?;
    Ok(WorkDetail {
        work: Work {
            work_id: row.get(0)?,
            status: status_from_sql(1, &status)?,
            completed: row.get(2)?,
            created_at: row.get(3)?,
            tool_id: row.get(4)?,
            task_id: row.get(5)?,
        },
        tool_skills: optional_attributes_from_sql(6, row.get(6)?)?,
        task_needs: optional_attributes_from_sql(7, row.get(7)?)?,
    })
}

/// Load one work item with linked tool skills and task needs.
pub(crate) fn select_work_detail(
    conn: &rusqlite::Connection,
    work_id: i64,
) -> rusqlite::Result<Option<WorkDetail>> {
    conn.query_row(
        &format!("{SELECT_WORK} WHERE w.work_id = ?1"),
        params![work_id],
        detail_from_row,
    )
    .optional()
}

fn filter_clause(filter: WorkFilter) -> &'static str {
    match filter {
        WorkFilter::All => "",
        WorkFilter::Completed => "WHERE w.completed = 1",
        WorkFilter::Succeeded => "WHERE w.status = 'succeeded'",
        WorkFilter::Failed => "WHERE w.status = 'failed'",
    }
}

fn exists(conn: &rusqlite::Connection, table: &str, key: &str, id: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE {key} = ?1)"),
        params![id],
        |row| row.get(0),
    )
}

enum Created {
    Work(Work),
    MissingTool,
    MissingTask,
}

/// Create a work item linking a tool to a task.
///
/// Availability is not checked: a tool or task already linked elsewhere is
/// re-linked to the new work item.
pub async fn create_work(
    db: &Database,
    tool_id: &str,
    task_id: &str,
) -> Result<Work, WorktrackError> {
    let tool = tool_id.to_string();
    let task = task_id.to_string();
    let created = db
        .connection()
        .call(move |conn| -> Result<Created, rusqlite::Error> {
            let tx = conn.transaction()?;
            if !exists(&tx, "tools", "tool_id", &tool)? {
                return Ok(Created::MissingTool);
            }
            if !exists(&tx, "tasks", "task_id", &task)? {
                return Ok(Created::MissingTask);
            }

            tx.execute("INSERT INTO work DEFAULT VALUES", [])?;
            let work_id = tx.last_insert_rowid();
            tx.execute(
                "UPDATE tools SET work_id = ?1 WHERE tool_id = ?2",
                params![work_id, tool],
            )?;
            tx.execute(
                "UPDATE tasks SET work_id = ?1 WHERE task_id = ?2",
                params![work_id, task],
            )?;
            let detail = tx.query_row(
                &format!("{SELECT_WORK} WHERE w.work_id = ?1"),
                params![work_id],
                detail_from_row,
            )?;
            tx.commit()?;
            Ok(Created::Work(detail.work))
        })
        .await
        .map_err(map_tr_err)?;

    match created {
        Created::Work(work) => {
            info!(work_id = work.work_id, tool_id, task_id, "work created");
            Ok(work)
        }
        Created::MissingTool => Err(tool_not_found(tool_id)),
        Created::MissingTask => Err(task_not_found(task_id)),
    }
}

/// Finish a work item and move it into the archive.
///
/// On success the task is deleted; on failure it is released so it can be
/// assigned again. The tool is released and must be marked ready again.
pub async fn finalize_work(
    db: &Database,
    work_id: i64,
    succeeded: bool,
    details: &Attributes,
) -> Result<Outcome, WorktrackError> {
    let details = details.clone();
    let status = if succeeded {
        WorkStatus::Succeeded
    } else {
        WorkStatus::Failed
    };
    let archived_at = now_timestamp();

    let archived = db
        .connection()
        .call(move |conn| -> Result<Option<usize>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let Some(detail) = select_work_detail(&tx, work_id)? else {
                return Ok(None);
            };

            reports::insert_report(&tx, work_id, status, &details)?;
            tx.execute(
                "UPDATE work SET status = ?1, completed = 1 WHERE work_id = ?2",
                params![status.to_string(), work_id],
            )?;

            tx.execute(
                "UPDATE tools SET work_id = NULL, ready_since = NULL WHERE work_id = ?1",
                params![work_id],
            )?;
            if succeeded {
                tx.execute("DELETE FROM tasks WHERE work_id = ?1", params![work_id])?;
            } else {
                tx.execute(
                    "UPDATE tasks SET work_id = NULL WHERE work_id = ?1",
                    params![work_id],
                )?;
            }

            let history: Vec<ArchivedReport> = reports::select_reports(&tx, work_id)?
                .into_iter()
                .map(ArchivedReport::from)
                .collect();
            let report_count = history.len();

            tx.execute(
                "DELETE FROM work_reports WHERE work_id = ?1",
                params![work_id],
            )?;
            tx.execute("DELETE FROM work WHERE work_id = ?1", params![work_id])?;

            archive::insert_archive(
                &tx,
                &Archive {
                    work_id,
                    status,
                    tool_id: detail.work.tool_id,
                    task_id: detail.work.task_id,
                    tool_skills: detail.tool_skills,
                    task_needs: detail.task_needs,
                    reports: history,
                    created_at: detail.work.created_at,
                    archived_at,
                },
            )?;
            tx.commit()?;
            Ok(Some(report_count))
        })
        .await
        .map_err(map_tr_err)?;

    let report_count = archived.ok_or_else(|| work_not_found(work_id))?;
    info!(work_id, %status, report_count, "work finalized and archived");
    Ok(Outcome::ok(format!(
        "Work item {work_id} completed and archived successfully"
    )))
}

/// List active work items, oldest first.
pub async fn list_work(db: &Database, filter: WorkFilter) -> Result<Vec<Work>, WorktrackError> {
    debug!(?filter, "listing work");
    db.connection()
        .call(move |conn| -> Result<Vec<Work>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_WORK} {} ORDER BY w.work_id",
                filter_clause(filter)
            ))?;
            let rows = stmt.query_map([], |row| detail_from_row(row).map(|d| d.work))?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_work(db: &Database, work_id: i64) -> Result<WorkDetail, WorktrackError> {
    db.connection()
        .call(move |conn| -> Result<Option<WorkDetail>, rusqlite::Error> {
            select_work_detail(conn, work_id)
        })
        .await
        .map_err(map_tr_err)?
        .ok_or_else(|| work_not_found(work_id))
}

/// Single-item deletion is not offered; work leaves the table by finalizing.
pub async fn delete_work(_db: &Database, work_id: i64) -> Result<Outcome, WorktrackError> {
    debug!(work_id, "delete_work requested");
    Ok(Outcome::failed("Not implemented yet"))
}

/// Remove every active work item.
///
/// Reports cascade; tool and task links are cleared by the schema.
pub async fn delete_all_work(db: &Database) -> Result<Outcome, WorktrackError> {
    let deleted = db
        .connection()
        .call(|conn| -> Result<usize, rusqlite::Error> { conn.execute("DELETE FROM work", []) })
        .await
        .map_err(map_tr_err)?;

    if deleted == 0 {
        return Ok(Outcome::failed("No work items found"));
    }
    info!(count = deleted, "all work deleted");
    Ok(Outcome::ok(format!("{deleted} work items were deleted")))
}
