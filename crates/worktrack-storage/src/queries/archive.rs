// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Work archive operations.
//!
//! Archive rows are written once, by work finalization, and are otherwise
//! read-only until deleted.

use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension};
use tracing::info;
use worktrack_core::types::Outcome;
use worktrack_core::WorktrackError;

use crate::database::{map_tr_err, Database};
use crate::models::{Archive, ArchivedReport};
use crate::queries::{
    attributes_to_sql, optional_attributes_from_sql, status_from_sql, work_not_found,
};

const SELECT_ARCHIVE: &str = "SELECT work_id, status, tool_id, task_id, tool_skills, task_needs,
        reports, created_at, archived_at
 FROM work_archive";

fn archive_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Archive> {
    let status: String = row.get(1)?;
    let reports: String = row.get(6)?;
    let reports: Vec<ArchivedReport> = serde_json::from_str(&reports)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;
    Ok(Archive {
        work_id: row.get(0)?,
        status: status_from_sql(1, &status)?,
        tool_id: row.get(2)?,
        task_id: row.get(3)?,
        tool_skills: optional_attributes_from_sql(4, row.get(4)?)?,
        task_needs: optional_attributes_from_sql(5, row.get(5)?)?,
        reports,
        created_at: row.get(7)?,
        archived_at: row.get(8)?,
    })
}

/// Write an archive snapshot.
pub(crate) fn insert_archive(
    conn: &rusqlite::Connection,
    archive: &Archive,
) -> rusqlite::Result<()> {
    let reports = serde_json::to_string(&archive.reports)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    let tool_skills = archive
        .tool_skills
        .as_ref()
        .map(attributes_to_sql)
        .transpose()?;
    let task_needs = archive
        .task_needs
        .as_ref()
        .map(attributes_to_sql)
        .transpose()?;
    conn.execute(
        "INSERT INTO work_archive
            (work_id, status, tool_id, task_id, tool_skills, task_needs, reports, created_at, archived_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            archive.work_id,
            archive.status.to_string(),
            archive.tool_id,
            archive.task_id,
            tool_skills,
            task_needs,
            reports,
            archive.created_at,
            archive.archived_at,
        ],
    )?;
    Ok(())
}

/// All archived work, oldest archival first.
pub async fn list_archives(db: &Database) -> Result<Vec<Archive>, WorktrackError> {
    db.connection()
        .call(|conn| -> Result<Vec<Archive>, rusqlite::Error> {
            let mut stmt =
                conn.prepare(&format!("{SELECT_ARCHIVE} ORDER BY archived_at, work_id"))?;
            let rows = stmt.query_map([], archive_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Archived work by original work id. Absence is not an error.
pub async fn get_archive(db: &Database, work_id: i64) -> Result<Option<Archive>, WorktrackError> {
    db.connection()
        .call(move |conn| -> Result<Option<Archive>, rusqlite::Error> {
            conn.query_row(
                &format!("{SELECT_ARCHIVE} WHERE work_id = ?1"),
                params![work_id],
                archive_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn delete_archive(db: &Database, work_id: i64) -> Result<Outcome, WorktrackError> {
    let deleted = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "DELETE FROM work_archive WHERE work_id = ?1",
                params![work_id],
            )
        })
        .await
        .map_err(map_tr_err)?;

    if deleted == 0 {
        return Err(work_not_found(work_id));
    }
    info!(work_id, "archived work deleted");
    Ok(Outcome::ok(format!(
        "Archived work {work_id} deleted successfully"
    )))
}

/// Remove the whole archive. An empty archive still reports success.
pub async fn delete_all_archives(db: &Database) -> Result<Outcome, WorktrackError> {
    let deleted = db
        .connection()
        .call(|conn| -> Result<usize, rusqlite::Error> {
            conn.execute("DELETE FROM work_archive", [])
        })
        .await
        .map_err(map_tr_err)?;

    if deleted == 0 {
        return Ok(Outcome::ok("No archived work items found"));
    }
    info!(count = deleted, "archive cleared");
    Ok(Outcome::ok(format!(
        "{deleted} archived work items were deleted"
    )))
}
