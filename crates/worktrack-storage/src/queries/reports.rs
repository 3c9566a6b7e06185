// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Work report operations.

use rusqlite::params;
use tracing::info;
use worktrack_core::types::Outcome;
use worktrack_core::WorktrackError;

use crate::database::{map_tr_err, Database};
use crate::models::{Attributes, Report, WorkStatus};
use crate::queries::{attributes_from_sql, attributes_to_sql, status_from_sql, work_not_found};

/// Insert a report row and return its id.
pub(crate) fn insert_report(
    conn: &rusqlite::Connection,
    work_id: i64,
    status: WorkStatus,
    details: &Attributes,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO work_reports (work_id, status, details) VALUES (?1, ?2, ?3)",
        params![work_id, status.to_string(), attributes_to_sql(details)?],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Reports for a work item in submission order.
pub(crate) fn select_reports(
    conn: &rusqlite::Connection,
    work_id: i64,
) -> rusqlite::Result<Vec<Report>> {
    let mut stmt = conn.prepare(
        "SELECT id, work_id, status, details, created_at
         FROM work_reports WHERE work_id = ?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![work_id], |row| {
        let status: String = row.get(2)?;
        let details: String = row.get(3)?;
        Ok(Report {
            id: row.get(0)?,
            work_id: row.get(1)?,
            status: status_from_sql(2, &status)?,
            details: attributes_from_sql(3, &details)?,
            created_at: row.get(4)?,
        })
    })?;
    rows.collect()
}

/// Attach a progress report to a work item and move the work to its status.
///
/// A terminal status marks the work completed but does not archive it.
pub async fn submit_report(
    db: &Database,
    work_id: i64,
    status: WorkStatus,
    details: &Attributes,
) -> Result<Outcome, WorktrackError> {
    let details = details.clone();
    let report_id = db
        .connection()
        .call(move |conn| -> Result<Option<i64>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM work WHERE work_id = ?1)",
                params![work_id],
                |row| row.get(0),
            )?;
            if !exists {
                return Ok(None);
            }
            let report_id = insert_report(&tx, work_id, status, &details)?;
            tx.execute(
                "UPDATE work SET status = ?1,
                    completed = CASE WHEN ?2 THEN 1 ELSE completed END
                 WHERE work_id = ?3",
                params![status.to_string(), status.is_terminal(), work_id],
            )?;
            tx.commit()?;
            Ok(Some(report_id))
        })
        .await
        .map_err(map_tr_err)?;

    let report_id = report_id.ok_or_else(|| work_not_found(work_id))?;
    info!(work_id, report_id, %status, "report submitted");
    Ok(Outcome::ok(format!(
        "Report {report_id} created successfully for work {work_id}"
    )))
}

/// Reports for a work item. Unknown work ids yield an empty list.
pub async fn list_reports(db: &Database, work_id: i64) -> Result<Vec<Report>, WorktrackError> {
    db.connection()
        .call(move |conn| -> Result<Vec<Report>, rusqlite::Error> {
            select_reports(conn, work_id)
        })
        .await
        .map_err(map_tr_err)
}

/// Remove every report of every work item.
pub async fn delete_all_reports(db: &Database) -> Result<Outcome, WorktrackError> {
    let deleted = db
        .connection()
        .call(|conn| -> Result<usize, rusqlite::Error> {
            conn.execute("DELETE FROM work_reports", [])
        })
        .await
        .map_err(map_tr_err)?;

    if deleted == 0 {
        return Ok(Outcome::failed("No reports found"));
    }
    info!(count = deleted, "all reports deleted");
    Ok(Outcome::ok(format!("{deleted} reports were deleted")))
}
