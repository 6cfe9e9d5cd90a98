//! Issue cache operations
//!
//! The cache is keyed by (project, issue number). Writes are upserts: a
//! second write for the same pair overwrites the row in place and refreshes
//! `cached_at`.

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_timestamp, CachedIssue, IssueRow, Store, StoreError, StoreResult};

const ISSUE_COLUMNS: &str =
    "id, project_id, issue_number, title, type, priority, status, cached_at";

impl Store {
    /// Insert or refresh a cached issue
    pub fn cache_issue(&self, issue: &IssueRow) -> StoreResult<()> {
        self.conn()?.execute(
            r#"
            INSERT INTO issue_cache (project_id, issue_number, title, type, priority, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(project_id, issue_number) DO UPDATE SET
                title = excluded.title,
                type = excluded.type,
                priority = excluded.priority,
                status = excluded.status,
                cached_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
            "#,
            params![
                issue.project_id,
                issue.issue_number,
                issue.title,
                issue.issue_type,
                issue.priority,
                issue.status,
            ],
        )?;
        Ok(())
    }

    /// Get a cached issue by project and issue number
    pub fn get_cached_issue(&self, project_id: &str, issue_number: i64) -> StoreResult<CachedIssue> {
        self.conn()?
            .query_row(
                &format!(
                    "SELECT {ISSUE_COLUMNS} FROM issue_cache WHERE project_id = ?1 AND issue_number = ?2"
                ),
                params![project_id, issue_number],
                row_to_issue,
            )
            .optional()?
            .ok_or_else(|| StoreError::not_found("cached issue", format!("{project_id}#{issue_number}")))
    }

    /// List the cached issues of one project by issue number
    pub fn list_issue_cache(&self, project_id: &str) -> StoreResult<Vec<CachedIssue>> {
        let mut stmt = self.conn()?.prepare(&format!(
            "SELECT {ISSUE_COLUMNS} FROM issue_cache WHERE project_id = ?1 ORDER BY issue_number"
        ))?;

        let issues = stmt
            .query_map(params![project_id], row_to_issue)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(issues)
    }

    /// Drop every cached issue of a project, returning how many were removed
    pub fn clear_issue_cache(&self, project_id: &str) -> StoreResult<usize> {
        let removed = self
            .conn()?
            .execute("DELETE FROM issue_cache WHERE project_id = ?1", params![project_id])?;
        Ok(removed)
    }
}

fn row_to_issue(row: &Row) -> rusqlite::Result<CachedIssue> {
    Ok(CachedIssue {
        id: row.get(0)?,
        project_id: row.get(1)?,
        issue_number: row.get(2)?,
        title: row.get(3)?,
        issue_type: row.get(4)?,
        priority: row.get(5)?,
        status: row.get(6)?,
        cached_at: parse_timestamp(7, &row.get::<_, String>(7)?)?,
    })
}
