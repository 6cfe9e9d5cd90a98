//! Worktree operations
//!
//! Worktrees are addressed by their own id. Nothing here stops two rows from
//! pointing at the same (project, issue) pair; callers that want one worktree
//! per issue enforce it themselves.

use rusqlite::{params, OptionalExtension, Row};

use super::{
    parse_timestamp, Store, StoreError, StoreResult, StoredWorktree, WorktreeRow,
    DEFAULT_WORKTREE_STATUS,
};

const WORKTREE_COLUMNS: &str = "id, project_id, issue_number, path, branch, status, created_at";

impl Store {
    /// Insert a worktree
    ///
    /// A `None` status leaves the column default in effect.
    pub fn create_worktree(&self, worktree: &WorktreeRow) -> StoreResult<()> {
        let conn = self.conn()?;
        match &worktree.status {
            Some(status) => conn.execute(
                r#"
                INSERT INTO worktrees (id, project_id, issue_number, path, branch, status)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    worktree.id,
                    worktree.project_id,
                    worktree.issue_number,
                    worktree.path,
                    worktree.branch,
                    status,
                ],
            )?,
            None => conn.execute(
                r#"
                INSERT INTO worktrees (id, project_id, issue_number, path, branch)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    worktree.id,
                    worktree.project_id,
                    worktree.issue_number,
                    worktree.path,
                    worktree.branch,
                ],
            )?,
        };
        Ok(())
    }

    /// Get a worktree by id
    pub fn get_worktree(&self, id: &str) -> StoreResult<StoredWorktree> {
        self.conn()?
            .query_row(
                &format!("SELECT {WORKTREE_COLUMNS} FROM worktrees WHERE id = ?1"),
                params![id],
                row_to_worktree,
            )
            .optional()?
            .ok_or_else(|| StoreError::not_found("worktree", id))
    }

    /// List every worktree, oldest first
    pub fn list_worktrees(&self) -> StoreResult<Vec<StoredWorktree>> {
        let mut stmt = self.conn()?.prepare(&format!(
            "SELECT {WORKTREE_COLUMNS} FROM worktrees ORDER BY created_at, rowid"
        ))?;

        let worktrees = stmt
            .query_map([], row_to_worktree)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(worktrees)
    }

    /// List the worktrees of one project, oldest first
    pub fn list_worktrees_by_project(&self, project_id: &str) -> StoreResult<Vec<StoredWorktree>> {
        let mut stmt = self.conn()?.prepare(&format!(
            "SELECT {WORKTREE_COLUMNS} FROM worktrees WHERE project_id = ?1 ORDER BY created_at, rowid"
        ))?;

        let worktrees = stmt
            .query_map(params![project_id], row_to_worktree)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(worktrees)
    }

    /// Replace every non-key column of a worktree
    ///
    /// A `None` status resets the row to the default status.
    pub fn update_worktree(&self, worktree: &WorktreeRow) -> StoreResult<()> {
        let status = worktree
            .status
            .as_deref()
            .unwrap_or(DEFAULT_WORKTREE_STATUS);

        let changed = self.conn()?.execute(
            r#"
            UPDATE worktrees
            SET project_id = ?2, issue_number = ?3, path = ?4, branch = ?5, status = ?6
            WHERE id = ?1
            "#,
            params![
                worktree.id,
                worktree.project_id,
                worktree.issue_number,
                worktree.path,
                worktree.branch,
                status,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::not_found("worktree", &worktree.id));
        }
        Ok(())
    }

    /// Change only the status of a worktree
    pub fn set_worktree_status(&self, id: &str, status: &str) -> StoreResult<()> {
        let changed = self.conn()?.execute(
            "UPDATE worktrees SET status = ?2 WHERE id = ?1",
            params![id, status],
        )?;

        if changed == 0 {
            return Err(StoreError::not_found("worktree", id));
        }
        Ok(())
    }

    /// Delete a worktree by id; unknown ids are ignored
    pub fn delete_worktree(&self, id: &str) -> StoreResult<()> {
        self.conn()?
            .execute("DELETE FROM worktrees WHERE id = ?1", params![id])?;
        Ok(())
    }
}

fn row_to_worktree(row: &Row) -> rusqlite::Result<StoredWorktree> {
    Ok(StoredWorktree {
        id: row.get(0)?,
        project_id: row.get(1)?,
        issue_number: row.get(2)?,
        path: row.get(3)?,
        branch: row.get(4)?,
        status: row.get(5)?,
        created_at: parse_timestamp(6, &row.get::<_, String>(6)?)?,
    })
}
