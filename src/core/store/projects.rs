//! Project operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_timestamp, ProjectRow, Store, StoreError, StoreResult, StoredProject};

const PROJECT_COLUMNS: &str =
    "id, name, github_owner, github_repo, local_path, worktree_dir, config, created_at, updated_at";

impl Store {
    /// Insert a project
    ///
    /// Fails with a constraint violation if the id already exists.
    pub fn create_project(&self, project: &ProjectRow) -> StoreResult<()> {
        self.conn()?.execute(
            r#"
            INSERT INTO projects (id, name, github_owner, github_repo, local_path, worktree_dir, config)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                project.id,
                project.name,
                project.github_owner,
                project.github_repo,
                project.local_path,
                project.worktree_dir,
                project.config,
            ],
        )?;
        Ok(())
    }

    /// Get a project by id
    pub fn get_project(&self, id: &str) -> StoreResult<StoredProject> {
        self.conn()?
            .query_row(
                &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"),
                params![id],
                row_to_project,
            )
            .optional()?
            .ok_or_else(|| StoreError::not_found("project", id))
    }

    /// List all projects ordered by name
    pub fn list_projects(&self) -> StoreResult<Vec<StoredProject>> {
        let mut stmt = self
            .conn()?
            .prepare(&format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY name"))?;

        let projects = stmt
            .query_map([], row_to_project)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(projects)
    }

    /// Replace every non-key column of a project and bump `updated_at`
    pub fn update_project(&self, project: &ProjectRow) -> StoreResult<()> {
        let changed = self.conn()?.execute(
            r#"
            UPDATE projects
            SET name = ?2, github_owner = ?3, github_repo = ?4, local_path = ?5,
                worktree_dir = ?6, config = ?7,
                updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now')
            WHERE id = ?1
            "#,
            params![
                project.id,
                project.name,
                project.github_owner,
                project.github_repo,
                project.local_path,
                project.worktree_dir,
                project.config,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::not_found("project", &project.id));
        }
        Ok(())
    }

    /// Delete a project by id
    ///
    /// Deleting an unknown id is not an error. Worktrees and cached issues
    /// that reference the project are left in place.
    pub fn delete_project(&self, id: &str) -> StoreResult<()> {
        self.conn()?
            .execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(())
    }
}

fn row_to_project(row: &Row) -> rusqlite::Result<StoredProject> {
    Ok(StoredProject {
        id: row.get(0)?,
        name: row.get(1)?,
        github_owner: row.get(2)?,
        github_repo: row.get(3)?,
        local_path: row.get(4)?,
        worktree_dir: row.get(5)?,
        config: row.get(6)?,
        created_at: parse_timestamp(7, &row.get::<_, String>(7)?)?,
        updated_at: parse_timestamp(8, &row.get::<_, String>(8)?)?,
    })
}
