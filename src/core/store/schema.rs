//! Database schema initialization
//!
//! Every object is created with `IF NOT EXISTS`, so running this against an
//! existing database is a no-op. There is no versioning: columns may only be
//! added in ways that old files still satisfy.

use rusqlite::Connection;

/// Per-connection settings, applied before the schema is touched
///
/// Foreign keys stay off whatever the SQLite build defaults to: deleting a
/// project leaves its worktrees and cached issues in place, and rows may name
/// a project that was never stored.
pub(super) fn configure(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = OFF;")
}

/// Create tables and indexes if they do not already exist
pub(super) fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- Tracked repositories
        CREATE TABLE IF NOT EXISTS projects (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            github_owner TEXT NOT NULL,
            github_repo TEXT NOT NULL,
            local_path TEXT NOT NULL,
            worktree_dir TEXT NOT NULL,
            config TEXT NOT NULL,
            created_at TIMESTAMP DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
            updated_at TIMESTAMP DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
        );

        -- Worktrees checked out per issue
        CREATE TABLE IF NOT EXISTS worktrees (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            issue_number INTEGER NOT NULL,
            path TEXT NOT NULL,
            branch TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            created_at TIMESTAMP DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
            FOREIGN KEY (project_id) REFERENCES projects(id)
        );
        CREATE INDEX IF NOT EXISTS idx_worktrees_project_id ON worktrees(project_id);
        CREATE INDEX IF NOT EXISTS idx_worktrees_issue_number ON worktrees(issue_number);

        -- Issue metadata, one row per (project, issue)
        CREATE TABLE IF NOT EXISTS issue_cache (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id TEXT NOT NULL,
            issue_number INTEGER NOT NULL,
            title TEXT NOT NULL,
            type TEXT,
            priority TEXT,
            status TEXT,
            cached_at TIMESTAMP DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
            FOREIGN KEY (project_id) REFERENCES projects(id),
            UNIQUE(project_id, issue_number)
        );
        CREATE INDEX IF NOT EXISTS idx_issue_cache_project ON issue_cache(project_id);
        "#,
    )
}
