//! Row types
//!
//! `*Row` structs carry the caller-writable columns; `Stored*` structs are
//! what reads return, including engine-assigned ids and timestamps.

use chrono::{DateTime, Utc};
use serde::Serialize;

// =========================================================================
// Projects
// =========================================================================

/// Writable columns of a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRow {
    pub id: String,
    pub name: String,
    pub github_owner: String,
    pub github_repo: String,
    pub local_path: String,
    pub worktree_dir: String,
    /// Serialized project configuration, opaque to the store
    pub config: String,
}

/// A project as read back from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredProject {
    pub id: String,
    pub name: String,
    pub github_owner: String,
    pub github_repo: String,
    pub local_path: String,
    pub worktree_dir: String,
    pub config: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =========================================================================
// Worktrees
// =========================================================================

/// Writable columns of a worktree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeRow {
    pub id: String,
    pub project_id: String,
    pub issue_number: i64,
    pub path: String,
    pub branch: String,
    /// `None` lets the column default (`"active"`) apply
    pub status: Option<String>,
}

/// A worktree as read back from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredWorktree {
    pub id: String,
    pub project_id: String,
    pub issue_number: i64,
    pub path: String,
    pub branch: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

// =========================================================================
// Issue cache
// =========================================================================

/// Writable columns of a cached issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRow {
    pub project_id: String,
    pub issue_number: i64,
    pub title: String,
    pub issue_type: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

/// A cached issue as read back from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedIssue {
    pub id: i64,
    pub project_id: String,
    pub issue_number: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub issue_type: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub cached_at: DateTime<Utc>,
}
