//! Domain-level operations over the store
//!
//! Managers borrow an open [`Store`] and add the rules the store itself does
//! not enforce: field validation, config (de)serialization, and one worktree
//! per issue.

use thiserror::Error;

use crate::core::project::{Project, ProjectError};
use crate::core::store::{Store, StoreError, StoredWorktree, WorktreeRow};

/// Project CRUD with config mapping
pub struct ProjectManager<'a> {
    store: &'a Store,
}

impl<'a> ProjectManager<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Validate and insert a new project
    pub fn add(&self, project: &Project) -> Result<(), ProjectError> {
        project.validate()?;
        let row = project.to_row()?;
        self.store.create_project(&row)?;
        tracing::debug!(id = %project.id, "added project");
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Project, ProjectError> {
        let stored = self.store.get_project(id)?;
        Project::from_stored(stored)
    }

    /// All projects ordered by name
    pub fn list(&self) -> Result<Vec<Project>, ProjectError> {
        self.store
            .list_projects()?
            .into_iter()
            .map(Project::from_stored)
            .collect()
    }

    /// Validate and replace an existing project
    pub fn update(&self, project: &Project) -> Result<(), ProjectError> {
        project.validate()?;
        let row = project.to_row()?;
        self.store.update_project(&row)?;
        tracing::debug!(id = %project.id, "updated project");
        Ok(())
    }

    /// Remove a project; unknown ids are ignored
    pub fn delete(&self, id: &str) -> Result<(), ProjectError> {
        self.store.delete_project(id)?;
        tracing::debug!(id, "deleted project");
        Ok(())
    }
}

/// Errors raised by worktree bookkeeping
#[derive(Debug, Error)]
pub enum WorktreeError {
    #[error("issue #{issue_number} of project {project_id} already has worktree {existing}")]
    IssueTaken {
        project_id: String,
        issue_number: i64,
        existing: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WorktreeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, WorktreeError::Store(e) if e.is_not_found())
    }
}

/// Worktree bookkeeping for one store
pub struct WorktreeManager<'a> {
    store: &'a Store,
}

impl<'a> WorktreeManager<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Conventional id for a project's worktree of an issue
    pub fn default_id(project_id: &str, issue_number: i64) -> String {
        format!("wt-{}-{}", project_id, issue_number)
    }

    /// Record a worktree, refusing a second one for the same issue
    ///
    /// The owning project must exist.
    pub fn register(&self, worktree: &WorktreeRow) -> Result<StoredWorktree, WorktreeError> {
        self.store.get_project(&worktree.project_id)?;

        if let Some(existing) = self.find_for_issue(&worktree.project_id, worktree.issue_number)? {
            return Err(WorktreeError::IssueTaken {
                project_id: worktree.project_id.clone(),
                issue_number: worktree.issue_number,
                existing: existing.id,
            });
        }

        self.store.create_worktree(worktree)?;
        tracing::debug!(id = %worktree.id, "registered worktree");
        Ok(self.store.get_worktree(&worktree.id)?)
    }

    /// The worktree recorded for an issue, if any
    pub fn find_for_issue(
        &self,
        project_id: &str,
        issue_number: i64,
    ) -> Result<Option<StoredWorktree>, WorktreeError> {
        Ok(self
            .store
            .list_worktrees_by_project(project_id)?
            .into_iter()
            .find(|w| w.issue_number == issue_number))
    }
}
