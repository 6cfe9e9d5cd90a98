//! Issue Flow: local state for issue-driven worktrees
//!
//! Keeps the projects, git worktrees and cached GitHub issues an issue-flow
//! CLI works with in a single embedded SQLite database.

pub mod cli;
pub mod core;
