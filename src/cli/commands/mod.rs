//! CLI command implementations

pub mod cache;
pub mod completions;
pub mod config;
pub mod project;
pub mod worktree;

/// `issue-flow version`
pub fn run_version() -> miette::Result<()> {
    println!("issue-flow v{}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
