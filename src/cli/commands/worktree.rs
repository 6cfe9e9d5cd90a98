//! `issue-flow worktree` command - Worktree bookkeeping
//!
//! Records worktrees that were created for issues. Nothing here runs git;
//! the commands only track where each worktree lives and what state it is in.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use crate::cli::helpers::{confirm, format_timestamp, load_config, open_store, print_list, print_record};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::WorktreeRow;
use crate::core::{ProjectManager, WorktreeManager};

/// Branch prefix when the issue type is unknown
const FALLBACK_PREFIX: &str = "issue";

#[derive(Subcommand, Debug)]
pub enum WorktreeCommands {
    /// List worktrees
    List {
        /// Only worktrees of this project
        #[arg(long, short = 'p')]
        project: Option<String>,
    },

    /// Record a worktree for an issue
    Add(AddArgs),

    /// Show a worktree's details
    Show {
        /// Worktree ID
        id: String,
    },

    /// Change a worktree's status
    Status {
        /// Worktree ID
        id: String,

        /// New status (e.g. active, merged, abandoned)
        status: String,
    },

    /// Forget a worktree
    Remove {
        /// Worktree ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Project ID
    #[arg(long, short = 'p')]
    pub project: String,

    /// Issue number
    #[arg(long, short = 'i')]
    pub issue: i64,

    /// Worktree ID (default: wt-<project>-<issue>)
    #[arg(long)]
    pub id: Option<String>,

    /// Worktree location (default: <worktree_dir>/<issue>)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Branch checked out in the worktree (default: from the project's branch pattern)
    #[arg(long, short = 'b')]
    pub branch: Option<String>,

    /// Initial status
    #[arg(long)]
    pub status: Option<String>,
}

pub fn run(cmd: WorktreeCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        WorktreeCommands::List { project } => run_list(project.as_deref(), global),
        WorktreeCommands::Add(args) => run_add(args, global),
        WorktreeCommands::Show { id } => run_show(&id, global),
        WorktreeCommands::Status { id, status } => run_status(&id, &status, global),
        WorktreeCommands::Remove { id, yes } => run_remove(&id, yes, global),
    }
}

fn run_list(project: Option<&str>, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let store = open_store(global, &config)?;

    let worktrees = match project {
        Some(project_id) => store.list_worktrees_by_project(project_id),
        None => store.list_worktrees(),
    }
    .into_diagnostic()?;

    if worktrees.is_empty() && global.format == OutputFormat::Auto {
        println!("No worktrees found.");
        return Ok(());
    }

    print_list(
        &worktrees,
        global.format,
        &["id", "project", "issue", "branch", "status", "path"],
        |w| {
            vec![
                w.id.clone(),
                w.project_id.clone(),
                w.issue_number.to_string(),
                w.branch.clone(),
                w.status.clone(),
                w.path.clone(),
            ]
        },
    )
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let store = open_store(global, &config)?;

    let project = ProjectManager::new(&store)
        .get(&args.project)
        .into_diagnostic()?;

    let path = match args.path {
        Some(path) => path,
        None if !project.worktree_dir.is_empty() => {
            Path::new(&project.worktree_dir).join(args.issue.to_string())
        }
        None => {
            return Err(miette::miette!(
                "Project '{}' has no worktree directory; pass --path",
                project.id
            ))
        }
    };

    let branch = match args.branch {
        Some(branch) => branch,
        None => {
            let cached = store.get_cached_issue(&project.id, args.issue);
            match cached {
                Ok(issue) => {
                    let prefix = issue
                        .issue_type
                        .as_deref()
                        .and_then(|t| project.issue_type(t))
                        .map(|t| t.branch_prefix.as_str())
                        .filter(|p| !p.is_empty())
                        .unwrap_or(FALLBACK_PREFIX);
                    project.branch_name(prefix, args.issue, &issue.title)
                }
                Err(e) if e.is_not_found() => {
                    return Err(miette::miette!(
                        "Issue #{} is not cached for '{}'; pass --branch",
                        args.issue,
                        project.id
                    ))
                }
                Err(e) => return Err(e).into_diagnostic(),
            }
        }
    };

    let row = WorktreeRow {
        id: args
            .id
            .unwrap_or_else(|| WorktreeManager::default_id(&project.id, args.issue)),
        project_id: project.id.clone(),
        issue_number: args.issue,
        path: path.display().to_string(),
        branch,
        status: args.status,
    };

    let stored = WorktreeManager::new(&store)
        .register(&row)
        .into_diagnostic()?;

    if !global.quiet {
        println!(
            "{} Added worktree {} for {}#{}",
            style("✓").green(),
            style(&stored.id).cyan(),
            project.id,
            stored.issue_number
        );
        println!("   Branch: {}", style(&stored.branch).yellow());
        println!("   Path:   {}", style(&stored.path).dim());
    }

    Ok(())
}

fn run_show(id: &str, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let store = open_store(global, &config)?;
    let worktree = store.get_worktree(id).into_diagnostic()?;

    if global.format == OutputFormat::Id {
        println!("{}", worktree.id);
        return Ok(());
    }
    if print_record(&worktree, global.format)? {
        return Ok(());
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&worktree.id).cyan());
    println!(
        "{}: {}#{}",
        style("Issue").bold(),
        worktree.project_id,
        worktree.issue_number
    );
    println!("{}: {}", style("Branch").bold(), style(&worktree.branch).yellow());
    println!("{}: {}", style("Path").bold(), worktree.path);
    println!("{}: {}", style("Status").bold(), worktree.status);
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}",
        style("Created").dim(),
        format_timestamp(&worktree.created_at)
    );

    Ok(())
}

fn run_status(id: &str, status: &str, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let store = open_store(global, &config)?;

    store.set_worktree_status(id, status).into_diagnostic()?;

    if !global.quiet {
        println!(
            "{} Worktree {} is now {}",
            style("✓").green(),
            style(id).cyan(),
            style(status).yellow()
        );
    }

    Ok(())
}

fn run_remove(id: &str, yes: bool, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let store = open_store(global, &config)?;

    let worktree = store.get_worktree(id).into_diagnostic()?;

    if !confirm(
        &format!("Forget worktree {} ({})?", worktree.id, worktree.path),
        yes,
    )? {
        println!("Aborted.");
        return Ok(());
    }

    store.delete_worktree(id).into_diagnostic()?;

    if !global.quiet {
        println!("{} Removed worktree {}", style("✓").green(), style(id).cyan());
        println!("   {}", style("The directory on disk was left in place").dim());
    }

    Ok(())
}
