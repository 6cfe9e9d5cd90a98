//! `issue-flow project` command - Project management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{confirm, format_timestamp, load_config, open_store, print_list, print_record};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Project, ProjectManager};

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List projects
    List,

    /// Add a project
    Add(AddArgs),

    /// Show a project's details
    Show {
        /// Project ID
        id: String,
    },

    /// Update a project
    Update(UpdateArgs),

    /// Remove a project
    Remove {
        /// Project ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Project ID (used in worktree IDs and branch names)
    pub id: String,

    /// GitHub owner (user or organization)
    #[arg(long)]
    pub owner: String,

    /// GitHub repository name
    #[arg(long)]
    pub repo: String,

    /// Display name (default: the repository name)
    #[arg(long)]
    pub name: Option<String>,

    /// Local checkout
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Directory worktrees are created in (default: <worktree_base>/<id>)
    #[arg(long)]
    pub worktree_dir: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Project ID
    pub id: String,

    /// New display name
    #[arg(long)]
    pub name: Option<String>,

    /// New GitHub owner
    #[arg(long)]
    pub owner: Option<String>,

    /// New GitHub repository name
    #[arg(long)]
    pub repo: Option<String>,

    /// New local checkout
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// New worktree directory
    #[arg(long)]
    pub worktree_dir: Option<PathBuf>,

    /// Branch naming pattern ({prefix}, {issue-number}, {slug})
    #[arg(long)]
    pub branch_pattern: Option<String>,

    /// Maximum slug length in branch names
    #[arg(long)]
    pub max_slug_length: Option<usize>,

    /// Enable or disable the coding-assistant integration
    #[arg(long)]
    pub opencode: Option<bool>,
}

pub fn run(cmd: ProjectCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProjectCommands::List => run_list(global),
        ProjectCommands::Add(args) => run_add(args, global),
        ProjectCommands::Show { id } => run_show(&id, global),
        ProjectCommands::Update(args) => run_update(args, global),
        ProjectCommands::Remove { id, yes } => run_remove(&id, yes, global),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let store = open_store(global, &config)?;
    let projects = ProjectManager::new(&store).list().into_diagnostic()?;

    if projects.is_empty() && global.format == OutputFormat::Auto {
        println!("No projects found. Use 'issue-flow project add' to add a project.");
        return Ok(());
    }

    print_list(
        &projects,
        global.format,
        &["id", "name", "github", "local_path"],
        |p| {
            vec![
                p.id.clone(),
                p.name.clone(),
                p.github_full_name(),
                p.local_path.clone(),
            ]
        },
    )
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let store = open_store(global, &config)?;

    let worktree_dir = args
        .worktree_dir
        .or_else(|| config.default_worktree_dir(&args.id))
        .unwrap_or_default();

    let name = args.name.unwrap_or_else(|| args.repo.clone());
    let mut project = Project::new(&args.id, name, args.owner, args.repo);
    project.local_path = args
        .path
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    project.worktree_dir = worktree_dir.display().to_string();
    project.config.integration.enabled = config.settings.opencode_enabled;

    ProjectManager::new(&store)
        .add(&project)
        .map_err(|e| miette::miette!("Failed to add project '{}': {}", args.id, e))?;

    if !global.quiet {
        println!(
            "{} Added project {} ({})",
            style("✓").green(),
            style(&project.id).cyan(),
            style(project.github_full_name()).yellow()
        );
        if !project.local_path.is_empty() {
            println!("   Path:      {}", style(&project.local_path).dim());
        }
        if !project.worktree_dir.is_empty() {
            println!("   Worktrees: {}", style(&project.worktree_dir).dim());
        }
    }

    Ok(())
}

fn run_show(id: &str, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let store = open_store(global, &config)?;
    let project = ProjectManager::new(&store).get(id).into_diagnostic()?;

    if global.format == OutputFormat::Id {
        println!("{}", project.id);
        return Ok(());
    }
    if print_record(&project, global.format)? {
        return Ok(());
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&project.id).cyan());
    println!("{}: {}", style("Name").bold(), style(&project.name).yellow());
    println!("{}: {}", style("GitHub").bold(), project.github_full_name());
    println!("{}: {}", style("Path").bold(), project.local_path);
    println!("{}: {}", style("Worktrees").bold(), project.worktree_dir);
    println!("{}", style("─".repeat(60)).dim());

    let branch = &project.config.branch_config;
    println!();
    println!(
        "{}: {} (slug ≤ {})",
        style("Branch pattern").bold(),
        branch.pattern,
        branch.max_slug_length
    );

    let integration = &project.config.integration;
    println!(
        "{}: {}{}",
        style("OpenCode").bold(),
        if integration.enabled { "enabled" } else { "disabled" },
        if integration.auto_launch { ", auto-launch" } else { "" }
    );

    if !project.config.issue_types.is_empty() {
        println!();
        println!(
            "{} ({}):",
            style("Issue types").bold(),
            project.config.issue_types.len()
        );
        for issue_type in &project.config.issue_types {
            print!("  • {}", issue_type.name);
            if !issue_type.branch_prefix.is_empty() {
                print!(" [{}]", issue_type.branch_prefix);
            }
            println!();
        }
    }

    println!();
    if let Some(created) = &project.created_at {
        println!("{}: {}", style("Created").dim(), format_timestamp(created));
    }
    if let Some(updated) = &project.updated_at {
        println!("{}: {}", style("Updated").dim(), format_timestamp(updated));
    }

    Ok(())
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let store = open_store(global, &config)?;
    let manager = ProjectManager::new(&store);

    let mut project = manager.get(&args.id).into_diagnostic()?;

    if let Some(name) = args.name {
        project.name = name;
    }
    if let Some(owner) = args.owner {
        project.github_owner = owner;
    }
    if let Some(repo) = args.repo {
        project.github_repo = repo;
    }
    if let Some(path) = args.path {
        project.local_path = path.display().to_string();
    }
    if let Some(dir) = args.worktree_dir {
        project.worktree_dir = dir.display().to_string();
    }
    if let Some(pattern) = args.branch_pattern {
        project.config.branch_config.pattern = pattern;
    }
    if let Some(max) = args.max_slug_length {
        project.config.branch_config.max_slug_length = max;
    }
    if let Some(enabled) = args.opencode {
        project.config.integration.enabled = enabled;
    }

    manager
        .update(&project)
        .map_err(|e| miette::miette!("Failed to update project '{}': {}", args.id, e))?;

    if !global.quiet {
        println!(
            "{} Updated project {}",
            style("✓").green(),
            style(&project.id).cyan()
        );
    }

    Ok(())
}

fn run_remove(id: &str, yes: bool, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let store = open_store(global, &config)?;
    let manager = ProjectManager::new(&store);

    // Surface a missing project before asking anything
    manager.get(id).into_diagnostic()?;

    if !confirm(&format!("Remove project {}?", id), yes)? {
        println!("Aborted.");
        return Ok(());
    }

    manager.delete(id).into_diagnostic()?;
    let remaining = store.list_worktrees_by_project(id).into_diagnostic()?;

    if !global.quiet {
        println!("{} Removed project {}", style("✓").green(), style(id).cyan());
        if !remaining.is_empty() {
            println!(
                "   {} {} worktree(s) still reference this project",
                style("!").yellow(),
                remaining.len()
            );
        }
    }

    Ok(())
}
