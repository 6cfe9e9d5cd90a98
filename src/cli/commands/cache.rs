//! `issue-flow cache` command - Manage the issue cache
//!
//! The cache keeps the title, type, priority and status of GitHub issues so
//! lists and branch names do not need a network round trip. Entries are keyed
//! by project and issue number; writing an entry again refreshes it.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{
    confirm, format_timestamp, load_config, open_store, print_list, print_record, truncate_str,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::IssueRow;

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// List cached issues of a project
    List {
        /// Project ID
        project: String,
    },

    /// Show one cached issue
    Show {
        /// Project ID
        project: String,

        /// Issue number
        issue: i64,
    },

    /// Insert or refresh a cached issue
    Put(PutArgs),

    /// Drop every cached issue of a project
    Clear {
        /// Project ID
        project: String,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct PutArgs {
    /// Project ID
    pub project: String,

    /// Issue number
    pub issue: i64,

    /// Issue title
    #[arg(long, short = 't')]
    pub title: String,

    /// Issue type (e.g. bug, feature)
    #[arg(long = "type")]
    pub issue_type: Option<String>,

    /// Priority label
    #[arg(long)]
    pub priority: Option<String>,

    /// Issue state (e.g. open, closed)
    #[arg(long)]
    pub status: Option<String>,
}

pub fn run(cmd: CacheCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CacheCommands::List { project } => run_list(&project, global),
        CacheCommands::Show { project, issue } => run_show(&project, issue, global),
        CacheCommands::Put(args) => run_put(args, global),
        CacheCommands::Clear { project, yes } => run_clear(&project, yes, global),
    }
}

fn run_list(project: &str, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let store = open_store(global, &config)?;
    let issues = store.list_issue_cache(project).into_diagnostic()?;

    if issues.is_empty() && global.format == OutputFormat::Auto {
        println!("No cached issues for {}.", project);
        return Ok(());
    }

    let auto = global.format == OutputFormat::Auto;
    print_list(
        &issues,
        global.format,
        &["issue", "title", "type", "priority", "status", "cached_at"],
        |i| {
            vec![
                i.issue_number.to_string(),
                if auto {
                    truncate_str(&i.title, 48)
                } else {
                    i.title.clone()
                },
                i.issue_type.clone().unwrap_or_default(),
                i.priority.clone().unwrap_or_default(),
                i.status.clone().unwrap_or_default(),
                format_timestamp(&i.cached_at),
            ]
        },
    )
}

fn run_show(project: &str, issue: i64, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let store = open_store(global, &config)?;
    let cached = store.get_cached_issue(project, issue).into_diagnostic()?;

    if global.format == OutputFormat::Id {
        println!("{}", cached.issue_number);
        return Ok(());
    }
    if print_record(&cached, global.format)? {
        return Ok(());
    }

    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}#{}",
        style("Issue").bold(),
        cached.project_id,
        style(cached.issue_number).cyan()
    );
    println!("{}: {}", style("Title").bold(), style(&cached.title).yellow());
    println!(
        "{}: {}",
        style("Type").bold(),
        cached.issue_type.as_deref().unwrap_or("-")
    );
    println!(
        "{}: {}",
        style("Priority").bold(),
        cached.priority.as_deref().unwrap_or("-")
    );
    println!(
        "{}: {}",
        style("Status").bold(),
        cached.status.as_deref().unwrap_or("-")
    );
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}",
        style("Cached").dim(),
        format_timestamp(&cached.cached_at)
    );

    Ok(())
}

fn run_put(args: PutArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let store = open_store(global, &config)?;

    let row = IssueRow {
        project_id: args.project,
        issue_number: args.issue,
        title: args.title,
        issue_type: args.issue_type,
        priority: args.priority,
        status: args.status,
    };
    store.cache_issue(&row).into_diagnostic()?;

    if !global.quiet {
        println!(
            "{} Cached {}#{} {}",
            style("✓").green(),
            row.project_id,
            style(row.issue_number).cyan(),
            style(truncate_str(&row.title, 60)).yellow()
        );
    }

    Ok(())
}

fn run_clear(project: &str, yes: bool, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let store = open_store(global, &config)?;

    if !confirm(&format!("Clear cached issues of {}?", project), yes)? {
        println!("Aborted.");
        return Ok(());
    }

    let removed = store.clear_issue_cache(project).into_diagnostic()?;

    if !global.quiet {
        println!(
            "{} Cleared {} cached issue(s) for {}",
            style("✓").green(),
            style(removed).cyan(),
            project
        );
    }

    Ok(())
}
