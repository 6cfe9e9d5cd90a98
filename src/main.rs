use clap::Parser;
use issue_flow::cli::commands;
use issue_flow::cli::helpers::load_config;
use issue_flow::cli::{Cli, Commands, GlobalOpts};
use miette::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    init_logging(&global);

    match cli.command {
        Commands::Project(cmd) => commands::project::run(cmd, &global),
        Commands::Worktree(cmd) => commands::worktree::run(cmd, &global),
        Commands::Cache(cmd) => commands::cache::run(cmd, &global),
        Commands::Config(cmd) => commands::config::run(cmd, &global),
        Commands::Version => commands::run_version(),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose` and the config setting
fn init_logging(global: &GlobalOpts) {
    // A broken config is reported by the command itself
    let verbose = global.verbose
        || load_config(global)
            .map(|config| config.settings.verbose)
            .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,issue_flow=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
