//! githelper - git workflows as single commands
//!
//! Run with `githelper --help` for usage.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use githelper::{
    commands::{self, Command, Context},
    config::{Config, Overrides},
    console::Console,
    process::SystemRunner,
    APP_NAME, VERSION,
};

/// Variable that overrides the log filter (`GITHELPER_LOG=githelper=trace`)
const LOG_ENV: &str = "GITHELPER_LOG";

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "Multi-step git and GitHub workflows as single commands")]
#[command(long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Path to config file (default: ~/.githelper.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Always use the numbered list instead of fzf
    #[arg(long, global = true)]
    no_fzf: bool,

    #[command(subcommand)]
    command: Command,
}

fn setup_logging(debug: bool) -> Result<()> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)?,
        _ if debug => EnvFilter::new("debug").add_directive("gix=info".parse()?),
        // Handlers print their own progress; logs stay quiet unless asked for
        _ => EnvFilter::new("warn"),
    };

    // stderr keeps logs out of piped output such as `worktree switch --print`
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    color_eyre::config::HookBuilder::default()
        .display_location_section(false)
        .display_env_section(false)
        .install()?;

    let cli = Cli::parse();

    let overrides = Overrides {
        debug: cli.debug.then_some(true),
        no_fzf: cli.no_fzf.then_some(true),
    };
    let config = Config::load(cli.config.as_deref(), overrides)?;
    setup_logging(config.debug)?;
    debug!(
        version = VERSION,
        main_branch = %config.main_branch,
        no_fzf = config.no_fzf,
        "starting"
    );

    let cwd = std::env::current_dir()?;
    let runner = SystemRunner::new();
    let mut console = Console::stdio();
    let mut ctx = Context::new(&config, &runner, &mut console, &cwd);

    commands::dispatch(&mut ctx, cli.command)?;
    Ok(())
}
