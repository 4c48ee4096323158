//! Larder - Build-Time External Dependency Cache
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use larder::cli::{Cli, Commands};
use larder::config::ConfigManager;
use larder::error::LarderResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> LarderResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };

    // Find local config unless --no-local is set
    let local_config_path = if cli.no_local {
        None
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| larder::error::LarderError::io("getting current directory", e))?;
        ConfigManager::find_local_config(&cwd)
    };

    let config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let effective_verbosity = if cli.verbose > 0 {
        cli.verbose
    } else if config.general.verbose {
        1
    } else {
        0
    };
    let filter = match effective_verbosity {
        0 => EnvFilter::new("larder=warn"),
        1 => EnvFilter::new("larder=info"),
        _ => EnvFilter::new("larder=debug"),
    };

    if config.general.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .init();
    }

    if let Some(ref path) = local_config_path {
        debug!("Found local config: {}", path.display());
    }

    larder::ui::init_theme();

    // Dispatch to command
    match cli.command {
        Commands::Populate(args) => larder::cli::commands::populate(args, &config).await,
        Commands::List(args) => larder::cli::commands::list(args, &config).await,
        Commands::Clean(args) => larder::cli::commands::clean(args, &config).await,
        Commands::Status => larder::cli::commands::status(&config).await,
        Commands::Config(args) => larder::cli::commands::config(args, &config).await,
    }
}
