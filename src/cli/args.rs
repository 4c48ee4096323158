//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Build-time external dependency cache
///
/// Fetches the npm packages, feed packages, and archives a plugin-task
/// repository declares in externals.json manifests, caching each one so
/// later build steps never re-download it.
#[derive(Parser, Debug)]
#[command(name = "larder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "LARDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .larder.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every declared external into the cache
    Populate(PopulateArgs),

    /// List cached entries
    List(ListArgs),

    /// Remove staged or cached artifacts
    Clean(CleanArgs),

    /// Check tool availability and cache health
    Status,

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the populate command
#[derive(Parser, Debug)]
pub struct PopulateArgs {
    /// Directory to scan for externals.json manifests (defaults to the
    /// current directory)
    pub path: Option<PathBuf>,

    /// Explicit manifest file(s) to load instead of scanning
    #[arg(short, long)]
    pub manifest: Vec<PathBuf>,

    /// Cache root directory override
    #[arg(long)]
    pub root: Option<PathBuf>,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Cache root directory override
    #[arg(long)]
    pub root: Option<PathBuf>,
}

/// Arguments for the clean command
#[derive(Parser, Debug)]
#[command(group(clap::ArgGroup::new("target").required(true).args(["partial", "all"])))]
pub struct CleanArgs {
    /// Remove only the partial/ staging namespace
    #[arg(long)]
    pub partial: bool,

    /// Remove the entire cache root, entries included
    #[arg(long, conflicts_with = "partial")]
    pub all: bool,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Cache root directory override
    #[arg(long)]
    pub root: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., npm.min_version)
        key: String,
        /// Value to set
        value: String,
        /// Write to project-local .larder.toml instead of global config
        #[arg(long)]
        local: bool,
    },
}

/// Output format for list command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_populate() {
        let cli = Cli::parse_from(["larder", "populate"]);
        match cli.command {
            Commands::Populate(args) => {
                assert!(args.path.is_none());
                assert!(args.manifest.is_empty());
            }
            _ => panic!("expected Populate command"),
        }
    }

    #[test]
    fn cli_parses_populate_manifests() {
        let cli = Cli::parse_from([
            "larder",
            "populate",
            "--manifest",
            "a/externals.json",
            "--manifest",
            "b/externals.json",
        ]);
        match cli.command {
            Commands::Populate(args) => assert_eq!(args.manifest.len(), 2),
            _ => panic!("expected Populate command"),
        }
    }

    #[test]
    fn cli_parses_populate_path_and_root() {
        let cli = Cli::parse_from(["larder", "populate", "Tasks", "--root", "/tmp/cache"]);
        match cli.command {
            Commands::Populate(args) => {
                assert_eq!(args.path, Some(PathBuf::from("Tasks")));
                assert_eq!(args.root, Some(PathBuf::from("/tmp/cache")));
            }
            _ => panic!("expected Populate command"),
        }
    }

    #[test]
    fn cli_parses_status() {
        let cli = Cli::parse_from(["larder", "status"]);
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn cli_parses_list_format() {
        let cli = Cli::parse_from(["larder", "list", "--format", "json"]);
        match cli.command {
            Commands::List(args) => assert!(matches!(args.format, OutputFormat::Json)),
            _ => panic!("expected List command"),
        }
    }

    #[test]
    fn clean_requires_target() {
        assert!(Cli::try_parse_from(["larder", "clean"]).is_err());
    }

    #[test]
    fn clean_partial_and_all_conflict() {
        assert!(Cli::try_parse_from(["larder", "clean", "--partial", "--all"]).is_err());
    }

    #[test]
    fn cli_parses_clean_partial() {
        let cli = Cli::parse_from(["larder", "clean", "--partial", "-y"]);
        match cli.command {
            Commands::Clean(args) => {
                assert!(args.partial);
                assert!(!args.all);
                assert!(args.yes);
            }
            _ => panic!("expected Clean command"),
        }
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["larder", "config", "set", "npm.min_version", "6.0.0"]);
        match cli.command {
            Commands::Config(args) => match args.action {
                Some(ConfigAction::Set { key, value, local }) => {
                    assert_eq!(key, "npm.min_version");
                    assert_eq!(value, "6.0.0");
                    assert!(!local);
                }
                other => panic!("expected Set, got {:?}", other),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn cli_no_local_flag() {
        let cli = Cli::parse_from(["larder", "--no-local", "status"]);
        assert!(cli.no_local);
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["larder", "status"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["larder", "-v", "status"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["larder", "-vv", "status"]);
        assert_eq!(cli.verbose, 2);
    }
}
