use clap::{Parser, Subcommand, ValueEnum};

/// SwimCoach — a terminal environment navigator for macOS
#[derive(Parser, Debug)]
#[command(
    name = "swimcoach",
    version,
    about = "A swim-coach themed navigator for your macOS terminal environment",
    long_about = "SwimCoach inspects your package managers, disk usage and shell setup,\n\
                   then coaches you toward a leaner, faster terminal. Dry-run by default.",
    after_help = "EXAMPLES:\n  \
        swimcoach probe                        Snapshot OS, package managers, disk, shell\n  \
        swimcoach managers                     List supported package managers\n  \
        swimcoach scan                         Find outdated packages\n  \
        swimcoach clean --remove-outdated      Preview removing outdated packages\n  \
        swimcoach clean --caches --apply       Run cleanup and measure caches\n  \
        swimcoach organize                     Preview config backup and shell review\n  \
        swimcoach nav --export nav.sh          Save a navigation alias script"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (defaults to `output_format` from config)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode — minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Per-command timeout in seconds (overrides config)
    #[arg(long, global = true, value_name = "SECS", env = "SWIMCOACH_TIMEOUT")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Snapshot OS version, package managers, disk usage and shell
    Probe,

    /// Show supported package managers
    Managers {
        #[command(subcommand)]
        action: Option<ManagersAction>,
    },

    /// Find outdated packages across installed package managers
    Scan,

    /// Remove outdated packages and run package-manager cleanup
    Clean {
        /// Uninstall every outdated package found by a fresh scan
        #[arg(long)]
        remove_outdated: bool,

        /// Measure system cache directories
        #[arg(long)]
        caches: bool,

        /// Preview only (default unless config says otherwise)
        #[arg(long, conflicts_with = "apply")]
        dry_run: bool,

        /// Actually run the commands
        #[arg(long)]
        apply: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Back up shell config files and review shell startup
    Organize {
        /// Skip backing up shell config files
        #[arg(long)]
        no_backup: bool,

        /// Skip measuring shell startup time
        #[arg(long)]
        no_shell_check: bool,

        /// Preview only (default unless config says otherwise)
        #[arg(long, conflicts_with = "apply")]
        dry_run: bool,

        /// Actually write backups
        #[arg(long)]
        apply: bool,
    },

    /// Build a navigation training plan of directory and command aliases
    Nav {
        /// Write the alias script to this file instead of printing it
        #[arg(long, value_name = "FILE")]
        export: Option<std::path::PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ManagersAction {
    /// List registered package managers and whether they are installed
    List,

    /// Show every command template for one package manager
    Show {
        /// Registry id, e.g. homebrew
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset to default configuration
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Initialize SwimCoach directories and default config
    Init,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

impl From<&crate::common::config::OutputFormat> for OutputFormat {
    fn from(configured: &crate::common::config::OutputFormat) -> Self {
        use crate::common::config::OutputFormat as Configured;
        match configured {
            Configured::Human => OutputFormat::Human,
            Configured::Json => OutputFormat::Json,
            Configured::Quiet => OutputFormat::Quiet,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

/// Resolve the dry-run flag pair against the configured default
pub fn resolve_dry_run(dry_run: bool, apply: bool, default_dry_run: bool) -> bool {
    if dry_run {
        true
    } else if apply {
        false
    } else {
        default_dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_resolve_dry_run() {
        assert!(resolve_dry_run(false, false, true));
        assert!(!resolve_dry_run(false, false, false));
        assert!(!resolve_dry_run(false, true, true));
        assert!(resolve_dry_run(true, false, false));
    }

    #[test]
    fn test_format_flag_is_optional() {
        let cli = Cli::try_parse_from(["swimcoach", "probe"]).unwrap();
        assert!(cli.format.is_none());
        let configured = crate::common::config::OutputFormat::Quiet;
        assert!(matches!(OutputFormat::from(&configured), OutputFormat::Quiet));
    }

    #[test]
    fn test_dry_run_conflicts_with_apply() {
        let parsed = Cli::try_parse_from(["swimcoach", "clean", "--dry-run", "--apply"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["swimcoach", "nav", "--format", "json", "--timeout", "5"])
            .unwrap();
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        assert_eq!(cli.timeout, Some(5));
        assert!(matches!(cli.command, Commands::Nav { export: None }));
    }
}
