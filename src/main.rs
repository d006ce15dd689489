use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};

use swimcoach::cli::args::{
    resolve_dry_run, Cli, Commands, CompletionShell, ConfigAction, ManagersAction, OutputFormat,
};
use swimcoach::cli::output;
use swimcoach::common::coach::CoachAction;
use swimcoach::common::config::Config;
use swimcoach::common::errors::CoachError;
use swimcoach::common::format;
use swimcoach::common::paths;
use swimcoach::managers::PackageManagerRegistry;
use swimcoach::planner::{
    CleanupPlanner, CleanupRequest, NavigationPlanner, OrganizePlanner, OrganizeRequest,
};
use swimcoach::probe::SystemProbe;
use swimcoach::runner::ShellRunner;

/// Everything a subcommand needs, resolved once from flags and config
struct Session {
    config: Config,
    runner: ShellRunner,
    registry: PackageManagerRegistry,
    home: PathBuf,
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // config and completions must work even when config.toml is broken
    match &cli.command {
        Commands::Config { action } => {
            let _log_guard = init_logging(cli.verbose, false);
            return cmd_config(action);
        }
        Commands::Completions { shell } => return cmd_completions(shell),
        _ => {}
    }

    let config = Config::load()?;
    if cli.format.is_none() {
        cli.format = Some(OutputFormat::from(&config.output_format));
    }
    let _log_guard = init_logging(cli.verbose, config.log_to_file);

    let timeout = cli
        .timeout
        .map(std::time::Duration::from_secs)
        .unwrap_or_else(|| config.command_timeout());
    let session = Session {
        runner: ShellRunner::new().with_timeout(timeout),
        registry: PackageManagerRegistry::builtin(),
        home: paths::home_dir()?,
        config,
    };

    match cli.command {
        Commands::Probe => cmd_probe(&cli, &session),
        Commands::Managers { ref action } => cmd_managers(&cli, &session, action.as_ref()),
        Commands::Scan => cmd_scan(&cli, &session),
        Commands::Clean {
            remove_outdated,
            caches,
            dry_run,
            apply,
            yes,
        } => {
            let dry_run = resolve_dry_run(dry_run, apply, session.config.default_dry_run);
            cmd_clean(&cli, &session, remove_outdated, caches, dry_run, yes)
        }
        Commands::Organize {
            no_backup,
            no_shell_check,
            dry_run,
            apply,
        } => {
            let request = OrganizeRequest {
                backup_configs: !no_backup,
                analyze_shell: !no_shell_check,
                dry_run: resolve_dry_run(dry_run, apply, session.config.default_dry_run),
            };
            cmd_organize(&cli, &session, &request)
        }
        Commands::Nav { ref export } => cmd_nav(&cli, &session, export.as_deref()),
        Commands::Config { .. } | Commands::Completions { .. } => Ok(()),
    }
}

/// Stderr logging, plus a daily log file when enabled in config
fn init_logging(
    verbose: bool,
    log_to_file: bool,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("swimcoach=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("swimcoach=warn"))
    };
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    if log_to_file && Config::init_dirs().is_ok() {
        let appender = tracing_appender::rolling::daily(Config::logs_dir(), "swimcoach.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .with(fmt::layer().with_ansi(false).with_writer(writer))
            .init();
        Some(guard)
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        None
    }
}

fn output_format(cli: &Cli) -> OutputFormat {
    cli.format.clone().unwrap_or(OutputFormat::Human)
}

fn is_human(cli: &Cli) -> bool {
    matches!(output_format(cli), OutputFormat::Human)
}

fn show_progress(cli: &Cli) -> bool {
    !cli.quiet && is_human(cli)
}

// ─── Probe ────────────────────────────────────────────────────────────────────

fn cmd_probe(cli: &Cli, session: &Session) -> Result<()> {
    if show_progress(cli) {
        output::print_tip(CoachAction::Monitor);
    }

    let spinner = output::make_spinner(show_progress(cli), "Analyzing your system configuration...");
    let snapshot = SystemProbe::new(&session.runner, session.registry).probe();
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match output_format(cli) {
        OutputFormat::Human => output::print_snapshot(&snapshot),
        OutputFormat::Json => output::print_json(&snapshot),
        OutputFormat::Quiet => output::print_snapshot_quiet(&snapshot),
    }
    Ok(())
}

// ─── Managers ─────────────────────────────────────────────────────────────────

fn cmd_managers(cli: &Cli, session: &Session, action: Option<&ManagersAction>) -> Result<()> {
    match action {
        None | Some(ManagersAction::List) => {
            let installed =
                SystemProbe::new(&session.runner, session.registry).installed_managers();
            match output_format(cli) {
                OutputFormat::Human => output::print_managers(&session.registry, &installed),
                OutputFormat::Json => {
                    let json: Vec<_> = session
                        .registry
                        .iter()
                        .map(|d| {
                            serde_json::json!({
                                "id": d.id,
                                "name": d.name,
                                "executable": d.executable,
                                "installed": installed.iter().any(|id| id == d.id),
                            })
                        })
                        .collect();
                    output::print_json(&json);
                }
                OutputFormat::Quiet => {
                    for id in &installed {
                        println!("{}", id);
                    }
                }
            }
            Ok(())
        }
        Some(ManagersAction::Show { id }) => {
            let descriptor = session
                .registry
                .lookup(id)
                .ok_or_else(|| CoachError::UnknownManager { id: id.clone() })?;
            match output_format(cli) {
                OutputFormat::Json => output::print_json(descriptor),
                _ => output::print_manager_detail(descriptor),
            }
            Ok(())
        }
    }
}

// ─── Scan ─────────────────────────────────────────────────────────────────────

fn cmd_scan(cli: &Cli, session: &Session) -> Result<()> {
    if show_progress(cli) {
        output::print_tip(CoachAction::CleanUp);
    }

    let planner = CleanupPlanner::new(&session.runner, session.registry, &session.home);
    let spinner = output::make_spinner(
        show_progress(cli),
        "Analyzing your installed packages for efficiency improvements...",
    );
    let scan = planner.scan_expired();
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let scan = scan?;

    match output_format(cli) {
        OutputFormat::Human => output::print_scan(&scan),
        OutputFormat::Json => output::print_json(&scan),
        OutputFormat::Quiet => output::print_scan_quiet(&scan),
    }
    Ok(())
}

// ─── Clean ────────────────────────────────────────────────────────────────────

fn cmd_clean(
    cli: &Cli,
    session: &Session,
    remove_outdated: bool,
    caches: bool,
    dry_run: bool,
    yes: bool,
) -> Result<()> {
    if show_progress(cli) {
        output::print_tip(CoachAction::Optimize);
    }

    let planner = CleanupPlanner::new(&session.runner, session.registry, &session.home)
        .with_extra_cache_dirs(&session.config.extra_cache_dirs, &session.home);

    let packages = if remove_outdated {
        planner.scan_expired()?.expired_packages
    } else {
        Vec::new()
    };

    if !dry_run && !yes && !confirm_cleanup(packages.len())? {
        eprintln!("  {} Cancelled", "✗".red());
        return Ok(());
    }

    let request = CleanupRequest {
        remove_outdated,
        clean_caches: caches,
        dry_run,
        packages,
    };

    let spinner = output::make_spinner(show_progress(cli), "Starting system optimization...");
    let outcome = planner.cleanup(&request);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let outcome = outcome?;

    match output_format(cli) {
        OutputFormat::Human => output::print_cleanup(&outcome),
        OutputFormat::Json => output::print_json(&outcome),
        OutputFormat::Quiet => output::print_cleanup_quiet(&outcome),
    }
    Ok(())
}

/// Asks on stderr so JSON and quiet output on stdout stay clean
fn confirm_cleanup(package_count: usize) -> Result<bool> {
    use std::io::Write;

    eprint!(
        "\n  {} Run package-manager cleanup and remove {}? [y/N] ",
        "❓",
        format::format_count(package_count)
    );
    std::io::stderr().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

// ─── Organize ─────────────────────────────────────────────────────────────────

fn cmd_organize(cli: &Cli, session: &Session, request: &OrganizeRequest) -> Result<()> {
    if show_progress(cli) {
        output::print_tip(CoachAction::Organize);
        if request.backup_configs {
            output::print_tip(CoachAction::Backup);
        }
    }

    let planner = OrganizePlanner::new(&session.runner, &session.home, &session.config.backup_dir_name)
        .with_threshold_ms(session.config.shell_startup_threshold_ms);

    let spinner = output::make_spinner(
        show_progress(cli),
        "Organizing your terminal configuration for better performance...",
    );
    let outcome = planner.organize(request);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let outcome = outcome?;

    match output_format(cli) {
        OutputFormat::Human => output::print_organize(&outcome),
        OutputFormat::Json => output::print_json(&outcome),
        OutputFormat::Quiet => {
            for f in &outcome.backed_up_files {
                println!("{}", f);
            }
        }
    }
    Ok(())
}

// ─── Nav ──────────────────────────────────────────────────────────────────────

fn cmd_nav(cli: &Cli, session: &Session, export: Option<&Path>) -> Result<()> {
    let plan = NavigationPlanner::new(&session.home).create_plan();

    if let Some(path) = export {
        std::fs::write(path, format!("{}\n", plan.export_script)).map_err(|e| CoachError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
    }

    match output_format(cli) {
        OutputFormat::Human => {
            output::print_nav(&plan);
            match export {
                Some(path) => println!(
                    "  {} Plan saved to {}",
                    "💾",
                    format::format_path(path).cyan()
                ),
                None => println!("{}", plan.export_script),
            }
            println!();
        }
        OutputFormat::Json => output::print_json(&plan),
        OutputFormat::Quiet => {
            if export.is_none() {
                println!("{}", plan.export_script);
            }
        }
    }
    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            Config::init_dirs()?;
            let config = Config::default();
            config.save()?;
            println!("  {} SwimCoach initialized at ~/.swimcoach", "✓".green());
            println!("  Created: config.toml, logs/");
            Ok(())
        }
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("  {} Configuration reset to defaults", "✓".green());
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load().unwrap_or_else(|e| {
                eprintln!("  {} {:#}; starting from defaults", "⚠".yellow(), e);
                Config::default()
            });
            config.set(key, value)?;
            config.save()?;
            println!("  {} Set {} = {}", "✓".green(), key, value);
            Ok(())
        }
    }
}

fn cmd_completions(shell: &CompletionShell) -> Result<()> {
    use clap::CommandFactory;
    let mut cmd = Cli::command();
    let shell = match shell {
        CompletionShell::Bash => clap_complete::Shell::Bash,
        CompletionShell::Zsh => clap_complete::Shell::Zsh,
        CompletionShell::Fish => clap_complete::Shell::Fish,
    };
    clap_complete::generate(shell, &mut cmd, "swimcoach", &mut std::io::stdout());
    Ok(())
}
