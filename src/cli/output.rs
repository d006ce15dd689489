use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::common::coach::{coach_says, CoachAction};
use crate::common::format::{
    self, format_disk_usage, format_millis, format_path, format_size_colored, format_step_status,
};
use crate::managers::{PackageManagerDescriptor, PackageManagerRegistry};
use crate::planner::{
    CleanupOutcome, ExpiredScan, NavigationPlan, OrganizeOutcome, StepReport, UnusedDetection,
};
use crate::probe::{SystemSnapshot, UNKNOWN};

/// Print any result as pretty JSON
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing results: {}", e),
    }
}

/// Spinner shown while a pipeline waits on external commands
pub fn make_spinner(show: bool, msg: &str) -> Option<ProgressBar> {
    if show {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    } else {
        None
    }
}

/// Print the swim-coach tip for an action
pub fn print_tip(action: CoachAction) {
    println!();
    println!("  {}", coach_says(action).italic().cyan());
}

pub fn print_snapshot(snapshot: &SystemSnapshot) {
    println!();
    println!("{}  SwimCoach System Check", "🏊");
    println!("{}", "─".repeat(60).dimmed());

    let os = if snapshot.os_version == UNKNOWN {
        UNKNOWN.dimmed()
    } else {
        snapshot.os_version.as_str().normal()
    };
    println!("  {:<18} {}", "macOS".dimmed(), os);

    let managers = if snapshot.package_managers.is_empty() {
        "none found".dimmed()
    } else {
        snapshot.package_managers.join(", ").cyan()
    };
    println!("  {:<18} {}", "Package managers".dimmed(), managers);
    println!(
        "  {:<18} {}",
        "Disk usage".dimmed(),
        format_disk_usage(&snapshot.disk_usage)
    );
    println!("  {:<18} {}", "Shell".dimmed(), snapshot.shell);

    println!("{}", "─".repeat(60).dimmed());
    println!("  System analysis complete for macOS {}", snapshot.os_version);
    println!();
}

pub fn print_snapshot_quiet(snapshot: &SystemSnapshot) {
    println!(
        "{}  {}  {}  {}",
        snapshot.os_version,
        if snapshot.package_managers.is_empty() {
            "-".to_string()
        } else {
            snapshot.package_managers.join(",")
        },
        if snapshot.disk_usage.is_empty() {
            "-"
        } else {
            snapshot.disk_usage.as_str()
        },
        snapshot.shell
    );
}

pub fn print_managers(registry: &PackageManagerRegistry, installed: &[String]) {
    format::print_header("Package Managers");
    for d in registry.iter() {
        let mark = if installed.iter().any(|id| id == d.id) {
            "●".green()
        } else {
            "○".dimmed()
        };
        println!(
            "  {} {:<12} {:<10} {}",
            mark,
            d.id.bold(),
            d.name,
            format!("({})", d.executable).dimmed()
        );
    }
    println!();
}

pub fn print_manager_detail(d: &PackageManagerDescriptor) {
    format::print_header(&format!("{} ({})", d.name, d.id));
    format::print_kv("executable", d.executable);
    for (label, template) in [
        ("install", d.install),
        ("uninstall", d.uninstall),
        ("list", d.list),
        ("update", d.update),
        ("upgrade", d.upgrade),
        ("cleanup", d.cleanup),
        ("info", d.info),
        ("outdated", d.outdated),
    ] {
        format::print_kv(label, &template.cyan().to_string());
    }
    println!();
}

pub fn print_scan(scan: &ExpiredScan) {
    println!();
    println!("{}  Package Efficiency Report", "🏊");
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  {} outdated  •  {} unused",
        format::format_count(scan.expired_packages.len()).yellow(),
        format::format_count(scan.unused_packages.len()).dimmed()
    );
    println!("{}", "─".repeat(60).dimmed());
    println!();

    if scan.expired_packages.is_empty() {
        println!("  {} Every package is up to date. Nice form!", "✨");
    } else {
        for p in &scan.expired_packages {
            println!(
                "  {} {:<32} {}",
                "●".yellow(),
                format::truncate(&p.name, 32),
                p.manager.dimmed()
            );
        }
    }

    if scan.unused_detection == UnusedDetection::Unsupported {
        println!();
        println!(
            "  {} {}",
            "ℹ️",
            "Unused-package detection needs usage tracking and is not available yet.".dimmed()
        );
    }

    print_steps(&scan.steps);
}

pub fn print_scan_quiet(scan: &ExpiredScan) {
    for p in &scan.expired_packages {
        println!("{}  {}", p.manager, p.name);
    }
}

pub fn print_cleanup(outcome: &CleanupOutcome) {
    println!();
    let (icon, label) = if outcome.dry_run {
        ("ℹ️", "Dry run")
    } else {
        ("✓", "Cleanup")
    };
    println!(
        "  {} {} — {} removed, {} freed",
        icon,
        label.bold(),
        outcome.removed_packages.len().to_string().cyan(),
        format_size_colored(outcome.bytes_freed)
    );

    if outcome.cache_bytes > 0 {
        println!(
            "  {} System caches measured at {} (nothing deleted)",
            "🗂",
            format_size_colored(outcome.cache_bytes)
        );
    }

    if !outcome.executed_commands.is_empty() {
        println!();
        println!("  {}", "Commands run:".dimmed());
        for cmd in &outcome.executed_commands {
            println!("    $ {}", cmd.cyan());
        }
    }

    if !outcome.planned_commands.is_empty() {
        println!();
        println!("  {}", "Would run:".dimmed());
        for cmd in &outcome.planned_commands {
            println!("    $ {}", cmd.cyan());
        }
    }

    print_errors(&outcome.errors);
    print_steps(&outcome.steps);
    println!("  {}", outcome.message.bold());
    println!();
}

pub fn print_cleanup_quiet(outcome: &CleanupOutcome) {
    println!(
        "{}  {}  {}",
        outcome.removed_packages.len(),
        format::format_size(outcome.bytes_freed),
        format::format_size(outcome.cache_bytes)
    );
}

pub fn print_organize(outcome: &OrganizeOutcome) {
    println!();
    if !outcome.backed_up_files.is_empty() {
        let verb = if outcome.dry_run {
            "Would back up"
        } else {
            "Backed up"
        };
        println!(
            "  {} {} to {}:",
            "💾",
            verb,
            format_path(&outcome.backup_dir).cyan()
        );
        for f in &outcome.backed_up_files {
            println!("    {} {}", "•".dimmed(), f);
        }
        println!();
    }

    if let Some(ref shell) = outcome.shell_type {
        let timing = outcome
            .startup_time_ms
            .map(format_millis)
            .unwrap_or_else(|| "n/a".to_string());
        println!("  {} {} starts in {}", "⏱", shell.bold(), timing.cyan());
        println!();
    }

    println!("  {}", "Coach's recommendations:".bold());
    for r in &outcome.recommendations {
        println!("    {} {}", "→".cyan(), r);
    }

    print_errors(&outcome.errors);
    print_steps(&outcome.steps);
    println!();
}

pub fn print_nav(plan: &NavigationPlan) {
    println!();
    println!("  Creating your terminal navigation training plan...");
    println!(
        "  {}",
        "Like a good swimming workout, effective terminal navigation builds muscle memory."
            .dimmed()
    );

    format::print_header("Directory shortcuts");
    for a in &plan.directory_aliases {
        println!("  {:<14} {}", a.name.bold(), a.alias_command.cyan());
    }

    format::print_header("Useful commands");
    for c in &plan.useful_commands {
        println!("  {}", c.command.bold());
        println!("    {}", c.description.dimmed());
        println!("    {}", c.alias.cyan());
    }
    println!();
}

fn print_errors(errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    println!();
    println!("  {} {} errors:", "⚠".yellow(), errors.len());
    for (i, err) in errors.iter().enumerate().take(10) {
        println!("    {} {}", format!("{}.", i + 1).dimmed(), err.dimmed());
    }
    if errors.len() > 10 {
        println!(
            "    ... and {} more",
            (errors.len() - 10).to_string().dimmed()
        );
    }
}

fn print_steps(steps: &[StepReport]) {
    if steps.is_empty() {
        return;
    }
    println!();
    println!("  {}", "Training log:".dimmed());
    for s in steps {
        println!(
            "    {} {:<26} {}",
            format_step_status(&s.status),
            s.name,
            s.status.to_string().dimmed()
        );
    }
    println!();
}
