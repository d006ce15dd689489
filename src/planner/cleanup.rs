use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::pipeline::{Pipeline, StepReport, StepStatus};
use crate::common::errors::CoachError;
use crate::common::paths::{dir_size, expand_tilde};
use crate::managers::{parse_outdated, Package, PackageManagerDescriptor, PackageManagerRegistry};
use crate::probe::is_installed;
use crate::runner::{CommandError, CommandRunner};

/// Whether unused packages can be detected at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnusedDetection {
    /// No usage tracking exists; `unused_packages` is always empty
    Unsupported,
}

/// Outdated and unused packages across all installed managers
#[derive(Debug, Clone, Serialize)]
pub struct ExpiredScan {
    pub expired_packages: Vec<Package>,
    pub unused_packages: Vec<Package>,
    pub total_count: usize,
    pub unused_detection: UnusedDetection,
    pub steps: Vec<StepReport>,
}

#[derive(Debug, Clone)]
pub struct CleanupRequest {
    pub remove_outdated: bool,
    pub clean_caches: bool,
    pub dry_run: bool,
    /// Packages to uninstall when `remove_outdated` is set
    pub packages: Vec<Package>,
}

impl Default for CleanupRequest {
    fn default() -> Self {
        Self {
            remove_outdated: false,
            clean_caches: false,
            dry_run: true,
            packages: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanupOutcome {
    pub success: bool,
    pub message: String,
    pub dry_run: bool,
    pub removed_packages: Vec<Package>,
    /// Commands that were actually run, in order
    pub executed_commands: Vec<String>,
    /// Commands a dry run would have run
    pub planned_commands: Vec<String>,
    /// Measured size of the known cache directories
    pub cache_bytes: u64,
    /// Space notionally reclaimed; stays 0 on dry runs
    pub bytes_freed: u64,
    pub errors: Vec<String>,
    pub steps: Vec<StepReport>,
}

impl CleanupOutcome {
    fn new(dry_run: bool) -> Self {
        Self {
            success: false,
            message: String::new(),
            dry_run,
            removed_packages: Vec::new(),
            executed_commands: Vec::new(),
            planned_commands: Vec::new(),
            cache_bytes: 0,
            bytes_freed: 0,
            errors: Vec::new(),
            steps: Vec::new(),
        }
    }
}

/// Cache directories measured by `clean --caches`
pub fn default_cache_dirs(home: &Path) -> Vec<PathBuf> {
    vec![home.join("Library/Caches"), PathBuf::from("/Library/Caches")]
}

/// Finds outdated packages and runs package-manager housekeeping.
pub struct CleanupPlanner<'a> {
    runner: &'a dyn CommandRunner,
    registry: PackageManagerRegistry,
    cache_dirs: Vec<PathBuf>,
}

impl<'a> CleanupPlanner<'a> {
    pub fn new(runner: &'a dyn CommandRunner, registry: PackageManagerRegistry, home: &Path) -> Self {
        Self {
            runner,
            registry,
            cache_dirs: default_cache_dirs(home),
        }
    }

    /// Measure these directories instead of the defaults
    pub fn with_cache_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.cache_dirs = dirs;
        self
    }

    /// Append extra (possibly `~`-prefixed) cache directories
    pub fn with_extra_cache_dirs(mut self, extra: &[String], home: &Path) -> Self {
        self.cache_dirs
            .extend(extra.iter().map(|d| expand_tilde(d, home)));
        self
    }

    pub fn cache_dirs(&self) -> &[PathBuf] {
        &self.cache_dirs
    }

    pub fn scan_pipeline<'r>() -> Pipeline<ScanRun<'r>> {
        Pipeline::new("scan")
            .step("detect_managers", scan_detect_managers)
            .step("collect_outdated", collect_outdated)
            .step("detect_unused", detect_unused)
    }

    pub fn cleanup_pipeline<'r>() -> Pipeline<CleanupRun<'r>> {
        Pipeline::new("cleanup")
            .step("detect_managers", cleanup_detect_managers)
            .step("remove_packages", remove_packages)
            .step("run_manager_cleanup", run_manager_cleanup)
            .step("measure_caches", measure_caches)
    }

    pub fn scan_expired(&self) -> Result<ExpiredScan, CoachError> {
        let mut run = ScanRun {
            runner: self.runner,
            registry: self.registry,
            installed: Vec::new(),
            expired: Vec::new(),
            unused: Vec::new(),
        };
        let steps = Self::scan_pipeline().run(&mut run)?;

        let total_count = run.expired.len() + run.unused.len();
        info!(total_count, "expired package scan complete");
        Ok(ExpiredScan {
            expired_packages: run.expired,
            unused_packages: run.unused,
            total_count,
            unused_detection: UnusedDetection::Unsupported,
            steps,
        })
    }

    pub fn cleanup(&self, request: &CleanupRequest) -> Result<CleanupOutcome, CoachError> {
        let mut run = CleanupRun {
            runner: self.runner,
            registry: self.registry,
            request,
            cache_dirs: &self.cache_dirs,
            installed: Vec::new(),
            outcome: CleanupOutcome::new(request.dry_run),
        };
        let steps = Self::cleanup_pipeline().run(&mut run)?;

        let mut outcome = run.outcome;
        outcome.steps = steps;
        outcome.success = true;
        outcome.message = if request.dry_run {
            "Dry run complete. No changes were made.".to_string()
        } else {
            "System optimization complete!".to_string()
        };
        Ok(outcome)
    }
}

pub struct ScanRun<'a> {
    runner: &'a dyn CommandRunner,
    registry: PackageManagerRegistry,
    installed: Vec<&'static PackageManagerDescriptor>,
    expired: Vec<Package>,
    unused: Vec<Package>,
}

pub struct CleanupRun<'a> {
    runner: &'a dyn CommandRunner,
    registry: PackageManagerRegistry,
    request: &'a CleanupRequest,
    cache_dirs: &'a [PathBuf],
    installed: Vec<&'static PackageManagerDescriptor>,
    outcome: CleanupOutcome,
}

fn installed_managers(
    runner: &dyn CommandRunner,
    registry: PackageManagerRegistry,
) -> Vec<&'static PackageManagerDescriptor> {
    registry.iter().filter(|d| is_installed(runner, d)).collect()
}

/// Non-fatal failures become `None`; launch failures abort the pipeline.
fn advisory(result: Result<String, CommandError>) -> Result<Option<String>, CoachError> {
    match result {
        Ok(out) => Ok(Some(out)),
        Err(e) if e.is_fatal() => Err(e.into()),
        Err(_) => Ok(None),
    }
}

fn scan_detect_managers(run: &mut ScanRun<'_>) -> Result<StepStatus, CoachError> {
    run.installed = installed_managers(run.runner, run.registry);
    if run.installed.is_empty() {
        return Ok(StepStatus::skipped("no package managers found"));
    }
    Ok(StepStatus::Completed)
}

fn collect_outdated(run: &mut ScanRun<'_>) -> Result<StepStatus, CoachError> {
    if run.installed.is_empty() {
        return Ok(StepStatus::skipped("no package managers found"));
    }

    let mut failures = 0;
    for manager in &run.installed {
        let listing = advisory(run.runner.run(manager.list))?;
        if listing.as_deref().map_or(true, |l| l.trim().is_empty()) {
            // nothing installed through this manager, or it could not tell us
            continue;
        }

        match advisory(run.runner.run(manager.outdated))? {
            Some(out) => {
                let found = parse_outdated(manager.id, Some(&out));
                info!(manager = manager.id, outdated = found.len(), "checked packages");
                run.expired.extend(found);
            }
            None => failures += 1,
        }
    }
    Ok(StepStatus::from_failures(failures))
}

fn detect_unused(_run: &mut ScanRun<'_>) -> Result<StepStatus, CoachError> {
    Ok(StepStatus::skipped("package usage tracking is not supported"))
}

fn cleanup_detect_managers(run: &mut CleanupRun<'_>) -> Result<StepStatus, CoachError> {
    run.installed = installed_managers(run.runner, run.registry);
    if run.installed.is_empty() {
        return Ok(StepStatus::skipped("no package managers found"));
    }
    Ok(StepStatus::Completed)
}

fn remove_packages(run: &mut CleanupRun<'_>) -> Result<StepStatus, CoachError> {
    if !run.request.remove_outdated {
        return Ok(StepStatus::skipped("not requested"));
    }
    if run.request.packages.is_empty() {
        return Ok(StepStatus::skipped("no packages selected"));
    }

    let mut failures = 0;
    for package in &run.request.packages {
        let Some(manager) = run.registry.lookup(&package.manager) else {
            failures += 1;
            run.outcome.errors.push(
                CoachError::UnknownManager {
                    id: package.manager.clone(),
                }
                .to_string(),
            );
            continue;
        };

        let command = manager.uninstall_command(&package.name);
        if run.request.dry_run {
            run.outcome.planned_commands.push(command);
            continue;
        }

        run.outcome.executed_commands.push(command.clone());
        match run.runner.run(&command) {
            Ok(_) => run.outcome.removed_packages.push(package.clone()),
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                warn!(package = %package.name, error = %e, "package removal failed");
                failures += 1;
                run.outcome
                    .errors
                    .push(format!("Failed to remove '{}': {}", package.name, e));
            }
        }
    }
    Ok(StepStatus::from_failures(failures))
}

fn run_manager_cleanup(run: &mut CleanupRun<'_>) -> Result<StepStatus, CoachError> {
    if run.installed.is_empty() {
        return Ok(StepStatus::skipped("no package managers found"));
    }

    let mut failures = 0;
    for manager in &run.installed {
        let command = manager.cleanup.to_string();
        if run.request.dry_run {
            run.outcome.planned_commands.push(command);
            continue;
        }

        run.outcome.executed_commands.push(command.clone());
        if let Err(e) = run.runner.run(&command) {
            if e.is_fatal() {
                return Err(e.into());
            }
            failures += 1;
            run.outcome
                .errors
                .push(format!("{} cleanup did not finish: {}", manager.name, e));
        }
    }
    Ok(StepStatus::from_failures(failures))
}

/// Measures cache directories. Nothing is ever deleted here.
fn measure_caches(run: &mut CleanupRun<'_>) -> Result<StepStatus, CoachError> {
    if !run.request.clean_caches {
        return Ok(StepStatus::skipped("not requested"));
    }

    for dir in run.cache_dirs.iter().filter(|d| d.is_dir()) {
        let size = dir_size(dir);
        info!(dir = %dir.display(), size, "measured cache directory");
        run.outcome.cache_bytes += size;
        if !run.request.dry_run {
            run.outcome.bytes_freed += size;
        }
    }
    Ok(StepStatus::Completed)
}
