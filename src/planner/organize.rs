use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use super::pipeline::{Pipeline, StepReport, StepStatus};
use crate::common::errors::CoachError;
use crate::probe::{shell_name, FALLBACK_SHELL};
use crate::runner::{shell_quote, CommandRunner};

/// Shell startup files backed up by `organize`
pub const SHELL_CONFIG_FILES: &[&str] = &[
    ".bash_profile",
    ".bashrc",
    ".zshrc",
    ".zprofile",
    ".profile",
];

pub const SLOW_STARTUP_RECOMMENDATION: &str =
    "Your shell startup time is high. Consider optimizing your profile scripts.";

pub const GENERAL_RECOMMENDATIONS: &[&str] = &[
    "Use aliases for common commands to improve efficiency.",
    "Consider using a modern shell like zsh with syntax highlighting.",
    "Organize your PATH variable to avoid duplicates and improve lookup times.",
];

#[derive(Debug, Clone)]
pub struct OrganizeRequest {
    pub backup_configs: bool,
    pub analyze_shell: bool,
    pub dry_run: bool,
}

impl Default for OrganizeRequest {
    fn default() -> Self {
        Self {
            backup_configs: true,
            analyze_shell: true,
            dry_run: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganizeOutcome {
    pub dry_run: bool,
    /// Config file names that were copied (or would be, on a dry run)
    pub backed_up_files: Vec<String>,
    pub backup_dir: PathBuf,
    pub shell_type: Option<String>,
    pub startup_time_ms: Option<u64>,
    pub recommendations: Vec<String>,
    pub errors: Vec<String>,
    pub steps: Vec<StepReport>,
}

/// Backs up shell dotfiles and reviews shell startup cost.
pub struct OrganizePlanner<'a> {
    runner: &'a dyn CommandRunner,
    home: PathBuf,
    backup_dir: PathBuf,
    stamp: String,
    shell_path: String,
    threshold_ms: u64,
}

impl<'a> OrganizePlanner<'a> {
    pub fn new(runner: &'a dyn CommandRunner, home: &Path, backup_dir_name: &str) -> Self {
        Self {
            runner,
            home: home.to_path_buf(),
            backup_dir: home.join(backup_dir_name),
            stamp: chrono::Local::now().format("%Y%m%d").to_string(),
            shell_path: std::env::var("SHELL").unwrap_or_else(|_| FALLBACK_SHELL.to_string()),
            threshold_ms: 500,
        }
    }

    pub fn with_shell(mut self, shell_path: &str) -> Self {
        self.shell_path = shell_path.to_string();
        self
    }

    pub fn with_threshold_ms(mut self, threshold_ms: u64) -> Self {
        self.threshold_ms = threshold_ms;
        self
    }

    /// Suffix appended to backup copies, `YYYYMMDD` by default
    pub fn with_stamp(mut self, stamp: &str) -> Self {
        self.stamp = stamp.to_string();
        self
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Full login-shell command whose runtime is measured
    pub fn startup_command(&self) -> String {
        format!("{} -l -c exit", shell_quote(&self.shell_path))
    }

    pub fn pipeline<'r>() -> Pipeline<OrganizeRun<'r>> {
        Pipeline::new("organize")
            .step("backup_configs", backup_configs)
            .step("measure_shell_startup", measure_shell_startup)
            .step("general_recommendations", general_recommendations)
    }

    pub fn organize(&self, request: &OrganizeRequest) -> Result<OrganizeOutcome, CoachError> {
        let mut run = OrganizeRun {
            planner: self,
            request,
            outcome: OrganizeOutcome {
                dry_run: request.dry_run,
                backed_up_files: Vec::new(),
                backup_dir: self.backup_dir.clone(),
                shell_type: None,
                startup_time_ms: None,
                recommendations: Vec::new(),
                errors: Vec::new(),
                steps: Vec::new(),
            },
        };
        let steps = Self::pipeline().run(&mut run)?;

        let mut outcome = run.outcome;
        outcome.steps = steps;
        Ok(outcome)
    }
}

pub struct OrganizeRun<'a> {
    planner: &'a OrganizePlanner<'a>,
    request: &'a OrganizeRequest,
    outcome: OrganizeOutcome,
}

fn backup_configs(run: &mut OrganizeRun<'_>) -> Result<StepStatus, CoachError> {
    if !run.request.backup_configs {
        return Ok(StepStatus::skipped("not requested"));
    }

    let planner = run.planner;
    let existing: Vec<&str> = SHELL_CONFIG_FILES
        .iter()
        .copied()
        .filter(|f| planner.home.join(f).is_file())
        .collect();

    if existing.is_empty() {
        return Ok(StepStatus::skipped("no shell config files found"));
    }

    if run.request.dry_run {
        run.outcome
            .backed_up_files
            .extend(existing.iter().map(|f| f.to_string()));
        return Ok(StepStatus::Completed);
    }

    if let Err(e) = std::fs::create_dir_all(&planner.backup_dir) {
        let err = CoachError::Io {
            path: planner.backup_dir.clone(),
            source: e,
        };
        warn!(error = %err, "could not create backup directory");
        run.outcome.errors.push(err.to_string());
        return Ok(StepStatus::Partial {
            failures: existing.len(),
        });
    }

    let mut failures = 0;
    for file in existing {
        let source = planner.home.join(file);
        let target = planner
            .backup_dir
            .join(format!("{}.{}", file, planner.stamp));
        match std::fs::copy(&source, &target) {
            Ok(_) => {
                info!(file, target = %target.display(), "backed up config file");
                run.outcome.backed_up_files.push(file.to_string());
            }
            Err(e) => {
                failures += 1;
                run.outcome
                    .errors
                    .push(format!("Failed to back up '{}': {}", file, e));
            }
        }
    }
    Ok(StepStatus::from_failures(failures))
}

fn measure_shell_startup(run: &mut OrganizeRun<'_>) -> Result<StepStatus, CoachError> {
    if !run.request.analyze_shell {
        return Ok(StepStatus::skipped("not requested"));
    }

    let planner = run.planner;
    run.outcome.shell_type = Some(shell_name(Some(&planner.shell_path)));

    let started = Instant::now();
    let result = planner.runner.run(&planner.startup_command());
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let status = match result {
        Ok(_) => StepStatus::Completed,
        Err(e) if e.is_fatal() => return Err(e.into()),
        Err(e) => {
            // a slow or failing profile still produced a meaningful timing
            run.outcome
                .errors
                .push(format!("Shell startup check did not exit cleanly: {}", e));
            StepStatus::Partial { failures: 1 }
        }
    };

    info!(elapsed_ms, threshold_ms = planner.threshold_ms, "measured shell startup");
    run.outcome.startup_time_ms = Some(elapsed_ms);
    if elapsed_ms > planner.threshold_ms {
        run.outcome
            .recommendations
            .push(SLOW_STARTUP_RECOMMENDATION.to_string());
    }
    Ok(status)
}

fn general_recommendations(run: &mut OrganizeRun<'_>) -> Result<StepStatus, CoachError> {
    run.outcome
        .recommendations
        .extend(GENERAL_RECOMMENDATIONS.iter().map(|r| r.to_string()));
    Ok(StepStatus::Completed)
}
