use serde::Serialize;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::common::errors::CoachError;

/// How a single pipeline step ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Skipped { reason: String },
    /// The step ran but some of its items did not complete
    Partial { failures: usize },
}

impl StepStatus {
    pub fn skipped(reason: &str) -> Self {
        StepStatus::Skipped {
            reason: reason.to_string(),
        }
    }

    /// `Completed` when nothing failed, otherwise `Partial`
    pub fn from_failures(failures: usize) -> Self {
        if failures == 0 {
            StepStatus::Completed
        } else {
            StepStatus::Partial { failures }
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepStatus::Completed => write!(f, "completed"),
            StepStatus::Skipped { reason } => write!(f, "skipped ({})", reason),
            StepStatus::Partial { failures } => write!(f, "partial ({} failed)", failures),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub name: &'static str,
    #[serde(flatten)]
    pub status: StepStatus,
    pub duration_ms: u64,
}

/// A step mutates the run context and reports how it went.
/// Returning `Err` aborts the pipeline.
pub type StepFn<C> = fn(&mut C) -> Result<StepStatus, CoachError>;

/// Ordered list of named steps run against a shared context
pub struct Pipeline<C> {
    name: &'static str,
    steps: Vec<(&'static str, StepFn<C>)>,
}

impl<C> Pipeline<C> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, name: &'static str, run: StepFn<C>) -> Self {
        self.steps.push((name, run));
        self
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|(name, _)| *name).collect()
    }

    /// Run every step in order, stopping at the first fatal error
    pub fn run(&self, ctx: &mut C) -> Result<Vec<StepReport>, CoachError> {
        info!(pipeline = self.name, steps = self.steps.len(), "starting pipeline");
        let mut reports = Vec::with_capacity(self.steps.len());

        for &(name, run) in &self.steps {
            let started = Instant::now();
            let status = run(ctx).map_err(|e| {
                error!(pipeline = self.name, step = name, error = %e, "step failed");
                e
            })?;
            let duration_ms = started.elapsed().as_millis() as u64;
            debug!(pipeline = self.name, step = name, %status, duration_ms, "step finished");
            reports.push(StepReport {
                name,
                status,
                duration_ms,
            });
        }

        Ok(reports)
    }
}
