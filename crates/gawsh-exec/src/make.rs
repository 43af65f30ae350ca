//! Executors that drive `make`.

use std::process::Command;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{ExecError, ExecResult};
use crate::traits::{ExecPlan, ExecReport, RuleExecutor};

/// Runs the rule file with a make binary, inheriting stdio.
#[derive(Clone, Debug)]
pub struct MakeExecutor {
    program: String,
    extra_args: Vec<String>,
}

impl MakeExecutor {
    /// Use `make` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("make")
    }

    /// Use a specific binary, e.g. `gmake` on BSDs.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Extra arguments placed before the goal, e.g. `--keep-going`.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// The argument vector `execute` would pass, program excluded.
    pub fn args_for(&self, plan: &ExecPlan) -> Vec<String> {
        let mut args = vec![
            format!("-j{}", plan.jobs),
            "-f".to_string(),
            plan.rule_file.display().to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args.push(plan.goal.clone());
        args
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for MakeExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleExecutor for MakeExecutor {
    fn execute(&self, plan: &ExecPlan) -> ExecResult<ExecReport> {
        plan.validate()?;
        if !plan.rule_file.is_file() {
            return Err(ExecError::MissingRuleFile(plan.rule_file.clone()));
        }

        let args = self.args_for(plan);
        info!(program = %self.program, jobs = plan.jobs, goal = %plan.goal, "starting job runner");
        debug!(?args, "job runner arguments");

        let started = Instant::now();
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|source| ExecError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let elapsed = started.elapsed();

        if !status.success() {
            return Err(ExecError::Failed {
                program: self.program.clone(),
                status: status.code(),
            });
        }
        info!(elapsed_ms = elapsed.as_millis() as u64, "job runner finished");
        Ok(ExecReport {
            program: self.program.clone(),
            elapsed,
        })
    }
}

/// Logs and records plans without running anything.
///
/// Backs `gawsh build --dry-run` and stands in for a real runner in tests.
#[derive(Debug, Default)]
pub struct DryRunExecutor {
    make: MakeExecutor,
    plans: Mutex<Vec<ExecPlan>>,
}

impl DryRunExecutor {
    pub fn new(make: MakeExecutor) -> Self {
        Self {
            make,
            plans: Mutex::new(Vec::new()),
        }
    }

    /// The command line a real run would use.
    pub fn command_line(&self, plan: &ExecPlan) -> String {
        let mut parts = vec![self.make.program().to_string()];
        parts.extend(self.make.args_for(plan));
        parts.join(" ")
    }

    /// Plans received so far.
    pub fn plans(&self) -> Vec<ExecPlan> {
        self.plans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RuleExecutor for DryRunExecutor {
    fn execute(&self, plan: &ExecPlan) -> ExecResult<ExecReport> {
        plan.validate()?;
        info!(command = %self.command_line(plan), "dry run; not executing");
        self.plans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(plan.clone());
        Ok(ExecReport {
            program: self.make.program().to_string(),
            elapsed: Duration::ZERO,
        })
    }
}
