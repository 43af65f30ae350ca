use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ExecError, ExecResult};

/// What to hand the job runner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecPlan {
    /// Generated rule file.
    pub rule_file: PathBuf,
    /// Rule to bring up to date, normally the umbrella.
    pub goal: String,
    /// Most rules allowed to run at once.
    pub jobs: usize,
}

impl ExecPlan {
    pub fn new(rule_file: impl Into<PathBuf>, goal: impl Into<String>, jobs: usize) -> Self {
        Self {
            rule_file: rule_file.into(),
            goal: goal.into(),
            jobs,
        }
    }

    /// Reject plans no runner could carry out.
    pub fn validate(&self) -> ExecResult<()> {
        if self.jobs == 0 {
            return Err(ExecError::InvalidJobs);
        }
        Ok(())
    }
}

/// Outcome of a successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecReport {
    pub program: String,
    pub elapsed: Duration,
}

/// Executes a rule graph with bounded parallelism.
///
/// Implementations must:
/// - never run more than `plan.jobs` rules at once;
/// - never run a rule before its prerequisites are complete;
/// - skip rules whose target is already newer than its inputs.
///
/// A parallel make satisfies all three; gawsh itself implements none of them.
pub trait RuleExecutor: Send + Sync {
    fn execute(&self, plan: &ExecPlan) -> ExecResult<ExecReport>;
}
