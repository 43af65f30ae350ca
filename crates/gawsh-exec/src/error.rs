/// Errors from running a rule file.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The job runner could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The job runner ran and reported failure.
    #[error("{program} exited with {}", describe_status(.status))]
    Failed { program: String, status: Option<i32> },

    /// A concurrency budget of zero can never make progress.
    #[error("job count must be at least 1")]
    InvalidJobs,

    /// The rule file to run does not exist.
    #[error("rule file not found: {0}")]
    MissingRuleFile(std::path::PathBuf),
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// Result alias for executor operations.
pub type ExecResult<T> = Result<T, ExecError>;
