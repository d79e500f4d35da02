use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while running an asynchronous remote job.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("job task description must not be empty")]
    EmptyTask,

    /// The creation request failed or was rejected. `status` is `None` when
    /// no HTTP response was received at all.
    #[error("job submission failed (status {}): {body}", status_label(.status))]
    SubmissionFailed { status: Option<u16>, body: String },

    #[error("job submission response carried no usable handle: {0}")]
    MalformedSubmissionResponse(String),

    #[error("remote job failed after {attempts} status checks: {reason}")]
    JobFailed { attempts: u32, reason: String },

    #[error("remote job did not finish within {attempts} status checks")]
    JobTimedOut { attempts: u32 },

    #[error("remote job completed without any result content")]
    EmptyResult,

    #[error("failed to fetch job result: {0}")]
    ExtractionFailed(String),

    /// Only produced by status fetches; the poll loop absorbs it into a retry.
    #[error("transient network error: {0}")]
    NetworkTransient(String),

    #[error("job cancelled")]
    Cancelled,
}

fn status_label(status: &Option<u16>) -> String {
    status.map_or_else(|| "none".to_string(), |s| s.to_string())
}
