//! Submit → poll → extract driver for asynchronous remote jobs.
//!
//! Every step observes a [`CancellationToken`] so a dropped request stops
//! consuming its retry budget right away.

use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::JobError;
use super::state::{JobStatus, Observation, PollMachine, PollState};
use super::transport::{JobHandle, JobTransport};
use crate::config::PollConfig;

/// Retry budget and fixed delay for the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: Duration::from_millis(2000),
        }
    }
}

impl From<&PollConfig> for PollSettings {
    fn from(config: &PollConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            interval: config.interval(),
        }
    }
}

/// Create the remote job. One request, no retries.
pub async fn submit(
    transport: &impl JobTransport,
    task: &str,
    cancel: &CancellationToken,
) -> Result<JobHandle, JobError> {
    if task.trim().is_empty() {
        return Err(JobError::EmptyTask);
    }

    let handle = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(JobError::Cancelled),
        result = transport.submit(task) => result?,
    };
    info!(job_id = %handle.id, "remote job submitted");
    Ok(handle)
}

/// Poll until the job completes, fails, or the attempt budget runs out.
///
/// Returns the number of status fetches performed. Transient fetch errors and
/// unknown statuses are logged and counted as retries, never surfaced.
pub async fn poll_until_complete(
    transport: &impl JobTransport,
    handle: &JobHandle,
    settings: &PollSettings,
    cancel: &CancellationToken,
) -> Result<u32, JobError> {
    let mut machine = PollMachine::new(settings.max_attempts);

    loop {
        let observation = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                machine.cancel();
                return Err(JobError::Cancelled);
            }
            result = transport.fetch_status(handle) => match result {
                Ok(report) => Observation::from(report),
                Err(e) => {
                    warn!(
                        job_id = %handle.id,
                        attempt = machine.attempts() + 1,
                        max = machine.max_attempts(),
                        error = %e,
                        "status check failed, will retry"
                    );
                    Observation::Transient(e.to_string())
                }
            },
        };

        if let Observation::Status {
            status: JobStatus::Unknown(raw),
            ..
        } = &observation
        {
            warn!(
                job_id = %handle.id,
                status = %raw,
                "unrecognised job status, treating as pending"
            );
        }

        match machine.observe(observation).clone() {
            PollState::Pending { attempt } => {
                debug!(
                    job_id = %handle.id,
                    attempt,
                    max = machine.max_attempts(),
                    "job still running"
                );
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        machine.cancel();
                        return Err(JobError::Cancelled);
                    }
                    _ = sleep(settings.interval) => {}
                }
            }
            PollState::Completed { attempts } => {
                info!(job_id = %handle.id, attempts, "remote job completed");
                return Ok(attempts);
            }
            PollState::Failed { attempts, reason } => {
                warn!(
                    job_id = %handle.id,
                    state = %machine.state(),
                    attempts,
                    %reason,
                    "remote job failed"
                );
                return Err(JobError::JobFailed { attempts, reason });
            }
            PollState::TimedOut { attempts } => {
                warn!(
                    job_id = %handle.id,
                    state = %machine.state(),
                    attempts,
                    "remote job did not finish in time"
                );
                return Err(JobError::JobTimedOut { attempts });
            }
            PollState::Cancelled { .. } => return Err(JobError::Cancelled),
        }
    }
}

/// Fetch the completed job's messages and return the content of the last one.
pub async fn extract_result(
    transport: &impl JobTransport,
    handle: &JobHandle,
    cancel: &CancellationToken,
) -> Result<String, JobError> {
    let messages = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(JobError::Cancelled),
        result = transport.fetch_messages(handle) => result?,
    };

    let content = messages.into_iter().last().ok_or(JobError::EmptyResult)?;
    if content.trim().is_empty() {
        return Err(JobError::EmptyResult);
    }
    Ok(content)
}

/// Run a whole job: submit, poll to completion, extract the final content.
pub async fn run_job(
    transport: &impl JobTransport,
    task: &str,
    settings: &PollSettings,
    cancel: &CancellationToken,
) -> Result<String, JobError> {
    let handle = submit(transport, task, cancel).await?;
    poll_until_complete(transport, &handle, settings, cancel).await?;
    extract_result(transport, &handle, cancel).await
}
