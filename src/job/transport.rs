use std::future::Future;

use super::error::JobError;
use super::state::{JobStatus, Observation};

/// Handle of a submitted remote job.
///
/// `id` identifies the job itself; `conversation_id` is the reference under
/// which the job's output messages are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub id: String,
    pub conversation_id: String,
}

/// One status report returned by the remote service.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub status: JobStatus,
    pub detail: Option<String>,
}

impl From<StatusReport> for Observation {
    fn from(report: StatusReport) -> Self {
        Observation::Status {
            status: report.status,
            detail: report.detail,
        }
    }
}

/// The three calls of an asynchronous job API: create, check, collect.
///
/// Implemented by the HTTP client for the real service and by scripted
/// fakes in tests.
pub trait JobTransport {
    /// Create a job for `task` and return its handle.
    fn submit(&self, task: &str) -> impl Future<Output = Result<JobHandle, JobError>> + Send;

    /// Fetch the current status of a job.
    fn fetch_status(
        &self,
        handle: &JobHandle,
    ) -> impl Future<Output = Result<StatusReport, JobError>> + Send;

    /// Fetch the message contents produced by a completed job, oldest first.
    fn fetch_messages(
        &self,
        handle: &JobHandle,
    ) -> impl Future<Output = Result<Vec<String>, JobError>> + Send;
}
