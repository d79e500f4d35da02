//! Asynchronous remote jobs: submit once, poll a bounded number of times, extract.

mod error;
mod runner;
mod state;
mod transport;

pub use error::JobError;
pub use runner::{PollSettings, run_job};
pub use state::JobStatus;
pub use transport::{JobHandle, JobTransport, StatusReport};
