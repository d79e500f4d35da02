use std::fmt;

use serde::{Deserialize, Serialize};

/// Remote job status as classified from a single status fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
    /// A status outside the documented set. Retried, but kept distinct so
    /// protocol drift upstream shows up in the logs.
    Unknown(String),
}

/// What one iteration of the poll loop observed.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    Status {
        status: JobStatus,
        /// Remote error detail, if the status report carried one.
        detail: Option<String>,
    },
    /// The status fetch itself failed (network, HTTP status, body parse).
    Transient(String),
}

/// The states of the poll state machine.
///
/// A job starts in `Pending` and flows to exactly one terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Pending { attempt: u32 },
    Completed { attempts: u32 },
    Failed { attempts: u32, reason: String },
    TimedOut { attempts: u32 },
    Cancelled { attempts: u32 },
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Pending { .. })
    }
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollState::Pending { attempt } => write!(f, "PENDING({attempt})"),
            PollState::Completed { .. } => write!(f, "COMPLETED"),
            PollState::Failed { .. } => write!(f, "FAILED"),
            PollState::TimedOut { .. } => write!(f, "TIMED_OUT"),
            PollState::Cancelled { .. } => write!(f, "CANCELLED"),
        }
    }
}

/// Drives a job through the poll state machine.
///
/// Every observation consumes one attempt. `Completed` and `Failed` end the
/// loop immediately; `Pending`, `Unknown` and transient errors retry until
/// the attempt budget is spent.
#[derive(Debug, Clone)]
pub struct PollMachine {
    max_attempts: u32,
    state: PollState,
}

impl PollMachine {
    /// A budget of zero is treated as one: the loop always fetches at least once.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            state: PollState::Pending { attempt: 0 },
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Number of status fetches observed so far.
    pub fn attempts(&self) -> u32 {
        match self.state {
            PollState::Pending { attempt } => attempt,
            PollState::Completed { attempts }
            | PollState::Failed { attempts, .. }
            | PollState::TimedOut { attempts }
            | PollState::Cancelled { attempts } => attempts,
        }
    }

    /// Apply one observation and return the new state.
    ///
    /// Terminal states absorb further observations unchanged.
    pub fn observe(&mut self, observation: Observation) -> &PollState {
        if self.state.is_terminal() {
            return &self.state;
        }
        let attempts = self.attempts() + 1;

        self.state = match observation {
            Observation::Status {
                status: JobStatus::Completed,
                ..
            } => PollState::Completed { attempts },
            Observation::Status {
                status: JobStatus::Failed,
                detail,
            } => PollState::Failed {
                attempts,
                reason: detail.unwrap_or_else(|| "remote job reported failure".to_string()),
            },
            Observation::Status { .. } | Observation::Transient(_) => {
                if attempts >= self.max_attempts {
                    PollState::TimedOut { attempts }
                } else {
                    PollState::Pending { attempt: attempts }
                }
            }
        };

        &self.state
    }

    /// Cancellation is a transition of its own, valid from any non-terminal state.
    pub fn cancel(&mut self) -> &PollState {
        if !self.state.is_terminal() {
            self.state = PollState::Cancelled {
                attempts: self.attempts(),
            };
        }
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: JobStatus) -> Observation {
        Observation::Status {
            status,
            detail: None,
        }
    }

    #[test]
    fn pending_then_completed() {
        let mut machine = PollMachine::new(10);
        assert_eq!(
            machine.observe(status(JobStatus::Pending)),
            &PollState::Pending { attempt: 1 }
        );
        assert_eq!(
            machine.observe(status(JobStatus::Pending)),
            &PollState::Pending { attempt: 2 }
        );
        assert_eq!(
            machine.observe(status(JobStatus::Completed)),
            &PollState::Completed { attempts: 3 }
        );
        assert!(machine.state().is_terminal());
    }

    #[test]
    fn failed_is_terminal_without_retry() {
        let mut machine = PollMachine::new(10);
        let state = machine.observe(Observation::Status {
            status: JobStatus::Failed,
            detail: Some("bot crashed".into()),
        });
        assert_eq!(
            state,
            &PollState::Failed {
                attempts: 1,
                reason: "bot crashed".into()
            }
        );

        // Terminal states absorb further observations.
        machine.observe(status(JobStatus::Completed));
        assert!(matches!(machine.state(), PollState::Failed { .. }));
    }

    #[test]
    fn budget_exhaustion_times_out() {
        let mut machine = PollMachine::new(3);
        machine.observe(status(JobStatus::Pending));
        machine.observe(status(JobStatus::Pending));
        assert_eq!(
            machine.observe(status(JobStatus::Pending)),
            &PollState::TimedOut { attempts: 3 }
        );
    }

    #[test]
    fn transient_error_consumes_an_attempt() {
        let mut machine = PollMachine::new(2);
        assert_eq!(
            machine.observe(Observation::Transient("connection reset".into())),
            &PollState::Pending { attempt: 1 }
        );
        assert_eq!(
            machine.observe(Observation::Transient("connection reset".into())),
            &PollState::TimedOut { attempts: 2 }
        );
    }

    #[test]
    fn unknown_status_is_retried() {
        let mut machine = PollMachine::new(5);
        assert_eq!(
            machine.observe(status(JobStatus::Unknown("canceled".into()))),
            &PollState::Pending { attempt: 1 }
        );
    }

    #[test]
    fn zero_budget_still_fetches_once() {
        let mut machine = PollMachine::new(0);
        assert_eq!(machine.max_attempts(), 1);
        assert_eq!(
            machine.observe(status(JobStatus::Pending)),
            &PollState::TimedOut { attempts: 1 }
        );
    }

    #[test]
    fn cancel_from_pending() {
        let mut machine = PollMachine::new(5);
        machine.observe(status(JobStatus::Pending));
        assert_eq!(machine.cancel(), &PollState::Cancelled { attempts: 1 });
        assert_eq!(machine.attempts(), 1);
    }

    #[test]
    fn cancel_after_completion_is_ignored() {
        let mut machine = PollMachine::new(5);
        machine.observe(status(JobStatus::Completed));
        assert_eq!(machine.cancel(), &PollState::Completed { attempts: 1 });
    }

    #[test]
    fn state_display() {
        assert_eq!(PollState::Pending { attempt: 2 }.to_string(), "PENDING(2)");
        assert_eq!(PollState::Completed { attempts: 1 }.to_string(), "COMPLETED");
        assert_eq!(PollState::TimedOut { attempts: 10 }.to_string(), "TIMED_OUT");
    }
}
