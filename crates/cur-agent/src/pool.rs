//! Bounded fan-out with per-call timeouts and a shared run deadline.
//!
//! Work items are spawned onto a [`JoinSet`] and gated by a [`Semaphore`].
//! Each task writes nothing shared; outcomes are placed by input index after
//! the join, so the result order always matches the input order.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// What happened to one unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome<T> {
    Completed(T),
    /// The call ran longer than the per-call timeout and was dropped.
    TimedOut(Duration),
    /// The run deadline had passed before the task could start.
    Skipped,
    /// The task panicked or was cancelled.
    Aborted(String),
}

impl<T> TaskOutcome<T> {
    /// Human-readable reason for any outcome other than `Completed`.
    #[must_use]
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Completed(_) => None,
            Self::TimedOut(after) => Some(format!("timed out after {}s", after.as_secs_f32())),
            Self::Skipped => Some("skipped: run deadline exceeded".to_string()),
            Self::Aborted(reason) => Some(format!("aborted: {reason}")),
        }
    }
}

/// Concurrency limiter for one subsystem.
#[derive(Debug, Clone, Copy)]
pub struct BoundedPool {
    max_in_flight: usize,
    call_timeout: Duration,
    deadline: Option<Instant>,
}

impl BoundedPool {
    /// A pool running at most `max_in_flight` calls, each bounded by `call_timeout`.
    ///
    /// A limit of zero is treated as one.
    #[must_use]
    pub fn new(max_in_flight: usize, call_timeout: Duration) -> Self {
        Self {
            max_in_flight: max_in_flight.max(1),
            call_timeout,
            deadline: None,
        }
    }

    /// Stop starting new work once `deadline` has passed.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub const fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Run `call` over every item and return one outcome per item, in input order.
    pub async fn run<I, T, F, Fut>(&self, items: Vec<I>, call: F) -> Vec<TaskOutcome<T>>
    where
        I: Send + 'static,
        T: Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let total = items.len();
        let permits = Arc::new(Semaphore::new(self.max_in_flight));
        let call = Arc::new(call);
        let mut tasks = JoinSet::new();

        for (index, item) in items.into_iter().enumerate() {
            let permits = Arc::clone(&permits);
            let call = Arc::clone(&call);
            let call_timeout = self.call_timeout;
            let deadline = self.deadline;

            tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return (index, TaskOutcome::Aborted("pool closed".to_string()));
                };
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    return (index, TaskOutcome::Skipped);
                }
                let outcome = match tokio::time::timeout(call_timeout, call(item)).await {
                    Ok(value) => TaskOutcome::Completed(value),
                    Err(_) => TaskOutcome::TimedOut(call_timeout),
                };
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<TaskOutcome<T>>> = std::iter::repeat_with(|| None).take(total).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(error) => tracing::error!(%error, "pool task did not complete"),
            }
        }

        slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| TaskOutcome::Aborted("task panicked".to_string())))
            .collect()
    }
}
