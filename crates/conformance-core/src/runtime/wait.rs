// crates/conformance-core/src/runtime/wait.rs
// ============================================================================
// Module: Settle Policies
// Description: Bounded waits applied before reconciling asynchronous effects.
// Purpose: Replace unconditional sleeps with bounded polling.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! Mutations such as uploads are persisted asynchronously by the service.
//! A [`WaitPolicy`] re-runs a poll until its result satisfies a predicate or
//! a deadline passes. Sleeps are async and never block other tasks.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio::time::sleep;

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Shortest delay between two backoff polls.
pub const MIN_BACKOFF_DELAY: Duration = Duration::from_millis(1);

/// Strategy for waiting on asynchronously persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Poll once, without waiting.
    Immediate,
    /// Sleep a fixed delay, then poll once.
    Fixed {
        /// Delay before the poll.
        delay: Duration,
    },
    /// Poll repeatedly with exponential backoff until settled or timed out.
    Backoff {
        /// Delay after the first unsettled poll.
        initial: Duration,
        /// Upper bound for a single delay.
        max_delay: Duration,
        /// Overall deadline measured from the first poll.
        timeout: Duration,
    },
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self::Backoff {
            initial: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Final poll result of a settle loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled<T> {
    /// Last poll value.
    pub value: T,
    /// Number of polls issued.
    pub attempts: u32,
    /// Whether the predicate held for `value`.
    pub settled: bool,
}

impl WaitPolicy {
    /// Builds a backoff policy.
    ///
    /// Delays below [`MIN_BACKOFF_DELAY`] are raised to it when the policy
    /// runs, so a zero `initial` or `max_delay` never busy-polls.
    #[must_use]
    pub const fn backoff(initial: Duration, max_delay: Duration, timeout: Duration) -> Self {
        Self::Backoff {
            initial,
            max_delay,
            timeout,
        }
    }

    /// Runs `poll` until `done` accepts its value or the policy gives up.
    ///
    /// # Errors
    ///
    /// Returns the first poll error; errors are never retried.
    pub async fn settle<T, E, F, Fut, D>(&self, mut poll: F, done: D) -> Result<Settled<T>, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        D: Fn(&T) -> bool,
    {
        match *self {
            Self::Immediate => Ok(single(poll().await?, &done)),
            Self::Fixed {
                delay,
            } => {
                sleep(delay).await;
                Ok(single(poll().await?, &done))
            }
            Self::Backoff {
                initial,
                max_delay,
                timeout,
            } => {
                let start = Instant::now();
                let max_delay = max_delay.max(MIN_BACKOFF_DELAY);
                let mut delay = initial.clamp(MIN_BACKOFF_DELAY, max_delay);
                let mut attempts = 0u32;
                loop {
                    attempts = attempts.saturating_add(1);
                    let value = poll().await?;
                    if done(&value) {
                        return Ok(Settled {
                            value,
                            attempts,
                            settled: true,
                        });
                    }
                    let elapsed = start.elapsed();
                    if elapsed >= timeout {
                        return Ok(Settled {
                            value,
                            attempts,
                            settled: false,
                        });
                    }
                    sleep(delay.min(timeout - elapsed)).await;
                    delay = delay.saturating_mul(2).min(max_delay);
                }
            }
        }
    }
}

/// Wraps a single poll result.
fn single<T, D: Fn(&T) -> bool>(value: T, done: &D) -> Settled<T> {
    let settled = done(&value);
    Settled {
        value,
        attempts: 1,
        settled,
    }
}
