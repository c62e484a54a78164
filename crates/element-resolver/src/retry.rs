//! Deadline-bounded polling against an eventually-consistent page

use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use tracing::debug;
use wd_adapter::DriverError;

/// Wall-clock cutoff for one top-level resolution call.
///
/// Computed once per call; every polling attempt within that call shares it.
#[derive(Clone, Copy, Debug)]
pub struct Deadline(Instant);

impl Deadline {
    pub fn from_timeout(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }

    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    /// Time left before the cutoff, zero once past it.
    pub fn remaining(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }

    pub fn expired(&self) -> bool {
        self.remaining().is_zero()
    }
}

/// The polling loop ran out of time before the condition was satisfied.
#[derive(Debug, Error)]
#[error("deadline expired before the condition was satisfied")]
pub struct DeadlineExpired {
    /// Last driver fault absorbed while polling, if any.
    #[source]
    pub cause: Option<DriverError>,
}

/// Repeatedly run `attempt` until it is satisfied or `deadline` passes.
///
/// `attempt` resolves to `Ok(Some(value))` when satisfied, `Ok(None)` when
/// not yet, and `Err` on a driver fault; faults are absorbed and retried,
/// with the last one kept as the timeout's diagnostic cause. The loop never
/// sleeps past the deadline: the final attempt runs at or just before it,
/// and no fresh attempt starts after it.
pub async fn retry_until<T, F, Fut>(
    deadline: Deadline,
    interval: Duration,
    mut attempt: F,
) -> Result<T, DeadlineExpired>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, DriverError>>,
{
    let mut last_error = None;
    loop {
        match attempt().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(error) => {
                debug!(error = %error, "attempt failed, treating as not yet satisfied");
                last_error = Some(error);
            }
        }

        let remaining = deadline.remaining();
        if remaining.is_zero() {
            return Err(DeadlineExpired { cause: last_error });
        }
        sleep(remaining.min(interval)).await;
    }
}
