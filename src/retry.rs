use std::fmt;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Number of attempts made before a removal is reported as failed.
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Fixed pause between two attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Fixed-delay retry for blocking operations.
///
/// There is no backoff growth and no jitter. The delay is only slept between
/// attempts, never after the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// Run `op` until it succeeds or the attempts are used up, sleeping the
    /// current thread in between.
    pub fn run<T, E, F>(&self, op: F) -> Result<T, E>
    where
        E: fmt::Display,
        F: FnMut() -> Result<T, E>,
    {
        self.run_with_sleep(thread::sleep, op)
    }

    /// Same as [`run`](Self::run) with a caller-supplied sleep function.
    ///
    /// An `attempts` value of zero still runs the operation once. The error
    /// returned is the one from the final attempt.
    pub fn run_with_sleep<T, E, S, F>(&self, mut sleep: S, mut op: F) -> Result<T, E>
    where
        E: fmt::Display,
        S: FnMut(Duration),
        F: FnMut() -> Result<T, E>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= attempts => return Err(e),
                Err(e) => {
                    debug!(
                        "Attempt {}/{} failed: {}, retrying in {:?}",
                        attempt, attempts, e, self.delay
                    );
                    sleep(self.delay);
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPTS, DEFAULT_DELAY)
    }
}
