use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use thiserror::Error;
use tokio::time::{sleep, Instant};

use crate::report::Reporter;

/// Outcome of one poll tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Check {
    /// Whether the awaited state has been reached.
    pub done: bool,
    /// Diagnostic for this tick; empty when there is nothing to say.
    pub reason: String,
}

impl Check {
    /// The awaited state has been reached.
    pub fn ready() -> Self {
        Check {
            done: true,
            reason: String::new(),
        }
    }

    /// Still waiting, with a diagnostic of what was observed instead.
    pub fn pending(reason: impl Into<String>) -> Self {
        Check {
            done: false,
            reason: reason.into(),
        }
    }
}

/// Terminal outcome of an unsuccessful wait.
#[derive(Debug, Error)]
pub enum WaitError {
    /// The deadline elapsed before the check succeeded. Carries the last
    /// non-empty reason observed, possibly empty if there never was one.
    #[error("condition not met within {waited:?}: {last_reason}")]
    TimedOut {
        waited: Duration,
        last_reason: String,
    },

    /// The check itself failed. Polling aborts without retrying: a failing
    /// check points at broken test setup, not slow convergence.
    #[error("condition check failed: {0:#}")]
    Check(#[source] anyhow::Error),
}

/// Polls `check` until it reports done, the deadline passes, or the check
/// fails fatally.
///
/// The check runs once immediately and then once per `tick` until `timeout`
/// has elapsed. Intermediate reasons are logged through `reporter` once 20%
/// of the timeout has passed, skipping repeats of the previously logged
/// reason; a flip to success with a reason in hand logs a closing line.
pub async fn try_eventually<R, F, Fut>(
    reporter: &R,
    mut check: F,
    timeout: Duration,
    tick: Duration,
) -> Result<(), WaitError>
where
    R: Reporter,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Check>>,
{
    let start = Instant::now();
    let mut last_reason = String::new();
    let mut last_logged: Option<String> = None;

    loop {
        let Check { done, reason } = check().await.map_err(WaitError::Check)?;
        if !reason.is_empty() {
            last_reason = reason.clone();
        }

        if start.elapsed() > timeout / 5 {
            if !done && !reason.is_empty() && last_logged.as_deref() != Some(&reason) {
                reporter.log(&format!("Waiting for condition, but got: {reason}"));
                last_logged = Some(reason);
            } else if done && !reason.is_empty() && last_logged.is_some() {
                reporter.log(&format!("Condition became true: {reason}"));
            }
        }

        if done {
            return Ok(());
        }
        if start.elapsed() >= timeout {
            return Err(WaitError::TimedOut {
                waited: timeout,
                last_reason,
            });
        }
        sleep(tick).await;
    }
}

/// Asserting variant of [`try_eventually`]: failures are routed into the
/// reporter instead of returned.
///
/// `context` names what the caller was waiting on and is appended to the
/// failure message when present.
pub async fn eventually<R, F, Fut>(
    reporter: &R,
    check: F,
    timeout: Duration,
    tick: Duration,
    context: Option<&str>,
) where
    R: Reporter,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Check>>,
{
    if let Err(error) = try_eventually(reporter, check, timeout, tick).await {
        let message = match context {
            Some(context) => format!("{error} ({context})"),
            None => error.to_string(),
        };
        reporter.fail(&message);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    use anyhow::anyhow;

    use super::*;
    use crate::report::RecordingReporter;

    fn counting_check(
        succeed_at: usize,
    ) -> (
        Arc<AtomicUsize>,
        impl FnMut() -> std::pin::Pin<Box<dyn Future<Output = Result<Check>>>>,
    ) {
        let attempts = Arc::new(AtomicUsize::new(0));
        let check_attempts = attempts.clone();
        let check = move || {
            let attempts = check_attempts.clone();
            Box::pin(async move {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt >= succeed_at {
                    Ok(Check::ready())
                } else {
                    Ok(Check::pending(format!("attempt {attempt} not ready")))
                }
            }) as std::pin::Pin<Box<dyn Future<Output = Result<Check>>>>
        };
        (attempts, check)
    }

    #[tokio::test]
    async fn succeeds_as_soon_as_check_does() {
        let reporter = RecordingReporter::new();
        let (attempts, check) = counting_check(5);

        let started = Instant::now();
        let result = try_eventually(
            &reporter,
            check,
            Duration::from_secs(1),
            Duration::from_millis(10),
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 5);
        // Nominally 40ms of ticks; leave slack for slow machines.
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn fails_once_with_last_reason_on_timeout() {
        let reporter = RecordingReporter::new();

        let started = Instant::now();
        eventually(
            &reporter,
            || async { Ok(Check::pending("still provisioning")) },
            Duration::from_millis(200),
            Duration::from_millis(50),
            None,
        )
        .await;

        let failures = reporter.failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("condition not met within 200ms"));
        assert!(failures[0].contains("still provisioning"));
        assert!(started.elapsed() >= Duration::from_millis(200));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn failure_message_carries_caller_context() {
        let reporter = RecordingReporter::new();

        eventually(
            &reporter,
            || async { Ok(Check::pending("")) },
            Duration::from_millis(50),
            Duration::from_millis(10),
            Some("registry catalog sync"),
        )
        .await;

        let failures = reporter.failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("(registry catalog sync)"));
    }

    #[tokio::test]
    async fn fatal_check_error_aborts_without_retrying() {
        let reporter = RecordingReporter::new();
        let attempts = Arc::new(AtomicUsize::new(0));
        let check_attempts = attempts.clone();

        let started = Instant::now();
        let result = try_eventually(
            &reporter,
            move || {
                let attempts = check_attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(anyhow!("connection refused"))
                }
            },
            Duration::from_secs(5),
            Duration::from_secs(1),
        )
        .await;

        assert!(matches!(result, Err(WaitError::Check(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn quiet_while_inside_throttle_window() {
        let reporter = RecordingReporter::new();
        let (_, check) = counting_check(3);

        // Succeeds around 100ms, well before 20% of the timeout.
        let result = try_eventually(
            &reporter,
            check,
            Duration::from_secs(2),
            Duration::from_millis(50),
        )
        .await;

        assert!(result.is_ok());
        assert!(reporter.lines().is_empty());
    }

    #[tokio::test]
    async fn repeated_reason_is_logged_once() {
        let reporter = RecordingReporter::new();

        let result = try_eventually(
            &reporter,
            || async { Ok(Check::pending("waiting on replica count")) },
            Duration::from_millis(400),
            Duration::from_millis(50),
        )
        .await;

        assert!(matches!(result, Err(WaitError::TimedOut { .. })));
        let lines = reporter.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("waiting on replica count"));
    }

    #[tokio::test]
    async fn flip_to_success_logs_closing_line() {
        let reporter = RecordingReporter::new();
        let attempts = Arc::new(AtomicUsize::new(0));
        let check_attempts = attempts.clone();

        let result = try_eventually(
            &reporter,
            move || {
                let attempts = check_attempts.clone();
                async move {
                    let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    if attempt >= 6 {
                        Ok(Check {
                            done: true,
                            reason: "all replicas ready".to_string(),
                        })
                    } else {
                        Ok(Check::pending("waiting on replica count"))
                    }
                }
            },
            Duration::from_millis(500),
            Duration::from_millis(50),
        )
        .await;

        assert!(result.is_ok());
        let lines = reporter.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("waiting on replica count"));
        assert!(lines[1].contains("Condition became true: all replicas ready"));
    }
}
