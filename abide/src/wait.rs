use std::future::Future;
use std::time::Duration;

use abide_core::{Condition, ConditionMatcher, ConditionStatus, Conditional, READY};
use anyhow::{Context, Result};

use crate::poll::{eventually, Check};
use crate::report::Reporter;

/// Deadline applied by [`WaitConfig::default`]: long enough for any healthy
/// convergence, short enough to keep a broken suite bounded.
pub const FOREVER_TEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tick applied by [`WaitConfig::default`].
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Timing of one wait: the total deadline and the interval between checks.
///
/// Always passed explicitly; `WaitConfig::default()` is the conventional
/// pair and individual fields can be overridden with struct update syntax.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitConfig {
    pub timeout: Duration,
    pub tick: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        WaitConfig {
            timeout: FOREVER_TEST_TIMEOUT,
            tick: DEFAULT_TICK,
        }
    }
}

/// Repeatedly fetches an object through `getter` until the condition
/// described by `matcher` holds.
///
/// A getter error is fatal and fails the test on the spot: fetch errors
/// during a wait indicate a broken setup, not slow convergence.
pub async fn eventually_condition<R, G, Fut, T>(
    reporter: &R,
    mut getter: G,
    matcher: ConditionMatcher,
    config: WaitConfig,
    context: Option<&str>,
) where
    R: Reporter,
    G: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    T: Conditional,
{
    let matcher = &matcher;
    let check = move || {
        let fetch = getter();
        async move {
            let object = fetch.await.context("fetching object")?;
            let evaluation = matcher.evaluate(&object);
            if evaluation.matched {
                return Ok(Check::ready());
            }
            let reason = match &evaluation.condition {
                Some(Condition {
                    reason, message, ..
                }) => format!(
                    "Not done waiting for object {}: {}: {}",
                    evaluation.descriptor, reason, message
                ),
                None => format!(
                    "Not done waiting for object {}: no condition present",
                    evaluation.descriptor
                ),
            };
            Ok(Check::pending(reason))
        }
    };

    eventually(reporter, check, config.timeout, config.tick, context).await;
}

/// Waits until the object's `Ready` condition is `True`, the common case.
pub async fn eventually_ready<R, G, Fut, T>(
    reporter: &R,
    getter: G,
    config: WaitConfig,
    context: Option<&str>,
) where
    R: Reporter,
    G: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    T: Conditional,
{
    let matcher = ConditionMatcher::is(READY, ConditionStatus::True);
    eventually_condition(reporter, getter, matcher, config, context).await;
}
