pub mod poll;
pub mod report;
pub mod tracing;
pub mod wait;

pub use abide_core::{
    Condition, ConditionMatcher, ConditionStatus, Conditional, Evaluation, StatusPredicate, READY,
};
pub use poll::{eventually, try_eventually, Check, WaitError};
pub use report::{RecordingReporter, Reporter, TracingReporter};
pub use wait::{
    eventually_condition, eventually_ready, WaitConfig, DEFAULT_TICK, FOREVER_TEST_TIMEOUT,
};
