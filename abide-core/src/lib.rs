pub mod condition;
pub mod matcher;

pub use condition::{Condition, ConditionStatus, Conditional, READY};
pub use matcher::{ConditionMatcher, Evaluation, StatusPredicate};
