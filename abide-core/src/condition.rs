use serde::{Deserialize, Serialize};
use strum::Display;

/// Condition type marking overall readiness of an observed object.
pub const READY: &str = "Ready";

/// Tri-state outcome of a single condition.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

/// A typed status record attached to an observed object.
///
/// Conditions model partial progress towards a desired state. They are owned
/// and mutated by the system under test; this crate only reads them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: ConditionStatus,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}

impl Condition {
    pub fn new(condition_type: impl Into<String>, status: ConditionStatus) -> Self {
        Condition {
            condition_type: condition_type.into(),
            status,
            ..Condition::default()
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

/// Capability of exposing typed conditions.
///
/// Implemented by whatever domain type a test waits on; the waiting
/// machinery never depends on a concrete status schema.
pub trait Conditional {
    /// Returns the condition of the given type, if present.
    fn condition(&self, condition_type: &str) -> Option<&Condition>;
}

impl Conditional for [Condition] {
    fn condition(&self, condition_type: &str) -> Option<&Condition> {
        self.iter()
            .find(|condition| condition.condition_type == condition_type)
    }
}

impl Conditional for Vec<Condition> {
    fn condition(&self, condition_type: &str) -> Option<&Condition> {
        self.as_slice().condition(condition_type)
    }
}
