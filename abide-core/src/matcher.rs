use crate::condition::{Condition, Conditional, ConditionStatus};

/// Status clause of a [`ConditionMatcher`]: the observed status must either
/// equal or differ from the given value. Exactly one clause exists per
/// matcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusPredicate {
    Is(ConditionStatus),
    IsNot(ConditionStatus),
}

/// Declarative description of an expected condition state.
///
/// Built with [`ConditionMatcher::is`] or [`ConditionMatcher::is_not`] and
/// optionally refined with [`ConditionMatcher::with_reason`]. Matchers are
/// plain values; refinement consumes the matcher and returns a new one, so
/// an instance can never be mutated behind the back of a running wait.
#[derive(Clone, Debug)]
pub struct ConditionMatcher {
    condition_type: String,
    predicate: StatusPredicate,
    reason: Option<String>,
}

/// Outcome of evaluating a matcher against one object snapshot.
#[derive(Clone, Debug)]
pub struct Evaluation {
    /// The condition of the configured type, if the object carried one.
    pub condition: Option<Condition>,
    /// Human-readable rendering of what the matcher expects.
    pub descriptor: String,
    /// Whether the snapshot satisfied the matcher.
    pub matched: bool,
}

impl ConditionMatcher {
    /// Matches when the condition of the given type has the given status.
    pub fn is(condition_type: impl Into<String>, status: ConditionStatus) -> Self {
        ConditionMatcher {
            condition_type: condition_type.into(),
            predicate: StatusPredicate::Is(status),
            reason: None,
        }
    }

    /// Matches when the condition of the given type does not have the given
    /// status.
    pub fn is_not(condition_type: impl Into<String>, status: ConditionStatus) -> Self {
        ConditionMatcher {
            condition_type: condition_type.into(),
            predicate: StatusPredicate::IsNot(status),
            reason: None,
        }
    }

    /// Additionally requires the condition's reason to equal `reason`.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Evaluates this matcher against one object snapshot.
    ///
    /// A missing condition never matches. The found condition is returned
    /// alongside the verdict so diagnostics can quote its reason and message
    /// fields.
    pub fn evaluate(&self, object: &(impl Conditional + ?Sized)) -> Evaluation {
        let descriptor = self.descriptor();
        let Some(condition) = object.condition(&self.condition_type) else {
            return Evaluation {
                condition: None,
                descriptor,
                matched: false,
            };
        };

        let status_holds = match self.predicate {
            StatusPredicate::Is(status) => condition.status == status,
            StatusPredicate::IsNot(status) => condition.status != status,
        };
        let reason_holds = match &self.reason {
            Some(reason) => &condition.reason == reason,
            None => true,
        };

        Evaluation {
            condition: Some(condition.clone()),
            descriptor,
            matched: status_holds && reason_holds,
        }
    }

    /// Renders what this matcher expects, e.g. `Ready to be True` or
    /// `Synced not to be True (with reason Deleted)`.
    ///
    /// The rendering depends only on the matcher's configuration, never on
    /// any evaluation having taken place.
    pub fn descriptor(&self) -> String {
        let mut descriptor = match self.predicate {
            StatusPredicate::Is(status) => {
                format!("{} to be {}", self.condition_type, status)
            }
            StatusPredicate::IsNot(status) => {
                format!("{} not to be {}", self.condition_type, status)
            }
        };
        if let Some(reason) = &self.reason {
            descriptor.push_str(&format!(" (with reason {reason})"));
        }
        descriptor
    }
}
