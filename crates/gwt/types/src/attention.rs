use serde::{Deserialize, Serialize};

use crate::coalition::{clamp_unit, ContentType};

/// A top-down directive that favors coalitions of one content type.
///
/// `set_at` is measured on the attention controller's own clock, in the same
/// time units as the `dt` passed to each cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttentionGoal {
    pub goal_type: String,
    pub target: ContentType,
    /// Clamped to `[0, 1]`
    pub priority: f64,
    pub set_at: f64,
}

impl AttentionGoal {
    pub fn new(goal_type: impl Into<String>, target: ContentType, priority: f64, set_at: f64) -> Self {
        Self {
            goal_type: goal_type.into(),
            target,
            priority: clamp_unit(priority),
            set_at,
        }
    }

    /// Age of the goal at time `now`.
    pub fn age(&self, now: f64) -> f64 {
        now - self.set_at
    }
}

/// A recorded change of attention focus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FocusShift {
    /// Focus before the shift; `None` for the first focus of a run
    pub from: Option<ContentType>,
    pub to: ContentType,
    /// How long the previous focus was held
    pub duration: f64,
    /// Controller clock when the shift happened
    pub at: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_priority_clamped() {
        let g = AttentionGoal::new("threat", ContentType::Urgency, 3.0, 0.0);
        assert_eq!(g.priority, 1.0);
        let g = AttentionGoal::new("threat", ContentType::Urgency, -3.0, 0.0);
        assert_eq!(g.priority, 0.0);
    }

    #[test]
    fn goal_age() {
        let g = AttentionGoal::new("explore", ContentType::Novelty, 0.5, 2.5);
        assert!((g.age(10.0) - 7.5).abs() < 1e-9);
    }
}
