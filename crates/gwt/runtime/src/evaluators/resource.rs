use gwt_types::{Coalition, ContentType, EvaluatorError, WorkspaceContext};
use serde_json::json;

use super::object;
use crate::evaluator::Evaluator;

/// Raises urgency when health or energy run low.
///
/// Health below 0.3 takes precedence over energy below 0.2; the coalition
/// is emitted only when the resulting urgency exceeds 0.5.
pub struct ResourceEvaluator;

impl ResourceEvaluator {
    /// Returns `(urgency, resource name, resource level)`.
    pub fn urgency(health: f64, energy: f64) -> (f64, &'static str, f64) {
        if health < 0.3 {
            (1.0 - health, "health", health)
        } else if energy < 0.2 {
            (0.8 - energy, "energy", energy)
        } else {
            (0.0, "none", 1.0)
        }
    }
}

impl Evaluator for ResourceEvaluator {
    fn name(&self) -> &str {
        "resource_evaluator"
    }

    fn priority(&self) -> f64 {
        0.85
    }

    fn evaluate(&mut self, context: &WorkspaceContext) -> Result<Option<Coalition>, EvaluatorError> {
        let (urgency, resource, level) = Self::urgency(context.health(), context.energy());
        if urgency.is_nan() || urgency <= 0.5 {
            return Ok(None);
        }

        Ok(Some(Coalition::new(
            self.name(),
            ContentType::Urgency,
            object(json!({
                "resource": resource,
                "level": level,
                "urgency": urgency,
            })),
            urgency,
            urgency,
        )))
    }
}
