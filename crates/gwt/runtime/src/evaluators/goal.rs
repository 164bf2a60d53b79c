use gwt_types::{Coalition, ContentType, EvaluatorError, WorkspaceContext};
use serde_json::json;

use super::object;
use crate::evaluator::Evaluator;

const DEFAULT_PRIORITY: f64 = 0.5;
const SALIENCE: f64 = 0.6;

/// Proposes the first active goal.
pub struct GoalEvaluator;

impl Evaluator for GoalEvaluator {
    fn name(&self) -> &str {
        "goal_evaluator"
    }

    fn priority(&self) -> f64 {
        0.6
    }

    fn evaluate(&mut self, context: &WorkspaceContext) -> Result<Option<Coalition>, EvaluatorError> {
        let Some(goal) = context.active_goals.first() else {
            return Ok(None);
        };

        let content = object(
            serde_json::to_value(goal).map_err(|e| EvaluatorError::Failed(e.to_string()))?,
        );

        let coalition = Coalition::new(
            self.name(),
            ContentType::Goal,
            content,
            goal.priority.unwrap_or(DEFAULT_PRIORITY),
            SALIENCE,
        )
        .with_context(object(json!({ "active_goals": context.active_goals.len() })));

        Ok(Some(coalition))
    }
}
