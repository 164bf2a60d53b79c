use gwt_types::{Coalition, ContentType, EvaluatorError, WorkspaceContext};
use serde_json::json;

use super::object;
use crate::evaluator::Evaluator;

const TRIGGER: f64 = 0.3;

/// Turns perceived danger above 0.3 into an urgency coalition.
pub struct DangerEvaluator;

impl Evaluator for DangerEvaluator {
    fn name(&self) -> &str {
        "danger_evaluator"
    }

    fn priority(&self) -> f64 {
        0.9
    }

    fn evaluate(&mut self, context: &WorkspaceContext) -> Result<Option<Coalition>, EvaluatorError> {
        let danger = context.danger_level();
        if danger.is_nan() {
            return Err(EvaluatorError::InvalidValue {
                field: "perception.danger_level".into(),
                reason: "not a number".into(),
            });
        }
        if danger <= TRIGGER {
            return Ok(None);
        }

        let coalition = Coalition::new(
            self.name(),
            ContentType::Urgency,
            object(json!({ "danger_level": danger })),
            0.5 + danger * 0.5,
            danger,
        )
        .with_context(object(json!({ "trigger": "danger" })));

        Ok(Some(coalition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_danger_emits_urgency() {
        let c = DangerEvaluator
            .evaluate(&WorkspaceContext::new().with_danger(0.8))
            .unwrap()
            .unwrap();
        assert_eq!(c.content_type(), ContentType::Urgency);
        assert!((c.activation() - 0.9).abs() < 1e-9);
        assert!((c.salience() - 0.8).abs() < 1e-9);
        assert!((c.competition_strength() - 0.72).abs() < 1e-9);
    }

    #[test]
    fn threshold_is_strict() {
        let ctx = WorkspaceContext::new().with_danger(0.3);
        assert!(DangerEvaluator.evaluate(&ctx).unwrap().is_none());
        assert!(DangerEvaluator.evaluate(&WorkspaceContext::new()).unwrap().is_none());
    }

    #[test]
    fn moderate_danger_scores() {
        let c = DangerEvaluator
            .evaluate(&WorkspaceContext::new().with_danger(0.5))
            .unwrap()
            .unwrap();
        assert!((c.activation() - 0.75).abs() < 1e-9);
        assert!((c.competition_strength() - 0.375).abs() < 1e-9);
    }

    #[test]
    fn nan_danger_is_an_error() {
        let ctx = WorkspaceContext::new().with_danger(f64::NAN);
        assert!(DangerEvaluator.evaluate(&ctx).is_err());
    }

    #[test]
    fn infinite_danger_has_no_strength() {
        let c = DangerEvaluator
            .evaluate(&WorkspaceContext::new().with_danger(f64::INFINITY))
            .unwrap()
            .unwrap();
        assert_eq!(c.activation(), 0.0);
        assert_eq!(c.salience(), 0.0);
        assert_eq!(c.competition_strength(), 0.0);
    }
}
