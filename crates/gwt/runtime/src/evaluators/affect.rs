use gwt_types::{Coalition, ContentType, EvaluatorError, WorkspaceContext};
use serde_json::json;

use super::object;
use crate::evaluator::Evaluator;

/// Surfaces strong affect: `(arousal + |valence|) / 2` strictly above 0.5.
pub struct AffectEvaluator;

impl AffectEvaluator {
    pub fn intensity(arousal: f64, valence: f64) -> f64 {
        (arousal + valence.abs()) / 2.0
    }
}

impl Evaluator for AffectEvaluator {
    fn name(&self) -> &str {
        "affect_evaluator"
    }

    fn priority(&self) -> f64 {
        0.6
    }

    fn evaluate(&mut self, context: &WorkspaceContext) -> Result<Option<Coalition>, EvaluatorError> {
        let arousal = context.arousal();
        let valence = context.valence();
        let intensity = Self::intensity(arousal, valence);

        if intensity.is_nan() || intensity <= 0.5 {
            return Ok(None);
        }

        let mut content = object(json!({
            "arousal": arousal,
            "valence": valence,
            "intensity": intensity,
        }));
        if let Some(label) = &context.affect.label {
            content.insert("label".into(), json!(label));
        }

        Ok(Some(Coalition::new(
            self.name(),
            ContentType::Affect,
            content,
            intensity,
            arousal,
        )))
    }
}
