use gwt_types::{Coalition, ContentType, EvaluatorError, WorkspaceContext};
use serde_json::json;

use super::object;
use crate::evaluator::Evaluator;

const DEFAULT_RELEVANCE: f64 = 0.5;
const SALIENCE: f64 = 0.5;

/// Proposes the most relevant retrieved memory (the first entry).
pub struct MemoryEvaluator;

impl Evaluator for MemoryEvaluator {
    fn name(&self) -> &str {
        "memory_evaluator"
    }

    fn priority(&self) -> f64 {
        0.5
    }

    fn evaluate(&mut self, context: &WorkspaceContext) -> Result<Option<Coalition>, EvaluatorError> {
        let Some(memory) = context.relevant_memories.first() else {
            return Ok(None);
        };

        let content = object(
            serde_json::to_value(memory).map_err(|e| EvaluatorError::Failed(e.to_string()))?,
        );

        let coalition = Coalition::new(
            self.name(),
            ContentType::RememberedItem,
            content,
            memory.relevance.unwrap_or(DEFAULT_RELEVANCE),
            SALIENCE,
        )
        .with_context(object(json!({ "memory_count": context.relevant_memories.len() })));

        Ok(Some(coalition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gwt_types::MemoryEntry;

    #[test]
    fn top_memory_scores() {
        let ctx = WorkspaceContext::new()
            .with_memory(MemoryEntry::new("river").with_relevance(0.7))
            .with_memory(MemoryEntry::new("cave").with_relevance(0.4));

        let c = MemoryEvaluator.evaluate(&ctx).unwrap().unwrap();
        assert_eq!(c.content_type(), ContentType::RememberedItem);
        assert_eq!(c.content()["id"], "river");
        assert!((c.activation() - 0.7).abs() < 1e-9);
        assert!((c.salience() - 0.5).abs() < 1e-9);
        assert_eq!(c.context()["memory_count"], 2);
    }

    #[test]
    fn default_relevance() {
        let ctx = WorkspaceContext::new().with_memory(MemoryEntry::new("m"));
        let c = MemoryEvaluator.evaluate(&ctx).unwrap().unwrap();
        assert!((c.activation() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn nothing_retrieved() {
        assert!(MemoryEvaluator.evaluate(&WorkspaceContext::new()).unwrap().is_none());
    }
}
