use std::collections::{BTreeSet, HashSet, VecDeque};

use gwt_types::{Coalition, ContentType, EvaluatorError, WorkspaceContext};
use serde_json::json;
use tracing::debug;

use super::object;
use crate::evaluator::Evaluator;

const DEFAULT_MEMORY: usize = 100;

type Pattern = BTreeSet<String>;

/// Flags symbol combinations the agent has not perceived before.
///
/// Combinations are order-independent. Each new combination produces one
/// coalition, the empty set included; repeats are silent until
/// [`Evaluator::reset`] clears the memory. Pattern memory is bounded: once it
/// exceeds its limit the oldest half is forgotten.
pub struct NoveltyEvaluator {
    seen: HashSet<Pattern>,
    order: VecDeque<Pattern>,
    memory_limit: usize,
}

impl NoveltyEvaluator {
    pub fn new() -> Self {
        Self::with_memory_limit(DEFAULT_MEMORY)
    }

    pub fn with_memory_limit(memory_limit: usize) -> Self {
        Self {
            seen: HashSet::new(),
            order: VecDeque::new(),
            memory_limit: memory_limit.max(1),
        }
    }

    /// `min(1, 0.2 × symbol count)`
    pub fn novelty_score(symbol_count: usize) -> f64 {
        (0.2 * symbol_count as f64).min(1.0)
    }

    pub fn remembered(&self) -> usize {
        self.seen.len()
    }

    fn remember(&mut self, pattern: Pattern) {
        self.seen.insert(pattern.clone());
        self.order.push_back(pattern);

        if self.order.len() > self.memory_limit {
            let keep = self.memory_limit / 2;
            while self.order.len() > keep {
                if let Some(old) = self.order.pop_front() {
                    self.seen.remove(&old);
                }
            }
            debug!(kept = self.order.len(), "Novelty memory trimmed");
        }
    }
}

impl Default for NoveltyEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for NoveltyEvaluator {
    fn name(&self) -> &str {
        "novelty_evaluator"
    }

    fn priority(&self) -> f64 {
        0.5
    }

    fn evaluate(&mut self, context: &WorkspaceContext) -> Result<Option<Coalition>, EvaluatorError> {
        let pattern: Pattern = context.perception.symbols.iter().cloned().collect();
        if self.seen.contains(&pattern) {
            return Ok(None);
        }

        let score = Self::novelty_score(pattern.len());
        let symbols: Vec<&String> = pattern.iter().collect();
        let content = object(json!({
            "pattern": symbols,
            "novelty_score": score,
        }));

        self.remember(pattern);

        Ok(Some(
            Coalition::new(
                self.name(),
                ContentType::Novelty,
                content,
                0.6 + score * 0.3,
                score,
            )
            .with_context(object(json!({ "first_encounter": true }))),
        ))
    }

    fn reset(&mut self) {
        self.seen.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(symbols: &[&str]) -> WorkspaceContext {
        WorkspaceContext::new().with_symbols(symbols.iter().copied())
    }

    #[test]
    fn new_pattern_emits_once() {
        let mut eval = NoveltyEvaluator::new();
        let c = eval.evaluate(&ctx(&["tree", "rock"])).unwrap().unwrap();
        assert_eq!(c.content_type(), ContentType::Novelty);
        // score = 0.4 → activation 0.72, salience 0.4
        assert!((c.activation() - 0.72).abs() < 1e-9);
        assert!((c.salience() - 0.4).abs() < 1e-9);

        assert!(eval.evaluate(&ctx(&["tree", "rock"])).unwrap().is_none());
    }

    #[test]
    fn order_independent() {
        let mut eval = NoveltyEvaluator::new();
        assert!(eval.evaluate(&ctx(&["a", "b", "c"])).unwrap().is_some());
        assert!(eval.evaluate(&ctx(&["c", "a", "b"])).unwrap().is_none());
        assert!(eval.evaluate(&ctx(&["a", "b"])).unwrap().is_some());
    }

    #[test]
    fn score_saturates() {
        assert_eq!(NoveltyEvaluator::novelty_score(0), 0.0);
        assert!((NoveltyEvaluator::novelty_score(3) - 0.6).abs() < 1e-9);
        assert_eq!(NoveltyEvaluator::novelty_score(5), 1.0);
        assert_eq!(NoveltyEvaluator::novelty_score(12), 1.0);

        let mut eval = NoveltyEvaluator::new();
        let c = eval
            .evaluate(&ctx(&["a", "b", "c", "d", "e", "f"]))
            .unwrap()
            .unwrap();
        assert!((c.activation() - 0.9).abs() < 1e-9);
        assert_eq!(c.salience(), 1.0);
    }

    #[test]
    fn empty_perception_is_novel_once() {
        let mut eval = NoveltyEvaluator::new();
        let c = eval.evaluate(&WorkspaceContext::new()).unwrap().unwrap();
        assert!((c.activation() - 0.6).abs() < 1e-9);
        assert_eq!(c.salience(), 0.0);
        assert_eq!(c.competition_strength(), 0.0);
        assert_eq!(eval.remembered(), 1);

        assert!(eval.evaluate(&WorkspaceContext::new()).unwrap().is_none());
    }

    #[test]
    fn reset_forgets_patterns() {
        let mut eval = NoveltyEvaluator::new();
        assert!(eval.evaluate(&ctx(&["x"])).unwrap().is_some());
        eval.reset();
        assert!(eval.evaluate(&ctx(&["x"])).unwrap().is_some());
    }

    #[test]
    fn memory_is_bounded() {
        let mut eval = NoveltyEvaluator::with_memory_limit(4);
        for i in 0..5 {
            let symbol = format!("s{}", i);
            assert!(eval.evaluate(&ctx(&[symbol.as_str()])).unwrap().is_some());
        }
        // Fifth insert overflowed the limit of 4, keeping the newest 2.
        assert_eq!(eval.remembered(), 2);
        // The oldest pattern was forgotten and is novel again.
        assert!(eval.evaluate(&ctx(&["s0"])).unwrap().is_some());
        // A recent one is still remembered.
        assert!(eval.evaluate(&ctx(&["s4"])).unwrap().is_none());
    }
}
