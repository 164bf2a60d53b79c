//! Evaluator ("codelet") abstraction and the ordered evaluation pass.

use std::panic::{self, AssertUnwindSafe};

use gwt_types::{Coalition, EvaluatorError, WorkspaceContext};
use tracing::{debug, warn};

/// An independent unit that inspects the context and may propose a coalition.
///
/// Evaluators may keep private state between cycles (see the novelty
/// evaluator) but never see the pool or each other.
pub trait Evaluator: Send {
    /// Identifier recorded as the coalition source.
    fn name(&self) -> &str;

    /// Higher priorities run first.
    fn priority(&self) -> f64 {
        0.5
    }

    fn evaluate(&mut self, context: &WorkspaceContext) -> Result<Option<Coalition>, EvaluatorError>;

    /// Forget any state accumulated across cycles.
    fn reset(&mut self) {}
}

/// Outcome of running every evaluator once.
#[derive(Debug, Default)]
pub struct EvaluationPass {
    pub coalitions: Vec<Coalition>,
    pub failures: Vec<(String, EvaluatorError)>,
}

/// Evaluators kept in descending priority order, stable by registration.
#[derive(Default)]
pub struct EvaluatorSet {
    evaluators: Vec<Box<dyn Evaluator>>,
}

impl EvaluatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, evaluator: Box<dyn Evaluator>) {
        let priority = evaluator.priority();
        let position = self
            .evaluators
            .iter()
            .position(|e| e.priority() < priority)
            .unwrap_or(self.evaluators.len());

        debug!(
            evaluator = evaluator.name(),
            priority,
            position,
            "Evaluator registered"
        );
        self.evaluators.insert(position, evaluator);
    }

    /// Run every evaluator against `context`.
    ///
    /// Errors and panics are contained per evaluator; the pass always
    /// completes.
    pub fn run(&mut self, context: &WorkspaceContext) -> EvaluationPass {
        let mut pass = EvaluationPass::default();

        for evaluator in self.evaluators.iter_mut() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| evaluator.evaluate(context)))
                .unwrap_or_else(|payload| Err(EvaluatorError::Panicked(panic_message(payload))));

            match outcome {
                Ok(Some(coalition)) => {
                    debug!(
                        evaluator = evaluator.name(),
                        content_type = %coalition.content_type(),
                        activation = coalition.activation(),
                        salience = coalition.salience(),
                        "Coalition proposed"
                    );
                    pass.coalitions.push(coalition);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(evaluator = evaluator.name(), error = %err, "Evaluator failed");
                    pass.failures.push((evaluator.name().to_string(), err));
                }
            }
        }

        pass
    }

    pub fn reset_all(&mut self) {
        for evaluator in self.evaluators.iter_mut() {
            evaluator.reset();
        }
    }

    /// Evaluator names in execution order.
    pub fn names(&self) -> Vec<String> {
        self.evaluators.iter().map(|e| e.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
