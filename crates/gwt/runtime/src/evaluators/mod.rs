//! Reference evaluator set.
//!
//! Trigger thresholds and score formulas are fixed; downstream consumers
//! rely on the exact values.

mod affect;
mod danger;
mod goal;
mod memory;
mod novelty;
mod resource;

pub use affect::AffectEvaluator;
pub use danger::DangerEvaluator;
pub use goal::GoalEvaluator;
pub use memory::MemoryEvaluator;
pub use novelty::NoveltyEvaluator;
pub use resource::ResourceEvaluator;

use gwt_types::Payload;
use serde_json::Value;

use crate::evaluator::Evaluator;

/// The six reference evaluators, in no particular order.
pub fn default_evaluators() -> Vec<Box<dyn Evaluator>> {
    vec![
        Box::new(DangerEvaluator),
        Box::new(AffectEvaluator),
        Box::new(GoalEvaluator),
        Box::new(MemoryEvaluator),
        Box::new(NoveltyEvaluator::new()),
        Box::new(ResourceEvaluator),
    ]
}

fn object(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        _ => Payload::new(),
    }
}
