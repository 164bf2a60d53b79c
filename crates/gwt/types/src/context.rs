//! Per-cycle context snapshot supplied by upstream modules.
//!
//! The snapshot is read-only for the workspace: evaluators inspect it, nothing
//! in the kernel writes back. Missing readings fall back to neutral defaults
//! (no danger, no arousal, full health and energy).

use serde::{Deserialize, Serialize};

use crate::coalition::Payload;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionSnapshot {
    pub danger_level: Option<f64>,
    /// Symbols recognised this cycle; order carries no meaning
    pub symbols: Vec<String>,
    #[serde(flatten)]
    pub extra: Payload,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffectSnapshot {
    pub arousal: Option<f64>,
    pub valence: Option<f64>,
    pub label: Option<String>,
}

/// An active goal as reported by the planning module.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalEntry {
    pub name: String,
    pub priority: Option<f64>,
    #[serde(flatten)]
    pub details: Payload,
}

impl GoalEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// A retrieved memory, most relevant first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryEntry {
    pub id: Option<String>,
    pub relevance: Option<f64>,
    #[serde(flatten)]
    pub details: Payload,
}

impl MemoryEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_relevance(mut self, relevance: f64) -> Self {
        self.relevance = Some(relevance);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vitals {
    pub health: Option<f64>,
    pub energy: Option<f64>,
}

/// Everything the evaluators may read during one cycle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceContext {
    pub perception: PerceptionSnapshot,
    pub affect: AffectSnapshot,
    pub active_goals: Vec<GoalEntry>,
    pub relevant_memories: Vec<MemoryEntry>,
    pub vitals: Vitals,
    /// Time elapsed since the previous cycle
    pub dt: Option<f64>,
}

impl WorkspaceContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_danger(mut self, danger_level: f64) -> Self {
        self.perception.danger_level = Some(danger_level);
        self
    }

    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.perception.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_affect(mut self, arousal: f64, valence: f64) -> Self {
        self.affect.arousal = Some(arousal);
        self.affect.valence = Some(valence);
        self
    }

    pub fn with_goal(mut self, goal: GoalEntry) -> Self {
        self.active_goals.push(goal);
        self
    }

    pub fn with_memory(mut self, memory: MemoryEntry) -> Self {
        self.relevant_memories.push(memory);
        self
    }

    pub fn with_health(mut self, health: f64) -> Self {
        self.vitals.health = Some(health);
        self
    }

    pub fn with_energy(mut self, energy: f64) -> Self {
        self.vitals.energy = Some(energy);
        self
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = Some(dt);
        self
    }

    pub fn danger_level(&self) -> f64 {
        self.perception.danger_level.unwrap_or(0.0)
    }

    pub fn arousal(&self) -> f64 {
        self.affect.arousal.unwrap_or(0.0)
    }

    pub fn valence(&self) -> f64 {
        self.affect.valence.unwrap_or(0.0)
    }

    pub fn health(&self) -> f64 {
        self.vitals.health.unwrap_or(1.0)
    }

    pub fn energy(&self) -> f64 {
        self.vitals.energy.unwrap_or(1.0)
    }
}
