//! Coalitions: the units of content competing for the broadcast slot.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured key/value payload carried by a coalition.
pub type Payload = Map<String, Value>;

/// Unique identifier assigned to every coalition at creation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoalitionId(pub uuid::Uuid);

impl CoalitionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for CoalitionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CoalitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of content that may enter the workspace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    PerceptualSignal,
    RememberedItem,
    Goal,
    Affect,
    PredictedOutcome,
    Conflict,
    Novelty,
    Urgency,
    Insight,
}

impl ContentType {
    pub const ALL: [ContentType; 9] = [
        ContentType::PerceptualSignal,
        ContentType::RememberedItem,
        ContentType::Goal,
        ContentType::Affect,
        ContentType::PredictedOutcome,
        ContentType::Conflict,
        ContentType::Novelty,
        ContentType::Urgency,
        ContentType::Insight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::PerceptualSignal => "perceptual_signal",
            ContentType::RememberedItem => "remembered_item",
            ContentType::Goal => "goal",
            ContentType::Affect => "affect",
            ContentType::PredictedOutcome => "predicted_outcome",
            ContentType::Conflict => "conflict",
            ContentType::Novelty => "novelty",
            ContentType::Urgency => "urgency",
            ContentType::Insight => "insight",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clamp a score into `[0, 1]`. Non-finite input maps to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// A candidate for the single conscious broadcast slot.
///
/// `activation` and `salience` are kept private so every mutation goes
/// through a clamping path; both always stay within `[0, 1]`.
#[derive(Clone, Debug, Serialize)]
pub struct Coalition {
    id: CoalitionId,
    content: Payload,
    content_type: ContentType,
    activation: f64,
    salience: f64,
    source: String,
    created_at: DateTime<Utc>,
    supporting_evaluators: BTreeSet<String>,
    context: Payload,
}

impl Coalition {
    /// Create a coalition produced by `source`. Scores are clamped.
    pub fn new(
        source: impl Into<String>,
        content_type: ContentType,
        content: Payload,
        activation: f64,
        salience: f64,
    ) -> Self {
        let source = source.into();
        let mut supporting_evaluators = BTreeSet::new();
        supporting_evaluators.insert(source.clone());

        Self {
            id: CoalitionId::new(),
            content,
            content_type,
            activation: clamp_unit(activation),
            salience: clamp_unit(salience),
            source,
            created_at: Utc::now(),
            supporting_evaluators,
            context: Payload::new(),
        }
    }

    /// Attach explanatory metadata. Not used in scoring.
    pub fn with_context(mut self, context: Payload) -> Self {
        self.context = context;
        self
    }

    pub fn id(&self) -> &CoalitionId {
        &self.id
    }

    pub fn content(&self) -> &Payload {
        &self.content
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn activation(&self) -> f64 {
        self.activation
    }

    pub fn salience(&self) -> f64 {
        self.salience
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Wall-clock creation time. Not monotonic; pool order comes from
    /// admission sequence numbers.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn supporting_evaluators(&self) -> &BTreeSet<String> {
        &self.supporting_evaluators
    }

    pub fn context(&self) -> &Payload {
        &self.context
    }

    /// Ranking score: `activation × salience`.
    pub fn competition_strength(&self) -> f64 {
        self.activation * self.salience
    }

    /// Replace the activation, re-clamped.
    pub fn set_activation(&mut self, activation: f64) {
        self.activation = clamp_unit(activation);
    }

    /// Add `delta` to the activation, re-clamped. Returns the applied change.
    pub fn boost(&mut self, delta: f64) -> f64 {
        let before = self.activation;
        self.set_activation(before + delta);
        self.activation - before
    }

    /// Lower the activation by `rate`, floored at zero. Salience is untouched.
    pub fn decay(&mut self, rate: f64) {
        self.set_activation(self.activation - rate.max(0.0));
    }
}

impl fmt::Display for Coalition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Coalition({}, act={:.3}, sal={:.3}, strength={:.3})",
            self.content_type,
            self.activation,
            self.salience,
            self.competition_strength()
        )
    }
}
