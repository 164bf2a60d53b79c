use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coalition::{Coalition, ContentType, Payload};

/// Broadcast message identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BroadcastId(pub uuid::Uuid);

impl BroadcastId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for BroadcastId {
    fn default() -> Self {
        Self::new()
    }
}

/// Delivery priority derived from the winner's content type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastPriority {
    Normal,
    High,
    Critical,
}

impl BroadcastPriority {
    /// Urgency is critical, affect is high, everything else is normal.
    pub fn for_content(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Urgency => BroadcastPriority::Critical,
            ContentType::Affect => BroadcastPriority::High,
            _ => BroadcastPriority::Normal,
        }
    }
}

/// How a winner stood against the rest of the pool when it was selected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompetitionSummary {
    /// Winning `activation × salience`
    pub winning_strength: f64,
    /// Threshold in force for this cycle
    pub threshold: f64,
    /// Pool members that took part
    pub competitors: usize,
    /// Share of competitors at or above the threshold (0.0 to 1.0)
    pub intensity: f64,
}

/// Immutable snapshot of a winning coalition, fanned out to every subscriber.
#[derive(Clone, Debug, Serialize)]
pub struct BroadcastMessage {
    pub id: BroadcastId,
    pub coalition: Coalition,
    pub content_type: ContentType,
    pub content: Payload,
    pub timestamp: DateTime<Utc>,
    /// Sequence number of the cycle that produced this broadcast
    pub cycle: u64,
    pub priority: BroadcastPriority,
    pub competition: CompetitionSummary,
    /// Subscribers registered when the broadcast went out
    pub recipients: Vec<String>,
}

impl BroadcastMessage {
    pub fn new(
        coalition: Coalition,
        cycle: u64,
        competition: CompetitionSummary,
        recipients: Vec<String>,
    ) -> Self {
        let content_type = coalition.content_type();
        Self {
            id: BroadcastId::new(),
            content: coalition.content().clone(),
            priority: BroadcastPriority::for_content(content_type),
            content_type,
            coalition,
            timestamp: Utc::now(),
            cycle,
            competition,
            recipients,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.priority == BroadcastPriority::Critical
    }
}
