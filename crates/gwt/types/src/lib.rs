//! # gwt-types
//!
//! Domain types for the Global Workspace kernel.
//!
//! Many small evaluators propose [`Coalition`]s, the coalitions compete on
//! `activation × salience`, and a single winner is fanned out to every
//! subscriber as a [`BroadcastMessage`]. [`AttentionGoal`]s bias the
//! competition toward a content type.
//!
//! Scores are clamped to `[0, 1]` on creation and on every mutation.

pub mod attention;
pub mod broadcast;
pub mod coalition;
pub mod context;
pub mod error;

pub use attention::{AttentionGoal, FocusShift};
pub use broadcast::{BroadcastId, BroadcastMessage, BroadcastPriority, CompetitionSummary};
pub use coalition::{clamp_unit, Coalition, CoalitionId, ContentType, Payload};
pub use context::{
    AffectSnapshot, GoalEntry, MemoryEntry, PerceptionSnapshot, Vitals, WorkspaceContext,
};
pub use error::{DeliveryError, EvaluatorError, WorkspaceError, WorkspaceResult};
