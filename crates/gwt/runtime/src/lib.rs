//! Global Workspace runtime
//!
//! Each cycle, evaluators inspect a [`WorkspaceContext`] and may propose a
//! [`Coalition`]. Proposals join a bounded pool where they are biased by
//! attention, decay, and compete on `activation × salience`. At most one
//! winner per cycle is broadcast concurrently to every [`Subscriber`].
//!
//! ```no_run
//! use gwt_runtime::{WorkspaceConfig, WorkspaceManager};
//! use gwt_types::WorkspaceContext;
//!
//! # async fn demo() -> gwt_types::WorkspaceResult<()> {
//! let mut manager = WorkspaceManager::with_default_evaluators(WorkspaceConfig::default())?;
//! if let Some(broadcast) = manager.cycle(&WorkspaceContext::new().with_danger(0.8)).await {
//!     println!("{} won cycle {}", broadcast.content_type, broadcast.cycle);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`WorkspaceContext`]: gwt_types::WorkspaceContext
//! [`Coalition`]: gwt_types::Coalition

pub mod attention;
pub mod config;
pub mod evaluator;
pub mod evaluators;
pub mod kernel;
pub mod manager;
pub mod pool;
pub mod subscriber;

pub use attention::{AttentionController, CoalitionBias, NoBias};
pub use config::{AttentionConfig, WorkspaceConfig};
pub use evaluator::{EvaluationPass, Evaluator, EvaluatorSet};
pub use evaluators::{
    default_evaluators, AffectEvaluator, DangerEvaluator, GoalEvaluator, MemoryEvaluator,
    NoveltyEvaluator, ResourceEvaluator,
};
pub use kernel::{CompetitionRecord, GlobalWorkspace, KernelStats};
pub use manager::{WorkspaceManager, WorkspaceStats};
pub use pool::{CoalitionPool, Leader, PoolEntry};
pub use subscriber::{fan_out, ChannelSubscriber, DeliveryReport, Subscriber};
