//! Workspace manager: the kernel paired with an attention controller.

use std::sync::Arc;

use gwt_types::{BroadcastMessage, Coalition, ContentType, WorkspaceContext, WorkspaceResult};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::attention::AttentionController;
use crate::config::WorkspaceConfig;
use crate::evaluator::Evaluator;
use crate::evaluators::default_evaluators;
use crate::kernel::{GlobalWorkspace, KernelStats};
use crate::subscriber::Subscriber;

/// Snapshot of manager and kernel state.
#[derive(Clone, Debug, Serialize)]
pub struct WorkspaceStats {
    pub cycle_count: u64,
    pub broadcast_count: u64,
    pub current_focus: Option<ContentType>,
    pub pool_size: usize,
    pub evaluator_count: usize,
    pub subscriber_count: usize,
    pub focus_duration: f64,
    pub goals_count: usize,
    pub shifts_count: usize,
    pub kernel: KernelStats,
}

pub struct WorkspaceManager {
    attention: AttentionController,
    workspace: GlobalWorkspace,
}

impl WorkspaceManager {
    /// Create a manager with no evaluators or subscribers.
    pub fn new(config: WorkspaceConfig) -> WorkspaceResult<Self> {
        config.validate()?;
        Ok(Self {
            attention: AttentionController::new(config.attention.clone()),
            workspace: GlobalWorkspace::new(config),
        })
    }

    /// Create a manager with the six built-in evaluators registered.
    pub fn with_default_evaluators(config: WorkspaceConfig) -> WorkspaceResult<Self> {
        let mut manager = Self::new(config)?;
        for evaluator in default_evaluators() {
            manager.register_evaluator(evaluator);
        }
        Ok(manager)
    }

    /// Run one cycle: advance attention time, compete under the attention
    /// bias, and move focus to whatever was broadcast.
    ///
    /// # Panics
    ///
    /// Must run inside a Tokio runtime when subscribers are registered:
    /// deliveries are spawned with `tokio::spawn`, which panics otherwise.
    #[instrument(skip(self, context), fields(cycle = self.workspace.cycle_count() + 1))]
    pub async fn cycle(&mut self, context: &WorkspaceContext) -> Option<BroadcastMessage> {
        let dt = context.dt.unwrap_or(self.workspace.config().default_dt);
        self.attention.tick(dt);

        let broadcast = self
            .workspace
            .cycle_with_bias(context, &self.attention)
            .await;

        match &broadcast {
            Some(message) => {
                if self.attention.shift_focus(message.content_type) {
                    info!(focus = %message.content_type, "Focus moved to broadcast content");
                }
            }
            None => debug!("Cycle ended without a broadcast"),
        }

        broadcast
    }

    pub fn register_evaluator(&mut self, evaluator: Box<dyn Evaluator>) {
        self.workspace.register_evaluator(evaluator);
    }

    pub fn register_subscriber(&mut self, subscriber: Arc<dyn Subscriber>) -> WorkspaceResult<()> {
        self.workspace.register_subscriber(subscriber)
    }

    pub fn unregister_subscriber(&mut self, name: &str) -> WorkspaceResult<()> {
        self.workspace.unregister_subscriber(name)
    }

    /// Give attention a top-down goal. Priority is clamped to `[0, 1]`.
    pub fn set_attention_goal(&mut self, goal_type: impl Into<String>, target: ContentType, priority: f64) {
        self.attention.set_goal(goal_type, target, priority);
    }

    /// Inject a coalition that competes from the next cycle on.
    pub fn submit(&mut self, coalition: Coalition) {
        self.workspace.submit(coalition);
    }

    /// Content of the most recent broadcast.
    pub fn current_content(&self) -> Option<&Coalition> {
        self.workspace.current_content()
    }

    pub fn current_focus(&self) -> Option<ContentType> {
        self.attention.current_focus()
    }

    pub fn stats(&self) -> WorkspaceStats {
        let kernel = self.workspace.stats().clone();
        WorkspaceStats {
            cycle_count: kernel.cycles,
            broadcast_count: kernel.broadcasts,
            current_focus: self.attention.current_focus(),
            pool_size: self.workspace.pool().len(),
            evaluator_count: self.workspace.evaluator_count(),
            subscriber_count: self.workspace.subscriber_count(),
            focus_duration: self.attention.focus_duration(),
            goals_count: self.attention.goals().len(),
            shifts_count: self.attention.shift_history().len(),
            kernel,
        }
    }

    pub fn attention(&self) -> &AttentionController {
        &self.attention
    }

    pub fn workspace(&self) -> &GlobalWorkspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut GlobalWorkspace {
        &mut self.workspace
    }
}
