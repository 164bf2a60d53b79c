//! Global Workspace kernel - the competition engine.
//!
//! One call to [`GlobalWorkspace::cycle_with_bias`] performs one transition:
//!
//! 1. run every evaluator against the context (failures isolated)
//! 2. admit new coalitions into the bounded pool, evicting the oldest
//! 3. bias every pool member
//! 4. decay every member admitted in an earlier cycle
//! 5. select the strongest member, if it meets the competition threshold
//! 6. remove the winner and fan it out to every subscriber
//! 7. record the broadcast and advance the cycle counter
//!
//! Nothing inside a cycle returns an error: misbehaving evaluators and
//! subscribers are logged and counted, and a missed threshold is simply a
//! cycle without a broadcast.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use gwt_types::{
    BroadcastMessage, Coalition, CompetitionSummary, ContentType, WorkspaceContext,
    WorkspaceError, WorkspaceResult,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::attention::{CoalitionBias, NoBias};
use crate::config::WorkspaceConfig;
use crate::evaluator::{Evaluator, EvaluatorSet};
use crate::pool::CoalitionPool;
use crate::subscriber::{fan_out, DeliveryReport, Subscriber};

/// One competition, with or without a winner.
#[derive(Clone, Debug, Serialize)]
pub struct CompetitionRecord {
    pub cycle: u64,
    pub competitors: usize,
    /// Competitors at or above the threshold
    pub qualified: usize,
    pub winner: Option<ContentType>,
    pub top_strength: f64,
    pub at: DateTime<Utc>,
}

/// Running counters kept by the kernel.
#[derive(Clone, Debug, Default, Serialize)]
pub struct KernelStats {
    pub cycles: u64,
    pub broadcasts: u64,
    /// Competitions held over a non-empty pool
    pub competitions: u64,
    /// Pool members considered, summed over all competitions
    pub coalitions_evaluated: u64,
    /// Coalitions admitted, by content type
    pub coalitions_by_type: BTreeMap<ContentType, u64>,
    /// Broadcast winners, by content type
    pub winners_by_type: BTreeMap<ContentType, u64>,
    pub mean_winning_strength: f64,
    pub evicted: u64,
    pub evaluator_failures: u64,
    pub delivery_failures: u64,
}

pub struct GlobalWorkspace {
    config: WorkspaceConfig,
    evaluators: EvaluatorSet,
    subscribers: Vec<Arc<dyn Subscriber>>,
    pool: CoalitionPool,
    history: VecDeque<BroadcastMessage>,
    competitions: VecDeque<CompetitionRecord>,
    current_content: Option<Coalition>,
    last_deliveries: Vec<DeliveryReport>,
    stats: KernelStats,
}

impl GlobalWorkspace {
    pub fn new(config: WorkspaceConfig) -> Self {
        Self {
            pool: CoalitionPool::new(config.pool_capacity),
            config,
            evaluators: EvaluatorSet::new(),
            subscribers: Vec::new(),
            history: VecDeque::new(),
            competitions: VecDeque::new(),
            current_content: None,
            last_deliveries: Vec::new(),
            stats: KernelStats::default(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(WorkspaceConfig::default())
    }

    // --- Registration ---

    pub fn register_evaluator(&mut self, evaluator: Box<dyn Evaluator>) {
        info!(evaluator = evaluator.name(), "Evaluator registered");
        self.evaluators.register(evaluator);
    }

    /// Register a subscriber. Names must be unique.
    pub fn register_subscriber(&mut self, subscriber: Arc<dyn Subscriber>) -> WorkspaceResult<()> {
        if self.subscribers.iter().any(|s| s.name() == subscriber.name()) {
            return Err(WorkspaceError::DuplicateSubscriber(subscriber.name().to_string()));
        }
        info!(subscriber = subscriber.name(), "Subscriber registered");
        self.subscribers.push(subscriber);
        Ok(())
    }

    pub fn unregister_subscriber(&mut self, name: &str) -> WorkspaceResult<()> {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.name() != name);
        if self.subscribers.len() == before {
            return Err(WorkspaceError::SubscriberNotFound(name.to_string()));
        }
        info!(subscriber = name, "Subscriber removed");
        Ok(())
    }

    /// Inject a coalition directly, outside the evaluator pass. It competes
    /// from the next cycle on and is not decayed in that cycle.
    pub fn submit(&mut self, coalition: Coalition) {
        let cycle = self.stats.cycles + 1;
        self.admit(coalition, cycle);
    }

    /// Clear state that evaluators carry across cycles.
    pub fn reset_evaluators(&mut self) {
        self.evaluators.reset_all();
        debug!("Evaluator state reset");
    }

    // --- Cycle ---

    /// Run one cycle without attention bias.
    ///
    /// # Panics
    ///
    /// Must run inside a Tokio runtime when subscribers are registered:
    /// deliveries are spawned with `tokio::spawn`, which panics otherwise.
    pub async fn cycle(&mut self, context: &WorkspaceContext) -> Option<BroadcastMessage> {
        self.cycle_with_bias(context, &NoBias).await
    }

    /// Run one cycle, biasing the pool through `bias` before competition.
    ///
    /// # Panics
    ///
    /// Must run inside a Tokio runtime when subscribers are registered:
    /// deliveries are spawned with `tokio::spawn`, which panics otherwise.
    pub async fn cycle_with_bias(
        &mut self,
        context: &WorkspaceContext,
        bias: &(dyn CoalitionBias + Sync),
    ) -> Option<BroadcastMessage> {
        let cycle = self.stats.cycles + 1;

        // Evaluate
        let pass = self.evaluators.run(context);
        self.stats.evaluator_failures += pass.failures.len() as u64;

        // Admit
        let proposed = pass.coalitions.len();
        for coalition in pass.coalitions {
            self.admit(coalition, cycle);
        }

        // Bias
        let boosted = self.pool.bias_all(bias);

        // Decay
        let decayed = self.pool.decay_survivors(cycle, self.config.decay_rate);

        debug!(
            cycle,
            proposed,
            boosted,
            decayed,
            pool = self.pool.len(),
            "Pool prepared for competition"
        );

        // Compete, broadcast
        let message = match self.compete(cycle) {
            Some((winner, summary)) => Some(self.broadcast(winner, cycle, summary).await),
            None => None,
        };

        // Record
        self.stats.cycles = cycle;
        message
    }

    fn admit(&mut self, coalition: Coalition, cycle: u64) {
        *self
            .stats
            .coalitions_by_type
            .entry(coalition.content_type())
            .or_insert(0) += 1;

        let evicted = self.pool.admit(coalition, cycle);
        self.stats.evicted += evicted.len() as u64;
    }

    fn compete(&mut self, cycle: u64) -> Option<(Coalition, CompetitionSummary)> {
        let leader = self.pool.strongest()?;
        let threshold = self.config.competition_threshold;
        let competitors = self.pool.len();
        self.stats.competitions += 1;
        self.stats.coalitions_evaluated += competitors as u64;
        let qualified = self
            .pool
            .coalitions()
            .filter(|c| c.competition_strength() >= threshold)
            .count();

        let winner = if leader.strength >= threshold {
            self.pool.take(leader.index).map(|entry| entry.coalition)
        } else {
            None
        };

        self.competitions.push_back(CompetitionRecord {
            cycle,
            competitors,
            qualified,
            winner: winner.as_ref().map(|c| c.content_type()),
            top_strength: leader.strength,
            at: Utc::now(),
        });
        while self.competitions.len() > self.config.competition_history_capacity {
            self.competitions.pop_front();
        }

        match winner {
            Some(winner) => Some((
                winner,
                CompetitionSummary {
                    winning_strength: leader.strength,
                    threshold,
                    competitors,
                    intensity: qualified as f64 / competitors as f64,
                },
            )),
            None => {
                debug!(
                    cycle,
                    top_strength = leader.strength,
                    threshold,
                    "No coalition reached the competition threshold"
                );
                None
            }
        }
    }

    async fn broadcast(
        &mut self,
        winner: Coalition,
        cycle: u64,
        summary: CompetitionSummary,
    ) -> BroadcastMessage {
        let recipients = self.subscriber_names();
        let strength = summary.winning_strength;
        let message = Arc::new(BroadcastMessage::new(winner.clone(), cycle, summary, recipients));

        let reports = fan_out(
            &self.subscribers,
            Arc::clone(&message),
            self.config.delivery_timeout(),
        )
        .await;
        let failures = reports.iter().filter(|r| !r.is_ok()).count();

        info!(
            cycle,
            content_type = %message.content_type,
            priority = ?message.priority,
            strength,
            recipients = reports.len(),
            failures,
            "Conscious broadcast"
        );

        *self
            .stats
            .winners_by_type
            .entry(winner.content_type())
            .or_insert(0) += 1;
        self.stats.broadcasts += 1;
        self.stats.delivery_failures += failures as u64;
        let n = self.stats.broadcasts as f64;
        self.stats.mean_winning_strength += (strength - self.stats.mean_winning_strength) / n;

        self.current_content = Some(winner);
        self.last_deliveries = reports;

        let message = Arc::try_unwrap(message).unwrap_or_else(|shared| (*shared).clone());
        self.history.push_back(message.clone());
        while self.history.len() > self.config.history_capacity {
            self.history.pop_front();
        }

        message
    }

    // --- Queries ---

    pub fn pool(&self) -> &CoalitionPool {
        &self.pool
    }

    pub fn history(&self) -> &VecDeque<BroadcastMessage> {
        &self.history
    }

    pub fn competition_history(&self) -> &VecDeque<CompetitionRecord> {
        &self.competitions
    }

    /// The most recent winner.
    pub fn current_content(&self) -> Option<&Coalition> {
        self.current_content.as_ref()
    }

    /// Delivery outcomes of the most recent broadcast.
    pub fn last_deliveries(&self) -> &[DeliveryReport] {
        &self.last_deliveries
    }

    pub fn stats(&self) -> &KernelStats {
        &self.stats
    }

    pub fn cycle_count(&self) -> u64 {
        self.stats.cycles
    }

    pub fn evaluator_count(&self) -> usize {
        self.evaluators.len()
    }

    pub fn evaluator_names(&self) -> Vec<String> {
        self.evaluators.names()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn subscriber_names(&self) -> Vec<String> {
        self.subscribers.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attention::AttentionController;
    use crate::evaluators::{AffectEvaluator, DangerEvaluator, ResourceEvaluator};
    use crate::subscriber::ChannelSubscriber;
    use gwt_types::{BroadcastPriority, EvaluatorError, Payload};

    fn coalition(source: &str, content_type: ContentType, activation: f64, salience: f64) -> Coalition {
        Coalition::new(source, content_type, Payload::new(), activation, salience)
    }

    struct Broken;

    impl Evaluator for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn evaluate(&mut self, _: &WorkspaceContext) -> Result<Option<Coalition>, EvaluatorError> {
            Err(EvaluatorError::MissingField("everything".into()))
        }
    }

    #[tokio::test]
    async fn danger_scenario_broadcasts_critical() {
        let mut ws = GlobalWorkspace::with_defaults();
        ws.register_evaluator(Box::new(DangerEvaluator));

        let msg = ws
            .cycle(&WorkspaceContext::new().with_danger(0.8))
            .await
            .expect("broadcast");

        assert_eq!(msg.priority, BroadcastPriority::Critical);
        assert_eq!(msg.content_type, ContentType::Urgency);
        assert_eq!(msg.cycle, 1);
        assert!((msg.competition.winning_strength - 0.72).abs() < 1e-9);
        assert!(ws.pool().is_empty());
        assert_eq!(ws.history().len(), 1);
        assert_eq!(ws.cycle_count(), 1);
    }

    #[tokio::test]
    async fn below_threshold_keeps_pool() {
        let mut ws = GlobalWorkspace::with_defaults();
        ws.register_evaluator(Box::new(DangerEvaluator));

        let msg = ws.cycle(&WorkspaceContext::new().with_danger(0.5)).await;
        assert!(msg.is_none());
        assert_eq!(ws.pool().len(), 1);
        assert!(ws.history().is_empty());
        assert_eq!(ws.cycle_count(), 1);

        let record = ws.competition_history().back().unwrap();
        assert!(record.winner.is_none());
        assert!((record.top_strength - 0.375).abs() < 1e-9);
    }

    #[tokio::test]
    async fn competitions_count_non_empty_pools() {
        let mut ws = GlobalWorkspace::with_defaults();
        ws.register_evaluator(Box::new(DangerEvaluator));

        // Empty pool: no competition held.
        assert!(ws.cycle(&WorkspaceContext::new()).await.is_none());
        assert_eq!(ws.stats().competitions, 0);

        // Below threshold still counts as a competition.
        assert!(ws.cycle(&WorkspaceContext::new().with_danger(0.5)).await.is_none());
        assert_eq!(ws.stats().competitions, 1);
        assert_eq!(ws.stats().coalitions_evaluated, 1);

        // The survivor competes again alongside the new danger coalition.
        assert!(ws.cycle(&WorkspaceContext::new().with_danger(0.9)).await.is_some());
        let stats = ws.stats();
        assert_eq!(stats.cycles, 3);
        assert_eq!(stats.competitions, 2);
        assert_eq!(stats.coalitions_evaluated, 3);
    }

    #[tokio::test]
    async fn survivors_decay_each_cycle() {
        let mut ws = GlobalWorkspace::with_defaults();
        ws.register_evaluator(Box::new(DangerEvaluator));

        ws.cycle(&WorkspaceContext::new().with_danger(0.5)).await;
        let first = ws.pool().coalitions().next().unwrap().activation();
        assert!((first - 0.75).abs() < 1e-9);

        ws.cycle(&WorkspaceContext::new()).await;
        let second = ws.pool().coalitions().next().unwrap().activation();
        assert!((second - 0.70).abs() < 1e-9);
        assert_eq!(ws.pool().coalitions().next().unwrap().salience(), 0.5);
    }

    #[tokio::test]
    async fn winner_removed_and_cannot_win_again() {
        let mut ws = GlobalWorkspace::with_defaults();
        ws.submit(coalition("a", ContentType::Goal, 0.9, 0.9));
        ws.submit(coalition("b", ContentType::Insight, 0.8, 0.8));

        let first = ws.cycle(&WorkspaceContext::new()).await.unwrap();
        assert_eq!(first.coalition.source(), "a");

        let second = ws.cycle(&WorkspaceContext::new()).await.unwrap();
        assert_eq!(second.coalition.source(), "b");
        assert_ne!(first.coalition.id(), second.coalition.id());
        assert!(ws.pool().is_empty());
    }

    #[tokio::test]
    async fn tie_goes_to_earliest_insertion() {
        let mut ws = GlobalWorkspace::with_defaults();
        ws.submit(coalition("early", ContentType::Goal, 0.8, 0.75));
        ws.submit(coalition("late", ContentType::Insight, 0.75, 0.8));

        let msg = ws.cycle(&WorkspaceContext::new()).await.unwrap();
        assert_eq!(msg.coalition.source(), "early");
    }

    #[tokio::test]
    async fn evaluator_failure_does_not_abort_cycle() {
        let mut ws = GlobalWorkspace::with_defaults();
        ws.register_evaluator(Box::new(Broken));
        ws.register_evaluator(Box::new(ResourceEvaluator));

        let msg = ws.cycle(&WorkspaceContext::new().with_health(0.2)).await;
        assert!(msg.is_some());
        assert_eq!(ws.stats().evaluator_failures, 1);
    }

    #[tokio::test]
    async fn subscribers_receive_and_are_reported() {
        let mut ws = GlobalWorkspace::with_defaults();
        ws.register_evaluator(Box::new(AffectEvaluator));
        let (sub, mut rx) = ChannelSubscriber::new("memory_writer", 4);
        ws.register_subscriber(Arc::new(sub)).unwrap();

        let msg = ws
            .cycle(&WorkspaceContext::new().with_affect(0.9, 0.9))
            .await
            .unwrap();
        assert_eq!(msg.priority, BroadcastPriority::High);
        assert_eq!(msg.recipients, vec!["memory_writer".to_string()]);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.id, msg.id);
        assert_eq!(ws.last_deliveries().len(), 1);
        assert!(ws.last_deliveries()[0].is_ok());
    }

    #[tokio::test]
    async fn duplicate_and_missing_subscribers() {
        let mut ws = GlobalWorkspace::with_defaults();
        let (a, _rx_a) = ChannelSubscriber::new("logger", 1);
        let (b, _rx_b) = ChannelSubscriber::new("logger", 1);
        ws.register_subscriber(Arc::new(a)).unwrap();
        assert!(matches!(
            ws.register_subscriber(Arc::new(b)),
            Err(WorkspaceError::DuplicateSubscriber(_))
        ));

        ws.unregister_subscriber("logger").unwrap();
        assert_eq!(ws.subscriber_count(), 0);
        assert!(matches!(
            ws.unregister_subscriber("logger"),
            Err(WorkspaceError::SubscriberNotFound(_))
        ));
    }

    #[tokio::test]
    async fn bias_can_lift_a_coalition_over_threshold() {
        let mut ws = GlobalWorkspace::with_defaults();
        // strength 0.6 × 0.6 = 0.36, under the 0.4 threshold.
        ws.submit(coalition("seed", ContentType::Novelty, 0.6, 0.6));

        let mut attention = AttentionController::new(crate::config::AttentionConfig {
            top_down_weight: 1.0,
            ..Default::default()
        });
        attention.set_goal("explore", ContentType::Novelty, 1.0);

        // Boost 0.3 → activation 0.9, strength 0.54.
        let msg = ws
            .cycle_with_bias(&WorkspaceContext::new(), &attention)
            .await
            .unwrap();
        assert!((msg.coalition.activation() - 0.9).abs() < 1e-9);
    }

    #[tokio::test]
    async fn statistics_accumulate() {
        let mut ws = GlobalWorkspace::with_defaults();
        ws.register_evaluator(Box::new(DangerEvaluator));

        ws.cycle(&WorkspaceContext::new().with_danger(0.8)).await;
        ws.cycle(&WorkspaceContext::new().with_danger(1.0)).await;

        let stats = ws.stats();
        assert_eq!(stats.cycles, 2);
        assert_eq!(stats.broadcasts, 2);
        assert_eq!(stats.coalitions_by_type[&ContentType::Urgency], 2);
        assert_eq!(stats.winners_by_type[&ContentType::Urgency], 2);
        // mean of 0.72 and 1.0
        assert!((stats.mean_winning_strength - 0.86).abs() < 1e-9);
    }

    #[tokio::test]
    async fn history_is_bounded() {
        let mut ws = GlobalWorkspace::new(WorkspaceConfig {
            history_capacity: 2,
            ..WorkspaceConfig::default()
        });
        for i in 0..4 {
            ws.submit(coalition(&format!("c{}", i), ContentType::Goal, 0.9, 0.9));
            ws.cycle(&WorkspaceContext::new()).await;
        }
        let cycles: Vec<u64> = ws.history().iter().map(|m| m.cycle).collect();
        assert_eq!(cycles, vec![3, 4]);
    }
}
