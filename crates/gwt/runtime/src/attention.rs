//! Attention Controller - top-down biasing of the competition.
//!
//! Keeps a ranked list of attention goals. The highest-priority goal boosts
//! coalitions whose content type matches its target by
//! `priority × top_down_weight × 0.3`. The controller also tracks the
//! current focus and a bounded history of focus shifts.
//!
//! Time is measured on the controller's own clock, advanced by [`tick`].
//!
//! [`tick`]: AttentionController::tick

use std::collections::VecDeque;

use gwt_types::{AttentionGoal, Coalition, ContentType, FocusShift};
use tracing::debug;

use crate::config::AttentionConfig;

const BOOST_SCALE: f64 = 0.3;

/// Anything that can adjust a coalition's activation before competition.
pub trait CoalitionBias {
    /// Bias `coalition` in place and return the activation change applied.
    fn bias(&self, coalition: &mut Coalition) -> f64;
}

/// Leaves every coalition untouched.
pub struct NoBias;

impl CoalitionBias for NoBias {
    fn bias(&self, _coalition: &mut Coalition) -> f64 {
        0.0
    }
}

pub struct AttentionController {
    config: AttentionConfig,
    /// Sorted by descending priority; ties keep insertion order
    goals: Vec<AttentionGoal>,
    current_focus: Option<ContentType>,
    focus_duration: f64,
    clock: f64,
    shifts: VecDeque<FocusShift>,
}

impl AttentionController {
    pub fn new(config: AttentionConfig) -> Self {
        Self {
            config,
            goals: Vec::new(),
            current_focus: None,
            focus_duration: 0.0,
            clock: 0.0,
            shifts: VecDeque::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(AttentionConfig::default())
    }

    // --- Goals ---

    /// Add a goal and re-rank. Priority is clamped to `[0, 1]`.
    pub fn set_goal(&mut self, goal_type: impl Into<String>, target: ContentType, priority: f64) {
        let goal = AttentionGoal::new(goal_type, target, priority, self.clock);
        debug!(
            goal_type = %goal.goal_type,
            target = %goal.target,
            priority = goal.priority,
            "Attention goal set"
        );
        self.goals.push(goal);
        self.goals.sort_by(|a, b| b.priority.total_cmp(&a.priority));
    }

    pub fn goals(&self) -> &[AttentionGoal] {
        &self.goals
    }

    pub fn top_goal(&self) -> Option<&AttentionGoal> {
        self.goals.first()
    }

    pub fn clear_goals(&mut self) {
        self.goals.clear();
    }

    /// Boost that the top goal would give a coalition of `content_type`.
    pub fn boost_for(&self, content_type: ContentType) -> f64 {
        match self.top_goal() {
            Some(goal) if goal.target == content_type => {
                goal.priority * self.config.top_down_weight * BOOST_SCALE
            }
            _ => 0.0,
        }
    }

    // --- Focus ---

    /// Move focus to `focus`. Returns `true` if the focus changed.
    pub fn shift_focus(&mut self, focus: ContentType) -> bool {
        if self.current_focus == Some(focus) {
            return false;
        }

        let shift = FocusShift {
            from: self.current_focus,
            to: focus,
            duration: self.focus_duration,
            at: self.clock,
        };
        debug!(from = ?shift.from, to = %focus, held = shift.duration, "Attention shifted");

        self.shifts.push_back(shift);
        while self.shifts.len() > self.config.shift_history_capacity {
            self.shifts.pop_front();
        }

        self.current_focus = Some(focus);
        self.focus_duration = 0.0;
        true
    }

    /// Advance the clock by `dt`, accumulate focus time, and prune goals
    /// whose age has reached the TTL. Negative or non-finite steps count as 0.
    pub fn tick(&mut self, dt: f64) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.clock += dt;
        if self.current_focus.is_some() {
            self.focus_duration += dt;
        }

        let now = self.clock;
        let ttl = self.config.goal_ttl;
        let before = self.goals.len();
        self.goals.retain(|g| g.age(now) < ttl);
        if self.goals.len() < before {
            debug!(pruned = before - self.goals.len(), "Expired attention goals pruned");
        }
    }

    pub fn current_focus(&self) -> Option<ContentType> {
        self.current_focus
    }

    pub fn focus_duration(&self) -> f64 {
        self.focus_duration
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn shift_history(&self) -> &VecDeque<FocusShift> {
        &self.shifts
    }

    pub fn config(&self) -> &AttentionConfig {
        &self.config
    }
}

impl CoalitionBias for AttentionController {
    fn bias(&self, coalition: &mut Coalition) -> f64 {
        let boost = self.boost_for(coalition.content_type());
        if boost <= 0.0 {
            return 0.0;
        }
        let applied = coalition.boost(boost);
        debug!(
            content_type = %coalition.content_type(),
            boost,
            applied,
            "Attention boost"
        );
        applied
    }
}
