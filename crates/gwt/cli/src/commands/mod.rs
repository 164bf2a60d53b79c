//! Command implementations

pub mod demo;
pub mod run;

use std::sync::Arc;

use async_trait::async_trait;
use colored::*;
use gwt_runtime::{Subscriber, WorkspaceConfig, WorkspaceManager};
use gwt_types::{BroadcastMessage, ContentType, DeliveryError, WorkspaceContext};

use crate::error::CliResult;
use crate::output::{self, CycleRow, OutputFormat};

/// A top-down attention goal given on the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalArg {
    pub target: ContentType,
    pub priority: f64,
}

/// Parse `content_type[=priority]`. Priority defaults to 1.0.
pub fn parse_goal(raw: &str) -> Result<GoalArg, String> {
    let (name, priority) = match raw.split_once('=') {
        Some((name, priority)) => {
            let priority = priority
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid priority '{}': {}", priority, e))?;
            (name, priority)
        }
        None => (raw, 1.0),
    };

    let key = name.trim().replace('-', "_");
    let target = ContentType::ALL
        .into_iter()
        .find(|ct| ct.as_str() == key)
        .ok_or_else(|| format!("unknown content type '{}'", name.trim()))?;

    Ok(GoalArg { target, priority })
}

/// Prints each broadcast as it is delivered.
struct ConsoleSubscriber;

#[async_trait]
impl Subscriber for ConsoleSubscriber {
    fn name(&self) -> &str {
        "console"
    }

    async fn receive(&self, message: &BroadcastMessage) -> Result<(), DeliveryError> {
        let label = format!("[{}]", message.content_type);
        let label = if message.is_critical() {
            label.red().bold()
        } else {
            label.green()
        };
        println!(
            "{} cycle {} from {} (strength {:.3})",
            label,
            message.cycle,
            message.coalition.source(),
            message.competition.winning_strength
        );
        Ok(())
    }
}

fn build_manager(
    config: WorkspaceConfig,
    goals: &[GoalArg],
    format: OutputFormat,
) -> CliResult<WorkspaceManager> {
    let mut manager = WorkspaceManager::with_default_evaluators(config)?;
    for goal in goals {
        manager.set_attention_goal(format!("cli_{}", goal.target), goal.target, goal.priority);
    }
    if matches!(format, OutputFormat::Table) {
        manager.register_subscriber(Arc::new(ConsoleSubscriber))?;
    }
    Ok(manager)
}

/// Run one cycle per labelled context and print the report.
async fn drive(
    config: WorkspaceConfig,
    goals: &[GoalArg],
    contexts: Vec<(String, WorkspaceContext)>,
    format: OutputFormat,
) -> CliResult<()> {
    let mut manager = build_manager(config, goals, format)?;
    let mut rows = Vec::with_capacity(contexts.len());
    let mut broadcasts = Vec::new();

    for (label, context) in contexts {
        let outcome = manager.cycle(&context).await;
        rows.push(CycleRow::new(manager.stats().cycle_count, label, outcome.as_ref()));
        broadcasts.extend(outcome);
    }

    output::print_report(&rows, &broadcasts, &manager.stats(), format)
}
