//! Built-in walkthrough

use gwt_runtime::WorkspaceConfig;
use gwt_types::{GoalEntry, MemoryEntry, WorkspaceContext};

use super::{drive, GoalArg};
use crate::error::CliResult;
use crate::output::OutputFormat;

fn scenarios() -> Vec<(String, WorkspaceContext)> {
    vec![
        ("high danger".into(), WorkspaceContext::new().with_danger(0.8)),
        ("moderate danger".into(), WorkspaceContext::new().with_danger(0.5)),
        ("mild affect".into(), WorkspaceContext::new().with_affect(0.5, 0.0)),
        ("low health".into(), WorkspaceContext::new().with_health(0.2)),
        (
            "new symbols".into(),
            WorkspaceContext::new().with_symbols(["smoke", "heat", "light"]),
        ),
        (
            "same symbols".into(),
            WorkspaceContext::new().with_symbols(["light", "smoke", "heat"]),
        ),
        (
            "goal and memory".into(),
            WorkspaceContext::new()
                .with_goal(GoalEntry::new("find_water").with_priority(0.9))
                .with_memory(MemoryEntry::new("river_bank").with_relevance(0.7)),
        ),
        ("strong affect".into(), WorkspaceContext::new().with_affect(0.9, -0.8)),
        ("quiet".into(), WorkspaceContext::new()),
    ]
}

pub async fn execute(config: WorkspaceConfig, goals: &[GoalArg], format: OutputFormat) -> CliResult<()> {
    drive(config, goals, scenarios(), format).await
}
