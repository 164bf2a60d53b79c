//! Contexts from a file

use std::path::Path;

use gwt_runtime::WorkspaceConfig;
use gwt_types::WorkspaceContext;
use tracing::info;

use super::{drive, GoalArg};
use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;

/// Read a list of contexts. `.yaml`/`.yml` files are YAML, anything else JSON.
fn load_contexts(path: &str) -> CliResult<Vec<WorkspaceContext>> {
    let raw = std::fs::read_to_string(path)?;
    let is_yaml = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let contexts: Vec<WorkspaceContext> = if is_yaml {
        serde_yaml::from_str(&raw)?
    } else {
        serde_json::from_str(&raw)?
    };

    if contexts.is_empty() {
        return Err(CliError::InvalidArgument(format!("{} holds no contexts", path)));
    }
    Ok(contexts)
}

pub async fn execute(
    config: WorkspaceConfig,
    path: &str,
    goals: &[GoalArg],
    format: OutputFormat,
) -> CliResult<()> {
    let contexts = load_contexts(path)?;
    info!(path, contexts = contexts.len(), "Contexts loaded");

    let labelled = contexts
        .into_iter()
        .enumerate()
        .map(|(i, ctx)| (format!("#{}", i + 1), ctx))
        .collect();

    drive(config, goals, labelled, format).await
}
