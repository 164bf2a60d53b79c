//! Output formatting utilities

use colored::*;
use gwt_runtime::WorkspaceStats;
use gwt_types::BroadcastMessage;
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::error::CliResult;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// One row per cycle
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct CycleRow {
    #[tabled(rename = "Cycle")]
    pub cycle: u64,
    #[tabled(rename = "Context")]
    pub label: String,
    #[tabled(rename = "Winner")]
    pub winner: String,
    #[tabled(rename = "Source")]
    pub source: String,
    #[tabled(rename = "Strength")]
    pub strength: String,
    #[tabled(rename = "Priority")]
    pub priority: String,
}

impl CycleRow {
    pub fn new(cycle: u64, label: impl Into<String>, broadcast: Option<&BroadcastMessage>) -> Self {
        match broadcast {
            Some(msg) => Self {
                cycle,
                label: label.into(),
                winner: msg.content_type.to_string(),
                source: msg.coalition.source().to_string(),
                strength: format!("{:.3}", msg.competition.winning_strength),
                priority: format!("{:?}", msg.priority).to_lowercase(),
            },
            None => Self {
                cycle,
                label: label.into(),
                winner: "-".into(),
                source: "-".into(),
                strength: "-".into(),
                priority: "-".into(),
            },
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    cycles: &'a [CycleRow],
    broadcasts: &'a [BroadcastMessage],
    stats: &'a WorkspaceStats,
}

/// Print a single item in the specified format
pub fn print_single<T: Serialize>(data: &T, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table | OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(data)?);
        }
    }
    Ok(())
}

/// Print the outcome of a run: per-cycle rows, broadcasts, statistics.
pub fn print_report(
    rows: &[CycleRow],
    broadcasts: &[BroadcastMessage],
    stats: &WorkspaceStats,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("{}", "No cycles run".dimmed());
            } else {
                println!("{}", Table::new(rows.to_vec()));
            }
            println!();
            println!(
                "{} {} cycles, {} broadcasts, focus {}",
                "Summary:".bold(),
                stats.cycle_count,
                stats.broadcast_count,
                stats
                    .current_focus
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "none".into())
                    .cyan()
            );
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Yaml => print_single(
            &Report {
                cycles: rows,
                broadcasts,
                stats,
            },
            format,
        ),
    }
}
