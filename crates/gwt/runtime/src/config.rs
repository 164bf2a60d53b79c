//! Workspace configuration

use gwt_types::{WorkspaceError, WorkspaceResult};
use serde::{Deserialize, Serialize};

/// Attention controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttentionConfig {
    /// Weight of top-down goals in the bias boost
    pub top_down_weight: f64,
    /// Goals whose age reaches this many time units are pruned
    pub goal_ttl: f64,
    /// Focus shifts retained in history
    pub shift_history_capacity: usize,
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self {
            top_down_weight: 0.3,
            goal_ttl: 30.0,
            shift_history_capacity: 100,
        }
    }
}

/// Complete workspace configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Minimum winning `activation × salience` for a broadcast
    pub competition_threshold: f64,
    /// Activation lost by every surviving coalition per cycle
    pub decay_rate: f64,
    /// Coalitions held in the pool before the oldest are evicted
    pub pool_capacity: usize,
    /// Broadcasts retained in history
    pub history_capacity: usize,
    /// Competition records retained in history
    pub competition_history_capacity: usize,
    /// Per-subscriber delivery timeout; 0 waits indefinitely
    pub delivery_timeout_ms: u64,
    /// Time step used when the context does not carry one
    pub default_dt: f64,
    pub attention: AttentionConfig,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            competition_threshold: 0.4,
            decay_rate: 0.05,
            pool_capacity: 10,
            history_capacity: 50,
            competition_history_capacity: 100,
            delivery_timeout_ms: 5_000,
            default_dt: 0.1,
            attention: AttentionConfig::default(),
        }
    }
}

impl WorkspaceConfig {
    /// Load configuration: defaults, then an optional file, then `GWT_*`
    /// environment variables (nested keys use `__`, e.g.
    /// `GWT_ATTENTION__TOP_DOWN_WEIGHT`).
    pub fn load(path: Option<&str>) -> WorkspaceResult<Self> {
        let source_err = |e: config::ConfigError| WorkspaceError::ConfigSource(e.to_string());

        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&WorkspaceConfig::default()).map_err(source_err)?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("GWT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: WorkspaceConfig = builder
            .build()
            .map_err(source_err)?
            .try_deserialize()
            .map_err(source_err)?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values outside their meaningful ranges.
    pub fn validate(&self) -> WorkspaceResult<()> {
        check_unit("competition_threshold", self.competition_threshold)?;
        check_unit("decay_rate", self.decay_rate)?;
        check_unit("attention.top_down_weight", self.attention.top_down_weight)?;

        if self.pool_capacity == 0 {
            return Err(WorkspaceError::invalid_config("pool_capacity", "must be at least 1"));
        }
        if self.history_capacity == 0 {
            return Err(WorkspaceError::invalid_config("history_capacity", "must be at least 1"));
        }
        if !(self.default_dt.is_finite() && self.default_dt >= 0.0) {
            return Err(WorkspaceError::invalid_config("default_dt", "must be finite and non-negative"));
        }
        if !(self.attention.goal_ttl.is_finite() && self.attention.goal_ttl > 0.0) {
            return Err(WorkspaceError::invalid_config("attention.goal_ttl", "must be positive"));
        }
        Ok(())
    }

    /// Delivery timeout, if one is configured.
    pub fn delivery_timeout(&self) -> Option<std::time::Duration> {
        match self.delivery_timeout_ms {
            0 => None,
            ms => Some(std::time::Duration::from_millis(ms)),
        }
    }
}

fn check_unit(field: &str, value: f64) -> WorkspaceResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(WorkspaceError::invalid_config(field, format!("{} is outside [0, 1]", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = WorkspaceConfig::default();
        assert_eq!(config.competition_threshold, 0.4);
        assert_eq!(config.decay_rate, 0.05);
        assert_eq!(config.attention.top_down_weight, 0.3);
        assert_eq!(config.attention.goal_ttl, 30.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        let config = WorkspaceConfig {
            competition_threshold: 1.5,
            ..WorkspaceConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(WorkspaceError::InvalidConfig { .. })
        ));

        let config = WorkspaceConfig {
            pool_capacity: 0,
            ..WorkspaceConfig::default()
        };
        assert!(config.validate().is_err());

        let config = WorkspaceConfig {
            decay_rate: f64::NAN,
            ..WorkspaceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_delivery_timeout() {
        let config = WorkspaceConfig::default();
        assert_eq!(
            config.delivery_timeout(),
            Some(std::time::Duration::from_millis(5_000))
        );

        let config = WorkspaceConfig {
            delivery_timeout_ms: 0,
            ..WorkspaceConfig::default()
        };
        assert!(config.delivery_timeout().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workspace.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "competition_threshold = 0.55").unwrap();
        writeln!(file, "pool_capacity = 4").unwrap();
        writeln!(file, "[attention]").unwrap();
        writeln!(file, "top_down_weight = 0.6").unwrap();
        drop(file);

        let config = WorkspaceConfig::load(path.to_str()).unwrap();
        assert_eq!(config.competition_threshold, 0.55);
        assert_eq!(config.pool_capacity, 4);
        assert_eq!(config.attention.top_down_weight, 0.6);
        // Untouched keys keep their defaults.
        assert_eq!(config.decay_rate, 0.05);
        assert_eq!(config.attention.goal_ttl, 30.0);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let config = WorkspaceConfig::load(None).unwrap();
        assert_eq!(config.pool_capacity, WorkspaceConfig::default().pool_capacity);
    }
}
