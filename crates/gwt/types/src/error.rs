use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure raised by an evaluator while inspecting the context.
///
/// The kernel never propagates this: the evaluator simply contributes no
/// coalition for the cycle.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EvaluatorError {
    #[error("missing context field: {0}")]
    MissingField(String),

    #[error("invalid context value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("evaluator panicked: {0}")]
    Panicked(String),

    #[error("evaluator failed: {0}")]
    Failed(String),
}

/// Failure delivering a broadcast to one subscriber.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeliveryError {
    #[error("subscriber rejected broadcast: {0}")]
    Rejected(String),

    #[error("delivery timed out after {timeout_ms}ms")]
    TimedOut { timeout_ms: u64 },

    #[error("subscriber channel closed")]
    ChannelClosed,

    #[error("subscriber task aborted: {0}")]
    Aborted(String),
}

/// Errors from workspace administration and configuration.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("configuration source error: {0}")]
    ConfigSource(String),

    #[error("subscriber already registered: {0}")]
    DuplicateSubscriber(String),

    #[error("subscriber not found: {0}")]
    SubscriberNotFound(String),
}

impl WorkspaceError {
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        WorkspaceError::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
