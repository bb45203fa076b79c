//! Error types for ar-portal.

use thiserror::Error;

/// The main error type for ar-portal operations.
#[derive(Error, Debug)]
pub enum PortalError {
    /// A configuration value is out of its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The adjustment step sequence is empty.
    #[error("placement step sequence is empty")]
    EmptyStepSequence,

    /// The step sequence contains a phase that is not an adjustment phase.
    #[error("'{0}' is not an adjustment phase")]
    NotAnAdjustmentPhase(String),

    /// The portal was already committed for this session.
    #[error("portal already committed")]
    AlreadyCommitted,

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for ar-portal operations.
pub type Result<T> = std::result::Result<T, PortalError>;
