//! Error types for the NAS provisioner
//!
//! Provides structured error types for configuration resolution, resource
//! selection, session management, and control plane calls.

use thiserror::Error;

/// Unified error type for the provisioner
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Missing required fields: {}", .missing.join(", "))]
    MissingFields { missing: Vec<String> },

    // =========================================================================
    // Selection Errors
    // =========================================================================
    #[error("Selection out of range: {input:?} (expected an ordinal between 1 and {count})")]
    SelectionOutOfRange { input: String, count: usize },

    #[error("Candidate query failed for {kind}: {reason}")]
    CandidateQuery { kind: String, reason: String },

    #[error("No {kind} candidates available on the cluster")]
    NoCandidates { kind: String },

    // =========================================================================
    // Session Errors
    // =========================================================================
    #[error("Connect to {endpoint} failed: {reason}")]
    Connect { endpoint: String, reason: String },

    #[error("Disconnect failed: {0}")]
    Disconnect(String),

    // =========================================================================
    // Control Plane Errors
    // =========================================================================
    #[error("Control plane rejected {operation} for {resource}: {reason}")]
    ControlPlane {
        operation: String,
        resource: String,
        reason: String,
    },

    #[error("Unexpected API response (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    // =========================================================================
    // Operator Input Errors
    // =========================================================================
    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Process exit code for this error
    ///
    /// - 2: configuration / validation error (nothing was attempted remotely)
    /// - 3: resource selection error
    /// - 4: session error (connect/disconnect)
    /// - 1: everything else
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Configuration(_) | Error::MissingFields { .. } => 2,
            Error::SelectionOutOfRange { .. }
            | Error::CandidateQuery { .. }
            | Error::NoCandidates { .. } => 3,
            Error::Connect { .. } | Error::Disconnect(_) => 4,
            _ => 1,
        }
    }

    /// Whether this error occurred before any remote mutation could happen
    pub fn is_pre_flight(&self) -> bool {
        matches!(
            self,
            Error::Configuration(_) | Error::MissingFields { .. }
        )
    }
}

/// Result type alias for the provisioner
pub type Result<T> = std::result::Result<T, Error>;
