//! NAS Service Provisioner
//!
//! Provisions a composite file-service endpoint on a remote
//! storage-management control plane: a tenant container, a data volume, a
//! network interface, a directory-joined protocol server, a share, optional
//! access control and NFS exposure, and a protective snapshot.
//!
//! The interesting part is the orchestration around the individual creation
//! calls, not the calls themselves:
//!
//! - the [`config`] resolver produces one validated request from exactly one
//!   of three input modes (batch string, guided-mandatory, guided-full)
//! - the [`selector`] fills live-queried resource references the operator
//!   did not supply
//! - the [`pipeline`] executes the fixed step order idempotently, classifying
//!   each failure as pipeline-fatal or degraded-but-continuable
//! - [`run`] owns the session: one connect, one disconnect, on every path
//!
//! # Modules
//!
//! - [`config`]: configuration resolution and the provisioning request
//! - [`selector`]: live resource selection (pools, home nodes)
//! - [`pipeline`]: the staged, idempotent provisioning executor
//! - [`controlplane`]: REST and dry-run control plane adapters
//! - [`domain`]: core port traits and resource types
//! - [`console`]: terminal prompts and the final report
//! - [`error`]: error types and exit codes

pub mod config;
pub mod console;
pub mod controlplane;
pub mod domain;
pub mod error;
pub mod pipeline;
pub mod run;
pub mod selector;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{
    resolver::{parse_batch, resolve, resolve_mode, Field, InputMode, RequestDraft, Resolution},
    NfsExposure, OptionalFeatures, ProvisioningRequest, ShareAclEntry,
};

pub use controlplane::{DryRunClient, RestConfig, RestControlPlane};

pub use domain::ports::{
    ClusterSession, ControlPlaneClient, Credentials, DomainCredentials, NodeCandidate,
    PoolCandidate, Prompter, Protocol, ResourceKey, ResourceSpec,
};

pub use error::{Error, Result};

pub use pipeline::{
    FailurePolicy, Pipeline, PipelineOutcome, StepName, StepOutcome, Verdict,
};

pub use run::run_provisioning;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
