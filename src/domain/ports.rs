//! Domain Ports - Core trait definitions for the provisioner
//!
//! These traits define the boundaries between the provisioning logic and the
//! outside world: the remote control plane on one side, the operator's
//! terminal on the other. Adapters implement these traits to provide concrete
//! functionality.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// =============================================================================
// Credentials & Session
// =============================================================================

/// Credentials for the cluster management endpoint
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Credentials for joining the protocol server to the directory domain
///
/// Collected separately from the cluster credentials; the directory domain is
/// an external system with its own administrator accounts.
#[derive(Debug, Clone)]
pub struct DomainCredentials {
    pub username: String,
    pub password: String,
}

/// Opaque handle for an authenticated control plane session
///
/// Produced by exactly one `connect` call and consumed by exactly one
/// `disconnect` call. The pipeline borrows it; closing it is the caller's
/// responsibility.
#[derive(Debug, Clone)]
pub struct ClusterSession {
    endpoint: String,
    token: String,
}

impl ClusterSession {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// =============================================================================
// Protocols
// =============================================================================

/// Data protocols servable through a network interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Smb,
    Nfs,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Smb => write!(f, "smb"),
            Protocol::Nfs => write!(f, "nfs"),
        }
    }
}

// =============================================================================
// Resource Identity & Specs
// =============================================================================

/// Minimal identity of a resource, used for pre-flight existence checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKey {
    Tenant { tenant: String },
    Volume { tenant: String, name: String },
    NetworkInterface { tenant: String, name: String },
    ProtocolServer { tenant: String },
    Share { tenant: String, name: String },
}

impl ResourceKey {
    /// Resource kind label for logs and error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceKey::Tenant { .. } => "tenant",
            ResourceKey::Volume { .. } => "volume",
            ResourceKey::NetworkInterface { .. } => "network-interface",
            ResourceKey::ProtocolServer { .. } => "protocol-server",
            ResourceKey::Share { .. } => "share",
        }
    }

    /// Human-readable identity, e.g. `volume svm1/vol1`
    pub fn describe(&self) -> String {
        match self {
            ResourceKey::Tenant { tenant } => format!("tenant {}", tenant),
            ResourceKey::Volume { tenant, name } => format!("volume {}/{}", tenant, name),
            ResourceKey::NetworkInterface { tenant, name } => {
                format!("network-interface {}/{}", tenant, name)
            }
            ResourceKey::ProtocolServer { tenant } => format!("protocol-server for {}", tenant),
            ResourceKey::Share { tenant, name } => format!("share {}/{}", tenant, name),
        }
    }
}

/// Full creation payload for a resource, one variant per mutating call
#[derive(Debug, Clone)]
pub enum ResourceSpec {
    Tenant {
        name: String,
        root_pool: String,
    },
    DnsConfig {
        tenant: String,
        servers: Vec<String>,
        search_domains: Vec<String>,
    },
    Volume {
        tenant: String,
        name: String,
        size: String,
        pool: String,
        junction_path: String,
    },
    NetworkInterface {
        tenant: String,
        name: String,
        address: String,
        netmask: String,
        home_node: String,
        home_port: String,
        protocols: Vec<Protocol>,
    },
    ProtocolServer {
        tenant: String,
        name: String,
        domain: String,
        credentials: DomainCredentials,
    },
    Share {
        tenant: String,
        name: String,
        path: String,
    },
    ShareAcl {
        tenant: String,
        share: String,
        principal: String,
        permission: String,
    },
    NfsService {
        tenant: String,
    },
    ExportPolicy {
        tenant: String,
        name: String,
    },
    ExportRule {
        tenant: String,
        policy: String,
        client_match: String,
    },
    VolumeExportPolicy {
        tenant: String,
        volume: String,
        policy: String,
    },
    Snapshot {
        tenant: String,
        volume: String,
        name: String,
    },
}

impl ResourceSpec {
    /// Resource kind label for logs and error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ResourceSpec::Tenant { .. } => "tenant",
            ResourceSpec::DnsConfig { .. } => "dns-config",
            ResourceSpec::Volume { .. } => "volume",
            ResourceSpec::NetworkInterface { .. } => "network-interface",
            ResourceSpec::ProtocolServer { .. } => "protocol-server",
            ResourceSpec::Share { .. } => "share",
            ResourceSpec::ShareAcl { .. } => "share-acl",
            ResourceSpec::NfsService { .. } => "nfs-service",
            ResourceSpec::ExportPolicy { .. } => "export-policy",
            ResourceSpec::ExportRule { .. } => "export-rule",
            ResourceSpec::VolumeExportPolicy { .. } => "volume-export-policy",
            ResourceSpec::Snapshot { .. } => "snapshot",
        }
    }

    /// Human-readable description of the mutation, used by dry-run logging
    pub fn describe(&self) -> String {
        match self {
            ResourceSpec::Tenant { name, root_pool } => {
                format!("tenant {} (root volume on pool {})", name, root_pool)
            }
            ResourceSpec::DnsConfig {
                tenant, servers, ..
            } => format!("DNS config for {} ({})", tenant, servers.join(", ")),
            ResourceSpec::Volume {
                tenant, name, size, ..
            } => format!("volume {}/{} ({})", tenant, name, size),
            ResourceSpec::NetworkInterface {
                tenant,
                name,
                address,
                ..
            } => format!("network interface {}/{} at {}", tenant, name, address),
            ResourceSpec::ProtocolServer {
                tenant,
                name,
                domain,
                ..
            } => format!("protocol server {} for {} joined to {}", name, tenant, domain),
            ResourceSpec::Share { tenant, name, path } => {
                format!("share {}/{} at {}", tenant, name, path)
            }
            ResourceSpec::ShareAcl {
                share,
                principal,
                permission,
                ..
            } => format!("ACL on {} for {} ({})", share, principal, permission),
            ResourceSpec::NfsService { tenant } => format!("NFS service on {}", tenant),
            ResourceSpec::ExportPolicy { tenant, name } => {
                format!("export policy {}/{}", tenant, name)
            }
            ResourceSpec::ExportRule {
                policy,
                client_match,
                ..
            } => format!("export rule on {} for {}", policy, client_match),
            ResourceSpec::VolumeExportPolicy { volume, policy, .. } => {
                format!("export policy {} attached to volume {}", policy, volume)
            }
            ResourceSpec::Snapshot { volume, name, .. } => {
                format!("snapshot {} of volume {}", name, volume)
            }
        }
    }
}

// =============================================================================
// Candidate Types
// =============================================================================

/// A storage pool eligible to back the tenant root and data volumes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolCandidate {
    pub name: String,
    pub available_bytes: u64,
}

/// A cluster node eligible to home the network interface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeCandidate {
    pub name: String,
    pub healthy: bool,
}

// =============================================================================
// Control Plane Port
// =============================================================================

/// Port for remote control plane operations
///
/// All calls are synchronous from the pipeline's point of view: one call in
/// flight at a time, blocking until the remote side answers. Timeouts are the
/// adapter's concern.
#[async_trait]
pub trait ControlPlaneClient: Send + Sync {
    /// Open a session against the cluster management endpoint
    async fn connect(&self, endpoint: &str, credentials: &Credentials) -> Result<ClusterSession>;

    /// Close a previously opened session
    async fn disconnect(&self, session: &ClusterSession) -> Result<()>;

    /// Check whether a resource already exists
    async fn exists(&self, session: &ClusterSession, key: &ResourceKey) -> Result<bool>;

    /// Create a resource
    async fn create(&self, session: &ClusterSession, spec: &ResourceSpec) -> Result<()>;

    /// List storage pools available for selection
    async fn list_pools(&self, session: &ClusterSession) -> Result<Vec<PoolCandidate>>;

    /// List cluster nodes available for selection
    async fn list_nodes(&self, session: &ClusterSession) -> Result<Vec<NodeCandidate>>;
}

// =============================================================================
// Operator Input Port
// =============================================================================

/// Port for operator interaction
///
/// The resolver and selector prompt through this trait so they can be driven
/// by a scripted implementation in tests.
pub trait Prompter: Send {
    /// Prompt for a line of input; returns the trimmed answer, possibly empty
    fn input(&mut self, prompt: &str) -> Result<String>;

    /// Prompt for a yes/no answer with a default
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;

    /// Prompt for a secret without echoing
    fn password(&mut self, prompt: &str) -> Result<String>;
}
