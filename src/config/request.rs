//! Provisioning request types
//!
//! A [`ProvisioningRequest`] is built once by the resolver and is read-only
//! thereafter; the pipeline only ever borrows it.

use crate::domain::ports::Protocol;

/// Fixed name of the share created on the data volume
pub const SHARE_NAME: &str = "data";

/// Name of the protective snapshot taken at the end of provisioning
pub const SNAPSHOT_NAME: &str = "initial_provision";

/// Default NFS export rule client match (allow all)
pub const DEFAULT_NFS_CLIENT_MATCH: &str = "0.0.0.0/0";

/// Default share ACL principal
pub const DEFAULT_ACL_PRINCIPAL: &str = "Everyone";

/// Default share ACL permission level
pub const DEFAULT_ACL_PERMISSION: &str = "full_control";

// =============================================================================
// Optional Features
// =============================================================================

/// Secondary-protocol (NFS) exposure of the data volume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfsExposure {
    /// Export rule client match, e.g. `10.0.0.0/24`
    pub client_match: String,
}

impl Default for NfsExposure {
    fn default() -> Self {
        Self {
            client_match: DEFAULT_NFS_CLIENT_MATCH.to_string(),
        }
    }
}

/// Explicit access-control entry added to the share
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareAclEntry {
    pub principal: String,
    pub permission: String,
}

impl Default for ShareAclEntry {
    fn default() -> Self {
        Self {
            principal: DEFAULT_ACL_PRINCIPAL.to_string(),
            permission: DEFAULT_ACL_PERMISSION.to_string(),
        }
    }
}

/// Optional provisioning features, only configurable in Guided-Full mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionalFeatures {
    /// Secondary-protocol exposure; `None` means SMB only
    pub nfs: Option<NfsExposure>,
    /// Explicit share ACL; `None` leaves the control plane default in place
    pub share_acl: Option<ShareAclEntry>,
}

// =============================================================================
// Provisioning Request
// =============================================================================

/// A complete, validated provisioning request
///
/// Every field required by the active step set is non-empty by construction;
/// the resolver refuses to produce a request otherwise.
#[derive(Debug, Clone)]
pub struct ProvisioningRequest {
    /// Cluster management endpoint (host or host:port)
    pub cluster: String,
    /// Tenant container name
    pub tenant: String,
    /// Storage pool backing the tenant root and data volumes
    pub pool: String,
    /// Data volume name
    pub volume: String,
    /// Data volume size, e.g. `100g`
    pub volume_size: String,
    /// Network interface name
    pub interface_name: String,
    /// Network interface address
    pub interface_address: String,
    /// Network interface netmask
    pub interface_netmask: String,
    /// Node homing the interface
    pub home_node: String,
    /// Port on the home node
    pub home_port: String,
    /// Protocol server (SMB) name
    pub protocol_server: String,
    /// Directory domain the protocol server joins
    pub directory_domain: String,
    /// Ordered DNS server addresses for the tenant
    pub dns_servers: Vec<String>,
    /// DNS search domain; independent of the directory domain, optional
    pub dns_search_domain: Option<String>,
    /// Optional features resolved in Guided-Full mode, off otherwise
    pub features: OptionalFeatures,
}

impl ProvisioningRequest {
    /// Junction path the data volume is mounted at inside the tenant namespace
    pub fn junction_path(&self) -> String {
        format!("/{}", self.volume)
    }

    /// Name of the export policy created for NFS exposure
    pub fn export_policy_name(&self) -> String {
        format!("{}_policy", self.volume)
    }

    /// Protocol set served through the network interface
    pub fn protocols(&self) -> Vec<Protocol> {
        let mut protocols = vec![Protocol::Smb];
        if self.features.nfs.is_some() {
            protocols.push(Protocol::Nfs);
        }
        protocols
    }

    /// UNC path of the provisioned share
    pub fn share_path(&self) -> String {
        format!("\\\\{}\\{}", self.protocol_server, SHARE_NAME)
    }

    /// NFS mount path, meaningful only when NFS exposure is enabled
    pub fn nfs_path(&self) -> String {
        format!("{}:{}", self.interface_address, self.junction_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProvisioningRequest {
        ProvisioningRequest {
            cluster: "c1".into(),
            tenant: "svmA".into(),
            pool: "aggr1".into(),
            volume: "vol1".into(),
            volume_size: "100g".into(),
            interface_name: "lif1".into(),
            interface_address: "10.0.0.5".into(),
            interface_netmask: "255.255.255.0".into(),
            home_node: "node1".into(),
            home_port: "e0c".into(),
            protocol_server: "SMBX".into(),
            directory_domain: "dom.local".into(),
            dns_servers: vec!["1.1.1.1".into()],
            dns_search_domain: None,
            features: OptionalFeatures::default(),
        }
    }

    #[test]
    fn test_derived_paths() {
        let req = request();
        assert_eq!(req.junction_path(), "/vol1");
        assert_eq!(req.export_policy_name(), "vol1_policy");
        assert_eq!(req.share_path(), "\\\\SMBX\\data");
        assert_eq!(req.nfs_path(), "10.0.0.5:/vol1");
    }

    #[test]
    fn test_protocol_set_follows_nfs_feature() {
        let mut req = request();
        assert_eq!(req.protocols(), vec![Protocol::Smb]);

        req.features.nfs = Some(NfsExposure::default());
        assert_eq!(req.protocols(), vec![Protocol::Smb, Protocol::Nfs]);
    }
}
