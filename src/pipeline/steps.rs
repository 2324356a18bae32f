//! Pipeline step planning
//!
//! The step sequence is fixed at design time. Planning a run turns the
//! resolved request into the ordered list of steps, each carrying its failure
//! policy, optional existence-check key, and the creation calls it performs.

use crate::config::request::{ProvisioningRequest, SHARE_NAME, SNAPSHOT_NAME};
use crate::domain::ports::{DomainCredentials, ResourceKey, ResourceSpec};

// =============================================================================
// Step Names
// =============================================================================

/// The nine provisioning steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepName {
    Tenant,
    Dns,
    Volume,
    NetworkInterface,
    ProtocolServer,
    Share,
    ShareAcl,
    NfsExposure,
    Snapshot,
}

impl StepName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepName::Tenant => "tenant",
            StepName::Dns => "dns",
            StepName::Volume => "volume",
            StepName::NetworkInterface => "network-interface",
            StepName::ProtocolServer => "protocol-server",
            StepName::Share => "share",
            StepName::ShareAcl => "share-acl",
            StepName::NfsExposure => "nfs-exposure",
            StepName::Snapshot => "snapshot",
        }
    }
}

impl std::fmt::Display for StepName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Failure Policy
// =============================================================================

/// How a step's failure affects the rest of the run
///
/// Steps 1-6 produce the minimum viable service and are fatal; the ACL, NFS
/// exposure, and snapshot steps are protective or convenience enhancements
/// whose absence does not invalidate the provisioned service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Halt all remaining steps
    Fatal,
    /// Record and continue
    Degraded,
}

// =============================================================================
// Planned Steps
// =============================================================================

/// One step of a planned run
#[derive(Debug, Clone)]
pub struct PlannedStep {
    pub name: StepName,
    pub policy: FailurePolicy,
    /// Pre-flight existence check; `None` means always attempt the creates
    pub existence: Option<ResourceKey>,
    /// Mutating calls, in order; all must succeed for the step to succeed
    pub actions: Vec<ResourceSpec>,
}

/// Plan the fixed, ordered step list for a request
///
/// Conditional steps (share ACL, NFS exposure) appear only when the request
/// enables them; everything else is always present, in the same order.
pub fn plan(request: &ProvisioningRequest, domain: &DomainCredentials) -> Vec<PlannedStep> {
    let tenant = request.tenant.clone();
    let mut steps = Vec::with_capacity(9);

    steps.push(PlannedStep {
        name: StepName::Tenant,
        policy: FailurePolicy::Fatal,
        existence: Some(ResourceKey::Tenant {
            tenant: tenant.clone(),
        }),
        actions: vec![ResourceSpec::Tenant {
            name: tenant.clone(),
            root_pool: request.pool.clone(),
        }],
    });

    // Re-applying DNS settings is assumed safe on the control plane, so this
    // step carries no existence check.
    steps.push(PlannedStep {
        name: StepName::Dns,
        policy: FailurePolicy::Fatal,
        existence: None,
        actions: vec![ResourceSpec::DnsConfig {
            tenant: tenant.clone(),
            servers: request.dns_servers.clone(),
            search_domains: request
                .dns_search_domain
                .clone()
                .into_iter()
                .collect(),
        }],
    });

    steps.push(PlannedStep {
        name: StepName::Volume,
        policy: FailurePolicy::Fatal,
        existence: Some(ResourceKey::Volume {
            tenant: tenant.clone(),
            name: request.volume.clone(),
        }),
        actions: vec![ResourceSpec::Volume {
            tenant: tenant.clone(),
            name: request.volume.clone(),
            size: request.volume_size.clone(),
            pool: request.pool.clone(),
            junction_path: request.junction_path(),
        }],
    });

    steps.push(PlannedStep {
        name: StepName::NetworkInterface,
        policy: FailurePolicy::Fatal,
        existence: Some(ResourceKey::NetworkInterface {
            tenant: tenant.clone(),
            name: request.interface_name.clone(),
        }),
        actions: vec![ResourceSpec::NetworkInterface {
            tenant: tenant.clone(),
            name: request.interface_name.clone(),
            address: request.interface_address.clone(),
            netmask: request.interface_netmask.clone(),
            home_node: request.home_node.clone(),
            home_port: request.home_port.clone(),
            protocols: request.protocols(),
        }],
    });

    steps.push(PlannedStep {
        name: StepName::ProtocolServer,
        policy: FailurePolicy::Fatal,
        existence: Some(ResourceKey::ProtocolServer {
            tenant: tenant.clone(),
        }),
        actions: vec![ResourceSpec::ProtocolServer {
            tenant: tenant.clone(),
            name: request.protocol_server.clone(),
            domain: request.directory_domain.clone(),
            credentials: domain.clone(),
        }],
    });

    steps.push(PlannedStep {
        name: StepName::Share,
        policy: FailurePolicy::Fatal,
        existence: Some(ResourceKey::Share {
            tenant: tenant.clone(),
            name: SHARE_NAME.to_string(),
        }),
        actions: vec![ResourceSpec::Share {
            tenant: tenant.clone(),
            name: SHARE_NAME.to_string(),
            path: request.junction_path(),
        }],
    });

    if let Some(acl) = &request.features.share_acl {
        steps.push(PlannedStep {
            name: StepName::ShareAcl,
            policy: FailurePolicy::Degraded,
            existence: None,
            actions: vec![ResourceSpec::ShareAcl {
                tenant: tenant.clone(),
                share: SHARE_NAME.to_string(),
                principal: acl.principal.clone(),
                permission: acl.permission.clone(),
            }],
        });
    }

    if let Some(nfs) = &request.features.nfs {
        let policy_name = request.export_policy_name();
        steps.push(PlannedStep {
            name: StepName::NfsExposure,
            policy: FailurePolicy::Degraded,
            existence: None,
            actions: vec![
                ResourceSpec::NfsService {
                    tenant: tenant.clone(),
                },
                ResourceSpec::ExportPolicy {
                    tenant: tenant.clone(),
                    name: policy_name.clone(),
                },
                ResourceSpec::ExportRule {
                    tenant: tenant.clone(),
                    policy: policy_name.clone(),
                    client_match: nfs.client_match.clone(),
                },
                ResourceSpec::VolumeExportPolicy {
                    tenant: tenant.clone(),
                    volume: request.volume.clone(),
                    policy: policy_name,
                },
            ],
        });
    }

    steps.push(PlannedStep {
        name: StepName::Snapshot,
        policy: FailurePolicy::Degraded,
        existence: None,
        actions: vec![ResourceSpec::Snapshot {
            tenant,
            volume: request.volume.clone(),
            name: SNAPSHOT_NAME.to_string(),
        }],
    });

    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::request::{NfsExposure, OptionalFeatures, ShareAclEntry};
    use crate::domain::ports::Protocol;

    fn request(features: OptionalFeatures) -> ProvisioningRequest {
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
            features,
        }
    }

    fn credentials() -> DomainCredentials {
        DomainCredentials {
            username: "Administrator".into(),
            password: "secret".into(),
        }
    }

    #[test]
    fn test_base_plan_order_and_policies() {
        let steps = plan(&request(OptionalFeatures::default()), &credentials());
        let names: Vec<StepName> = steps.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                StepName::Tenant,
                StepName::Dns,
                StepName::Volume,
                StepName::NetworkInterface,
                StepName::ProtocolServer,
                StepName::Share,
                StepName::Snapshot,
            ]
        );

        for step in &steps {
            let expected = if step.name == StepName::Snapshot {
                FailurePolicy::Degraded
            } else {
                FailurePolicy::Fatal
            };
            assert_eq!(step.policy, expected, "policy for {}", step.name);
        }
    }

    #[test]
    fn test_dns_and_snapshot_have_no_existence_check() {
        let steps = plan(&request(OptionalFeatures::default()), &credentials());
        for step in &steps {
            match step.name {
                StepName::Dns | StepName::Snapshot => assert!(step.existence.is_none()),
                _ => assert!(step.existence.is_some(), "missing check for {}", step.name),
            }
        }
    }

    #[test]
    fn test_full_plan_inserts_conditional_steps_in_order() {
        let features = OptionalFeatures {
            nfs: Some(NfsExposure::default()),
            share_acl: Some(ShareAclEntry::default()),
        };
        let steps = plan(&request(features), &credentials());
        let names: Vec<StepName> = steps.iter().map(|s| s.name).collect();
        assert_eq!(
            &names[5..],
            &[
                StepName::Share,
                StepName::ShareAcl,
                StepName::NfsExposure,
                StepName::Snapshot,
            ]
        );

        // NFS exposure bundles service, policy, rule, and attach, in order.
        let nfs = steps
            .iter()
            .find(|s| s.name == StepName::NfsExposure)
            .unwrap();
        let kinds: Vec<&str> = nfs.actions.iter().map(|a| a.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                "nfs-service",
                "export-policy",
                "export-rule",
                "volume-export-policy",
            ]
        );
    }

    #[test]
    fn test_interface_protocols_follow_features() {
        let features = OptionalFeatures {
            nfs: Some(NfsExposure::default()),
            share_acl: None,
        };
        let steps = plan(&request(features), &credentials());
        let interface = steps
            .iter()
            .find(|s| s.name == StepName::NetworkInterface)
            .unwrap();
        match &interface.actions[0] {
            ResourceSpec::NetworkInterface { protocols, .. } => {
                assert_eq!(protocols, &vec![Protocol::Smb, Protocol::Nfs]);
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_export_policy_named_after_volume() {
        let features = OptionalFeatures {
            nfs: Some(NfsExposure::default()),
            share_acl: None,
        };
        let steps = plan(&request(features), &credentials());
        let nfs = steps
            .iter()
            .find(|s| s.name == StepName::NfsExposure)
            .unwrap();
        match &nfs.actions[1] {
            ResourceSpec::ExportPolicy { name, .. } => assert_eq!(name, "vol1_policy"),
            other => panic!("unexpected action: {:?}", other),
        }
    }
}
