//! Scriptable in-memory control plane for tests
//!
//! Tracks created resources so existence checks behave like the real control
//! plane across repeated runs, and injects failures by resource kind.

use crate::domain::ports::{
    ClusterSession, ControlPlaneClient, Credentials, NodeCandidate, PoolCandidate, ResourceKey,
    ResourceSpec,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct MockState {
    existing: HashSet<String>,
    created: Vec<String>,
    fail_create: HashMap<String, String>,
    fail_exists: HashMap<String, String>,
    fail_connect: Option<String>,
    fail_disconnect: Option<String>,
    fail_listing: Option<String>,
    pools: Vec<PoolCandidate>,
    nodes: Vec<NodeCandidate>,
    connects: usize,
    disconnects: usize,
}

/// In-memory [`ControlPlaneClient`] double
#[derive(Debug, Default)]
pub struct MockControlPlane {
    state: Mutex<MockState>,
}

/// The identity a creation call establishes, matched by later existence checks
fn key_for(spec: &ResourceSpec) -> Option<ResourceKey> {
    match spec {
        ResourceSpec::Tenant { name, .. } => Some(ResourceKey::Tenant {
            tenant: name.clone(),
        }),
        ResourceSpec::Volume { tenant, name, .. } => Some(ResourceKey::Volume {
            tenant: tenant.clone(),
            name: name.clone(),
        }),
        ResourceSpec::NetworkInterface { tenant, name, .. } => {
            Some(ResourceKey::NetworkInterface {
                tenant: tenant.clone(),
                name: name.clone(),
            })
        }
        ResourceSpec::ProtocolServer { tenant, .. } => Some(ResourceKey::ProtocolServer {
            tenant: tenant.clone(),
        }),
        ResourceSpec::Share { tenant, name, .. } => Some(ResourceKey::Share {
            tenant: tenant.clone(),
            name: name.clone(),
        }),
        _ => None,
    }
}

impl MockControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pools(self, pools: Vec<PoolCandidate>) -> Self {
        self.state.lock().unwrap().pools = pools;
        self
    }

    pub fn with_nodes(self, nodes: Vec<NodeCandidate>) -> Self {
        self.state.lock().unwrap().nodes = nodes;
        self
    }

    /// Fail every `create` call for the given resource kind
    pub fn fail_create_on(&self, kind: &str, reason: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_create
            .insert(kind.to_string(), reason.to_string());
    }

    /// Fail every `exists` call for the given resource kind
    pub fn fail_exists_on(&self, kind: &str, reason: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_exists
            .insert(kind.to_string(), reason.to_string());
    }

    pub fn fail_connect(&self, reason: &str) {
        self.state.lock().unwrap().fail_connect = Some(reason.to_string());
    }

    pub fn fail_disconnect(&self, reason: &str) {
        self.state.lock().unwrap().fail_disconnect = Some(reason.to_string());
    }

    pub fn fail_listing(&self, reason: &str) {
        self.state.lock().unwrap().fail_listing = Some(reason.to_string());
    }

    /// Kinds of every mutation issued, in call order
    pub fn created(&self) -> Vec<String> {
        self.state.lock().unwrap().created.clone()
    }

    /// Reset the mutation log without forgetting what exists
    pub fn clear_created(&self) {
        self.state.lock().unwrap().created.clear();
    }

    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    pub fn disconnects(&self) -> usize {
        self.state.lock().unwrap().disconnects
    }
}

#[async_trait]
impl ControlPlaneClient for MockControlPlane {
    async fn connect(&self, endpoint: &str, _credentials: &Credentials) -> Result<ClusterSession> {
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = &state.fail_connect {
            return Err(Error::Connect {
                endpoint: endpoint.to_string(),
                reason: reason.clone(),
            });
        }
        state.connects += 1;
        Ok(ClusterSession::new(endpoint, "mock-token"))
    }

    async fn disconnect(&self, _session: &ClusterSession) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.disconnects += 1;
        if let Some(reason) = &state.fail_disconnect {
            return Err(Error::Disconnect(reason.clone()));
        }
        Ok(())
    }

    async fn exists(&self, _session: &ClusterSession, key: &ResourceKey) -> Result<bool> {
        let state = self.state.lock().unwrap();
        if let Some(reason) = state.fail_exists.get(key.kind()) {
            return Err(Error::ControlPlane {
                operation: "exists".into(),
                resource: key.describe(),
                reason: reason.clone(),
            });
        }
        Ok(state.existing.contains(&key.describe()))
    }

    async fn create(&self, _session: &ClusterSession, spec: &ResourceSpec) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(reason) = state.fail_create.get(spec.kind()) {
            return Err(Error::ControlPlane {
                operation: "create".into(),
                resource: spec.describe(),
                reason: reason.clone(),
            });
        }
        state.created.push(spec.kind().to_string());
        if let Some(key) = key_for(spec) {
            state.existing.insert(key.describe());
        }
        Ok(())
    }

    async fn list_pools(&self, _session: &ClusterSession) -> Result<Vec<PoolCandidate>> {
        let state = self.state.lock().unwrap();
        if let Some(reason) = &state.fail_listing {
            return Err(Error::CandidateQuery {
                kind: "storage pool".into(),
                reason: reason.clone(),
            });
        }
        Ok(state.pools.clone())
    }

    async fn list_nodes(&self, _session: &ClusterSession) -> Result<Vec<NodeCandidate>> {
        let state = self.state.lock().unwrap();
        if let Some(reason) = &state.fail_listing {
            return Err(Error::CandidateQuery {
                kind: "node".into(),
                reason: reason.clone(),
            });
        }
        Ok(state.nodes.clone())
    }
}
