//! Dry-Run Adapter
//!
//! Wraps a real client and intercepts every mutating call: each create is
//! reported instead of performed, while session handling, existence checks,
//! and candidate queries pass through. Handing this wrapper to the pipeline
//! gates every step's create call individually.

use crate::domain::ports::{
    ClusterSession, ControlPlaneClient, Credentials, NodeCandidate, PoolCandidate, ResourceKey,
    ResourceSpec,
};
use crate::error::Result;
use async_trait::async_trait;
use tracing::info;

/// Client wrapper that reports mutations instead of performing them
pub struct DryRunClient<C> {
    inner: C,
}

impl<C: ControlPlaneClient> DryRunClient<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: ControlPlaneClient> ControlPlaneClient for DryRunClient<C> {
    async fn connect(&self, endpoint: &str, credentials: &Credentials) -> Result<ClusterSession> {
        self.inner.connect(endpoint, credentials).await
    }

    async fn disconnect(&self, session: &ClusterSession) -> Result<()> {
        self.inner.disconnect(session).await
    }

    async fn exists(&self, session: &ClusterSession, key: &ResourceKey) -> Result<bool> {
        self.inner.exists(session, key).await
    }

    async fn create(&self, _session: &ClusterSession, spec: &ResourceSpec) -> Result<()> {
        info!(resource = %spec.describe(), "dry-run: would create");
        println!("dry-run: would create {}", spec.describe());
        Ok(())
    }

    async fn list_pools(&self, session: &ClusterSession) -> Result<Vec<PoolCandidate>> {
        self.inner.list_pools(session).await
    }

    async fn list_nodes(&self, session: &ClusterSession) -> Result<Vec<NodeCandidate>> {
        self.inner.list_nodes(session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controlplane::mock::MockControlPlane;

    #[tokio::test]
    async fn test_creates_never_reach_the_inner_client() {
        let dry = DryRunClient::new(MockControlPlane::new());
        let credentials = Credentials {
            username: "admin".into(),
            password: "pw".into(),
        };
        let session = dry.connect("c1", &credentials).await.unwrap();

        dry.create(
            &session,
            &ResourceSpec::Tenant {
                name: "svmA".into(),
                root_pool: "aggr1".into(),
            },
        )
        .await
        .unwrap();

        assert!(dry.inner.created().is_empty());

        // The tenant was never created, so the existence check still misses.
        let exists = dry
            .exists(
                &session,
                &ResourceKey::Tenant {
                    tenant: "svmA".into(),
                },
            )
            .await
            .unwrap();
        assert!(!exists);
    }
}
