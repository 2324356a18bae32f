//! REST Control Plane Adapter
//!
//! Speaks the management API over HTTPS/JSON: one session per run, resources
//! created by POST, existence probed by GET (404 means absent). No retries,
//! no backoff; a timed-out call surfaces as that step's failure.

use crate::domain::ports::{
    ClusterSession, ControlPlaneClient, Credentials, NodeCandidate, PoolCandidate, ResourceKey,
    ResourceSpec,
};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};
use urlencoding::encode;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the REST adapter
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Per-request timeout; the only cancellation mechanism in the system
    pub timeout: Duration,
    /// Accept invalid TLS certificates (lab clusters with self-signed certs)
    pub insecure: bool,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            insecure: false,
        }
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Deserialize)]
struct Records<T> {
    records: Vec<T>,
}

// =============================================================================
// REST Adapter
// =============================================================================

/// Adapter for the management-plane REST API
pub struct RestControlPlane {
    http: reqwest::Client,
}

impl RestControlPlane {
    pub fn new(config: RestConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure)
            .build()?;
        Ok(Self { http })
    }

    /// API base for a cluster endpoint; a bare host gets the https scheme
    fn base(endpoint: &str) -> String {
        let endpoint = endpoint.trim_end_matches('/');
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            format!("{}/api/v1", endpoint)
        } else {
            format!("https://{}/api/v1", endpoint)
        }
    }

    fn url(session: &ClusterSession, path: &str) -> String {
        format!("{}{}", Self::base(session.endpoint()), path)
    }

    /// GET path identifying a resource for existence checks
    fn key_path(key: &ResourceKey) -> String {
        match key {
            ResourceKey::Tenant { tenant } => format!("/tenants/{}", encode(tenant)),
            ResourceKey::Volume { tenant, name } => {
                format!("/tenants/{}/volumes/{}", encode(tenant), encode(name))
            }
            ResourceKey::NetworkInterface { tenant, name } => {
                format!("/tenants/{}/interfaces/{}", encode(tenant), encode(name))
            }
            ResourceKey::ProtocolServer { tenant } => {
                format!("/tenants/{}/protocol-server", encode(tenant))
            }
            ResourceKey::Share { tenant, name } => {
                format!("/tenants/{}/shares/{}", encode(tenant), encode(name))
            }
        }
    }

    /// POST path and JSON body for a creation call
    fn create_call(spec: &ResourceSpec) -> (String, Value) {
        match spec {
            ResourceSpec::Tenant { name, root_pool } => (
                "/tenants".to_string(),
                json!({ "name": name, "root_pool": root_pool }),
            ),
            ResourceSpec::DnsConfig {
                tenant,
                servers,
                search_domains,
            } => (
                format!("/tenants/{}/dns", encode(tenant)),
                json!({ "servers": servers, "search_domains": search_domains }),
            ),
            ResourceSpec::Volume {
                tenant,
                name,
                size,
                pool,
                junction_path,
            } => (
                format!("/tenants/{}/volumes", encode(tenant)),
                json!({
                    "name": name,
                    "size": size,
                    "pool": pool,
                    "junction_path": junction_path,
                }),
            ),
            ResourceSpec::NetworkInterface {
                tenant,
                name,
                address,
                netmask,
                home_node,
                home_port,
                protocols,
            } => (
                format!("/tenants/{}/interfaces", encode(tenant)),
                json!({
                    "name": name,
                    "address": address,
                    "netmask": netmask,
                    "home_node": home_node,
                    "home_port": home_port,
                    "protocols": protocols,
                }),
            ),
            ResourceSpec::ProtocolServer {
                tenant,
                name,
                domain,
                credentials,
            } => (
                format!("/tenants/{}/protocol-server", encode(tenant)),
                json!({
                    "name": name,
                    "domain": domain,
                    "domain_username": credentials.username,
                    "domain_password": credentials.password,
                }),
            ),
            ResourceSpec::Share { tenant, name, path } => (
                format!("/tenants/{}/shares", encode(tenant)),
                json!({ "name": name, "path": path }),
            ),
            ResourceSpec::ShareAcl {
                tenant,
                share,
                principal,
                permission,
            } => (
                format!("/tenants/{}/shares/{}/acls", encode(tenant), encode(share)),
                json!({ "principal": principal, "permission": permission }),
            ),
            ResourceSpec::NfsService { tenant } => (
                format!("/tenants/{}/nfs-service", encode(tenant)),
                json!({ "enabled": true }),
            ),
            ResourceSpec::ExportPolicy { tenant, name } => (
                format!("/tenants/{}/export-policies", encode(tenant)),
                json!({ "name": name }),
            ),
            ResourceSpec::ExportRule {
                tenant,
                policy,
                client_match,
            } => (
                format!(
                    "/tenants/{}/export-policies/{}/rules",
                    encode(tenant),
                    encode(policy)
                ),
                json!({
                    "client_match": client_match,
                    "ro_rule": "any",
                    "rw_rule": "any",
                    "superuser": "any",
                }),
            ),
            ResourceSpec::VolumeExportPolicy {
                tenant,
                volume,
                policy,
            } => (
                format!(
                    "/tenants/{}/volumes/{}/export-policy",
                    encode(tenant),
                    encode(volume)
                ),
                json!({ "policy": policy }),
            ),
            ResourceSpec::Snapshot {
                tenant,
                volume,
                name,
            } => (
                format!(
                    "/tenants/{}/volumes/{}/snapshots",
                    encode(tenant),
                    encode(volume)
                ),
                json!({ "name": name }),
            ),
        }
    }

    /// Map a non-success response to a control plane error
    async fn reject(operation: &str, resource: String, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Error::ControlPlane {
            operation: operation.to_string(),
            resource,
            reason: format!("status {}: {}", status, body),
        }
    }
}

#[async_trait]
impl ControlPlaneClient for RestControlPlane {
    async fn connect(&self, endpoint: &str, credentials: &Credentials) -> Result<ClusterSession> {
        let url = format!("{}/sessions", Self::base(endpoint));
        debug!(endpoint, "opening session");

        let response = self
            .http
            .post(&url)
            .json(&LoginBody {
                username: &credentials.username,
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(|e| Error::Connect {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Connect {
                endpoint: endpoint.to_string(),
                reason: format!("status {}: {}", status, body),
            });
        }

        let login: LoginResponse = response.json().await?;
        info!(endpoint, "session established");
        Ok(ClusterSession::new(endpoint, login.token))
    }

    async fn disconnect(&self, session: &ClusterSession) -> Result<()> {
        let url = Self::url(session, "/sessions/current");
        let response = self
            .http
            .delete(&url)
            .bearer_auth(session.token())
            .send()
            .await
            .map_err(|e| Error::Disconnect(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Disconnect(format!(
                "status {}",
                response.status().as_u16()
            )));
        }
        debug!(endpoint = session.endpoint(), "session closed");
        Ok(())
    }

    async fn exists(&self, session: &ClusterSession, key: &ResourceKey) -> Result<bool> {
        let url = Self::url(session, &Self::key_path(key));
        let response = self
            .http
            .get(&url)
            .bearer_auth(session.token())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            Err(Self::reject("exists", key.describe(), response).await)
        }
    }

    async fn create(&self, session: &ClusterSession, spec: &ResourceSpec) -> Result<()> {
        let (path, body) = Self::create_call(spec);
        let url = Self::url(session, &path);
        let response = self
            .http
            .post(&url)
            .bearer_auth(session.token())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::reject("create", spec.describe(), response).await);
        }
        Ok(())
    }

    async fn list_pools(&self, session: &ClusterSession) -> Result<Vec<PoolCandidate>> {
        let url = Self::url(session, "/pools");
        let response = self
            .http
            .get(&url)
            .bearer_auth(session.token())
            .send()
            .await
            .map_err(|e| Error::CandidateQuery {
                kind: "storage pool".into(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Error::CandidateQuery {
                kind: "storage pool".into(),
                reason: format!("status {}", response.status().as_u16()),
            });
        }
        let records: Records<PoolCandidate> = response.json().await?;
        Ok(records.records)
    }

    async fn list_nodes(&self, session: &ClusterSession) -> Result<Vec<NodeCandidate>> {
        let url = Self::url(session, "/nodes");
        let response = self
            .http
            .get(&url)
            .bearer_auth(session.token())
            .send()
            .await
            .map_err(|e| Error::CandidateQuery {
                kind: "node".into(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(Error::CandidateQuery {
                kind: "node".into(),
                reason: format!("status {}", response.status().as_u16()),
            });
        }
        let records: Records<NodeCandidate> = response.json().await?;
        Ok(records.records)
    }
}
