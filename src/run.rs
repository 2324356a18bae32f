//! Top-level provisioning run
//!
//! Owns the session for its whole lifetime: one connect, one disconnect, no
//! exceptions. Everything between the two — resource selection and the
//! pipeline — only borrows the session, and its result is carried across the
//! teardown unchanged.

use crate::config::request::ProvisioningRequest;
use crate::config::resolver::Resolution;
use crate::domain::ports::{
    ClusterSession, ControlPlaneClient, Credentials, DomainCredentials, Prompter,
};
use crate::error::Result;
use crate::pipeline::{Pipeline, PipelineOutcome};
use crate::selector;
use tracing::{info, warn};

/// Connect, provision, and tear the session down on every path
///
/// A connect failure aborts before anything else happens; once connected,
/// disconnect runs exactly once whether selection fails, the pipeline halts
/// fatally, or everything succeeds. A disconnect failure is reported but
/// never alters the already-determined result.
pub async fn run_provisioning<C, P>(
    client: &C,
    resolution: Resolution,
    credentials: &Credentials,
    domain: &DomainCredentials,
    prompter: &mut P,
) -> Result<(ProvisioningRequest, PipelineOutcome)>
where
    C: ControlPlaneClient + ?Sized,
    P: Prompter,
{
    let endpoint = resolution.cluster().to_string();
    let session = client.connect(&endpoint, credentials).await?;
    info!("Connected to {}", endpoint);

    let result = drive(client, &session, resolution, domain, prompter).await;

    if let Err(e) = client.disconnect(&session).await {
        warn!(error = %e, "disconnect failed; provisioning result unchanged");
    }

    result
}

/// Everything that happens between connect and disconnect
async fn drive<C, P>(
    client: &C,
    session: &ClusterSession,
    resolution: Resolution,
    domain: &DomainCredentials,
    prompter: &mut P,
) -> Result<(ProvisioningRequest, PipelineOutcome)>
where
    C: ControlPlaneClient + ?Sized,
    P: Prompter,
{
    let request = match resolution {
        Resolution::Complete(request) => request,
        Resolution::NeedsSelection(pending) => {
            // Selection only fills what flags did not already supply.
            let pool = match pending.pool() {
                Some(pool) => pool.to_string(),
                None => selector::select_pool(client, session, prompter).await?,
            };
            let home_node = match pending.home_node() {
                Some(node) => node.to_string(),
                None => selector::select_home_node(client, session, prompter).await?,
            };
            pending.with_selected(pool, home_node)?
        }
    };

    let outcome = Pipeline::new(client, session).run(&request, domain).await;
    Ok((request, outcome))
}
