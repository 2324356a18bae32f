//! Resource Selector
//!
//! Fills the live-reference fields a Guided-Full run defers: the storage pool
//! and the interface home node. Candidates are queried from an open session,
//! rendered as a 1-based menu, and picked by ordinal. An out-of-range ordinal
//! is never silently mapped to a default; the operator is re-prompted.

use crate::domain::ports::{ClusterSession, ControlPlaneClient, Prompter};
use crate::error::{Error, Result};
use tracing::debug;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Resolve a 1-based ordinal against a candidate list
///
/// Anything that does not parse to an ordinal within `1..=len` is a selection
/// error; the caller decides whether to re-prompt or abort.
pub fn resolve_ordinal<'a>(candidates: &'a [String], input: &str) -> Result<&'a str> {
    let trimmed = input.trim();
    let out_of_range = || Error::SelectionOutOfRange {
        input: trimmed.to_string(),
        count: candidates.len(),
    };

    let ordinal: usize = trimmed.parse().map_err(|_| out_of_range())?;
    if ordinal == 0 || ordinal > candidates.len() {
        return Err(out_of_range());
    }
    Ok(&candidates[ordinal - 1])
}

/// Render a menu and prompt until a valid ordinal is entered
fn pick<P: Prompter>(
    prompter: &mut P,
    kind: &str,
    names: &[String],
    annotations: &[String],
) -> Result<String> {
    println!("Available {}s:", kind);
    for (i, (name, annotation)) in names.iter().zip(annotations).enumerate() {
        println!("  {}. {} {}", i + 1, name, annotation);
    }

    loop {
        let answer = prompter.input(&format!("Select a {} [1-{}]", kind, names.len()))?;
        match resolve_ordinal(names, &answer) {
            Ok(name) => {
                debug!(kind, name, "candidate selected");
                return Ok(name.to_string());
            }
            Err(e) => println!("{}", e),
        }
    }
}

/// Let the operator pick the storage pool backing the tenant
///
/// Pools are annotated with their available capacity in GiB. A failed
/// candidate query propagates and aborts the run.
pub async fn select_pool<C, P>(
    client: &C,
    session: &ClusterSession,
    prompter: &mut P,
) -> Result<String>
where
    C: ControlPlaneClient + ?Sized,
    P: Prompter,
{
    let pools = client.list_pools(session).await?;
    if pools.is_empty() {
        return Err(Error::NoCandidates {
            kind: "storage pool".into(),
        });
    }

    let names: Vec<String> = pools.iter().map(|p| p.name.clone()).collect();
    let annotations: Vec<String> = pools
        .iter()
        .map(|p| format!("({:.2} GiB available)", p.available_bytes as f64 / GIB))
        .collect();

    pick(prompter, "storage pool", &names, &annotations)
}

/// Let the operator pick the node homing the network interface
///
/// Nodes are annotated with a health indicator.
pub async fn select_home_node<C, P>(
    client: &C,
    session: &ClusterSession,
    prompter: &mut P,
) -> Result<String>
where
    C: ControlPlaneClient + ?Sized,
    P: Prompter,
{
    let nodes = client.list_nodes(session).await?;
    if nodes.is_empty() {
        return Err(Error::NoCandidates {
            kind: "node".into(),
        });
    }

    let names: Vec<String> = nodes.iter().map(|n| n.name.clone()).collect();
    let annotations: Vec<String> = nodes
        .iter()
        .map(|n| {
            if n.healthy {
                "[healthy]".to_string()
            } else {
                "[unhealthy]".to_string()
            }
        })
        .collect();

    pick(prompter, "node", &names, &annotations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controlplane::mock::MockControlPlane;
    use crate::domain::ports::{Credentials, NodeCandidate, PoolCandidate};
    use crate::testing::ScriptedPrompter;
    use assert_matches::assert_matches;

    fn three() -> Vec<String> {
        vec!["aggr1".into(), "aggr2".into(), "aggr3".into()]
    }

    #[test]
    fn test_ordinal_in_range() {
        assert_eq!(resolve_ordinal(&three(), "2").unwrap(), "aggr2");
        assert_eq!(resolve_ordinal(&three(), " 1 ").unwrap(), "aggr1");
        assert_eq!(resolve_ordinal(&three(), "3").unwrap(), "aggr3");
    }

    #[test]
    fn test_ordinal_out_of_range() {
        for bad in ["4", "0", "-1", "abc", ""] {
            let err = resolve_ordinal(&three(), bad).unwrap_err();
            assert_matches!(err, Error::SelectionOutOfRange { count: 3, .. });
        }
    }

    async fn session(mock: &MockControlPlane) -> crate::domain::ports::ClusterSession {
        let credentials = Credentials {
            username: "admin".into(),
            password: "pw".into(),
        };
        mock.connect("c1", &credentials).await.unwrap()
    }

    #[tokio::test]
    async fn test_select_pool_reprompts_on_out_of_range() {
        let mock = MockControlPlane::new().with_pools(vec![
            PoolCandidate {
                name: "aggr1".into(),
                available_bytes: 500 * 1024 * 1024 * 1024,
            },
            PoolCandidate {
                name: "aggr2".into(),
                available_bytes: 1024 * 1024 * 1024 * 1024,
            },
            PoolCandidate {
                name: "aggr3".into(),
                available_bytes: 10 * 1024 * 1024 * 1024,
            },
        ]);
        let session = session(&mock).await;

        let mut prompter = ScriptedPrompter::with_inputs(["4", "2"]);
        let picked = select_pool(&mock, &session, &mut prompter).await.unwrap();
        assert_eq!(picked, "aggr2");
        assert!(prompter.inputs_exhausted());
    }

    #[tokio::test]
    async fn test_select_node() {
        let mock = MockControlPlane::new().with_nodes(vec![
            NodeCandidate {
                name: "node1".into(),
                healthy: true,
            },
            NodeCandidate {
                name: "node2".into(),
                healthy: false,
            },
        ]);
        let session = session(&mock).await;

        let mut prompter = ScriptedPrompter::with_inputs(["1"]);
        let picked = select_home_node(&mock, &session, &mut prompter)
            .await
            .unwrap();
        assert_eq!(picked, "node1");
    }

    #[tokio::test]
    async fn test_failed_candidate_query_propagates() {
        let mock = MockControlPlane::new();
        mock.fail_listing("API timeout");
        let session = session(&mock).await;

        let mut prompter = ScriptedPrompter::default();
        let err = select_pool(&mock, &session, &mut prompter)
            .await
            .unwrap_err();
        assert_matches!(err, Error::CandidateQuery { .. });
        assert!(prompter.untouched());
    }

    #[tokio::test]
    async fn test_empty_candidate_list_is_an_error() {
        let mock = MockControlPlane::new();
        let session = session(&mock).await;

        let mut prompter = ScriptedPrompter::default();
        let err = select_pool(&mock, &session, &mut prompter)
            .await
            .unwrap_err();
        assert_matches!(err, Error::NoCandidates { .. });
    }
}
