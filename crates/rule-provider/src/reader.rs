//! # Remote Reader
//!
//! Assembles the remote API's current view of a rule (scalar
//! attributes plus the complete target collection) into one transient snapshot the
//! rest of the pass works from. Read-only: the only remote calls issued here
//! are `describe_rule` and the pagination-exhausting target listing.

use events_api::{ApiError, EventsApi, RuleState, Target};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// The remote state at the start of a reconciliation pass.
///
/// `targets` is keyed by target id: identity in this engine is the id and
/// nothing else, so the snapshot never depends on incidental field equality.
/// Constructed per pass and discarded with it.
#[derive(Debug, Clone)]
pub struct RemoteRuleSnapshot {
    pub name: String,
    pub arn: String,
    pub description: Option<String>,
    /// Pattern in the serialized form the remote stores.
    pub event_pattern: Option<String>,
    pub state: RuleState,
    pub targets: BTreeMap<String, Target>,
}

/// Fetch rule attributes and the full target collection, following
/// pagination tokens until exhausted. Fails with [`ApiError::NotFound`] if
/// the rule is absent, or vanishes between pages.
#[instrument(skip(api))]
pub async fn read_rule<A: EventsApi>(api: &A, name: &str) -> Result<RemoteRuleSnapshot, ApiError> {
    let described = api.describe_rule(name).await?;

    let mut targets = BTreeMap::new();
    let mut next_token: Option<String> = None;
    let mut pages = 0usize;
    loop {
        let page = api
            .list_targets_by_rule(name, next_token.as_deref())
            .await?;
        pages += 1;
        for target in page.targets {
            targets.insert(target.id.clone(), target);
        }
        match page.next_token {
            Some(token) => next_token = Some(token),
            None => break,
        }
    }

    debug!(targets = targets.len(), pages, "assembled remote snapshot");
    Ok(RemoteRuleSnapshot {
        name: described.name,
        arn: described.arn,
        description: described.description,
        event_pattern: described.event_pattern,
        state: described.state,
        targets,
    })
}
