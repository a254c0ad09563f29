//! # Diff Engine
//!
//! Computes what must change to converge the remote rule onto the desired
//! model: whether the scalar attributes diverged, and the symmetric
//! difference of the two target sets.
//!
//! # Architecture Note
//! Target identity is the id, full stop. A target whose arn or parameters
//! changed under a reused id is *replaced in place*: it rides a `put`
//! upsert and never appears in the removal set, so there is no window where
//! the id is detached. Targets identical in id and every attribute produce
//! no call at all; that is what keeps a converged pass free of spurious
//! mutations (and of the propagation delay they would cost).

use crate::model::ResourceModel;
use crate::reader::RemoteRuleSnapshot;
use events_api::Target;
use std::collections::{BTreeMap, HashSet};

/// The minimal target mutation needed to converge remote state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetDelta {
    /// Targets to attach or replace (upsert by id), in desired order.
    pub to_put: Vec<Target>,
    /// Ids to detach, in id order.
    pub to_remove_ids: Vec<String>,
}

impl TargetDelta {
    /// True when the pass needs no target-mutating call.
    pub fn is_empty(&self) -> bool {
        self.to_put.is_empty() && self.to_remove_ids.is_empty()
    }
}

/// True when description, state, or pattern differ between the desired
/// model and the remote snapshot.
///
/// The remote stores the pattern serialized, so the stored string is parsed
/// back and compared structurally; key order and whitespace never count as
/// a change. A stored pattern that fails to parse counts as divergent, so
/// the pass rewrites it rather than erroring on read.
pub fn diff_attributes(desired: &ResourceModel, current: &RemoteRuleSnapshot) -> bool {
    if desired.description != current.description || desired.state != current.state {
        return true;
    }
    match (&desired.event_pattern, &current.event_pattern) {
        (None, None) => false,
        (Some(_), None) | (None, Some(_)) => true,
        (Some(desired_pattern), Some(stored)) => {
            match serde_json::from_str::<serde_json::Value>(stored) {
                Ok(stored_pattern) => *desired_pattern != stored_pattern,
                Err(_) => true,
            }
        }
    }
}

/// Symmetric difference of the desired and current target sets, keyed by id.
///
/// - `to_remove_ids`: ids attached remotely but absent from the desired set.
/// - `to_put`: desired targets missing remotely, or present under the same
///   id with any differing attribute.
///
/// Both outputs are deterministic, and both are empty when the collections
/// already match, including the desired-empty/current-empty corner, where
/// no removal may be attempted at all.
pub fn diff_targets(desired: &[Target], current: &BTreeMap<String, Target>) -> TargetDelta {
    let desired_ids: HashSet<&str> = desired.iter().map(|t| t.id.as_str()).collect();

    let to_remove_ids = current
        .keys()
        .filter(|id| !desired_ids.contains(id.as_str()))
        .cloned()
        .collect();

    let to_put = desired
        .iter()
        .filter(|target| current.get(&target.id) != Some(*target))
        .cloned()
        .collect();

    TargetDelta {
        to_put,
        to_remove_ids,
    }
}
