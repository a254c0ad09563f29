//! # Convergence Applier
//!
//! Issues the remote calls that carry the computed delta: one atomic
//! attribute record, then the target mutations: removals before puts,
//! chunked to the remote's per-call batch bound.

use crate::diff::TargetDelta;
use crate::model::ResourceModel;
use events_api::{ApiError, EventsApi, TARGET_BATCH_SIZE};
use tracing::{debug, instrument};

/// Submit the rule's scalar attributes as one atomic `put_rule` record.
///
/// The record is an idempotent upsert, and it is issued once per pass
/// whether or not the diff saw an attribute change: a uniform pass keeps the
/// remote-call sequence identical across invocations, which is what makes
/// abandon-and-retry safe for the host.
#[instrument(skip(api, desired), fields(rule = %desired.name))]
pub async fn apply_attributes<A: EventsApi>(
    api: &A,
    desired: &ResourceModel,
) -> Result<(), ApiError> {
    let output = api.put_rule(desired.attribute_record()).await?;
    debug!(rule_arn = %output.rule_arn, "rule attributes submitted");
    Ok(())
}

/// Apply the target delta within this pass: removals first, then puts.
///
/// Detachments go first so the collection never holds a stale attachment
/// past the point its replacement lands. Each phase is chunked to
/// [`TARGET_BATCH_SIZE`]; a failed chunk aborts everything after it; the
/// error surfaces instead of a silent partial continuation. Empty phases
/// issue no call at all (the remote rejects empty batches).
#[instrument(
    skip(api, delta),
    fields(removes = delta.to_remove_ids.len(), puts = delta.to_put.len())
)]
pub async fn apply_targets<A: EventsApi>(
    api: &A,
    name: &str,
    delta: &TargetDelta,
) -> Result<(), ApiError> {
    for chunk in delta.to_remove_ids.chunks(TARGET_BATCH_SIZE) {
        api.remove_targets(name, chunk).await?;
    }
    for chunk in delta.to_put.chunks(TARGET_BATCH_SIZE) {
        api.put_targets(name, chunk).await?;
    }
    Ok(())
}
