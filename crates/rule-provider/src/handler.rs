//! # Update Handler
//!
//! The lifecycle orchestrator for the "update an existing rule" operation.
//! One invocation is one linear pass over the steps
//!
//! ```text
//! START → READ_CURRENT → DIFF → APPLY_ATTRIBUTES → APPLY_TARGETS → VERIFY → DONE
//!            │                        │                  │
//!            └────────────────────────┴──────────────────┴──→ FAILED
//! ```
//!
//! each under its own tracing span. The pass is terminal in the common case
//! and safe to restart from the top: it reconciles against the remote state
//! it reads, so re-running with identical inputs over converged state issues
//! zero target-mutating calls.
//!
//! # Architecture Note
//! The handler returns an envelope, not a `Result`: every outcome the host
//! can see, success or any classified failure, is a [`ProgressEvent`].
//! Remote errors propagate with `?` inside the pass and are mapped to a
//! stable [`HandlerErrorCode`] exactly once, here.

use crate::apply::{apply_attributes, apply_targets};
use crate::diff::{diff_attributes, diff_targets};
use crate::model::{HandlerErrorCode, HandlerRequest, ProgressEvent, ResourceModel};
use crate::reader::read_rule;
use events_api::{ApiError, EventsApi};
use tracing::{debug, info, info_span, warn, Instrument};

/// Map a boundary failure onto the host-facing error code.
///
/// Partial batch rejections are a hard failure of the whole pass; the
/// envelope never reports a partial commit.
fn error_code_for(error: &ApiError) -> HandlerErrorCode {
    match error {
        ApiError::NotFound(_) => HandlerErrorCode::NotFound,
        ApiError::InvalidRequest(_) => HandlerErrorCode::InvalidRequest,
        ApiError::Throttling(_) => HandlerErrorCode::Throttling,
        ApiError::ServiceUnavailable(_) => HandlerErrorCode::ServiceUnavailable,
        ApiError::PartialBatch { .. } => HandlerErrorCode::GeneralServiceException,
        ApiError::Transport(_) => HandlerErrorCode::InternalFailure,
    }
}

/// Drive one update pass and package the outcome.
///
/// The success envelope echoes the desired model unchanged, never a
/// re-read, so no server-generated field the caller didn't specify leaks
/// into it. Update requires an existing resource: a missing rule fails the
/// pass with [`HandlerErrorCode::NotFound`].
pub async fn update<A: EventsApi>(api: &A, request: HandlerRequest) -> ProgressEvent {
    let HandlerRequest {
        desired_resource_state: desired,
        previous_resource_state,
        callback_context,
    } = request;
    let context = callback_context.unwrap_or_default();
    info!(
        rule = %desired.name,
        invocation = context.invocation,
        has_previous = previous_resource_state.is_some(),
        "starting update pass"
    );

    if let Err(error) = desired.validate() {
        warn!(rule = %desired.name, error = %error, "desired model rejected");
        return ProgressEvent::failed(HandlerErrorCode::InvalidRequest, error.to_string());
    }

    match reconcile(api, &desired).await {
        Ok(()) => {
            info!(rule = %desired.name, "update pass converged");
            ProgressEvent::success(desired)
        }
        Err(error) => {
            warn!(
                rule = %desired.name,
                error = %error,
                retryable = error.is_retryable(),
                "update pass failed"
            );
            ProgressEvent::failed(error_code_for(&error), error.to_string())
        }
    }
}

/// The pass itself: read, diff, apply, verify: sequential awaited calls,
/// no internal parallelism, no state beyond the transient snapshot.
async fn reconcile<A: EventsApi>(api: &A, desired: &ResourceModel) -> Result<(), ApiError> {
    let current = read_rule(api, &desired.name)
        .instrument(info_span!("read_current"))
        .await?;

    let (attributes_changed, delta) = info_span!("diff").in_scope(|| {
        let attributes_changed = diff_attributes(desired, &current);
        let delta = diff_targets(&desired.targets, &current.targets);
        debug!(
            attributes_changed,
            puts = delta.to_put.len(),
            removes = delta.to_remove_ids.len(),
            "computed convergence delta"
        );
        (attributes_changed, delta)
    });

    apply_attributes(api, desired)
        .instrument(info_span!("apply_attributes"))
        .await?;

    apply_targets(api, &desired.name, &delta)
        .instrument(info_span!("apply_targets"))
        .await?;

    // Verification issues no further remote calls: describe happens once per
    // pass, and the envelope must mirror the input model rather than a
    // re-read.
    info_span!("verify").in_scope(|| {
        if attributes_changed || !delta.is_empty() {
            debug!(
                attributes_changed,
                targets_converged = !delta.is_empty(),
                "remote state converged onto desired state"
            );
        } else {
            debug!("remote state already matched desired state");
        }
    });

    Ok(())
}
