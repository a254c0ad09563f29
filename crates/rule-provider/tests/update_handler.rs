use events_api::{
    ApiError, BatchFailureEntry, InMemoryEventsApi, Op, PutRuleInput, RuleState, Target,
};
use rule_provider::handler;
use rule_provider::model::{
    CallbackContext, HandlerErrorCode, HandlerRequest, OperationStatus, ResourceModel,
};
use serde_json::json;

fn desired_model(targets: Vec<Target>) -> ResourceModel {
    ResourceModel {
        name: "TestRule".to_string(),
        description: Some("TestDescription".to_string()),
        event_pattern: Some(json!({
            "source": ["aws.s3"],
            "detail-type": ["Object Created"]
        })),
        state: RuleState::Enabled,
        targets,
    }
}

fn request_for(model: ResourceModel) -> HandlerRequest {
    HandlerRequest {
        desired_resource_state: model,
        previous_resource_state: None,
        callback_context: None,
    }
}

/// Seed the fake with the rule's current remote state: attributes matching
/// the desired model, plus whatever targets are currently attached.
fn seed_remote(api: &InMemoryEventsApi, targets: Vec<Target>) {
    api.seed_rule(PutRuleInput {
        name: "TestRule".to_string(),
        description: Some("TestDescription".to_string()),
        // Stored serialized, with different formatting than the desired
        // model would produce; equality must be structural.
        event_pattern: Some(
            r#"{ "detail-type": ["Object Created"], "source": ["aws.s3"] }"#.to_string(),
        ),
        state: RuleState::Enabled,
    });
    api.seed_targets(targets);
}

/// End-to-end update: the remote holds the desired target plus a stale one,
/// spread across two listing pages. The pass must describe once, re-put the
/// attribute record once, exhaust pagination, remove exactly the stale id,
/// and touch nothing else.
#[tokio::test]
async fn update_removes_stale_target_and_leaves_matching_target_alone() {
    // Setup: remote has the desired lambda target and one leftover.
    let lambda = Target::new("TestLambdaFunctionId", "arn:aws:lambda:fn");
    let api = InMemoryEventsApi::new();
    seed_remote(&api, vec![lambda.clone(), Target::new("ToDeleteId", "arn:aws:lambda:old")]);
    api.set_page_size(1);

    let desired = desired_model(vec![lambda.clone()]);

    // Execute
    let event = handler::update(&api, request_for(desired.clone())).await;

    // Verify the envelope mirrors the desired model.
    assert_eq!(event.status, OperationStatus::Success);
    assert_eq!(event.resource_model, Some(desired));
    assert_eq!(event.callback_delay_seconds, 0);
    assert_eq!(event.message, None);
    assert_eq!(event.error_code, None);
    assert_eq!(event.resource_models, None);

    // Verify the call set was minimal.
    let counts = api.counts();
    assert_eq!(counts.describe_rule, 1);
    assert_eq!(counts.put_rule, 1);
    assert!(counts.list_targets_by_rule >= 2, "listing must span pages");
    assert_eq!(counts.remove_targets, 1);
    assert_eq!(counts.put_targets, 0, "matching target must not be re-put");

    // Verify the remote converged.
    assert_eq!(api.stored_targets(), vec![lambda]);
}

/// Running the same update twice over an unchanged remote must issue zero
/// target-mutating calls on the second pass.
#[tokio::test]
async fn second_pass_over_converged_state_mutates_nothing() {
    let lambda = Target::new("TestLambdaFunctionId", "arn:aws:lambda:fn");
    let api = InMemoryEventsApi::new();
    seed_remote(&api, vec![lambda.clone(), Target::new("ToDeleteId", "arn:aws:lambda:old")]);

    let desired = desired_model(vec![lambda]);

    let first = handler::update(&api, request_for(desired.clone())).await;
    assert_eq!(first.status, OperationStatus::Success);
    let after_first = api.counts();
    assert_eq!(after_first.target_mutations(), 1);

    let second = handler::update(&api, request_for(desired)).await;
    assert_eq!(second.status, OperationStatus::Success);
    let after_second = api.counts();

    assert_eq!(
        after_second.target_mutations(),
        after_first.target_mutations(),
        "a converged pass must not mutate targets"
    );
}

/// A state flip with identical targets is exactly one attribute-update call
/// and zero target calls.
#[tokio::test]
async fn state_flip_touches_attributes_only() {
    let lambda = Target::new("TestLambdaFunctionId", "arn:aws:lambda:fn");
    let api = InMemoryEventsApi::new();
    seed_remote(&api, vec![lambda.clone()]);

    let mut desired = desired_model(vec![lambda]);
    desired.state = RuleState::Disabled;

    let event = handler::update(&api, request_for(desired)).await;

    assert_eq!(event.status, OperationStatus::Success);
    let counts = api.counts();
    assert_eq!(counts.put_rule, 1);
    assert_eq!(counts.target_mutations(), 0);
    assert_eq!(api.stored_rule().unwrap().state, RuleState::Disabled);
}

/// Desired and current both empty: the pass must not issue a remove call
/// with an empty id list (the remote rejects it; the fake enforces that).
#[tokio::test]
async fn empty_desired_against_empty_current_issues_no_target_calls() {
    let api = InMemoryEventsApi::new();
    seed_remote(&api, Vec::new());

    let event = handler::update(&api, request_for(desired_model(Vec::new()))).await;

    assert_eq!(event.status, OperationStatus::Success);
    assert_eq!(api.counts().target_mutations(), 0);
}

/// A target replaced under a reused id is re-put in place; the id never
/// passes through the removal path.
#[tokio::test]
async fn reused_id_with_new_arn_is_put_without_remove() {
    let api = InMemoryEventsApi::new();
    seed_remote(&api, vec![Target::new("X", "arn:aws:lambda:old")]);

    let replacement = Target::new("X", "arn:aws:lambda:new");
    let event = handler::update(&api, request_for(desired_model(vec![replacement.clone()]))).await;

    assert_eq!(event.status, OperationStatus::Success);
    let counts = api.counts();
    assert_eq!(counts.remove_targets, 0);
    assert_eq!(counts.put_targets, 1);
    assert_eq!(api.stored_targets(), vec![replacement]);
}

/// Update requires an existing resource: a missing rule is terminal FAILED
/// with the NotFound code, before any mutation is attempted.
#[tokio::test]
async fn missing_rule_fails_with_not_found() {
    let api = InMemoryEventsApi::new();

    let event = handler::update(&api, request_for(desired_model(Vec::new()))).await;

    assert_eq!(event.status, OperationStatus::Failed);
    assert_eq!(event.error_code, Some(HandlerErrorCode::NotFound));
    assert!(event.message.is_some());
    assert_eq!(event.resource_model, None);
    assert_eq!(api.counts().put_rule, 0);
    assert_eq!(api.counts().target_mutations(), 0);
}

/// A partially rejected removal batch fails the whole pass: the put phase
/// is aborted and the envelope carries the batch failure code.
#[tokio::test]
async fn partial_batch_rejection_aborts_the_pass() {
    let api = InMemoryEventsApi::new();
    seed_remote(&api, vec![Target::new("stale", "arn:aws:lambda:old")]);
    api.fail_next(
        Op::RemoveTargets,
        ApiError::PartialBatch {
            failures: vec![BatchFailureEntry {
                target_id: "stale".to_string(),
                error_code: "ConcurrentModificationException".to_string(),
                error_message: "try again".to_string(),
            }],
        },
    );

    let desired = desired_model(vec![Target::new("fresh", "arn:aws:lambda:new")]);
    let event = handler::update(&api, request_for(desired)).await;

    assert_eq!(event.status, OperationStatus::Failed);
    assert_eq!(
        event.error_code,
        Some(HandlerErrorCode::GeneralServiceException)
    );
    assert_eq!(api.counts().put_targets, 0, "puts must not follow a failed remove");
}

/// A throttled call surfaces as a retryable FAILED envelope; the engine does
/// not retry internally.
#[tokio::test]
async fn throttling_surfaces_as_failed_with_throttling_code() {
    let api = InMemoryEventsApi::new();
    seed_remote(&api, Vec::new());
    api.fail_next(Op::PutRule, ApiError::Throttling("rate exceeded".to_string()));

    let event = handler::update(&api, request_for(desired_model(Vec::new()))).await;

    assert_eq!(event.status, OperationStatus::Failed);
    assert_eq!(event.error_code, Some(HandlerErrorCode::Throttling));
    assert_eq!(api.counts().put_rule, 1, "exactly one attempt, no internal retry");
}

/// A desired model with duplicate target ids is rejected before the first
/// remote call.
#[tokio::test]
async fn duplicate_target_ids_fail_before_any_remote_call() {
    let api = InMemoryEventsApi::new();
    seed_remote(&api, Vec::new());

    let desired = desired_model(vec![
        Target::new("dup", "arn:a"),
        Target::new("dup", "arn:b"),
    ]);
    let event = handler::update(&api, request_for(desired)).await;

    assert_eq!(event.status, OperationStatus::Failed);
    assert_eq!(event.error_code, Some(HandlerErrorCode::InvalidRequest));
    assert_eq!(api.counts(), events_api::CallCounts::default());
}

/// The host envelope round-trips: camelCase request JSON in, camelCase
/// ProgressEvent JSON out.
#[tokio::test]
async fn host_envelope_round_trips_camel_case_json() {
    let raw = json!({
        "desiredResourceState": {
            "name": "TestRule",
            "description": "TestDescription",
            "eventPattern": {"source": ["aws.s3"], "detail-type": ["Object Created"]},
            "state": "ENABLED",
            "targets": [{"id": "TestLambdaFunctionId", "arn": "arn:aws:lambda:fn"}]
        },
        "callbackContext": {"invocation": 1}
    });
    let request: HandlerRequest = serde_json::from_value(raw).unwrap();
    assert_eq!(
        request.callback_context,
        Some(CallbackContext { invocation: 1 })
    );

    let api = InMemoryEventsApi::new();
    seed_remote(
        &api,
        vec![Target::new("TestLambdaFunctionId", "arn:aws:lambda:fn")],
    );

    let event = handler::update(&api, request).await;
    let out = serde_json::to_value(&event).unwrap();

    assert_eq!(out["status"], "SUCCESS");
    assert_eq!(out["resourceModel"]["eventPattern"]["source"][0], "aws.s3");
    assert_eq!(out["callbackDelaySeconds"], 0);
}
