//! # HTTP Adapter
//!
//! `HttpEventsApi` is the production implementation of [`EventsApi`]: it
//! posts JSON bodies to a service endpoint using the target-header calling
//! convention (`X-Amz-Target: AWSEvents.<Operation>`) and classifies remote
//! error shapes into [`ApiError`] at this boundary.
//!
//! Requests are unsigned: credential and signature handling live outside
//! this crate, so the adapter is pointed at emulator or gateway endpoints
//! that accept anonymous calls.

use crate::api::EventsApi;
use crate::error::ApiError;
use crate::types::{
    BatchFailureEntry, DescribeRuleOutput, PutRuleInput, PutRuleOutput, RuleState, Target,
    TargetPage,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

const SERVICE_TARGET_PREFIX: &str = "AWSEvents";

/// [`EventsApi`] over HTTP.
pub struct HttpEventsApi {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpEventsApi {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    async fn call<Req, Resp>(&self, operation: &str, body: &Req) -> Result<Resp, ApiError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        debug!(operation, endpoint = %self.endpoint, "issuing remote call");
        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Amz-Target", format!("{SERVICE_TARGET_PREFIX}.{operation}"))
            .header(reqwest::header::CONTENT_TYPE, "application/x-amz-json-1.1")
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if status.is_success() {
            // Some endpoints answer mutations with an empty body.
            let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
            serde_json::from_str(body)
                .map_err(|e| ApiError::Transport(format!("undecodable response body: {e}")))
        } else {
            Err(classify_failure(status, &body))
        }
    }
}

/// Map a non-success response onto the error taxonomy. This is the single
/// place remote error shapes are interpreted.
fn classify_failure(status: reqwest::StatusCode, body: &str) -> ApiError {
    #[derive(Deserialize, Default)]
    struct WireError {
        #[serde(rename = "__type", default)]
        kind: Option<String>,
        #[serde(rename = "message", alias = "Message", default)]
        message: Option<String>,
    }

    let parsed: WireError = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .unwrap_or_else(|| format!("http status {status}"));
    // The wire error type may be namespaced ("com.amazonaws...#Name").
    let kind = parsed
        .kind
        .as_deref()
        .map(|k| k.rsplit('#').next().unwrap_or(k).to_string());

    match kind.as_deref() {
        Some("ResourceNotFoundException") => ApiError::NotFound(message),
        Some("ValidationException")
        | Some("InvalidEventPatternException")
        | Some("ManagedRuleException") => ApiError::InvalidRequest(message),
        Some("ThrottlingException") | Some("TooManyRequestsException") => {
            ApiError::Throttling(message)
        }
        Some("InternalException") | Some("ServiceUnavailableException") => {
            ApiError::ServiceUnavailable(message)
        }
        Some(other) => {
            if status.is_server_error() {
                ApiError::ServiceUnavailable(format!("{other}: {message}"))
            } else {
                ApiError::InvalidRequest(format!("{other}: {message}"))
            }
        }
        None if status.as_u16() == 429 => ApiError::Throttling(message),
        None if status.is_server_error() => ApiError::ServiceUnavailable(message),
        None => ApiError::Transport(message),
    }
}

// --- Wire shapes (PascalCase, per the target-header JSON protocol) ---

#[derive(Serialize, Deserialize)]
struct WireTarget {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Arn")]
    arn: String,
    /// Everything else on a wire target (input transforms, role bindings, …)
    /// rides along untouched. An empty map flattens to nothing.
    #[serde(flatten)]
    parameters: serde_json::Map<String, serde_json::Value>,
}

impl From<&Target> for WireTarget {
    fn from(target: &Target) -> Self {
        Self {
            id: target.id.clone(),
            arn: target.arn.clone(),
            parameters: target.parameters.clone().unwrap_or_default(),
        }
    }
}

impl From<WireTarget> for Target {
    fn from(wire: WireTarget) -> Self {
        Self {
            id: wire.id,
            arn: wire.arn,
            parameters: (!wire.parameters.is_empty()).then_some(wire.parameters),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeRuleRequest<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeRuleResponse {
    name: String,
    arn: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    event_pattern: Option<String>,
    state: RuleState,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PutRuleRequest<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_pattern: Option<&'a str>,
    state: RuleState,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PutRuleResponse {
    rule_arn: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ListTargetsByRuleRequest<'a> {
    rule: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListTargetsByRuleResponse {
    #[serde(default)]
    targets: Vec<WireTarget>,
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct RemoveTargetsRequest<'a> {
    rule: &'a str,
    ids: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PutTargetsRequest<'a> {
    rule: &'a str,
    targets: Vec<WireTarget>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BatchResponse {
    #[serde(default)]
    failed_entries: Vec<WireFailedEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireFailedEntry {
    target_id: String,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

impl BatchResponse {
    /// Per-entry rejections fail the whole call.
    fn into_result(self) -> Result<(), ApiError> {
        if self.failed_entries.is_empty() {
            return Ok(());
        }
        let failures = self
            .failed_entries
            .into_iter()
            .map(|entry| BatchFailureEntry {
                target_id: entry.target_id,
                error_code: entry.error_code.unwrap_or_default(),
                error_message: entry.error_message.unwrap_or_default(),
            })
            .collect();
        Err(ApiError::PartialBatch { failures })
    }
}

#[async_trait]
impl EventsApi for HttpEventsApi {
    async fn describe_rule(&self, name: &str) -> Result<DescribeRuleOutput, ApiError> {
        let response: DescribeRuleResponse = self
            .call("DescribeRule", &DescribeRuleRequest { name })
            .await?;
        Ok(DescribeRuleOutput {
            name: response.name,
            arn: response.arn,
            description: response.description,
            event_pattern: response.event_pattern,
            state: response.state,
        })
    }

    async fn put_rule(&self, input: PutRuleInput) -> Result<PutRuleOutput, ApiError> {
        let response: PutRuleResponse = self
            .call(
                "PutRule",
                &PutRuleRequest {
                    name: &input.name,
                    description: input.description.as_deref(),
                    event_pattern: input.event_pattern.as_deref(),
                    state: input.state,
                },
            )
            .await?;
        Ok(PutRuleOutput {
            rule_arn: response.rule_arn,
        })
    }

    async fn list_targets_by_rule(
        &self,
        name: &str,
        next_token: Option<&str>,
    ) -> Result<TargetPage, ApiError> {
        let response: ListTargetsByRuleResponse = self
            .call(
                "ListTargetsByRule",
                &ListTargetsByRuleRequest {
                    rule: name,
                    next_token,
                },
            )
            .await?;
        Ok(TargetPage {
            targets: response.targets.into_iter().map(Target::from).collect(),
            next_token: response.next_token,
        })
    }

    async fn remove_targets(&self, name: &str, ids: &[String]) -> Result<(), ApiError> {
        let response: BatchResponse = self
            .call("RemoveTargets", &RemoveTargetsRequest { rule: name, ids })
            .await?;
        response.into_result()
    }

    async fn put_targets(&self, name: &str, targets: &[Target]) -> Result<(), ApiError> {
        let response: BatchResponse = self
            .call(
                "PutTargets",
                &PutTargetsRequest {
                    rule: name,
                    targets: targets.iter().map(WireTarget::from).collect(),
                },
            )
            .await?;
        response.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaced_error_types_are_classified() {
        let body = r#"{"__type":"com.amazonaws.events#ResourceNotFoundException","message":"no rule"}"#;
        let err = classify_failure(reqwest::StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn unknown_server_errors_map_to_service_unavailable() {
        let err = classify_failure(reqwest::StatusCode::BAD_GATEWAY, "not json");
        assert!(matches!(err, ApiError::ServiceUnavailable(_)));
    }

    #[test]
    fn wire_target_round_trips_opaque_parameters() {
        let json = r#"{"Id":"t1","Arn":"arn:x","Input":"{\"k\":1}","RoleArn":"arn:r"}"#;
        let wire: WireTarget = serde_json::from_str(json).unwrap();
        let target = Target::from(wire);
        let parameters = target.parameters.as_ref().unwrap();
        assert_eq!(parameters.len(), 2);
        assert!(parameters.contains_key("Input"));

        let back = serde_json::to_value(WireTarget::from(&target)).unwrap();
        assert_eq!(back["RoleArn"], "arn:r");
    }
}
