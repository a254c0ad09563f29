//! # Wire Types
//!
//! Value types exchanged with the remote eventing API. These are plain,
//! explicitly-constructed records (no builders): the reconciliation engine
//! owns them for the duration of one pass and never mutates them in place.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Upper bound on entries per `remove_targets` / `put_targets` call,
/// imposed by the remote API. Larger deltas must be chunked by the caller.
pub const TARGET_BATCH_SIZE: usize = 10;

/// Enablement state of a rule.
///
/// Serialized with the remote API's spelling (`ENABLED` / `DISABLED`), which
/// is also the spelling used in the host envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleState {
    #[serde(rename = "ENABLED")]
    Enabled,
    #[serde(rename = "DISABLED")]
    Disabled,
}

impl Display for RuleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleState::Enabled => write!(f, "ENABLED"),
            RuleState::Disabled => write!(f, "DISABLED"),
        }
    }
}

/// One delivery destination attached to a rule.
///
/// The `id` is the target's identity: two targets with equal ids describe the
/// same attachment even when every other attribute differs. `parameters`
/// carries optional execution configuration (input transforms, role
/// bindings, …) as an opaque JSON object that the engine passes through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub id: String,
    pub arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Target {
    /// A target with no execution parameters.
    pub fn new(id: impl Into<String>, arn: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            arn: arn.into(),
            parameters: None,
        }
    }
}

/// Input record for `put_rule`.
///
/// The remote API models a rule's scalar attributes as one atomic record:
/// name, description, pattern, and state always travel together, never as a
/// partial patch.
#[derive(Debug, Clone, PartialEq)]
pub struct PutRuleInput {
    pub name: String,
    pub description: Option<String>,
    /// Pattern in its serialized (string) form, as the remote stores it.
    pub event_pattern: Option<String>,
    pub state: RuleState,
}

#[derive(Debug, Clone)]
pub struct PutRuleOutput {
    pub rule_arn: String,
}

/// The remote API's view of a rule's scalar attributes.
#[derive(Debug, Clone)]
pub struct DescribeRuleOutput {
    pub name: String,
    pub arn: String,
    pub description: Option<String>,
    /// Serialized pattern string; structural comparison happens in the diff
    /// engine, not here.
    pub event_pattern: Option<String>,
    pub state: RuleState,
}

/// One page of a rule's target listing.
///
/// `next_token` is an opaque continuation token; `Some` means more pages
/// remain and the caller must keep listing before diffing.
#[derive(Debug, Clone)]
pub struct TargetPage {
    pub targets: Vec<Target>,
    pub next_token: Option<String>,
}

/// A single rejected entry from a batched target mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailureEntry {
    pub target_id: String,
    pub error_code: String,
    pub error_message: String,
}
