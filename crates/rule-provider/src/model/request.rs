//! The invocation envelope the host runtime hands the handler.

use crate::model::progress::CallbackContext;
use crate::model::rule::ResourceModel;
use serde::{Deserialize, Serialize};

/// One handler invocation.
///
/// `previous_resource_state` is informational for an update (the engine
/// reconciles against the *remote* state it reads, not against what the host
/// remembers); `callback_context` is present only on re-invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerRequest {
    pub desired_resource_state: ResourceModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_resource_state: Option<ResourceModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_context: Option<CallbackContext>,
}
