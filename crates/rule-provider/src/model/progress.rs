//! The lifecycle envelope the handler returns to the host runtime.

use crate::model::rule::ResourceModel;
use serde::{Deserialize, Serialize};

/// Terminal or in-flight status of one handler invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "IN_PROGRESS")]
    InProgress,
    #[serde(rename = "FAILED")]
    Failed,
}

/// Stable, host-facing error codes. The mapping from boundary failures
/// lives in the handler; these names are part of the host contract and
/// never change with the underlying client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandlerErrorCode {
    NotFound,
    InvalidRequest,
    Throttling,
    ServiceUnavailable,
    GeneralServiceException,
    InternalFailure,
}

/// Scratch state threaded through re-invocations of one operation.
///
/// The host hands it back verbatim on each re-invocation and discards it on
/// terminal status; the engine reads and writes it but never stores it
/// anywhere else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackContext {
    /// How many times the host has driven this operation so far.
    pub invocation: u32,
}

/// The result envelope, produced once per invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub status: OperationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_model: Option<ResourceModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_models: Option<Vec<ResourceModel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_context: Option<CallbackContext>,
    pub callback_delay_seconds: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<HandlerErrorCode>,
}

impl ProgressEvent {
    /// Terminal success: echoes the desired model unchanged, no delay, no
    /// message, no error code.
    pub fn success(model: ResourceModel) -> Self {
        Self {
            status: OperationStatus::Success,
            resource_model: Some(model),
            resource_models: None,
            callback_context: None,
            callback_delay_seconds: 0,
            message: None,
            error_code: None,
        }
    }

    /// Non-terminal progress: the host re-invokes after `delay_seconds`
    /// with the given context.
    pub fn in_progress(model: ResourceModel, context: CallbackContext, delay_seconds: u32) -> Self {
        Self {
            status: OperationStatus::InProgress,
            resource_model: Some(model),
            resource_models: None,
            callback_context: Some(context),
            callback_delay_seconds: delay_seconds,
            message: None,
            error_code: None,
        }
    }

    /// Terminal failure with a stable code and a human-readable message.
    pub fn failed(error_code: HandlerErrorCode, message: impl Into<String>) -> Self {
        Self {
            status: OperationStatus::Failed,
            resource_model: None,
            resource_models: None,
            callback_context: None,
            callback_delay_seconds: 0,
            message: Some(message.into()),
            error_code: Some(error_code),
        }
    }
}
