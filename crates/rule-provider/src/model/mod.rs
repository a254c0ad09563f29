//! # Data Model
//!
//! Value types crossing the host-runtime boundary:
//!
//! - [`rule`] - the desired-state [`ResourceModel`] and its validation.
//! - [`progress`] - the lifecycle envelope ([`ProgressEvent`]) plus status,
//!   error code, and callback scratch state.
//! - [`request`] - the invocation envelope the host hands the handler.
//!
//! All of these serialize with camelCase keys, matching the host's JSON
//! contract, and are constructed explicitly; the engine treats them as
//! immutable for the duration of a pass.

pub mod progress;
pub mod request;
pub mod rule;

pub use progress::{CallbackContext, HandlerErrorCode, OperationStatus, ProgressEvent};
pub use request::HandlerRequest;
pub use rule::{ResourceModel, ValidationError};
