//! # Events API
//!
//! The boundary between the rule reconciliation engine and the remote
//! eventing service, separated into three layers:
//!
//! 1. **Contract** ([`api`]) - the [`EventsApi`] trait: describe/put rule,
//!    list/remove/put targets, with pagination and batch-size bounds.
//! 2. **Shapes** ([`types`], [`error`]) - plain value records for the wire
//!    and one [`ApiError`] taxonomy every implementation classifies into.
//! 3. **Implementations** - the production HTTP adapter ([`http`]) and the
//!    in-memory fake with call accounting ([`memory`]).
//!
//! The engine crate depends only on the contract; which implementation runs
//! underneath is the host's choice. That separation is what makes the
//! engine's call-level properties (idempotence, minimal call set, ordering)
//! directly testable.

pub mod api;
pub mod error;
pub mod http;
pub mod memory;
pub mod types;

// Re-export core types for convenience
pub use api::EventsApi;
pub use error::ApiError;
pub use http::HttpEventsApi;
pub use memory::{CallCounts, InMemoryEventsApi, Op};
pub use types::{
    BatchFailureEntry, DescribeRuleOutput, PutRuleInput, PutRuleOutput, RuleState, Target,
    TargetPage, TARGET_BATCH_SIZE,
};
