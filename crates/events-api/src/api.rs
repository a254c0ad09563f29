//! # EventsApi Trait
//!
//! The boundary contract between the reconciliation engine and the remote
//! eventing service. The engine is written entirely against this trait, so
//! the same handler code runs over the real HTTP adapter
//! ([`HttpEventsApi`](crate::http::HttpEventsApi)) and the in-memory fake
//! ([`InMemoryEventsApi`](crate::memory::InMemoryEventsApi)) used in tests.
//!
//! # Architecture Note
//! Why a trait instead of a concrete client? The engine's correctness
//! properties (idempotence, minimal call set, remove-before-put ordering)
//! are statements about *which calls were issued*. With the boundary behind
//! a trait, tests can assert those properties directly from the fake's call
//! accounting instead of reverse-engineering them from side effects.

use crate::error::ApiError;
use crate::types::{DescribeRuleOutput, PutRuleInput, PutRuleOutput, Target, TargetPage};
use async_trait::async_trait;

/// Async client contract for the remote eventing API.
///
/// All operations are issued sequentially by the engine; implementations do
/// not need internal ordering guarantees beyond completing each call before
/// returning. Implementations classify their failures into [`ApiError`] at
/// this boundary; callers never see raw transport or provider errors.
#[async_trait]
pub trait EventsApi: Send + Sync {
    /// Fetch a rule's scalar attributes. Fails with [`ApiError::NotFound`]
    /// when no rule of that name exists.
    async fn describe_rule(&self, name: &str) -> Result<DescribeRuleOutput, ApiError>;

    /// Create or replace a rule's scalar attributes as one atomic record.
    async fn put_rule(&self, input: PutRuleInput) -> Result<PutRuleOutput, ApiError>;

    /// Fetch one page of the rule's target list. Pass the previous page's
    /// `next_token` to continue; `None` starts from the beginning. Fails
    /// with [`ApiError::NotFound`] if the rule disappeared mid-pagination.
    async fn list_targets_by_rule(
        &self,
        name: &str,
        next_token: Option<&str>,
    ) -> Result<TargetPage, ApiError>;

    /// Detach targets by id. At most [`TARGET_BATCH_SIZE`] ids per call and
    /// never an empty batch; the remote rejects both. Per-id rejections
    /// surface as [`ApiError::PartialBatch`].
    ///
    /// [`TARGET_BATCH_SIZE`]: crate::types::TARGET_BATCH_SIZE
    async fn remove_targets(&self, name: &str, ids: &[String]) -> Result<(), ApiError>;

    /// Attach or replace targets (upsert by id). Same batch bounds and
    /// failure semantics as [`EventsApi::remove_targets`].
    async fn put_targets(&self, name: &str, targets: &[Target]) -> Result<(), ApiError>;
}
