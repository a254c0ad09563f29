//! # In-Memory Fake
//!
//! `InMemoryEventsApi` implements the same [`EventsApi`] contract as the
//! production adapter but holds its rule and target store in memory. It
//! exists so the engine's correctness properties can be asserted in terms of
//! *calls issued*, deterministically and without a network.
//!
//! ## What it gives tests
//!
//! - **Seedable state**: install a rule and its targets before the pass
//!   ([`seed_rule`](InMemoryEventsApi::seed_rule),
//!   [`seed_targets`](InMemoryEventsApi::seed_targets)).
//! - **Call accounting**: per-operation counters
//!   ([`counts`](InMemoryEventsApi::counts)) and an ordered operation log
//!   ([`op_log`](InMemoryEventsApi::op_log)) for ordering assertions such as
//!   removals-before-puts.
//! - **Pagination control**: [`set_page_size`](InMemoryEventsApi::set_page_size)
//!   forces the target listing to span multiple pages.
//! - **Fault injection**: [`fail_next`](InMemoryEventsApi::fail_next) queues
//!   an error for the next call of an operation, the easy way to exercise
//!   throttling, partial-batch, and mid-pagination-vanish paths.
//!
//! The fake also enforces the remote's batch contract (no empty batches,
//! at most [`TARGET_BATCH_SIZE`] entries per call), so a handler that chunks
//! incorrectly fails its tests instead of passing silently.

use crate::api::EventsApi;
use crate::error::ApiError;
use crate::types::{
    BatchFailureEntry, DescribeRuleOutput, PutRuleInput, PutRuleOutput, RuleState, Target,
    TargetPage, TARGET_BATCH_SIZE,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

/// Operations of the [`EventsApi`] contract, as recorded in the call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    DescribeRule,
    PutRule,
    ListTargetsByRule,
    RemoveTargets,
    PutTargets,
}

/// Per-operation call counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub describe_rule: usize,
    pub put_rule: usize,
    pub list_targets_by_rule: usize,
    pub remove_targets: usize,
    pub put_targets: usize,
}

impl CallCounts {
    /// Calls that mutate the target collection. The idempotence property is
    /// stated in terms of this number being zero on a converged pass.
    pub fn target_mutations(&self) -> usize {
        self.remove_targets + self.put_targets
    }

    fn bump(&mut self, op: Op) {
        match op {
            Op::DescribeRule => self.describe_rule += 1,
            Op::PutRule => self.put_rule += 1,
            Op::ListTargetsByRule => self.list_targets_by_rule += 1,
            Op::RemoveTargets => self.remove_targets += 1,
            Op::PutTargets => self.put_targets += 1,
        }
    }
}

struct StoredRule {
    name: String,
    arn: String,
    description: Option<String>,
    event_pattern: Option<String>,
    state: RuleState,
}

struct State {
    rule: Option<StoredRule>,
    targets: BTreeMap<String, Target>,
    page_size: Option<usize>,
    counts: CallCounts,
    op_log: Vec<Op>,
    faults: HashMap<Op, VecDeque<ApiError>>,
}

/// In-memory [`EventsApi`] implementation with call accounting.
pub struct InMemoryEventsApi {
    state: Mutex<State>,
}

impl InMemoryEventsApi {
    /// An empty store: no rule, no targets, single-page listings.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                rule: None,
                targets: BTreeMap::new(),
                page_size: None,
                counts: CallCounts::default(),
                op_log: Vec::new(),
                faults: HashMap::new(),
            }),
        }
    }

    /// Install a rule without counting as a remote call.
    pub fn seed_rule(&self, input: PutRuleInput) {
        let arn = Self::rule_arn(&input.name);
        self.state.lock().unwrap().rule = Some(StoredRule {
            name: input.name,
            arn,
            description: input.description,
            event_pattern: input.event_pattern,
            state: input.state,
        });
    }

    /// Install targets without counting as remote calls.
    pub fn seed_targets(&self, targets: Vec<Target>) {
        let mut state = self.state.lock().unwrap();
        for target in targets {
            state.targets.insert(target.id.clone(), target);
        }
    }

    /// Force the target listing to return at most `page_size` entries per
    /// page, so tests can exercise pagination exhaustion.
    pub fn set_page_size(&self, page_size: usize) {
        self.state.lock().unwrap().page_size = Some(page_size);
    }

    /// Queue an error for the next call of `op`. Faults are consumed in
    /// order; the faulted call still counts in the call log.
    pub fn fail_next(&self, op: Op, error: ApiError) {
        self.state
            .lock()
            .unwrap()
            .faults
            .entry(op)
            .or_default()
            .push_back(error);
    }

    /// Snapshot of the per-operation call counters.
    pub fn counts(&self) -> CallCounts {
        self.state.lock().unwrap().counts.clone()
    }

    /// Every operation issued so far, in order.
    pub fn op_log(&self) -> Vec<Op> {
        self.state.lock().unwrap().op_log.clone()
    }

    /// Current target collection, ordered by id.
    pub fn stored_targets(&self) -> Vec<Target> {
        self.state.lock().unwrap().targets.values().cloned().collect()
    }

    /// Current rule attributes, if a rule exists.
    pub fn stored_rule(&self) -> Option<DescribeRuleOutput> {
        self.state.lock().unwrap().rule.as_ref().map(|rule| DescribeRuleOutput {
            name: rule.name.clone(),
            arn: rule.arn.clone(),
            description: rule.description.clone(),
            event_pattern: rule.event_pattern.clone(),
            state: rule.state,
        })
    }

    fn rule_arn(name: &str) -> String {
        format!("arn:aws:events:local:000000000000:rule/{name}")
    }

    /// Count the call, log it, and pop a queued fault if one is pending.
    fn begin(&self, op: Op) -> Result<MutexGuard<'_, State>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.counts.bump(op);
        state.op_log.push(op);
        if let Some(fault) = state.faults.get_mut(&op).and_then(|queue| queue.pop_front()) {
            return Err(fault);
        }
        Ok(state)
    }
}

impl Default for InMemoryEventsApi {
    fn default() -> Self {
        Self::new()
    }
}

fn check_batch_bounds(len: usize, what: &str) -> Result<(), ApiError> {
    if len == 0 {
        return Err(ApiError::InvalidRequest(format!(
            "{what} requires at least one entry"
        )));
    }
    if len > TARGET_BATCH_SIZE {
        return Err(ApiError::InvalidRequest(format!(
            "{what} accepts at most {TARGET_BATCH_SIZE} entries, got {len}"
        )));
    }
    Ok(())
}

#[async_trait]
impl EventsApi for InMemoryEventsApi {
    async fn describe_rule(&self, name: &str) -> Result<DescribeRuleOutput, ApiError> {
        let state = self.begin(Op::DescribeRule)?;
        match &state.rule {
            Some(rule) if rule.name == name => Ok(DescribeRuleOutput {
                name: rule.name.clone(),
                arn: rule.arn.clone(),
                description: rule.description.clone(),
                event_pattern: rule.event_pattern.clone(),
                state: rule.state,
            }),
            _ => Err(ApiError::NotFound(name.to_string())),
        }
    }

    async fn put_rule(&self, input: PutRuleInput) -> Result<PutRuleOutput, ApiError> {
        let mut state = self.begin(Op::PutRule)?;
        let arn = Self::rule_arn(&input.name);
        state.rule = Some(StoredRule {
            name: input.name,
            arn: arn.clone(),
            description: input.description,
            event_pattern: input.event_pattern,
            state: input.state,
        });
        Ok(PutRuleOutput { rule_arn: arn })
    }

    async fn list_targets_by_rule(
        &self,
        name: &str,
        next_token: Option<&str>,
    ) -> Result<TargetPage, ApiError> {
        let state = self.begin(Op::ListTargetsByRule)?;
        match &state.rule {
            Some(rule) if rule.name == name => {}
            _ => return Err(ApiError::NotFound(name.to_string())),
        }

        let all: Vec<Target> = state.targets.values().cloned().collect();
        let start = match next_token {
            None => 0,
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| ApiError::InvalidRequest(format!("bad pagination token: {token}")))?,
        };
        let page_size = state.page_size.unwrap_or(all.len().max(1));
        let end = (start + page_size).min(all.len());
        let next = (end < all.len()).then(|| end.to_string());
        Ok(TargetPage {
            targets: all[start.min(all.len())..end].to_vec(),
            next_token: next,
        })
    }

    async fn remove_targets(&self, name: &str, ids: &[String]) -> Result<(), ApiError> {
        let mut state = self.begin(Op::RemoveTargets)?;
        check_batch_bounds(ids.len(), "remove_targets")?;
        match &state.rule {
            Some(rule) if rule.name == name => {}
            _ => return Err(ApiError::NotFound(name.to_string())),
        }

        let mut failures = Vec::new();
        for id in ids {
            if state.targets.remove(id).is_none() {
                failures.push(BatchFailureEntry {
                    target_id: id.clone(),
                    error_code: "ResourceNotFoundException".to_string(),
                    error_message: format!("target {id} is not attached to rule {name}"),
                });
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ApiError::PartialBatch { failures })
        }
    }

    async fn put_targets(&self, name: &str, targets: &[Target]) -> Result<(), ApiError> {
        let mut state = self.begin(Op::PutTargets)?;
        check_batch_bounds(targets.len(), "put_targets")?;
        match &state.rule {
            Some(rule) if rule.name == name => {}
            _ => return Err(ApiError::NotFound(name.to_string())),
        }

        for target in targets {
            state.targets.insert(target.id.clone(), target.clone());
        }
        Ok(())
    }
}
