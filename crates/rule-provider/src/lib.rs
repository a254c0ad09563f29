//! # Rule Provider
//!
//! The reconciliation engine behind the "update" handler of an event-bus
//! rule resource provider: given a desired rule (name, description, pattern,
//! state, targets) and whatever the remote currently holds, converge the
//! remote onto the desired state with the minimal set of API calls, and
//! report the outcome as a lifecycle envelope.
//!
//! ## Module Tour
//!
//! The pass flows through four layers:
//!
//! 1. **The Snapshot** ([`reader`]) - fetch rule attributes and the full,
//!    pagination-exhausted target collection into one transient
//!    [`RemoteRuleSnapshot`](reader::RemoteRuleSnapshot).
//! 2. **The Delta** ([`diff`]) - attribute divergence plus the symmetric
//!    difference of the target sets, keyed strictly by target id.
//! 3. **The Calls** ([`apply`]) - one atomic attribute record, then
//!    removals-before-puts in batch-bounded chunks.
//! 4. **The Envelope** ([`handler`]) - the orchestrator that drives
//!    read → diff → apply → verify and maps every outcome onto a
//!    [`ProgressEvent`](model::ProgressEvent).
//!
//! [`model`] holds the host-boundary value types, and [`tracing`] the
//! logging setup the binary installs before its first pass.
//!
//! The remote API itself lives behind the `events-api` crate's
//! [`EventsApi`](events_api::EventsApi) trait; everything here is written
//! against that trait, so the whole engine runs identically over the
//! production HTTP adapter and the in-memory fake the tests drive.
//!
//! ## Running the host shim
//!
//! ```bash
//! # Dry-run an update against an in-memory store seeded from the previous state
//! RUST_LOG=info cargo run -p rule-provider -- --request request.json
//!
//! # Drive a real endpoint
//! RUST_LOG=debug cargo run -p rule-provider -- --request request.json \
//!     --endpoint http://localhost:4566
//! ```

pub mod apply;
pub mod diff;
pub mod handler;
pub mod model;
pub mod reader;
pub mod tracing;
