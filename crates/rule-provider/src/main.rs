//! # Rule Provider Host Shim
//!
//! Thin host-runtime stand-in around the update handler: it deserializes a
//! request envelope from JSON, picks the API implementation, drives one
//! reconciliation pass, and prints the resulting
//! [`ProgressEvent`](rule_provider::model::ProgressEvent) to stdout.
//!
//! With `--endpoint` the pass runs over the real HTTP adapter; without one
//! it dry-runs against an in-memory store seeded from the request's
//! `previousResourceState`, which makes the convergence observable with no
//! remote service at all.

use std::path::PathBuf;

use clap::Parser;
use events_api::{HttpEventsApi, InMemoryEventsApi};
use rule_provider::handler;
use rule_provider::model::HandlerRequest;
use rule_provider::tracing::setup_tracing;
use tracing::info;

/// Drive one update pass of the event-bus rule provider.
#[derive(Parser)]
#[command(name = "rule-provider", version, about)]
struct Cli {
    /// Request envelope JSON file:
    /// {desiredResourceState, previousResourceState?, callbackContext?}.
    #[arg(long)]
    request: PathBuf,

    /// Remote API endpoint. When omitted, the pass dry-runs against an
    /// in-memory store seeded from previousResourceState.
    #[arg(long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();
    let cli = Cli::parse();

    let raw = std::fs::read_to_string(&cli.request)?;
    let request: HandlerRequest = serde_json::from_str(&raw)?;

    let event = match cli.endpoint {
        Some(endpoint) => {
            info!(endpoint = %endpoint, "driving update against remote endpoint");
            let api = HttpEventsApi::new(endpoint);
            handler::update(&api, request).await
        }
        None => {
            info!("no endpoint given; dry-running against an in-memory store");
            let api = seeded_store(&request);
            handler::update(&api, request).await
        }
    };

    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}

/// Seed the in-memory store from the previous resource state so the dry run
/// simulates exactly the convergence this update would perform remotely.
fn seeded_store(request: &HandlerRequest) -> InMemoryEventsApi {
    let api = InMemoryEventsApi::new();
    let seed = request
        .previous_resource_state
        .as_ref()
        .unwrap_or(&request.desired_resource_state);
    api.seed_rule(seed.attribute_record());
    api.seed_targets(seed.targets.clone());
    api
}
