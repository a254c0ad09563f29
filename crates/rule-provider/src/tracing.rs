/// Initializes the tracing/logging infrastructure for the provider.
///
/// Structured logging via the `tracing` crate with:
/// - **Environment-based filtering**: controlled via the `RUST_LOG`
///   environment variable
/// - **Span tracking**: each reconciliation step runs under a named span
///   (`read_current`, `diff`, `apply_attributes`, `apply_targets`, `verify`)
///
/// # Environment Variables
///
/// - `RUST_LOG=info` - pass start/convergence and failures
/// - `RUST_LOG=debug` - plus computed deltas and per-call breadcrumbs
/// - `RUST_LOG=rule_provider=debug` - debug only for this crate
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
