use tracing_subscriber::prelude::*;
use tracing_subscriber::Registry;

/// Installs the global tracing subscriber: env-filtered, JSON formatted,
/// with ordinary `log` statements forwarded to `tracing`.
///
/// Call once from the composition root; panics if a subscriber is already
/// installed.
pub fn init_telemetry() {
    tracing_log::LogTracer::init().expect("Failed to initialize log tracer");

    let subscriber = Registry::default()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_thread_names(true),
        );

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to install `tracing` subscriber");
}
