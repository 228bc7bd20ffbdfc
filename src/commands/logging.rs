//! Diagnostic logging setup
//!
//! Logs go to stderr so that stdout carries nothing but results. `RUST_LOG`
//! overrides the level picked from `--debug`.

use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

pub fn log_dispatch(debug: bool) -> Dispatch {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(debug),
    );
    Dispatch::new(subscriber)
}
