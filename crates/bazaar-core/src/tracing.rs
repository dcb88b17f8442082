use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured stdout tracing. Call once at service startup.
/// Uses JSON format with env-filter (`RUST_LOG` env var).
///
/// Safe to call multiple times — subsequent calls are silently ignored,
/// which keeps integration tests that each boot a service from panicking.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json())
        .try_init();
}
