//! Tracing and logging setup shared by every roster binary and test harness.

/// Initialize process-wide logging from `config`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init(config: &LogConfig) {
    tracing::init(config);
}

/// [`init`] with the default configuration (JSON, `info` unless `RUST_LOG`
/// says otherwise).
pub fn init_default() {
    tracing::init(&LogConfig::default());
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use tracing::LogConfig;
