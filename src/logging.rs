//! Optional `tracing-subscriber` bootstrap.
//!
//! Applications that already install their own subscriber should skip this
//! module; it exists so examples and small tools get useful output with a
//! single call.

/// Install a formatting subscriber filtered by `RUST_LOG`.
///
/// Does nothing if a global subscriber is already set.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
