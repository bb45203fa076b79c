//! Logging setup.

/// Initializes `env_logger` from `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::try_init();
    log::debug!("ar-portal logging initialized");
}
