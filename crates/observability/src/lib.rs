//! Process-wide logging setup for binaries and tests embedding the stack.

/// Initialize logging with the default filter (`RUST_LOG`, else `info`).
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    subscriber::init(subscriber::DEFAULT_FILTER);
}

/// Initialize logging, falling back to `default_filter` when `RUST_LOG` is
/// unset or unparsable.
pub fn init_with_filter(default_filter: &str) {
    subscriber::init(default_filter);
}

/// Subscriber configuration (filters, layers).
pub mod subscriber;
