//! Network-related constants.

/// Default API server address (HTTP).
pub const DEFAULT_API_ADDR: &str = "http://127.0.0.1:6443";

/// Default per-request timeout for API reads, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
