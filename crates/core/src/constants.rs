//! Defaults used when configuration leaves a value unset.

/// Request timeout applied to platform calls, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Address the REST server binds to.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Backend used when none is configured.
pub const DEFAULT_DATA_BACKEND: &str = "http";
