//! Engine constants and default values.

use std::time::Duration;

/// Default HTTP User-Agent header value.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; urlhunter/0.1)";

/// Maximum URL length (2048 characters) to prevent pathological inputs.
/// This matches common browser and server limits.
pub const MAX_URL_LENGTH: usize = 2048;

/// Width of the active scanner's worker pool. A scan or brute-force run
/// occupies one slot for its duration; the pool is reused across runs.
pub const SCANNER_POOL_WIDTH: usize = 10;

/// Number of background workers that build and persist passive discovery
/// records. Kept small so the interception path stays cheap.
pub const LISTENER_WORKERS: usize = 2;

/// Capacity of the pending-discovery queue between the listener's
/// synchronous classification path and its background workers.
pub const DISCOVERY_QUEUE_CAPACITY: usize = 256;

/// Capacity of the outward discovery event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Politeness delay between consecutive probes in a list scan.
pub const SCAN_PROBE_DELAY: Duration = Duration::from_millis(100);

/// Politeness delay between consecutive dictionary fuzz probes.
pub const FUZZ_PROBE_DELAY: Duration = Duration::from_millis(50);

/// Politeness delay between consecutive short-link brute-force probes.
pub const BRUTE_FORCE_PROBE_DELAY: Duration = Duration::from_millis(50);

/// Upper bound on the estimated combination count of a short-link
/// brute-force run. Runs whose estimate exceeds this are rejected up front
/// instead of starting effectively unbounded work. The default sits above
/// the full-alphanumeric worst case (62^1 + ... + 62^4, about 15.0M) so the
/// stock configuration still runs.
pub const BRUTE_FORCE_MAX_COMBINATIONS: u128 = 20_000_000;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// DNS resolution timeout in seconds.
pub const DNS_TIMEOUT_SECS: u64 = 5;

/// File extensions filtered by default (common static assets).
pub const DEFAULT_EXTENSION_BLACKLIST: &[&str] = &[
    "ico", "jpg", "jpeg", "png", "gif", "css", "js", "woff", "woff2", "ttf", "eot", "svg",
];

/// Status codes filtered by default.
pub const DEFAULT_STATUS_CODE_BLACKLIST: &[u16] = &[403, 404, 501, 502, 503];

/// Default dictionary for path fuzzing.
pub const DEFAULT_FUZZ_DICTIONARY: &[&str] = &[
    "admin", "test", "backup", "config", "login", "api", "upload", "debug",
];

/// Default short-link charset: full alphanumeric, 62 characters.
pub const DEFAULT_SHORT_LINK_CHARSET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default minimum short-link length.
pub const DEFAULT_SHORT_LINK_MIN_LENGTH: usize = 1;

/// Default maximum short-link length.
pub const DEFAULT_SHORT_LINK_MAX_LENGTH: usize = 4;
