// Worker constants (no magic values in the worker loop)
use std::time::Duration;

/// How long an idle worker waits on its queue before re-checking shutdown (1s)
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(1);

/// Default retry base delay (500ms -> waits of 1s, 2s, 4s)
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default wait for room in a full queue before rejecting (100ms)
pub const DEFAULT_ADMISSION_TIMEOUT: Duration = Duration::from_millis(100);

/// Grace period for workers to notice shutdown (5s)
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Terminal error message when the dynamic queue refuses a forwarded job
pub const FORWARD_QUEUE_FULL_MESSAGE: &str = "failed to forward: queue full";
