// Lifecycle constants (no magic values)
use std::time::Duration;

/// How often the expiry sweep closes overdue jobs (1 hour)
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Jobs returned by the public featured listing when no limit is given
pub const DEFAULT_FEATURED_LIMIT: u32 = 6;

/// Maximum job title length (characters)
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum company name length (characters)
pub const MAX_COMPANY_NAME_LEN: usize = 120;

/// Currency assumed when a salary omits one
pub const DEFAULT_CURRENCY: &str = "USD";
