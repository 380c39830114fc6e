//! Fixed limits for sync runs.

/// Records per store upsert call.
pub const BATCH_SIZE: usize = 100;

/// Page size for `full` and `delta` runs.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Page size for the single `debug` page.
pub const DEBUG_PAGE_SIZE: usize = 10;

/// Hard offset ceiling; matches the remote API's own pagination limit.
pub const MAX_FETCH_OFFSET: usize = 10_000;

/// Trailing window for `delta` runs.
pub const DELTA_WINDOW_DAYS: i64 = 7;

/// Consecutive empty pages treated as a stalled pagination.
pub const MAX_CONSECUTIVE_EMPTY_PAGES: usize = 2;
