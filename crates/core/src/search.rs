//! Pagination and lookup limits shared by list, search, and suggest
//! endpoints.

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of results per page.
pub const DEFAULT_LIST_LIMIT: i64 = 20;

/// Maximum number of results per page.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Default number of title suggestions for `[[` autocomplete.
pub const DEFAULT_SUGGEST_LIMIT: i64 = 10;

/// Maximum number of title suggestions.
pub const MAX_SUGGEST_LIMIT: i64 = 25;

/// Minimum query length before suggest returns anything.
pub const MIN_SUGGEST_QUERY_LEN: usize = 2;

// ---------------------------------------------------------------------------
// Clamp helpers
// ---------------------------------------------------------------------------

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
