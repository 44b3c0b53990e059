//! Article field validation and lifecycle constants.
//!
//! This module lives in `core` (zero internal deps) so it can be used by both
//! the API/repository layer and any future CLI or worker tooling.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";

/// All valid article statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_PUBLISHED];

// ---------------------------------------------------------------------------
// Version change-type constants
// ---------------------------------------------------------------------------

pub const CHANGE_CREATE: &str = "create";
pub const CHANGE_UPDATE: &str = "update";
pub const CHANGE_REVERT: &str = "revert";

/// All valid version change types.
pub const VALID_CHANGE_TYPES: &[&str] = &[CHANGE_CREATE, CHANGE_UPDATE, CHANGE_REVERT];

// ---------------------------------------------------------------------------
// Field limits
// ---------------------------------------------------------------------------

/// Maximum article title length in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum article body length in characters.
pub const MAX_BODY_LEN: usize = 100_000;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an article title (non-empty, <= 200 chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate an article body (may be empty, <= 100 000 chars).
pub fn validate_body(body: &str) -> Result<(), CoreError> {
    if body.len() > MAX_BODY_LEN {
        return Err(CoreError::Validation(format!(
            "Body must be at most {MAX_BODY_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate an article status against the known set.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if !VALID_STATUSES.contains(&status) {
        return Err(CoreError::Validation(format!(
            "Invalid status '{}'. Valid statuses: {}",
            status,
            VALID_STATUSES.join(", ")
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
