//! Expiry rules for pastes.
//!
//! Every function takes the current instant as an argument; nothing here reads
//! the wall clock.

use crate::error::AppError;
use chrono::{DateTime, TimeDelta, Utc};

/// Validate an optional positive integer field such as `ttl_seconds`.
///
/// # Arguments
/// - `field`: Field name used in the error message.
/// - `value`: Raw value from the request.
///
/// # Returns
/// The value as `u64` when present.
///
/// # Errors
/// Returns [`AppError::InvalidArgument`] when the value is present but < 1.
pub fn validate_positive(field: &str, value: Option<i64>) -> Result<Option<u64>, AppError> {
    match value {
        None => Ok(None),
        Some(raw) if raw >= 1 => Ok(Some(raw as u64)),
        Some(raw) => Err(AppError::InvalidArgument(format!(
            "{} must be an integer >= 1 (got {})",
            field, raw
        ))),
    }
}

/// Compute the expiry instant for a paste created at `created_at`.
///
/// # Returns
/// `created_at + ttl_seconds` when a TTL is present, otherwise `None`.
///
/// # Errors
/// Returns [`AppError::InvalidArgument`] when `ttl_seconds` is < 1 or the
/// resulting instant is out of range.
pub fn compute_expiry(
    ttl_seconds: Option<i64>,
    created_at: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    let Some(ttl) = validate_positive("ttl_seconds", ttl_seconds)? else {
        return Ok(None);
    };
    let out_of_range =
        || AppError::InvalidArgument(format!("ttl_seconds {} is out of range", ttl));
    let delta = i64::try_from(ttl)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(out_of_range)?;
    created_at
        .checked_add_signed(delta)
        .map(Some)
        .ok_or_else(out_of_range)
}

/// A paste expires exactly at its boundary instant.
pub fn is_time_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    expires_at.is_some_and(|expires_at| now >= expires_at)
}

/// A paste with a view limit is spent once `views` reaches it.
pub fn is_view_expired(views: u64, max_views: Option<u64>) -> bool {
    max_views.is_some_and(|max_views| views >= max_views)
}

/// Liveness predicate shared by reads, sweeps, and stats.
pub fn is_live(
    expires_at: Option<DateTime<Utc>>,
    views: u64,
    max_views: Option<u64>,
    now: DateTime<Utc>,
) -> bool {
    !is_time_expired(expires_at, now) && !is_view_expired(views, max_views)
}
