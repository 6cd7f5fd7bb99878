//! # Temporal Types
//!
//! A UTC-only instant with millisecond precision. Challenge nonces are
//! minted and compared in milliseconds since the Unix epoch, while section
//! signature timestamps and every ledger timestamp are whole seconds; both
//! views are available from the same [`Timestamp`].
//!
//! The human-readable form rendered into challenge text is ISO 8601 with a
//! `Z` suffix, truncated to seconds: `YYYY-MM-DDTHH:MM:SSZ`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A UTC instant with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated to milliseconds.
    pub fn now() -> Self {
        let now = Utc::now();
        DateTime::from_timestamp_millis(now.timestamp_millis())
            .map(Self)
            .unwrap_or(Self(now))
    }

    /// Wrap a `chrono::DateTime<Utc>`, truncating to milliseconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        DateTime::from_timestamp_millis(dt.timestamp_millis())
            .map(Self)
            .unwrap_or(Self(dt))
    }

    /// Create a timestamp from milliseconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] if the value is outside
    /// chrono's representable range.
    pub fn from_unix_millis(millis: i64) -> Result<Self, ValidationError> {
        DateTime::from_timestamp_millis(millis)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidTimestamp(format!("{millis} ms out of range")))
    }

    /// Create a timestamp from whole seconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] if the value is outside
    /// chrono's representable range.
    pub fn from_unix_seconds(secs: i64) -> Result<Self, ValidationError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidTimestamp(format!("{secs} s out of range")))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Milliseconds since the Unix epoch.
    pub fn unix_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Whole seconds since the Unix epoch (floor).
    pub fn unix_seconds(&self) -> i64 {
        self.0.timestamp()
    }

    /// Render as ISO 8601 with Z suffix at seconds precision
    /// (e.g. `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}
