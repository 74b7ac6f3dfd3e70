//! Unified error handling for track validation.
//!
//! All fallible operations in this crate return [`Result`], an alias over
//! [`TrackCleanError`]. Failures here are data or programmer errors, not
//! transient conditions: nothing retries.

use thiserror::Error;

/// Errors raised while loading or querying a track.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackCleanError {
    /// A raw row did not decompose into exactly 3 numeric fields.
    #[error("row {line}: expected 3 fields (longitude, latitude, timestamp), found {found}")]
    MalformedRow { line: usize, found: usize },

    /// A parsed field was NaN or infinite.
    #[error("row {line}: {field} is not a finite number")]
    NonFiniteField { line: usize, field: &'static str },

    /// A point was requested past the end of the loaded sequence.
    #[error("point index {index} out of bounds for a path of {len} points")]
    OutOfBounds { index: usize, len: usize },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TrackCleanError>;

/// Extension trait for converting `Option` into positional-access errors.
pub trait OptionExt<T> {
    /// Convert `None` into [`TrackCleanError::OutOfBounds`].
    fn ok_or_out_of_bounds(self, index: usize, len: usize) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_out_of_bounds(self, index: usize, len: usize) -> Result<T> {
        self.ok_or(TrackCleanError::OutOfBounds { index, len })
    }
}
