//! # Track Clean
//!
//! GPS track noise detection and pruning library.
//!
//! This library provides:
//! - Per-point positional deltas against the preceding sample
//! - Two-tier deviation classification (loose either-axis margin,
//!   strict both-axes margin)
//! - Pruning of sustained deviant runs while preserving path continuity
//! - A linked path representation that survives repeated pruning passes
//!
//! Deltas are raw coordinate differences, not great-circle distances:
//! the margins operate in degrees, directly on the recorded values.
//!
//! ## Quick Start
//!
//! ```rust
//! use trackclean::{PathValidator, ValidatorConfig};
//!
//! // Rows are (longitude, latitude, timestamp) triples in track order.
//! let rows = vec![
//!     vec![0.0, 0.0, 0.0],
//!     vec![0.002, 0.002, 1.0],
//!     vec![0.1, 0.1, 2.0],
//!     vec![0.101, 0.101, 3.0],
//! ];
//!
//! let mut validator = PathValidator::new(ValidatorConfig::default());
//! validator.load(&rows).unwrap();
//! assert_eq!(validator.count(), 4);
//!
//! let removed = validator.prune();
//! assert_eq!(validator.count(), 4 - removed);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{OptionExt, Result, TrackCleanError};

// Path points: deltas and deviation classification
pub mod path;
pub use path::{Delta, Deviance, DeviationRule, PathPoint};

// Path validation: chain assembly, classification, pruning
pub mod validator;
pub use validator::{ChainIter, PathValidator, ValidatorConfig};

// ============================================================================
// Core Types
// ============================================================================

/// A single timestamped sample on the map.
///
/// Field order mirrors the raw row layout: longitude, latitude,
/// timestamp. Nothing in this crate mutates a point after construction.
///
/// # Example
/// ```
/// use trackclean::TrackPoint;
/// let point = TrackPoint::new(-0.1278, 51.5074, 0.0); // London
/// assert_eq!(point.to_string(), "at 0: (51.50740,-0.12780)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub longitude: f64,
    pub latitude: f64,
    /// Sample time in seconds; integer and fractional inputs both land here.
    pub timestamp: f64,
}

impl TrackPoint {
    /// Create a new track point.
    pub fn new(longitude: f64, latitude: f64, timestamp: f64) -> Self {
        Self {
            longitude,
            latitude,
            timestamp,
        }
    }

    /// Build a point from one raw row of already-parsed numeric fields.
    ///
    /// External loaders guarantee the `(longitude, latitude, timestamp)`
    /// shape, but the constructor still validates it: a row must carry
    /// exactly 3 fields and every field must be finite. `line` is the
    /// 0-based row position, carried only for error context.
    pub fn from_row(row: &[f64], line: usize) -> Result<Self> {
        if row.len() != 3 {
            return Err(TrackCleanError::MalformedRow {
                line,
                found: row.len(),
            });
        }

        let fields = [
            ("longitude", row[0]),
            ("latitude", row[1]),
            ("timestamp", row[2]),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(TrackCleanError::NonFiniteField { line, field });
            }
        }

        Ok(Self::new(row[0], row[1], row[2]))
    }
}

impl fmt::Display for TrackPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "at {}: ({:.5},{:.5})",
            self.timestamp, self.latitude, self.longitude
        )
    }
}
