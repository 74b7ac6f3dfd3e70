//! Path validation: chain assembly, two-tier classification, pruning.
//!
//! [`PathValidator`] owns the full ordered sequence of points as an
//! arena (`Vec<PathPoint>` plus a head index). Loading builds the linked
//! chain in input order and classifies each point as it is constructed;
//! pruning splices out sustained deviant runs while relinking survivors
//! so the chain stays a single forward traversal from head to tail.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{OptionExt, Result};
use crate::path::{DeviationRule, PathPoint};
use crate::TrackPoint;

/// Deviation margins used for error checking.
///
/// Margins are compared against the absolute per-axis deltas, in the
/// same units as the input coordinates (degrees for GPS tracks).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Loose margin: a point is deviant when either axis delta reaches
    /// this. Catches obviously erratic single-axis jumps cheaply.
    /// Default: 0.005
    pub d_or: f64,

    /// Strict margin: a point is deviant when both axis deltas reach
    /// this together. Only consulted when the loose test comes back
    /// clean. Default: 0.01
    pub d_and: f64,

    /// Reserved margin for a "returns close enough to the path" check.
    /// Accepted in configuration but not applied anywhere yet.
    /// Default: None
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_delta: Option<f64>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            d_or: 0.005,
            d_and: 0.01,
            min_delta: None,
        }
    }
}

/// Validator for ordered GPS track data.
///
/// Owns the point chain. Re-running [`load`](Self::load) replaces the
/// previous track; [`prune`](Self::prune) may be invoked any number of
/// times against the loaded chain.
#[derive(Debug, Default)]
pub struct PathValidator {
    points: Vec<PathPoint>,
    head: Option<usize>,
    config: ValidatorConfig,
}

impl PathValidator {
    /// Create a validator with the given margins.
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            points: Vec::new(),
            head: None,
            config,
        }
    }

    /// Convenience constructor taking just the two margins.
    pub fn with_margins(d_or: f64, d_and: f64) -> Self {
        Self::new(ValidatorConfig {
            d_or,
            d_and,
            ..ValidatorConfig::default()
        })
    }

    /// Current margin configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Load an ordered sequence of raw `(longitude, latitude, timestamp)`
    /// rows, replacing any previously loaded track.
    ///
    /// Row 0 becomes the head of the chain. Every later point is linked
    /// to its predecessor, its deltas are computed, and it is classified
    /// immediately: first against the loose `d_or` margin under the
    /// either-axis rule, then — only when that comes back clean —
    /// against the strict `d_and` margin under the both-axes rule.
    ///
    /// The whole load aborts on the first malformed row; a skipped row
    /// would silently desynchronize timestamps from the physical track.
    /// On error the validator keeps its previous contents.
    ///
    /// Returns the number of points loaded.
    pub fn load(&mut self, rows: &[Vec<f64>]) -> Result<usize> {
        info!("loading {} points", rows.len());

        let mut points: Vec<PathPoint> = Vec::with_capacity(rows.len());
        for (line, row) in rows.iter().enumerate() {
            let point = TrackPoint::from_row(row, line)?;
            let path_point = match points.last() {
                None => PathPoint::new(point),
                Some(prev) => PathPoint::after(point, points.len() - 1, prev.point()),
            };
            points.push(path_point);

            let index = points.len() - 1;
            if index > 0 {
                points[index - 1].link_next(index);
                // only test the strict rule when the loose test is clean
                if !points[index].classify(self.config.d_or, DeviationRule::Either) {
                    points[index].classify(self.config.d_and, DeviationRule::Both);
                }
            }
            debug!("{} {}", index, points[index]);
        }

        self.head = if points.is_empty() { None } else { Some(0) };
        self.points = points;
        Ok(self.points.len())
    }

    /// Remove invalid points in a single pass from head to tail.
    ///
    /// A point is invalid iff it has both a predecessor and a successor,
    /// it is deviant, and its immediate successor is deviant too: a lone
    /// deviant sample is tolerated as a noise spike, but the first point
    /// of a sustained jump is removed. Removal splices the point out and
    /// recomputes the successor's deltas against the new predecessor;
    /// deviance flags are not re-evaluated. Traversal continues at the
    /// relinked successor, so one pass leaves no removable pair. The
    /// head and tail are never removed.
    ///
    /// Returns the number of points removed.
    pub fn prune(&mut self) -> usize {
        let mut removed = 0;
        let mut cursor = self.head;

        while let Some(index) = cursor {
            let prev = self.points[index].prev();
            let next = self.points[index].next();

            match (prev, next) {
                (Some(prev), Some(succ))
                    if self.points[index].is_deviant() && self.points[succ].is_deviant() =>
                {
                    let prev_point = *self.points[prev].point();
                    self.points[prev].link_next(succ);
                    self.points[succ].set_predecessor(prev, &prev_point);
                    self.points[index].unlink();
                    debug!("removed {} {}", index, self.points[index]);
                    removed += 1;
                    cursor = Some(succ);
                }
                _ => cursor = next,
            }
        }

        if removed > 0 {
            info!("pruned {} deviant points", removed);
        }
        removed
    }

    /// Repeat [`prune`](Self::prune) until a pass removes nothing.
    ///
    /// Returns the total number of points removed across all passes.
    pub fn prune_to_fixed_point(&mut self) -> usize {
        let mut total = 0;
        loop {
            let removed = self.prune();
            if removed == 0 {
                return total;
            }
            total += removed;
        }
    }

    /// Number of points reachable by walking the chain from the head.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Whether no track is loaded.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Access a point by its original load position.
    ///
    /// Spliced-out points remain readable here — their fields are
    /// intact, only their links are cleared. Requesting a position past
    /// the end of the loaded sequence fails rather than returning a
    /// default point.
    pub fn point(&self, index: usize) -> Result<&PathPoint> {
        let len = self.points.len();
        self.points.get(index).ok_or_out_of_bounds(index, len)
    }

    /// Iterate over the live chain from head to tail.
    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter {
            points: &self.points,
            cursor: self.head,
        }
    }
}

/// Forward traversal over the live chain, head to tail.
pub struct ChainIter<'a> {
    points: &'a [PathPoint],
    cursor: Option<usize>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a PathPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let point = &self.points[index];
        self.cursor = point.next();
        Some(point)
    }
}
