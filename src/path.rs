//! Path points: sequence-aware samples with deltas and deviation state.
//!
//! A [`PathPoint`] wraps a [`TrackPoint`] with awareness of its place in
//! the track: the signed positional change against its predecessor and
//! the outcome of the most recent deviation test. Neighbor links are
//! arena indices into the owning validator's point vector rather than
//! native references; the forward link carries the traversal chain while
//! the back-link exists only for delta computation and splicing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TrackPoint;

/// Signed positional change relative to the immediate predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub lat: f64,
    pub long: f64,
}

/// Rule for combining the two axis deltas into a single verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationRule {
    /// Deviant when either axis delta reaches the margin.
    Either,
    /// Deviant when both axis deltas reach the margin.
    Both,
}

/// Outcome of the most recent deviation test on a point.
///
/// The tag records which rule flagged the point, so callers can tell a
/// loose-margin hit apart from a strict-margin one. Only the latest
/// [`PathPoint::classify`] call's result is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deviance {
    /// Clean under the most recent test, or never tested.
    #[default]
    Clean,
    /// Flagged by the either-axis rule.
    EitherAxis,
    /// Flagged by the both-axes rule.
    BothAxes,
}

impl Deviance {
    /// Whether the point is currently considered deviant.
    pub fn is_deviant(&self) -> bool {
        !matches!(self, Deviance::Clean)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Deviance::Clean => "clean",
            Deviance::EitherAxis => "either_axis",
            Deviance::BothAxes => "both_axes",
        }
    }
}

impl fmt::Display for Deviance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sample that is part of a path and aware of its neighbors.
///
/// A point with no predecessor (the head of a chain) carries no delta
/// and can never be classified deviant. A point spliced out of the chain
/// keeps its readable fields, but both links are cleared.
#[derive(Debug, Clone, Serialize)]
pub struct PathPoint {
    #[serde(flatten)]
    point: TrackPoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    delta: Option<Delta>,
    #[serde(skip)]
    prev: Option<usize>,
    #[serde(skip)]
    next: Option<usize>,
    deviance: Deviance,
}

impl PathPoint {
    /// Create an unlinked point with no predecessor.
    pub fn new(point: TrackPoint) -> Self {
        Self {
            point,
            delta: None,
            prev: None,
            next: None,
            deviance: Deviance::Clean,
        }
    }

    /// Create a point following `prev`, computing its delta immediately.
    ///
    /// `prev_index` is the predecessor's position in the owning arena.
    pub fn after(point: TrackPoint, prev_index: usize, prev: &TrackPoint) -> Self {
        let mut path_point = Self::new(point);
        path_point.set_predecessor(prev_index, prev);
        path_point
    }

    /// Reassign the back-link and recompute both deltas from the new
    /// predecessor. Pruning uses this to keep the successor's deltas
    /// consistent after an intervening point is removed.
    pub fn set_predecessor(&mut self, prev_index: usize, prev: &TrackPoint) {
        self.delta = Some(Delta {
            lat: self.point.latitude - prev.latitude,
            long: self.point.longitude - prev.longitude,
        });
        self.prev = Some(prev_index);
    }

    /// Set the forward link. The target's own back-link is untouched.
    pub fn link_next(&mut self, index: usize) {
        self.next = Some(index);
    }

    /// Detach a spliced-out point from the chain. Its fields stay
    /// readable; the delta keeps its last computed value.
    pub(crate) fn unlink(&mut self) {
        self.prev = None;
        self.next = None;
    }

    /// Test this point's deltas against `margin` under `rule`.
    ///
    /// Overwrites the stored [`Deviance`] with this call's tagged outcome
    /// and returns whether the point was flagged. A point without a
    /// predecessor records `Clean` and returns `false` regardless of the
    /// margin.
    ///
    /// # Example
    /// ```
    /// use trackclean::{DeviationRule, PathPoint, TrackPoint};
    ///
    /// let start = TrackPoint::new(0.0, 0.0, 0.0);
    /// let mut point = PathPoint::after(TrackPoint::new(0.1, 0.0, 1.0), 0, &start);
    /// assert!(point.classify(0.05, DeviationRule::Either));
    /// assert!(!point.classify(0.05, DeviationRule::Both));
    /// ```
    pub fn classify(&mut self, margin: f64, rule: DeviationRule) -> bool {
        let delta = match self.delta {
            Some(delta) => delta,
            None => {
                self.deviance = Deviance::Clean;
                return false;
            }
        };

        let flagged = match rule {
            DeviationRule::Either => delta.lat.abs() >= margin || delta.long.abs() >= margin,
            DeviationRule::Both => delta.lat.abs() >= margin && delta.long.abs() >= margin,
        };

        self.deviance = match (flagged, rule) {
            (false, _) => Deviance::Clean,
            (true, DeviationRule::Either) => Deviance::EitherAxis,
            (true, DeviationRule::Both) => Deviance::BothAxes,
        };

        flagged
    }

    /// The underlying sample.
    pub fn point(&self) -> &TrackPoint {
        &self.point
    }

    /// Positional change against the predecessor; `None` for a point
    /// that never had one.
    pub fn delta(&self) -> Option<Delta> {
        self.delta
    }

    /// Arena index of the predecessor, if linked.
    pub fn prev(&self) -> Option<usize> {
        self.prev
    }

    /// Arena index of the successor, if linked.
    pub fn next(&self) -> Option<usize> {
        self.next
    }

    /// Most recent classification outcome.
    pub fn deviance(&self) -> Deviance {
        self.deviance
    }

    /// Whether the most recent classification flagged this point.
    pub fn is_deviant(&self) -> bool {
        self.deviance.is_deviant()
    }
}

impl fmt::Display for PathPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.point)?;
        if let Some(delta) = self.delta {
            write!(f, " change: ({:.3},{:.3})", delta.lat, delta.long)?;
        }
        if self.deviance.is_deviant() {
            write!(f, " deviant!")?;
        }
        Ok(())
    }
}
