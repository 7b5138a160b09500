//! # Stay segments
//!
//! A [`StaySegment`] is an **inclusive** index range `[start, end]` into the trajectory it
//! was detected in. It never copies points: [`StaySegment::points`] re-borrows the
//! matching sub-slice from the owning trajectory, which also makes the containment
//! property (a stay is a contiguous, unreordered sub-sequence) hold by construction.
//!
//! The same type describes the candidate windows visited by the segmenter
//! (see [`StayWindows`](crate::stay_detection::segmenter::StayWindows)); a window becomes a
//! stay once it passes the duration and point-count tests.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::ais_points::AisPoint;
use crate::constants::Timestamp;

/// Inclusive `[start, end]` index range into a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StaySegment {
    pub start: usize,
    pub end: usize,
}

impl StaySegment {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "segment start {start} past end {end}");
        StaySegment { start, end }
    }

    /// Number of points in the segment (`end - start + 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always `false`: a segment holds at least its start point.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Index distance between the last and the first point (`end - start`), the quantity
    /// compared against `min_points`.
    #[inline]
    pub fn index_span(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn range(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Borrow the points of this segment from the trajectory it was detected in.
    ///
    /// Panics
    /// ----------
    /// * If `trajectory` is shorter than `end + 1`, i.e. it is not the owning trajectory.
    #[inline]
    pub fn points<'a>(&self, trajectory: &'a [AisPoint]) -> &'a [AisPoint] {
        &trajectory[self.range()]
    }

    /// Elapsed time between the last and the first point, in trajectory time units.
    #[inline]
    pub fn duration(&self, trajectory: &[AisPoint]) -> Timestamp {
        trajectory[self.end].timestamp() - trajectory[self.start].timestamp()
    }
}

impl fmt::Display for StaySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..={}]", self.start, self.end)
    }
}
