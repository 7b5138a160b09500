//! # Two-pointer stay segmentation
//!
//! Single left-to-right pass over a time-ordered trajectory with two indices `m <= n`:
//!
//! ```text
//! m = n = 0
//! while m + 1 < len:
//!     while dist(p[m], p[n]) < radius and n + 1 < len:
//!         n += 1
//!     if t[n] - t[m] > duration and n - m > min_points:
//!         emit [m, n]            (inclusive)
//!     m = n
//! ```
//!
//! The radius is always measured from the **anchor** `p[m]`, never from the previous
//! point. A vessel drifting slowly but staying inside the radius of the anchor therefore
//! stays in one cluster, and a brief excursion that comes back inside the radius closes
//! the window at the first point found outside.
//!
//! Candidate windows are exposed through the [`StayWindows`] iterator. Consecutive
//! windows share their boundary point (`next.start == previous.end`) and both indices are
//! non-decreasing over a run. [`detect_stays`] keeps the windows that pass both strict
//! tests (duration and point count).
//!
//! Complexity: `O(len)` distance evaluations, `O(1)` extra state besides the output.

use crate::ais_points::AisPoint;
use crate::stay_detection::stay_segment::StaySegment;
use crate::stay_detection::StayParams;

/// Iterator over the candidate windows `[m, n]` of one trajectory.
///
/// Each call to [`Iterator::next`] runs one iteration of the outer loop: it grows the
/// window from its anchor as long as points stay strictly inside the radius, yields it,
/// and restarts from the window end. The iterator is exhausted once fewer than two points
/// remain, so trajectories of 0 or 1 points yield nothing.
#[derive(Debug, Clone)]
pub struct StayWindows<'a> {
    points: &'a [AisPoint],
    params: &'a StayParams,
    m: usize,
    n: usize,
}

impl<'a> StayWindows<'a> {
    pub fn new(points: &'a [AisPoint], params: &'a StayParams) -> Self {
        StayWindows {
            points,
            params,
            m: 0,
            n: 0,
        }
    }

    /// Whether a candidate window qualifies as a stay: strictly longer than
    /// `duration_threshold` and strictly more than `min_points` indices.
    #[inline]
    pub fn is_stay(&self, window: &StaySegment) -> bool {
        window.duration(self.points) > self.params.duration_threshold
            && window.index_span() > self.params.min_points
    }
}

impl Iterator for StayWindows<'_> {
    type Item = StaySegment;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.points.len();
        if self.m + 1 >= len {
            return None;
        }

        let anchor = &self.points[self.m];
        let radius = self.params.radius_threshold;
        let earth_radius = self.params.earth_radius;

        while anchor.distance_to(&self.points[self.n], earth_radius) < radius
            && self.n + 1 < len
        {
            self.n += 1;
        }

        // The anchor is at distance 0 from itself, so `n` only stays on `m` when the
        // distance is NaN (non-finite coordinates). Step over it to keep the scan finite.
        if self.n == self.m {
            self.n += 1;
        }

        let window = StaySegment::new(self.m, self.n);
        self.m = self.n;
        Some(window)
    }
}

/// Segmentation of a trajectory into stays.
///
/// Implemented for `[AisPoint]`, so it is available on `Vec<AisPoint>`,
/// [`Trajectory`](crate::constants::Trajectory) and any slice of points.
pub trait StaySegmenter {
    /// Candidate windows visited by the scan, in order.
    fn stay_windows<'a>(&'a self, params: &'a StayParams) -> StayWindows<'a>;

    /// Detect the stay segments of this trajectory.
    ///
    /// Arguments
    /// -----------------
    /// * `params`: Thresholds of the radius, duration and point-count tests.
    ///
    /// Return
    /// ----------
    /// * The stays in detection order (left to right), possibly empty. Each
    ///   [`StaySegment`] indexes into `self`.
    ///
    /// Example
    /// -----------------
    /// ```rust
    /// use moorage::ais_points::AisPoint;
    /// use moorage::stay_detection::StayParams;
    /// use moorage::stay_detection::segmenter::StaySegmenter;
    ///
    /// // 10 reports at the same place, one every 5 minutes
    /// let trajectory: Vec<AisPoint> = (0..10)
    ///     .map(|i| AisPoint::new(100, i * 300, 10.0, 55.0, 0.0, 0.0))
    ///     .collect();
    ///
    /// let stays = trajectory.detect_stays(&StayParams::default());
    /// assert_eq!(stays.len(), 1);
    /// assert_eq!(stays[0].points(&trajectory).len(), 10);
    /// ```
    fn detect_stays(&self, params: &StayParams) -> Vec<StaySegment>;
}

impl StaySegmenter for [AisPoint] {
    fn stay_windows<'a>(&'a self, params: &'a StayParams) -> StayWindows<'a> {
        StayWindows::new(self, params)
    }

    fn detect_stays(&self, params: &StayParams) -> Vec<StaySegment> {
        let windows = self.stay_windows(params);
        let mut stays = Vec::new();
        for window in windows.clone() {
            if windows.is_stay(&window) {
                log::trace!(
                    "stay {window} of {} points over {} time units",
                    window.len(),
                    window.duration(self)
                );
                stays.push(window);
            }
        }
        stays
    }
}

/// Free-function form of [`StaySegmenter::detect_stays`].
pub fn detect_stays(trajectory: &[AisPoint], params: &StayParams) -> Vec<StaySegment> {
    trajectory.detect_stays(params)
}

#[cfg(test)]
mod test_segmenter {
    use super::*;
    use crate::constants::Timestamp;

    /// Offset of about `meters` to the north of (10°E, 55°N).
    fn north_of_anchor(meters: f64) -> (f64, f64) {
        (10.0, 55.0 + meters / 111_319.491)
    }

    fn point(t: Timestamp, (lon, lat): (f64, f64)) -> AisPoint {
        AisPoint::new(100, t, lon, lat, 0.0, 0.0)
    }

    fn stationary(n: i64, dt: Timestamp) -> Vec<AisPoint> {
        (0..n).map(|i| point(i * dt, north_of_anchor(0.0))).collect()
    }

    #[test]
    fn test_empty_and_single_point() {
        let params = StayParams::default();
        let empty: Vec<AisPoint> = Vec::new();
        assert!(empty.detect_stays(&params).is_empty());
        assert_eq!(empty.stay_windows(&params).count(), 0);

        let single = stationary(1, 0);
        assert!(single.detect_stays(&params).is_empty());
        assert_eq!(single.stay_windows(&params).count(), 0);
    }

    #[test]
    fn test_whole_trajectory_is_one_stay() {
        let params = StayParams::default();
        let traj = stationary(10, 300);
        let stays = traj.detect_stays(&params);
        assert_eq!(stays, vec![StaySegment::new(0, 9)]);
        assert_eq!(stays[0].points(&traj), &traj[..]);
    }

    #[test]
    fn test_window_closes_on_first_point_outside_radius() {
        let params = StayParams::default();
        let mut traj: Vec<AisPoint> = (0..8)
            .map(|i| point(i * 300, north_of_anchor(10.0 * i as f64)))
            .collect();
        // Leaves the anchorage, 5 km north
        traj.extend(
            (8..12).map(|i| point(i * 300, north_of_anchor(5_000.0 + 1_000.0 * i as f64))),
        );

        let windows: Vec<StaySegment> = traj.stay_windows(&params).collect();
        assert_eq!(windows[0], StaySegment::new(0, 8));

        // The closing point (index 8) belongs to the emitted window
        let stays = traj.detect_stays(&params);
        assert_eq!(stays, vec![StaySegment::new(0, 8)]);
    }

    #[test]
    fn test_radius_is_measured_from_anchor() {
        // Each step is 150 m, well below the radius, but the cumulated drift exceeds
        // 400 m from the anchor after the third step.
        let params = StayParams::builder()
            .duration_threshold(0)
            .min_points(0)
            .build()
            .unwrap();
        let traj: Vec<AisPoint> = (0..8)
            .map(|i| point(i * 600, north_of_anchor(150.0 * i as f64)))
            .collect();

        let windows: Vec<StaySegment> = traj.stay_windows(&params).collect();
        assert_eq!(windows[0], StaySegment::new(0, 3));
        assert_eq!(windows[1], StaySegment::new(3, 6));
        assert_eq!(windows[2], StaySegment::new(6, 7));
        assert_eq!(windows.len(), 3);
    }

    #[test]
    fn test_excursion_back_inside_radius_starts_new_window() {
        let params = StayParams::default();
        let mut traj: Vec<AisPoint> = (0..7)
            .map(|i| point(i * 400, north_of_anchor(20.0)))
            .collect();
        traj.push(point(2_800, north_of_anchor(2_000.0)));
        traj.extend((8..15).map(|i| point(i * 400, north_of_anchor(30.0))));

        let stays = traj.detect_stays(&params);
        // [0..=7] closes on the excursion point, [7..=8] is a 2-point hop,
        // then the vessel anchors again from index 8 to the end.
        assert_eq!(stays, vec![StaySegment::new(0, 7), StaySegment::new(8, 14)]);
    }

    #[test]
    fn test_duration_threshold_is_strict() {
        let traj = stationary(10, 200); // spans 1800
        let at_threshold = StayParams::builder()
            .duration_threshold(1800)
            .build()
            .unwrap();
        assert!(traj.detect_stays(&at_threshold).is_empty());

        let below_threshold = StayParams::builder()
            .duration_threshold(1799)
            .build()
            .unwrap();
        assert_eq!(traj.detect_stays(&below_threshold).len(), 1);
    }

    #[test]
    fn test_min_points_is_strict() {
        let traj = stationary(6, 1_000); // index span 5
        let params = StayParams::default();
        assert!(traj.detect_stays(&params).is_empty());

        let relaxed = StayParams::builder().min_points(4).build().unwrap();
        assert_eq!(traj.detect_stays(&relaxed), vec![StaySegment::new(0, 5)]);
    }

    #[test]
    fn test_duplicated_timestamps_are_zero_length() {
        let params = StayParams::default();
        let traj: Vec<AisPoint> = (0..10).map(|_| point(500, north_of_anchor(0.0))).collect();
        assert!(traj.detect_stays(&params).is_empty());
    }

    #[test]
    fn test_non_finite_coordinates_terminate() {
        let params = StayParams::default();
        let traj: Vec<AisPoint> = (0..5)
            .map(|i| point(i * 1_000, (f64::NAN, f64::NAN)))
            .collect();
        let windows: Vec<StaySegment> = traj.stay_windows(&params).collect();
        assert_eq!(windows.len(), 4);
        assert!(traj.detect_stays(&params).is_empty());
    }

    #[test]
    fn test_free_function_matches_trait() {
        let params = StayParams::default();
        let traj = stationary(12, 400);
        assert_eq!(detect_stays(&traj, &params), traj.detect_stays(&params));
    }
}
