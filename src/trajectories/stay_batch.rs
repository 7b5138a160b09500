//! # Batch stay detection over Trajectory Sets
//!
//! Run the stay segmenter over many trajectories, keep the vessels with at least one
//! stay, and expose helpers to query the results and summarize trajectory sizes.
//!
//! ## Overview
//! -----------------
//! * [`detect_all_stays`] – generic, sequential batch over any `(Mmsi, &[AisPoint])`
//!   sequence; results follow the input order.
//! * `par_detect_all_stays` *(feature `parallel`)* – same contract on rayon's pool.
//! * [`StayDetection`] – trait implemented on [`TrajectorySet`], adding cooperative
//!   cancellation, progress reporting (feature `progress`) and set-level statistics.
//!
//! ## Result Model
//! -----------------
//! A [`StayCollection`] is a `Vec<VesselStays>`:
//!
//! ```text
//! [ VesselStays { mmsi, trajectory: &[AisPoint], segments: [StaySegment, …] }, … ]
//! ```
//!
//! * outer order = trajectory processing order (ascending MMSI for a [`TrajectorySet`]),
//! * inner order = detection order inside the trajectory (left to right in time),
//! * vessels without any stay are omitted,
//! * segments are index ranges borrowed against the trajectory, no point is copied.
//!
//! ## Independence
//! -----------------
//! Each trajectory is processed on its own with the same [`StayParams`]; no state flows
//! from one vessel to the next. This is what makes the parallel variant equivalent to the
//! sequential one.
//!
//! ## Examples
//! -----------------
//! ```rust
//! use moorage::ais_points::AisPoint;
//! use moorage::stay_detection::StayParams;
//! use moorage::trajectories::stay_batch::detect_all_stays;
//!
//! let anchored: Vec<AisPoint> = (0..10)
//!     .map(|i| AisPoint::new(1, i * 300, 10.0, 55.0, 0.0, 0.0))
//!     .collect();
//! let transiting: Vec<AisPoint> = (0..10)
//!     .map(|i| AisPoint::new(2, i * 300, 10.0 + 0.05 * i as f64, 55.0, 12.0, 90.0))
//!     .collect();
//!
//! let stays = detect_all_stays(
//!     [(1, anchored.as_slice()), (2, transiting.as_slice())],
//!     &StayParams::default(),
//! );
//! assert_eq!(stays.len(), 1);
//! assert_eq!(stays[0].mmsi, 1);
//! ```
//!
//! ## See also
//! ------------
//! * [`StaySegmenter::detect_stays`] – Per-trajectory detection (called internally).
//! * [`StayParams`] – Thresholds shared by every trajectory of a batch.
use std::fmt;
use std::time::{Duration, Instant};

use crate::ais_points::AisPoint;
use crate::constants::{Mmsi, Timestamp, TrajectorySet};
use crate::stay_detection::segmenter::StaySegmenter;
use crate::stay_detection::stay_segment::StaySegment;
use crate::stay_detection::StayParams;
use crate::trajectories::progress_bar::BatchProgress;

/// Minimal wall-clock interval between two calls to the cancellation closure.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Stays detected in the trajectory of one vessel.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselStays<'a> {
    pub mmsi: Mmsi,
    /// The trajectory the segments index into.
    pub trajectory: &'a [AisPoint],
    /// Non-empty, in detection order.
    pub segments: Vec<StaySegment>,
}

/// Batch result: one entry per vessel with at least one stay, in processing order.
pub type StayCollection<'a> = Vec<VesselStays<'a>>;

impl<'a> VesselStays<'a> {
    /// Number of stay segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Points of each stay, borrowed from the trajectory.
    pub fn stay_points(&self) -> impl Iterator<Item = &'a [AisPoint]> + '_ {
        let trajectory = self.trajectory;
        self.segments.iter().map(move |s| s.points(trajectory))
    }

    /// Sum of the stay durations, in trajectory time units.
    pub fn total_stay_duration(&self) -> Timestamp {
        self.segments
            .iter()
            .map(|s| s.duration(self.trajectory))
            .sum()
    }
}

impl fmt::Display for VesselStays<'_> {
    /// One line per vessel by default; one extra line per stay with `{:#}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MMSI {}: {} stay(s), {} time units in total",
            self.mmsi,
            self.len(),
            self.total_stay_duration()
        )?;
        if f.alternate() {
            for (seg, points) in self.segments.iter().zip(self.stay_points()) {
                let (first, last) = (&points[0], &points[points.len() - 1]);
                write!(
                    f,
                    "\n  {seg} {} → {} ({} points) at lon {:.5}°, lat {:.5}°",
                    first.timestamp(),
                    last.timestamp(),
                    points.len(),
                    first.lon(),
                    first.lat()
                )?;
            }
        }
        Ok(())
    }
}

/// Borrow the stays of a given vessel, if it has any.
pub fn stays_for<'c, 'a>(all: &'c StayCollection<'a>, mmsi: Mmsi) -> Option<&'c VesselStays<'a>> {
    all.iter().find(|v| v.mmsi == mmsi)
}

/// Total number of stay segments across all vessels.
pub fn total_stay_segments(all: &StayCollection<'_>) -> usize {
    all.iter().map(VesselStays::len).sum()
}

/// Detect the stays of one trajectory, `None` when it has none.
fn vessel_stays<'a>(
    mmsi: Mmsi,
    trajectory: &'a [AisPoint],
    params: &StayParams,
) -> Option<VesselStays<'a>> {
    let segments = trajectory.detect_stays(params);
    if segments.is_empty() {
        None
    } else {
        Some(VesselStays {
            mmsi,
            trajectory,
            segments,
        })
    }
}

/// Detect stays in every trajectory and keep the vessels with at least one stay.
///
/// Arguments
/// -----------------
/// * `trajectories`: `(vessel, trajectory)` pairs, processed in iteration order.
/// * `params`: Thresholds applied to every trajectory.
///
/// Return
/// ----------
/// * A [`StayCollection`] preserving the relative input order of the kept vessels.
pub fn detect_all_stays<'a, I>(trajectories: I, params: &StayParams) -> StayCollection<'a>
where
    I: IntoIterator<Item = (Mmsi, &'a [AisPoint])>,
{
    trajectories
        .into_iter()
        .filter_map(|(mmsi, trajectory)| vessel_stays(mmsi, trajectory, params))
        .collect()
}

/// Parallel [`detect_all_stays`] on rayon's global pool.
///
/// Trajectories are independent, and rayon's ordered `collect` puts every result back at
/// the position of its input, so the output is identical to the sequential version.
#[cfg(feature = "parallel")]
pub fn par_detect_all_stays<'a>(
    trajectories: &[(Mmsi, &'a [AisPoint])],
    params: &StayParams,
) -> StayCollection<'a> {
    use rayon::prelude::*;

    trajectories
        .par_iter()
        .filter_map(|&(mmsi, trajectory)| vessel_stays(mmsi, trajectory, params))
        .collect()
}

/// Point counts per trajectory: extremes, median and 95th percentile (nearest rank).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointCountStats {
    pub trajectories: usize,
    pub min: usize,
    pub median: usize,
    pub p95: usize,
    pub max: usize,
}

impl PointCountStats {
    /// `None` when `counts` is empty.
    pub fn from_counts(mut counts: Vec<usize>) -> Option<Self> {
        counts.sort_unstable();
        let (&min, &max) = (counts.first()?, counts.last()?);
        let rank = |q: f64| counts[((counts.len() - 1) as f64 * q).round() as usize];
        Some(PointCountStats {
            trajectories: counts.len(),
            min,
            median: rank(0.5),
            p95: rank(0.95),
            max,
        })
    }
}

impl fmt::Display for PointCountStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} trajectories, points per trajectory: min {} / median {} / p95 {} / max {}",
            self.trajectories, self.min, self.median, self.p95, self.max
        )
    }
}

/// Sequential batch over `set`, asking `should_cancel` at most once per `poll_every`.
fn detect_with_cancel<'a, F>(
    set: &'a TrajectorySet,
    params: &StayParams,
    poll_every: Duration,
    mut should_cancel: F,
) -> StayCollection<'a>
where
    F: FnMut() -> bool,
{
    log::debug!(
        "detecting stays over {} trajectories ({} points) with {params}",
        set.len(),
        set.total_points()
    );

    let mut progress = BatchProgress::new(set.len());
    let mut results = StayCollection::new();
    let mut last_poll = Instant::now();

    for (&mmsi, trajectory) in set {
        if last_poll.elapsed() >= poll_every {
            if should_cancel() {
                log::info!(
                    "stay detection interrupted after {} vessels with stays",
                    results.len()
                );
                progress.interrupted();
                break;
            }
            last_poll = Instant::now();
        }

        if let Some(stays) = vessel_stays(mmsi, trajectory, params) {
            results.push(stays);
        }
        progress.tick();
    }

    progress.finish();
    log::debug!(
        "{} of {} vessels have at least one stay ({} stays)",
        results.len(),
        set.len(),
        total_stay_segments(&results)
    );
    results
}

pub trait StayDetection {
    /// Detect stays for **every trajectory** of the set.
    ///
    /// Vessels are processed one after the other in ascending MMSI order; those without
    /// any stay are left out of the result. With the `progress` feature a progress bar
    /// is rendered on stderr.
    ///
    /// Arguments
    /// -----------------
    /// * `params`: Thresholds applied to every trajectory.
    ///
    /// Return
    /// ----------
    /// * A [`StayCollection`] borrowing the trajectories of the set.
    fn detect_all_stays(&self, params: &StayParams) -> StayCollection<'_>;

    /// Same as [`detect_all_stays`](StayDetection::detect_all_stays) with cooperative
    /// cancellation.
    ///
    /// `should_cancel()` is polled on a wall-clock interval (20 ms) rather than on every
    /// trajectory, so its cost stays negligible. On cancellation the vessels already
    /// processed are returned.
    fn detect_all_stays_with_cancel<F>(
        &self,
        params: &StayParams,
        should_cancel: F,
    ) -> StayCollection<'_>
    where
        F: FnMut() -> bool;

    /// Parallel [`detect_all_stays`](StayDetection::detect_all_stays) (feature `parallel`).
    /// Output is identical to the sequential version.
    #[cfg(feature = "parallel")]
    fn par_detect_all_stays(&self, params: &StayParams) -> StayCollection<'_>;

    /// Total number of points across all trajectories.
    fn total_points(&self) -> usize;

    /// Number of distinct trajectories (vessels) in the set.
    fn number_of_trajectories(&self) -> usize;

    /// Distribution of the number of points per trajectory, `None` if the set is empty.
    fn point_count_stats(&self) -> Option<PointCountStats>;
}

impl StayDetection for TrajectorySet {
    fn detect_all_stays(&self, params: &StayParams) -> StayCollection<'_> {
        self.detect_all_stays_with_cancel(params, || false)
    }

    fn detect_all_stays_with_cancel<F>(
        &self,
        params: &StayParams,
        should_cancel: F,
    ) -> StayCollection<'_>
    where
        F: FnMut() -> bool,
    {
        detect_with_cancel(self, params, CANCEL_POLL_INTERVAL, should_cancel)
    }

    #[cfg(feature = "parallel")]
    fn par_detect_all_stays(&self, params: &StayParams) -> StayCollection<'_> {
        let pairs: Vec<(Mmsi, &[AisPoint])> = self
            .iter()
            .map(|(&mmsi, trajectory)| (mmsi, trajectory.as_slice()))
            .collect();
        par_detect_all_stays(&pairs, params)
    }

    #[inline]
    fn total_points(&self) -> usize {
        self.values().map(Vec::len).sum()
    }

    #[inline]
    fn number_of_trajectories(&self) -> usize {
        self.len()
    }

    fn point_count_stats(&self) -> Option<PointCountStats> {
        PointCountStats::from_counts(self.values().map(Vec::len).collect())
    }
}

#[cfg(test)]
mod test_stay_batch {
    use super::*;

    fn anchored(mmsi: Mmsi, n: i64) -> Vec<AisPoint> {
        (0..n)
            .map(|i| AisPoint::new(mmsi, i * 300, 10.0, 55.0, 0.0, 0.0))
            .collect()
    }

    fn transiting(mmsi: Mmsi, n: i64) -> Vec<AisPoint> {
        (0..n)
            .map(|i| AisPoint::new(mmsi, i * 300, 10.0 + 0.05 * i as f64, 55.0, 12.0, 90.0))
            .collect()
    }

    fn set() -> TrajectorySet {
        let mut set = TrajectorySet::new();
        set.insert(30, anchored(30, 12));
        set.insert(10, transiting(10, 8));
        set.insert(20, anchored(20, 10));
        set.insert(40, Vec::new());
        set
    }

    #[test]
    fn test_detect_all_stays_keeps_non_empty_in_order() {
        let set = set();
        let stays = set.detect_all_stays(&StayParams::default());
        let vessels: Vec<Mmsi> = stays.iter().map(|v| v.mmsi).collect();
        assert_eq!(vessels, vec![20, 30]);
        assert!(stays.iter().all(|v| !v.is_empty()));
        assert_eq!(total_stay_segments(&stays), 2);

        let v30 = stays_for(&stays, 30).unwrap();
        assert_eq!(v30.segments, vec![StaySegment::new(0, 11)]);
        assert_eq!(v30.total_stay_duration(), 11 * 300);
        assert!(stays_for(&stays, 10).is_none());
    }

    #[test]
    fn test_generic_batch_preserves_input_order() {
        let a = anchored(1, 10);
        let b = transiting(2, 10);
        let c = anchored(3, 10);
        let stays = detect_all_stays(
            [(3, c.as_slice()), (2, b.as_slice()), (1, a.as_slice())],
            &StayParams::default(),
        );
        let vessels: Vec<Mmsi> = stays.iter().map(|v| v.mmsi).collect();
        assert_eq!(vessels, vec![3, 1]);
    }

    #[test]
    fn test_stay_points_borrow_trajectory() {
        let set = set();
        let stays = set.detect_all_stays(&StayParams::default());
        let v20 = stays_for(&stays, 20).unwrap();
        let points: Vec<&[AisPoint]> = v20.stay_points().collect();
        assert_eq!(points.len(), 1);
        assert!(std::ptr::eq(points[0].as_ptr(), set[&20].as_ptr()));
    }

    fn anchored_fleet(vessels: Mmsi, points: i64) -> TrajectorySet {
        (1..=vessels)
            .map(|mmsi| (mmsi, anchored(mmsi, points)))
            .collect()
    }

    #[test]
    fn test_cancel_keeps_processed_prefix() {
        let set = anchored_fleet(10, 8);
        let params = StayParams::default();
        let full = set.detect_all_stays(&params);
        assert_eq!(full.len(), 10);

        // Polled before every vessel: three vessels go through, the fourth poll stops.
        let mut polls = 0;
        let partial = detect_with_cancel(&set, &params, Duration::ZERO, || {
            polls += 1;
            polls > 3
        });
        assert_eq!(polls, 4);
        assert_eq!(partial, full[..3]);

        let none = detect_with_cancel(&set, &params, Duration::ZERO, || true);
        assert!(none.is_empty());
    }

    #[test]
    fn test_cancel_after_poll_interval_on_large_set() {
        let set = anchored_fleet(20_000, 20);
        let params = StayParams::default();
        let full = set.detect_all_stays(&params);
        let partial = set.detect_all_stays_with_cancel(&params, || true);

        assert!(partial.len() < full.len());
        assert_eq!(partial, full[..partial.len()]);
        let vessels: Vec<Mmsi> = partial.iter().map(|v| v.mmsi).collect();
        assert!(vessels.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_set_statistics() {
        let set = set();
        assert_eq!(set.number_of_trajectories(), 4);
        assert_eq!(set.total_points(), 30);
        let stats = set.point_count_stats().unwrap();
        assert_eq!(
            stats,
            PointCountStats {
                trajectories: 4,
                min: 0,
                median: 10,
                p95: 12,
                max: 12
            }
        );
        assert_eq!(
            stats.to_string(),
            "4 trajectories, points per trajectory: min 0 / median 10 / p95 12 / max 12"
        );
        assert_eq!(PointCountStats::from_counts(vec![7]).map(|s| s.p95), Some(7));
        assert!(TrajectorySet::new().point_count_stats().is_none());
    }

    #[test]
    fn test_display() {
        let set = set();
        let stays = set.detect_all_stays(&StayParams::default());
        assert_eq!(
            stays[0].to_string(),
            "MMSI 20: 1 stay(s), 2700 time units in total"
        );
        let pretty = format!("{:#}", stays[0]);
        assert!(pretty.contains("[0..=9] 0 → 2700 (10 points)"));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let set = set();
        let params = StayParams::default();
        assert_eq!(set.par_detect_all_stays(&params), set.detect_all_stays(&params));
    }
}
