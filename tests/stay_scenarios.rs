use moorage::ais_points::point_batch::AisBatch;
use moorage::constants::Timestamp;
use moorage::stay_detection::segmenter::StaySegmenter;
use moorage::trajectories::stay_batch::{stays_for, total_stay_segments};
use moorage::{
    detect_all_stays, AisPoint, StayDetection, StayParams, StaySegment, TrajectoryFile,
    TrajectorySet,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

mod common;
use common::{anchored, north_of_anchor, report, steaming};

/// Random walk around the anchor: short hops most of the time, with occasional jumps.
fn random_walk(seed: u64, n: usize) -> Vec<AisPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut t: Timestamp = 0;
    let mut north = 0.0;
    (0..n)
        .map(|_| {
            t += rng.random_range(10..600);
            north += if rng.random_bool(0.1) {
                rng.random_range(500.0..3_000.0)
            } else {
                rng.random_range(0.0..60.0)
            };
            report(42, t, north_of_anchor(north))
        })
        .collect()
}

#[test]
fn test_anchored_vessel_duration_boundary() {
    let params = StayParams::default();

    // 10 reports within 50 m, 200 s apart: spans exactly 1800 s
    let mut trajectory = anchored(100, 10, 200, 40.0);
    assert_eq!(trajectory[9].timestamp() - trajectory[0].timestamp(), 1800);
    assert!(trajectory.detect_stays(&params).is_empty());

    trajectory[9].set_timestamp(1801);
    let stays = trajectory.detect_stays(&params);
    assert_eq!(stays, vec![StaySegment::new(0, 9)]);
    assert_eq!(stays[0].points(&trajectory).len(), 10);
    assert_eq!(stays[0].duration(&trajectory), 1801);
}

#[test]
fn test_short_inputs_yield_nothing() {
    let params = StayParams::default();
    assert!(Vec::<AisPoint>::new().detect_stays(&params).is_empty());
    assert!(anchored(1, 1, 60, 0.0).detect_stays(&params).is_empty());
}

#[test]
fn test_two_vessels_only_qualifying_one_is_returned() {
    let params = StayParams::default();
    let steamer = steaming(2, 20, 60, 250.0);
    let anchored_vessel = anchored(1, 20, 300, 30.0);

    let stays = detect_all_stays(
        [(2, steamer.as_slice()), (1, anchored_vessel.as_slice())],
        &params,
    );
    assert_eq!(stays.len(), 1);
    assert_eq!(stays[0].mmsi, 1);
    assert_eq!(stays[0].segments, vec![StaySegment::new(0, 19)]);
}

#[test]
fn test_trajectory_set_from_batch() {
    let mut mmsi = Vec::new();
    let mut ts = Vec::new();
    let mut lon = Vec::new();
    let mut lat = Vec::new();
    // Interleaved rows of two vessels, the way a live feed delivers them
    for (a, b) in anchored(1, 12, 300, 30.0)
        .iter()
        .zip(steaming(2, 12, 300, 800.0).iter())
    {
        for p in [b, a] {
            mmsi.push(p.mmsi());
            ts.push(p.timestamp());
            lon.push(p.lon());
            lat.push(p.lat());
        }
    }
    let sog = vec![0.0; mmsi.len()];
    let cog = vec![0.0; mmsi.len()];
    let batch = AisBatch::from_borrowed(&mmsi, &ts, &lon, &lat, &sog, &cog);

    let set = TrajectorySet::new_from_vec(&batch).unwrap();
    assert_eq!(set.number_of_trajectories(), 2);
    assert_eq!(set.total_points(), 24);

    let stays = set.detect_all_stays(&StayParams::default());
    assert_eq!(total_stay_segments(&stays), 1);
    let vessel = stays_for(&stays, 1).unwrap();
    assert_eq!(vessel.total_stay_duration(), 11 * 300);
    assert!(stays_for(&stays, 2).is_none());
}

#[test]
fn test_detection_is_deterministic() {
    let params = StayParams::default();
    for seed in 0..5 {
        let trajectory = random_walk(seed, 300);
        assert_eq!(trajectory.detect_stays(&params), trajectory.detect_stays(&params));
    }
}

#[test]
fn test_windows_are_chained_and_monotonic() {
    let params = StayParams::default();
    for seed in 0..10 {
        let trajectory = random_walk(seed, 200);
        let windows: Vec<StaySegment> = trajectory.stay_windows(&params).collect();

        assert_eq!(windows[0].start, 0);
        assert_eq!(windows[windows.len() - 1].end, trajectory.len() - 1);
        for w in &windows {
            assert!(w.start < w.end);
        }
        for pair in windows.windows(2) {
            assert_eq!(pair[1].start, pair[0].end);
        }
    }
}

#[test]
fn test_stays_are_contiguous_and_within_radius() {
    let params = StayParams::default();
    for seed in 0..10 {
        let trajectory = random_walk(seed, 400);
        for stay in trajectory.detect_stays(&params) {
            let points = stay.points(&trajectory);
            assert_eq!(points, &trajectory[stay.start..=stay.end]);
            assert!(std::ptr::eq(points.as_ptr(), &trajectory[stay.start]));

            assert!(stay.duration(&trajectory) > params.duration_threshold);
            assert!(stay.index_span() > params.min_points);

            // Every point but the closing one lies strictly inside the anchor radius
            let anchor = &points[0];
            for p in &points[..points.len() - 1] {
                assert!(anchor.distance_to(p, params.earth_radius) < params.radius_threshold);
            }
        }
    }
}

#[test]
fn test_radius_is_anchored_not_chained() {
    // 110 m hops: every consecutive pair is close, but the vessel drifts away
    let params = StayParams::builder()
        .duration_threshold(0)
        .min_points(0)
        .build()
        .unwrap();
    let drifting = steaming(7, 12, 60, 110.0);
    let windows: Vec<StaySegment> = drifting.stay_windows(&params).collect();
    assert_eq!(
        windows,
        vec![
            StaySegment::new(0, 4),
            StaySegment::new(4, 8),
            StaySegment::new(8, 11)
        ]
    );
}
