#![allow(dead_code)]

use moorage::constants::{Mmsi, Timestamp};
use moorage::AisPoint;

/// Reference position of the synthetic anchorages (Kattegat).
pub const ANCHOR: (f64, f64) = (10.0, 55.0);

/// Meters per degree of latitude on the default earth radius.
pub const METERS_PER_DEGREE: f64 = 111_319.491;

/// Position about `meters` to the north of [`ANCHOR`].
pub fn north_of_anchor(meters: f64) -> (f64, f64) {
    (ANCHOR.0, ANCHOR.1 + meters / METERS_PER_DEGREE)
}

pub fn report(mmsi: Mmsi, t: Timestamp, (lon, lat): (f64, f64)) -> AisPoint {
    AisPoint::new(mmsi, t, lon, lat, 0.1, 0.0)
}

/// `n` reports jittering within `jitter` meters of the anchor, `dt` apart.
pub fn anchored(mmsi: Mmsi, n: usize, dt: Timestamp, jitter: f64) -> Vec<AisPoint> {
    (0..n)
        .map(|i| {
            let offset = jitter * ((i % 3) as f64) / 2.0;
            report(mmsi, i as Timestamp * dt, north_of_anchor(offset))
        })
        .collect()
}

/// `n` reports moving north by `step` meters every `dt`.
pub fn steaming(mmsi: Mmsi, n: usize, dt: Timestamp, step: f64) -> Vec<AisPoint> {
    (0..n)
        .map(|i| report(mmsi, i as Timestamp * dt, north_of_anchor(step * i as f64)))
        .collect()
}
