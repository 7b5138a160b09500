//! # Great-circle distance on a spherical Earth
//!
//! Distance between two geographic coordinates given as `(longitude, latitude)` in
//! **degrees**, returned in **meters** and rounded to the millimeter.
//!
//! The angular separation uses the `atan2` form of the great-circle formula
//! (special case of Vincenty's formula for a sphere):
//!
//! ```text
//! num = sqrt( (cos φ2 · sin Δλ)² + (cos φ1 · sin φ2 − sin φ1 · cos φ2 · cos Δλ)² )
//! den = sin φ1 · sin φ2 + cos φ1 · cos φ2 · cos Δλ
//! Δσ  = atan2(num, den)
//! d   = R · Δσ
//! ```
//!
//! It is well conditioned for both coincident and antipodal points, where the plain
//! arccosine law loses precision.
//!
//! No datum handling is performed: the Earth is a sphere of radius `R`
//! ([`EARTH_MAJOR_AXIS`] by default). Out-of-range latitudes/longitudes are not rejected.

use crate::constants::{Degree, Meter, DISTANCE_DECIMALS, EARTH_MAJOR_AXIS, RADEG};

/// Round a distance to [`DISTANCE_DECIMALS`] decimal places (millimeters).
#[inline]
fn round_distance(d: Meter) -> Meter {
    let scale = 10f64.powi(DISTANCE_DECIMALS);
    (d * scale).round() / scale
}

/// Great-circle distance (meters) between two `(longitude, latitude)` pairs in degrees.
///
/// Arguments
/// -----------------
/// * `from` – `(lon, lat)` of the first point, degrees.
/// * `to` – `(lon, lat)` of the second point, degrees.
/// * `earth_radius` – sphere radius in meters.
///
/// Return
/// ----------
/// * The distance in meters rounded to 3 decimals. `0.0` for identical inputs.
///
/// Example
/// -----------------
/// ```rust
/// use moorage::great_circle::great_circle_distance;
/// use moorage::constants::EARTH_MAJOR_AXIS;
///
/// let d = great_circle_distance((0.0, 0.0), (1.0, 0.0), EARTH_MAJOR_AXIS);
/// assert!((d - 111_319.491).abs() < 1e-3);
/// ```
pub fn great_circle_distance(
    from: (Degree, Degree),
    to: (Degree, Degree),
    earth_radius: Meter,
) -> Meter {
    let (lon1, lat1) = from;
    let (lon2, lat2) = to;

    let phi1 = lat1 * RADEG;
    let phi2 = lat2 * RADEG;
    let delta_lon = (lon1 - lon2) * RADEG;

    let (sin_phi1, cos_phi1) = phi1.sin_cos();
    let (sin_phi2, cos_phi2) = phi2.sin_cos();
    let (sin_dlon, cos_dlon) = delta_lon.sin_cos();

    let top_1 = cos_phi2 * sin_dlon;
    let top_2 = cos_phi1 * sin_phi2 - sin_phi1 * cos_phi2 * cos_dlon;
    let top = top_1.hypot(top_2);
    let bottom = sin_phi1 * sin_phi2 + cos_phi1 * cos_phi2 * cos_dlon;

    let delta_sigma = top.atan2(bottom);
    round_distance(delta_sigma * earth_radius)
}

/// [`great_circle_distance`] on the default sphere ([`EARTH_MAJOR_AXIS`]).
#[inline]
pub fn distance(from: (Degree, Degree), to: (Degree, Degree)) -> Meter {
    great_circle_distance(from, to, EARTH_MAJOR_AXIS)
}
