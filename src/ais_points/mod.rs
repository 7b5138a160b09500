//! # AIS position reports
//!
//! [`AisPoint`] is the atomic sample of a vessel trajectory: one AIS position report
//! reduced to the six fields used by stay detection (vessel identifier, timestamp,
//! longitude, latitude, speed over ground, course over ground).
//!
//! Points are value objects. Only the timestamp can be rewritten after construction
//! (through [`AisPoint::set_timestamp`]), which lets upstream cleaning normalize time
//! units; everything downstream reads points through shared slices.
//!
//! Modules
//! -----------------
//! * [`point_batch`] – Columnar, zero-copy container to build many points at once.

pub mod point_batch;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Meter, Mmsi, Timestamp};
use crate::great_circle::great_circle_distance;

/// A single AIS report of a vessel.
///
/// # Fields
///
/// * `mmsi` - The vessel identifier
/// * `timestamp` - Report time since the Unix epoch (seconds, or milliseconds if consistent)
/// * `lon` - Longitude in degrees, signed
/// * `lat` - Latitude in degrees, signed
/// * `sog` - Speed over ground (knots in AIS feeds)
/// * `cog` - Course over ground in degrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AisPoint {
    mmsi: Mmsi,
    timestamp: Timestamp,
    lon: Degree,
    lat: Degree,
    sog: f64,
    cog: Degree,
}

impl AisPoint {
    /// Create a new AIS point
    ///
    /// Arguments
    /// ---------
    /// * `mmsi`: the vessel identifier
    /// * `timestamp`: the report time
    /// * `lon`: the longitude in degrees
    /// * `lat`: the latitude in degrees
    /// * `sog`: the speed over ground
    /// * `cog`: the course over ground in degrees
    ///
    /// Return
    /// ------
    /// * a new AisPoint struct, no validation is performed on the values
    pub fn new(
        mmsi: Mmsi,
        timestamp: Timestamp,
        lon: Degree,
        lat: Degree,
        sog: f64,
        cog: Degree,
    ) -> Self {
        AisPoint {
            mmsi,
            timestamp,
            lon,
            lat,
            sog,
            cog,
        }
    }

    pub fn mmsi(&self) -> Mmsi {
        self.mmsi
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Rewrite the report time (e.g. after a unit conversion in a cleaning stage).
    pub fn set_timestamp(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    pub fn lon(&self) -> Degree {
        self.lon
    }

    pub fn lat(&self) -> Degree {
        self.lat
    }

    pub fn sog(&self) -> f64 {
        self.sog
    }

    pub fn cog(&self) -> Degree {
        self.cog
    }

    /// `(longitude, latitude)` in degrees, the argument order of
    /// [`great_circle_distance`].
    #[inline]
    pub fn position(&self) -> (Degree, Degree) {
        (self.lon, self.lat)
    }

    /// Great-circle distance in meters to another point on a sphere of radius `earth_radius`.
    ///
    /// See also
    /// ------------
    /// * [`great_circle_distance`] – The underlying formula.
    #[inline]
    pub fn distance_to(&self, other: &AisPoint, earth_radius: Meter) -> Meter {
        great_circle_distance(self.position(), other.position(), earth_radius)
    }
}

impl fmt::Display for AisPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MMSI {} @ {} (lon {:.6}°, lat {:.6}°) sog={:.1} cog={:.1}°",
            self.mmsi, self.timestamp, self.lon, self.lat, self.sog, self.cog
        )
    }
}
