//! # Constants and type definitions for Moorage
//!
//! This module centralizes the **geophysical constants**, **unit conversions**, and
//! **common type definitions** used throughout the `moorage` crate.
//!
//! ## Overview
//!
//! - Spherical Earth radius used by the great-circle distance
//! - Default stay-detection thresholds
//! - Core type aliases (vessel identifier, timestamps, trajectories)
//!
//! The thresholds here are only *defaults*: every detection call receives its values
//! through [`StayParams`](crate::stay_detection::StayParams).

use std::collections::BTreeMap;

use crate::ais_points::AisPoint;

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Earth equatorial radius in meters (GRS1980/WGS84), used as the sphere radius
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Distances are normalized to millimeters (3 decimal places)
pub const DISTANCE_DECIMALS: i32 = 3;

// -------------------------------------------------------------------------------------------------
// Default stay-detection thresholds
// -------------------------------------------------------------------------------------------------

/// Default maximum distance (m) from the anchor point inside a stay
pub const DEFAULT_RADIUS_THRESHOLD: Meter = 400.0;

/// Default minimum stay duration, in trajectory time units (seconds)
pub const DEFAULT_DURATION_THRESHOLD: Timestamp = 1800;

/// Default minimum index span of a stay
pub const DEFAULT_MIN_POINTS: usize = 5;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in meters
pub type Meter = f64;
/// Seconds (or milliseconds) since the Unix epoch; the unit must be consistent within a trajectory
pub type Timestamp = i64;
/// Maritime Mobile Service Identity, the AIS vessel identifier
pub type Mmsi = u32;

/// Time-ordered reports of a single vessel.
pub type Trajectory = Vec<AisPoint>;

/// A full set of trajectories for multiple vessels.
///
/// The key is the [`Mmsi`] of the vessel, the value its time-ordered [`Trajectory`].
/// A `BTreeMap` keeps the iteration order (ascending MMSI) deterministic, which is the
/// order in which batch stay detection reports its results.
pub type TrajectorySet = BTreeMap<Mmsi, Trajectory>;
