//! # Stay detection
//!
//! Detection of **stay** episodes (anchoring, berthing, loitering) in a single vessel
//! trajectory, and the parameters that drive it.
//!
//! Modules
//! -----------------
//! * [`segmenter`] – Two-pointer scan producing candidate windows and stay segments.
//! * [`stay_segment`] – Index-range result type borrowed against the owning trajectory.
//!
//! A stay is a run of consecutive points that
//! 1. all lie strictly closer than `radius_threshold` to the **first** point of the run
//!    (the anchor), except the closing point of the window,
//! 2. spans strictly more than `duration_threshold` time units, and
//! 3. spans strictly more than `min_points` indices.
//!
//! See [`segmenter`] for the exact scan.

pub mod segmenter;
pub mod stay_segment;

use std::fmt;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::constants::{
    Meter, Timestamp, DEFAULT_DURATION_THRESHOLD, DEFAULT_MIN_POINTS, DEFAULT_RADIUS_THRESHOLD,
    EARTH_MAJOR_AXIS,
};
use crate::moorage_errors::MoorageError;

/// Configuration parameters for stay detection.
///
/// Fields
/// -----------------
/// * `radius_threshold` – maximum distance (m) from the anchor point for a point to stay
///   in the current cluster. The test is strict (`distance < radius_threshold`).
/// * `duration_threshold` – minimum elapsed time between the first and last point of a
///   candidate, in the unit of the trajectory timestamps. Strict (`>`).
/// * `min_points` – minimum index span (`end - start`) of a candidate. Strict (`>`).
/// * `earth_radius` – sphere radius (m) used by the great-circle distance.
///
/// Defaults
/// -----------------
/// * `radius_threshold`: 400 m
/// * `duration_threshold`: 1800 (30 min when timestamps are seconds)
/// * `min_points`: 5
/// * `earth_radius`: 6 378 137 m
///
/// Validation
/// -----------------
/// * `radius_threshold` finite and `> 0` (a non-positive radius never lets the scan advance),
/// * `duration_threshold >= 0`,
/// * `earth_radius` finite and `> 0`.
///
/// Parameters can be built in code with [`StayParams::builder`] or loaded from JSON with
/// [`StayParams::from_json_str`] / [`StayParams::from_json_file`]; missing JSON keys take
/// their default value and both paths go through the same validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StayParams {
    pub radius_threshold: Meter,
    pub duration_threshold: Timestamp,
    pub min_points: usize,
    pub earth_radius: Meter,
}

impl StayParams {
    /// Construct a new [`StayParams`] with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`StayParamsBuilder`] to override the defaults step by step.
    ///
    /// # Example
    ///
    /// ```rust
    /// use moorage::stay_detection::StayParams;
    ///
    /// let params = StayParams::builder()
    ///     .radius_threshold(250.0)
    ///     .duration_threshold(3600)
    ///     .min_points(10)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(params.min_points, 10);
    /// ```
    pub fn builder() -> StayParamsBuilder {
        StayParamsBuilder::new()
    }

    /// Parse and validate parameters from a JSON document.
    ///
    /// ```rust
    /// use moorage::stay_detection::StayParams;
    ///
    /// let params = StayParams::from_json_str(r#"{ "radius_threshold": 150.0 }"#).unwrap();
    /// assert_eq!(params.radius_threshold, 150.0);
    /// assert_eq!(params.duration_threshold, 1800);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, MoorageError> {
        let params: StayParams = serde_json::from_str(json)?;
        StayParamsBuilder { params }.build()
    }

    /// Read, parse and validate parameters from a JSON file.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, MoorageError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

impl Default for StayParams {
    fn default() -> Self {
        StayParams {
            radius_threshold: DEFAULT_RADIUS_THRESHOLD,
            duration_threshold: DEFAULT_DURATION_THRESHOLD,
            min_points: DEFAULT_MIN_POINTS,
            earth_radius: EARTH_MAJOR_AXIS,
        }
    }
}

/// Builder for [`StayParams`], with validation.
#[derive(Debug, Clone)]
pub struct StayParamsBuilder {
    params: StayParams,
}

impl Default for StayParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StayParamsBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            params: StayParams::default(),
        }
    }

    pub fn radius_threshold(mut self, v: Meter) -> Self {
        self.params.radius_threshold = v;
        self
    }
    pub fn duration_threshold(mut self, v: Timestamp) -> Self {
        self.params.duration_threshold = v;
        self
    }
    pub fn min_points(mut self, v: usize) -> Self {
        self.params.min_points = v;
        self
    }
    pub fn earth_radius(mut self, v: Meter) -> Self {
        self.params.earth_radius = v;
        self
    }

    #[inline]
    fn gt0(x: f64) -> bool {
        x.is_finite() && x > 0.0
    }

    /// Validate and return the parameters.
    pub fn build(self) -> Result<StayParams, MoorageError> {
        let p = &self.params;

        if !Self::gt0(p.radius_threshold) {
            return Err(MoorageError::InvalidStayParameter(
                "radius_threshold must be finite and > 0".into(),
            ));
        }
        if p.duration_threshold < 0 {
            return Err(MoorageError::InvalidStayParameter(
                "duration_threshold must be >= 0".into(),
            ));
        }
        if !Self::gt0(p.earth_radius) {
            return Err(MoorageError::InvalidStayParameter(
                "earth_radius must be finite and > 0".into(),
            ));
        }

        Ok(self.params)
    }
}

impl fmt::Display for StayParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Stay Detection Parameters")?;
            writeln!(f, "-------------------------")?;
            writeln!(f, "  radius_threshold   = {:.1} m", self.radius_threshold)?;
            writeln!(f, "  duration_threshold = {}", self.duration_threshold)?;
            writeln!(f, "  min_points         = {}", self.min_points)?;
            write!(f, "  earth_radius       = {:.1} m", self.earth_radius)
        } else {
            write!(
                f,
                "StayParams(radius={:.1} m, duration={}, min_points={}, earth_radius={:.1} m)",
                self.radius_threshold, self.duration_threshold, self.min_points, self.earth_radius
            )
        }
    }
}
