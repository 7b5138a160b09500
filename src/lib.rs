//! # moorage
//!
//! Detection of **stays** (anchorage, mooring, loitering) in AIS vessel trajectories.
//!
//! A stay is a run of consecutive reports that remain within a radius of the first
//! report of the run, last strictly longer than a duration threshold and span strictly
//! more than a minimum number of reports.
//!
//! ```rust
//! use moorage::{AisPoint, StayParams, StaySegmenter};
//!
//! let trajectory: Vec<AisPoint> = (0..10)
//!     .map(|i| AisPoint::new(219_000_001, i * 300, 10.0, 55.0, 0.0, 0.0))
//!     .collect();
//! let stays = trajectory.detect_stays(&StayParams::default());
//! assert_eq!(stays.len(), 1);
//! ```
//!
//! Feature flags: `progress` (progress bar during batch detection) and `parallel`
//! (rayon-based batch detection).

pub mod ais_points;
pub mod constants;
pub mod great_circle;
pub mod moorage_errors;
pub mod stay_detection;
pub mod trajectories;

pub use crate::ais_points::AisPoint;
pub use crate::constants::TrajectorySet;
pub use crate::moorage_errors::MoorageError;
pub use crate::stay_detection::segmenter::{detect_stays, StaySegmenter};
pub use crate::stay_detection::stay_segment::StaySegment;
pub use crate::stay_detection::StayParams;
pub use crate::trajectories::stay_batch::{detect_all_stays, StayDetection, VesselStays};
pub use crate::trajectories::trajectory_file::TrajectoryFile;
