//! # Trajectories: ingestion, storage, and batch stay detection
//!
//! High-level facilities to **ingest**, **store**, and **process** AIS reports grouped by
//! vessel. The central type is [`TrajectorySet`], an ordered map that buckets time-ordered
//! [`AisPoint`](crate::ais_points::AisPoint)s per [`Mmsi`](crate::constants::Mmsi).
//!
//! Modules
//! -----------------
//! * [`csv_reader`](crate::trajectories::csv_reader) – CSV ingestion of raw AIS rows with a configurable column layout.
//! * [`cleaning`](crate::trajectories::cleaning) – Field extraction, missing-field filtering and per-vessel
//!   timestamp de-duplication.
//! * [`trajectory_file`](crate::trajectories::trajectory_file) – **Public** trait exposing `new_from_*` and `add_from_*`
//!   helpers to construct/extend a [`TrajectorySet`] from CSV files, readers or columnar batches.
//! * [`stay_batch`](crate::trajectories::stay_batch) – Batch stay detection over a set (`StayDetection` trait,
//!   result types and statistics).
//! * [`stay_export`](crate::trajectories::stay_export) – CSV/JSON export of the detected stay points.
//! * *(crate-private)* `progress_bar` – Optional progress UI when the `progress` feature is enabled.
//!
//! Data Model
//! -----------------
//! * **Key:** [`Mmsi`](crate::constants::Mmsi) (vessel identifier).
//! * **Value:** [`Trajectory`](crate::constants::Trajectory) = `Vec<AisPoint>`, time-ordered per vessel.
//! * **Set:** [`TrajectorySet`] = `BTreeMap<Mmsi, Trajectory>`; batch detection walks it in
//!   ascending MMSI order, so results are reproducible run to run.
//!
//! Cleaning guarantees
//! -----------------
//! Every ingestion path leaves each trajectory:
//! * free of rows with a missing field,
//! * free of duplicated timestamps (the first report seen wins),
//! * sorted by timestamp (stable, so equal keys keep their arrival order).
//!
//! Feature Flags
//! -----------------
//! * `progress` – live progress bar and iteration timing during batch detection.
//! * `parallel` – rayon-based batch detection preserving input order.
//!
//! Quick-Start
//! -----------------
//! ```rust,no_run
//! use camino::Utf8Path;
//! use moorage::TrajectorySet;
//! use moorage::stay_detection::StayParams;
//! use moorage::trajectories::csv_reader::CsvLayout;
//! use moorage::trajectories::trajectory_file::TrajectoryFile;
//! use moorage::trajectories::stay_batch::StayDetection;
//!
//! # fn run() -> Result<(), moorage::moorage_errors::MoorageError> {
//! let trajs = TrajectorySet::new_from_csv(Utf8Path::new("aisdk.csv"), &CsvLayout::default())?;
//! let stays = trajs.detect_all_stays(&StayParams::default());
//! for vessel in &stays {
//!     println!("{vessel}");
//! }
//! # Ok(()) }
//! ```

pub mod cleaning;
pub mod csv_reader;
pub(crate) mod progress_bar;
pub mod stay_batch;
pub mod stay_export;
pub mod trajectory_file;

pub use crate::constants::TrajectorySet;
