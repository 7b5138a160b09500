//! # Trajectory ingestion
//!
//! High-level utilities to **build and extend** a [`TrajectorySet`] from CSV exports,
//! arbitrary readers, or in-memory columnar batches.
//!
//! ## Overview
//! -----------------
//! This module exposes the [`TrajectoryFile`] trait implemented for [`TrajectorySet`].
//! It provides:
//! - Constructors that **create** a new set from a given source (`new_from_*`),
//! - Appenders that **extend** an existing set (`add_from_*`).
//!
//! ## Ingestion sources & signatures
//! -----------------
//! **CSV file**
//! - [`TrajectoryFile::new_from_csv`] → `Result<Self, MoorageError>`
//! - [`TrajectoryFile::add_from_csv`] → `Result<LoadReport, MoorageError>`
//!
//! **Any reader** (in-memory buffer, decompressor, socket…)
//! - [`TrajectoryFile::new_from_reader`] → `Result<Self, MoorageError>`
//! - [`TrajectoryFile::add_from_reader`] → `Result<LoadReport, MoorageError>`
//!
//! **In-memory batches**
//! - [`TrajectoryFile::new_from_vec`] → `Result<Self, MoorageError>`
//! - [`TrajectoryFile::add_from_vec`] → `Result<(), MoorageError>`
//!   Expand an [`AisBatch`] row by row and group the points by MMSI.
//!
//! ## Duplicates & ordering
//! -----------------
//! Every `add_*` method leaves the touched trajectories sorted by timestamp and free of
//! duplicated timestamps. When a new report shares its timestamp with a point already in
//! the set, the **existing point is kept**.
//!
//! ## Error semantics
//! -----------------
//! - I/O, CSV framing and batch shape errors are propagated and leave the set untouched
//!   for the batch path, or partially untouched for readers (nothing is merged before the
//!   whole input was read).
//! - Malformed rows are skipped and counted in the [`LoadReport`].
//!
//! ## Example
//! -----------------
//! ```no_run
//! use camino::Utf8Path;
//! use moorage::TrajectorySet;
//! use moorage::ais_points::point_batch::AisBatch;
//! use moorage::trajectories::csv_reader::CsvLayout;
//! use moorage::trajectories::trajectory_file::TrajectoryFile;
//!
//! # fn demo() -> Result<(), moorage::moorage_errors::MoorageError> {
//! let layout = CsvLayout::default();
//! let mut trajs = TrajectorySet::new_from_csv(Utf8Path::new("aisdk-2023-01-01.csv"), &layout)?;
//! let report = trajs.add_from_csv(Utf8Path::new("aisdk-2023-01-02.csv"), &layout)?;
//! println!("{report}");
//!
//! let batch = AisBatch::from_owned(
//!     vec![219_000_001],
//!     vec![1_672_704_000],
//!     vec![10.0],
//!     vec![55.0],
//!     vec![0.0],
//!     vec![0.0],
//! );
//! trajs.add_from_vec(&batch)?;
//! # Ok(()) }
//! ```
//!
//! ## See also
//! ------------
//! * [`csv_reader`](crate::trajectories::csv_reader) – Row parsing and layout.
//! * [`StayDetection`](crate::trajectories::stay_batch::StayDetection) – Batch stay detection.
use std::fs::File;
use std::io;

use camino::Utf8Path;

use crate::ais_points::point_batch::AisBatch;
use crate::ais_points::AisPoint;
use crate::constants::{Mmsi, TrajectorySet};
use crate::moorage_errors::MoorageError;
use crate::trajectories::cleaning::clean_trajectory;
use crate::trajectories::csv_reader::{csv_to_trajset, CsvLayout, FastHashMap, LoadReport};

pub trait TrajectoryFile {
    /// Create a new [`TrajectorySet`] from an AIS CSV file.
    ///
    /// Arguments
    /// -----------------
    /// * `csv`: Path to the CSV file.
    /// * `layout`: Column positions and framing options.
    ///
    /// Return
    /// ----------
    /// * A new set, one trajectory per vessel, or the first I/O/CSV error.
    fn new_from_csv(csv: &Utf8Path, layout: &CsvLayout) -> Result<Self, MoorageError>
    where
        Self: Sized;

    /// Append the reports of an AIS CSV file to this set.
    ///
    /// Return
    /// ----------
    /// * The [`LoadReport`] of this file.
    fn add_from_csv(&mut self, csv: &Utf8Path, layout: &CsvLayout)
        -> Result<LoadReport, MoorageError>;

    /// Create a new set from any CSV byte source.
    fn new_from_reader<R: io::Read>(reader: R, layout: &CsvLayout) -> Result<Self, MoorageError>
    where
        Self: Sized;

    /// Append the rows of any CSV byte source to this set.
    fn add_from_reader<R: io::Read>(
        &mut self,
        reader: R,
        layout: &CsvLayout,
    ) -> Result<LoadReport, MoorageError>;

    /// Create a new set from a columnar [`AisBatch`].
    ///
    /// Arguments
    /// -----------------
    /// * `batch`: Parallel columns of reports, possibly mixing several vessels.
    ///
    /// Return
    /// ----------
    /// * `Err(MoorageError::BatchLengthMismatch)` if the columns differ in length.
    fn new_from_vec(batch: &AisBatch<'_>) -> Result<Self, MoorageError>
    where
        Self: Sized;

    /// Append a columnar [`AisBatch`] to this set.
    ///
    /// The batch is validated before anything is inserted, so a ragged batch leaves the
    /// set unchanged.
    fn add_from_vec(&mut self, batch: &AisBatch<'_>) -> Result<(), MoorageError>;
}

/// Group the rows of a validated batch per vessel and merge them into `trajectories`.
fn batch_to_trajset(
    trajectories: &mut TrajectorySet,
    batch: &AisBatch<'_>,
) -> Result<(), MoorageError> {
    batch.validate()?;

    let mut buckets: FastHashMap<Mmsi, Vec<AisPoint>> = FastHashMap::default();
    for point in batch.points() {
        buckets.entry(point.mmsi()).or_default().push(point);
    }

    let vessels = buckets.len();
    for (mmsi, points) in buckets {
        let trajectory = trajectories.entry(mmsi).or_default();
        trajectory.extend(points);
        *trajectory = clean_trajectory(std::mem::take(trajectory));
    }

    log::debug!("AIS batch: {} rows for {vessels} vessels", batch.len());
    Ok(())
}

impl TrajectoryFile for TrajectorySet {
    fn new_from_csv(csv: &Utf8Path, layout: &CsvLayout) -> Result<Self, MoorageError> {
        let mut trajs = TrajectorySet::new();
        trajs.add_from_csv(csv, layout)?;
        Ok(trajs)
    }

    fn add_from_csv(
        &mut self,
        csv: &Utf8Path,
        layout: &CsvLayout,
    ) -> Result<LoadReport, MoorageError> {
        log::info!("reading AIS reports from {csv}");
        let file = File::open(csv.as_std_path())?;
        csv_to_trajset(self, file, layout)
    }

    fn new_from_reader<R: io::Read>(reader: R, layout: &CsvLayout) -> Result<Self, MoorageError> {
        let mut trajs = TrajectorySet::new();
        csv_to_trajset(&mut trajs, reader, layout)?;
        Ok(trajs)
    }

    fn add_from_reader<R: io::Read>(
        &mut self,
        reader: R,
        layout: &CsvLayout,
    ) -> Result<LoadReport, MoorageError> {
        csv_to_trajset(self, reader, layout)
    }

    fn new_from_vec(batch: &AisBatch<'_>) -> Result<Self, MoorageError> {
        let mut traj_set = TrajectorySet::new();
        batch_to_trajset(&mut traj_set, batch)?;
        Ok(traj_set)
    }

    fn add_from_vec(&mut self, batch: &AisBatch<'_>) -> Result<(), MoorageError> {
        batch_to_trajset(self, batch)
    }
}
