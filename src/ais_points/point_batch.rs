//! # Columnar AIS batches
//!
//! [`AisBatch`] holds AIS reports of **several vessels** as parallel columns, the layout
//! produced by dataframe-style upstream pipelines. Columns are stored as [`Cow`] so a
//! batch can either borrow existing buffers (zero-copy) or own them.
//!
//! A batch is expanded into [`AisPoint`]s row by row with [`AisBatch::points`] and is
//! consumed by [`TrajectoryFile::new_from_vec`](crate::trajectories::trajectory_file::TrajectoryFile::new_from_vec)
//! which groups the rows per vessel.
//!
//! Invariants
//! -----------------
//! * All six columns have the same length (checked by [`AisBatch::validate`]).
//! * Timestamps share one unit across the batch.

use std::borrow::Cow;

use crate::ais_points::AisPoint;
use crate::constants::{Degree, Mmsi, Timestamp};
use crate::moorage_errors::MoorageError;

/// Parallel columns of AIS reports, one row per report.
#[derive(Debug, Clone)]
pub struct AisBatch<'a> {
    pub mmsi: Cow<'a, [Mmsi]>,
    pub timestamp: Cow<'a, [Timestamp]>,
    /// Longitudes (**degrees**).
    pub lon: Cow<'a, [Degree]>,
    /// Latitudes (**degrees**).
    pub lat: Cow<'a, [Degree]>,
    pub sog: Cow<'a, [f64]>,
    /// Courses over ground (**degrees**).
    pub cog: Cow<'a, [Degree]>,
}

impl<'a> AisBatch<'a> {
    /// Construct a batch by **borrowing** the provided columns.
    ///
    /// No allocation and no validation is done here, call [`AisBatch::validate`]
    /// (or let the ingestion helpers do it) before expanding the rows.
    pub fn from_borrowed(
        mmsi: &'a [Mmsi],
        timestamp: &'a [Timestamp],
        lon: &'a [Degree],
        lat: &'a [Degree],
        sog: &'a [f64],
        cog: &'a [Degree],
    ) -> Self {
        AisBatch {
            mmsi: Cow::Borrowed(mmsi),
            timestamp: Cow::Borrowed(timestamp),
            lon: Cow::Borrowed(lon),
            lat: Cow::Borrowed(lat),
            sog: Cow::Borrowed(sog),
            cog: Cow::Borrowed(cog),
        }
    }

    /// Construct a batch that **owns** its columns.
    pub fn from_owned(
        mmsi: Vec<Mmsi>,
        timestamp: Vec<Timestamp>,
        lon: Vec<Degree>,
        lat: Vec<Degree>,
        sog: Vec<f64>,
        cog: Vec<Degree>,
    ) -> AisBatch<'static> {
        AisBatch {
            mmsi: Cow::Owned(mmsi),
            timestamp: Cow::Owned(timestamp),
            lon: Cow::Owned(lon),
            lat: Cow::Owned(lat),
            sog: Cow::Owned(sog),
            cog: Cow::Owned(cog),
        }
    }

    /// Number of rows, taken from the `mmsi` column.
    #[inline]
    pub fn len(&self) -> usize {
        self.mmsi.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mmsi.is_empty()
    }

    /// Check that every column has as many values as the `mmsi` column.
    ///
    /// Return
    /// ----------
    /// * `Err(MoorageError::BatchLengthMismatch)` naming the first offending column.
    pub fn validate(&self) -> Result<(), MoorageError> {
        let expected = self.len();
        let columns: [(&'static str, usize); 5] = [
            ("timestamp", self.timestamp.len()),
            ("lon", self.lon.len()),
            ("lat", self.lat.len()),
            ("sog", self.sog.len()),
            ("cog", self.cog.len()),
        ];
        for (column, found) in columns {
            if found != expected {
                return Err(MoorageError::BatchLengthMismatch {
                    column,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }

    /// Expand the rows into [`AisPoint`]s, in batch order.
    ///
    /// Rows past the shortest column are ignored; use [`AisBatch::validate`] first
    /// to reject ragged batches.
    pub fn points(&self) -> impl Iterator<Item = AisPoint> + '_ {
        self.mmsi
            .iter()
            .zip(self.timestamp.iter())
            .zip(self.lon.iter().zip(self.lat.iter()))
            .zip(self.sog.iter().zip(self.cog.iter()))
            .map(|(((&mmsi, &t), (&lon, &lat)), (&sog, &cog))| {
                AisPoint::new(mmsi, t, lon, lat, sog, cog)
            })
    }
}
