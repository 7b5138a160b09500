//! # CSV Reader for AIS Reports
//!
//! Ingestion of raw AIS position reports from delimited text into a [`TrajectorySet`].
//! Raw exports (e.g. the Danish Maritime Authority AIS archive) carry many more columns
//! than stay detection needs; the [`CsvLayout`] tells the reader where the six relevant
//! fields live.
//!
//! ## Overview
//! -----------------
//! The entry point is a crate-internal routine, [`csv_to_trajset`], used by the public
//! [`TrajectoryFile`](crate::trajectories::trajectory_file::TrajectoryFile) helpers. For
//! each record it:
//! 1. extracts the six fields ([`extract_ais_fields`]); incomplete rows are skipped,
//! 2. parses them into an [`AisPoint`] ([`parse_ais_point`]); malformed rows are skipped
//!    with a warning,
//! 3. buckets the point by MMSI.
//!
//! Each touched trajectory is then cleaned (duplicate timestamps dropped, first seen
//! wins, then sorted by time) and merged into the set.
//!
//! ## Timestamps
//! -----------------
//! * Integer values are taken verbatim (seconds since the Unix epoch, or any consistent unit).
//! * Other values are parsed with `hifitime` using [`CsvLayout::timestamp_format`]
//!   (default `%d/%m/%Y %H:%M:%S`, the DMA export format, read as **UTC**) and converted to
//!   Unix seconds.
//!
//! ## Error Handling
//! -----------------
//! * I/O and CSV framing errors abort the load and surface as [`MoorageError`].
//! * Row-level problems never abort: they are counted in the returned [`LoadReport`].

use std::collections::HashMap;
use std::fmt;
use std::io;

use ahash::RandomState;
use csv::StringRecord;
use hifitime::Epoch;

use crate::ais_points::AisPoint;
use crate::constants::{Mmsi, Timestamp, TrajectorySet};
use crate::moorage_errors::MoorageError;
use crate::trajectories::cleaning::{clean_trajectory, extract_ais_fields, AisFields};

pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;

/// Default textual timestamp format (Danish Maritime Authority exports).
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Position of the six AIS fields inside a raw CSV row, plus framing options.
///
/// The default layout reads `timestamp` from column 0, `mmsi` from 2, `latitude` from 3,
/// `longitude` from 4, `sog` from 6 and `cog` from 7, with a header line and `,` as
/// delimiter.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvLayout {
    pub has_headers: bool,
    pub delimiter: u8,
    pub timestamp: usize,
    pub mmsi: usize,
    pub latitude: usize,
    pub longitude: usize,
    pub sog: usize,
    pub cog: usize,
    /// `hifitime` format used when a timestamp is not a plain integer.
    /// `None` only accepts integer timestamps.
    pub timestamp_format: Option<String>,
}

impl Default for CsvLayout {
    fn default() -> Self {
        CsvLayout {
            has_headers: true,
            delimiter: b',',
            timestamp: 0,
            mmsi: 2,
            latitude: 3,
            longitude: 4,
            sog: 6,
            cog: 7,
            timestamp_format: Some(DEFAULT_TIMESTAMP_FORMAT.to_string()),
        }
    }
}

impl CsvLayout {
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_timestamp_format(mut self, format: Option<&str>) -> Self {
        self.timestamp_format = format.map(str::to_string);
        self
    }
}

/// Row accounting of one CSV load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows read (header excluded).
    pub rows_read: usize,
    /// Rows turned into an [`AisPoint`].
    pub rows_parsed: usize,
    /// Rows dropped because a field was missing or empty.
    pub rows_incomplete: usize,
    /// Rows dropped because a field could not be parsed.
    pub rows_invalid: usize,
    /// Points dropped because their vessel already had a report at that timestamp.
    pub duplicates_dropped: usize,
    /// Distinct vessels seen in this load.
    pub vessels: usize,
}

impl LoadReport {
    /// Points actually added to the set.
    pub fn points_kept(&self) -> usize {
        self.rows_parsed.saturating_sub(self.duplicates_dropped)
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows read, {} points kept for {} vessels ({} incomplete, {} invalid, {} duplicated timestamps)",
            self.rows_read,
            self.points_kept(),
            self.vessels,
            self.rows_incomplete,
            self.rows_invalid,
            self.duplicates_dropped
        )
    }
}

/// Parse a timestamp field: integer first, then the optional `hifitime` format.
///
/// Return
/// ----------
/// * Seconds since the Unix epoch for formatted values, the raw integer otherwise.
/// * `Err(MoorageError::InvalidTimestamp)` when neither interpretation works.
pub fn parse_timestamp(value: &str, format: Option<&str>) -> Result<Timestamp, MoorageError> {
    let value = value.trim();
    if let Ok(t) = value.parse::<Timestamp>() {
        return Ok(t);
    }
    let format = format.ok_or_else(|| MoorageError::InvalidTimestamp(value.to_string()))?;
    let epoch = Epoch::from_format_str(value, format)
        .map_err(|e| MoorageError::InvalidTimestamp(format!("{value} ({e})")))?;
    Ok(epoch.to_unix_seconds().round() as Timestamp)
}

fn parse_f64(field: &'static str, value: &str) -> Result<f64, MoorageError> {
    value
        .parse::<f64>()
        .map_err(|_| MoorageError::InvalidNumericField {
            field,
            value: value.to_string(),
        })
}

/// Build an [`AisPoint`] from extracted fields `[mmsi, timestamp, lon, lat, sog, cog]`.
pub fn parse_ais_point(
    fields: &AisFields<'_>,
    layout: &CsvLayout,
) -> Result<AisPoint, MoorageError> {
    let [mmsi, timestamp, lon, lat, sog, cog] = *fields;
    let mmsi = mmsi
        .parse::<Mmsi>()
        .map_err(|_| MoorageError::InvalidNumericField {
            field: "mmsi",
            value: mmsi.to_string(),
        })?;
    let timestamp = parse_timestamp(timestamp, layout.timestamp_format.as_deref())?;
    Ok(AisPoint::new(
        mmsi,
        timestamp,
        parse_f64("longitude", lon)?,
        parse_f64("latitude", lat)?,
        parse_f64("sog", sog)?,
        parse_f64("cog", cog)?,
    ))
}

/// Read AIS rows from `reader` and merge them into `trajectories`.
///
/// Arguments
/// -----------------
/// * `trajectories` – The set to extend; existing trajectories keep their points and
///   win over new reports at the same timestamp.
/// * `reader` – Any byte source (file, in-memory buffer, decompressor…).
/// * `layout` – Column positions and framing options.
///
/// Return
/// ----------
/// * A [`LoadReport`] describing what was kept and dropped.
/// * `Err(MoorageError::CsvError)` on I/O or framing errors.
pub(crate) fn csv_to_trajset<R: io::Read>(
    trajectories: &mut TrajectorySet,
    reader: R,
    layout: &CsvLayout,
) -> Result<LoadReport, MoorageError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(layout.has_headers)
        .delimiter(layout.delimiter)
        .flexible(true)
        .from_reader(reader);

    let mut report = LoadReport::default();
    let mut buckets: FastHashMap<Mmsi, Vec<AisPoint>> = FastHashMap::default();
    let mut record = StringRecord::new();

    while rdr.read_record(&mut record)? {
        report.rows_read += 1;

        let Some(fields) = extract_ais_fields(&record, layout) else {
            report.rows_incomplete += 1;
            continue;
        };

        match parse_ais_point(&fields, layout) {
            Ok(point) => {
                report.rows_parsed += 1;
                buckets.entry(point.mmsi()).or_default().push(point);
            }
            Err(err) => {
                report.rows_invalid += 1;
                let line = record.position().map_or(0, |p| p.line());
                log::warn!("skipping AIS row at line {line}: {err}");
            }
        }
    }

    report.vessels = buckets.len();
    for (mmsi, points) in buckets {
        let trajectory = trajectories.entry(mmsi).or_default();
        let incoming = points.len();

        // Points already in the set may carry their own duplicates; those are not drops of
        // this load, so the set side is cleaned before measuring.
        let mut merged = clean_trajectory(std::mem::take(trajectory));
        let before = merged.len();
        merged.extend(points);
        *trajectory = clean_trajectory(merged);

        report.duplicates_dropped += before + incoming - trajectory.len();
    }

    log::info!("AIS load: {report}");
    Ok(report)
}
