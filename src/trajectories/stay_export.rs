//! # Export of detected stays
//!
//! Flattens a [`StayCollection`] into one [`StayPointRecord`] per point of every stay, the
//! shape a plotting or GIS tool consumes (scatter of stay positions over a basemap).
//!
//! Writers
//! -----------------
//! * [`write_stay_points_csv`] – header + one CSV row per record.
//! * [`write_stay_points_json`] – a JSON array of records.
//! * [`export_stay_points`] – file helper choosing the writer from the extension
//!   (`.json`, anything else is CSV).
//!
//! Records follow the collection order: vessels in processing order, then stays in
//! detection order, then points in time order. `stay` numbers the stays of one vessel
//! from 0.

use std::fs::File;
use std::io::{self, BufWriter};

use camino::Utf8Path;
use serde::Serialize;

use crate::constants::{Degree, Mmsi, Timestamp};
use crate::moorage_errors::MoorageError;
use crate::trajectories::stay_batch::StayCollection;

/// One point of one stay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StayPointRecord {
    pub mmsi: Mmsi,
    /// Index of the stay among the stays of this vessel.
    pub stay: usize,
    pub timestamp: Timestamp,
    pub lon: Degree,
    pub lat: Degree,
    pub sog: f64,
    pub cog: Degree,
}

/// Flatten `stays` into owned records, lazily.
pub fn stay_point_records<'a>(
    stays: &'a StayCollection<'a>,
) -> impl Iterator<Item = StayPointRecord> + 'a {
    stays.iter().flat_map(|vessel| {
        vessel
            .stay_points()
            .enumerate()
            .flat_map(move |(stay, points)| {
                points.iter().map(move |p| StayPointRecord {
                    mmsi: vessel.mmsi,
                    stay,
                    timestamp: p.timestamp(),
                    lon: p.lon(),
                    lat: p.lat(),
                    sog: p.sog(),
                    cog: p.cog(),
                })
            })
    })
}

/// Write the stay points as CSV (with a header line).
///
/// Return
/// ----------
/// * The number of data rows written.
pub fn write_stay_points_csv<W: io::Write>(
    stays: &StayCollection<'_>,
    writer: W,
) -> Result<usize, MoorageError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for record in stay_point_records(stays) {
        wtr.serialize(record)?;
        rows += 1;
    }
    wtr.flush()?;
    Ok(rows)
}

/// Write the stay points as a JSON array.
pub fn write_stay_points_json<W: io::Write>(
    stays: &StayCollection<'_>,
    writer: W,
) -> Result<usize, MoorageError> {
    let records: Vec<StayPointRecord> = stay_point_records(stays).collect();
    serde_json::to_writer_pretty(writer, &records)?;
    Ok(records.len())
}

/// Write the stay points to `path`, as JSON for a `.json` extension and CSV otherwise.
pub fn export_stay_points(
    stays: &StayCollection<'_>,
    path: &Utf8Path,
) -> Result<usize, MoorageError> {
    let file = BufWriter::new(File::create(path.as_std_path())?);
    let rows = match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("json") => write_stay_points_json(stays, file)?,
        _ => write_stay_points_csv(stays, file)?,
    };
    log::info!("exported {rows} stay points to {path}");
    Ok(rows)
}
