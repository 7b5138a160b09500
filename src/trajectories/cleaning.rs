//! # Cleaning of raw AIS rows
//!
//! Small, composable steps applied between the raw CSV record and a [`Trajectory`]:
//!
//! 1. [`extract_ais_fields`] picks the six fields used downstream out of a wider record,
//!    in the fixed order `[mmsi, timestamp, longitude, latitude, sog, cog]`.
//! 2. A row with any **missing or empty** field is discarded (`None`).
//! 3. [`drop_duplicated_time`] removes reports of one vessel sharing a timestamp with an
//!    earlier report; the first one seen wins.
//! 4. [`clean_trajectory`] chains de-duplication and a stable sort by timestamp.

use csv::StringRecord;
use itertools::Itertools;

use crate::ais_points::AisPoint;
use crate::constants::Trajectory;
use crate::trajectories::csv_reader::CsvLayout;

/// The six extracted fields, ordered `[mmsi, timestamp, longitude, latitude, sog, cog]`.
pub type AisFields<'r> = [&'r str; 6];

/// `true` when at least one field is empty (after trimming whitespace).
#[inline]
pub fn has_missing_field(fields: &[&str]) -> bool {
    fields.iter().any(|f| f.trim().is_empty())
}

/// Extract the six AIS fields of interest from a raw record.
///
/// Arguments
/// -----------------
/// * `record`: one raw CSV row.
/// * `layout`: column index of each field in the row.
///
/// Return
/// ----------
/// * `Some([mmsi, timestamp, longitude, latitude, sog, cog])` (trimmed) when every
///   column exists and is non-empty.
/// * `None` when the row is too short or any field is empty.
pub fn extract_ais_fields<'r>(
    record: &'r StringRecord,
    layout: &CsvLayout,
) -> Option<AisFields<'r>> {
    let pick = |idx: usize| record.get(idx).map(str::trim);
    let fields = [
        pick(layout.mmsi)?,
        pick(layout.timestamp)?,
        pick(layout.longitude)?,
        pick(layout.latitude)?,
        pick(layout.sog)?,
        pick(layout.cog)?,
    ];
    if has_missing_field(&fields) {
        None
    } else {
        Some(fields)
    }
}

/// Drop the reports whose timestamp was already seen, keeping the first occurrence and
/// the original order of the remaining points.
///
/// Intended for the points of **one vessel**; reports of different vessels may legally
/// share a timestamp.
pub fn drop_duplicated_time(points: Vec<AisPoint>) -> Vec<AisPoint> {
    points.into_iter().unique_by(AisPoint::timestamp).collect()
}

/// De-duplicate timestamps (first seen wins) then sort by time.
pub fn clean_trajectory(points: Vec<AisPoint>) -> Trajectory {
    let mut trajectory = drop_duplicated_time(points);
    trajectory.sort_by_key(AisPoint::timestamp);
    trajectory
}

#[cfg(test)]
mod test_cleaning {
    use super::*;

    fn layout() -> CsvLayout {
        CsvLayout::default()
    }

    #[test]
    fn test_extract_fields_reorders_columns() {
        // timestamp, type, mmsi, lat, lon, nav status, sog, cog, extra
        let record = StringRecord::from(vec![
            "1672531200", "Class A", "219000001", "55.5", "10.25", "Moored", "0.1", " 182.0 ", "x",
        ]);
        let fields = extract_ais_fields(&record, &layout()).unwrap();
        assert_eq!(fields, ["219000001", "1672531200", "10.25", "55.5", "0.1", "182.0"]);
    }

    #[test]
    fn test_extract_fields_rejects_missing_values() {
        let empty_sog = StringRecord::from(vec![
            "1672531200", "Class A", "219000001", "55.5", "10.25", "Moored", "", "182.0",
        ]);
        assert!(extract_ais_fields(&empty_sog, &layout()).is_none());

        let blank_lat = StringRecord::from(vec![
            "1672531200", "Class A", "219000001", "  ", "10.25", "Moored", "0.1", "182.0",
        ]);
        assert!(extract_ais_fields(&blank_lat, &layout()).is_none());

        let too_short = StringRecord::from(vec!["1672531200", "Class A", "219000001"]);
        assert!(extract_ais_fields(&too_short, &layout()).is_none());
    }

    #[test]
    fn test_has_missing_field() {
        assert!(!has_missing_field(&["a", "b"]));
        assert!(has_missing_field(&["a", ""]));
        assert!(has_missing_field(&[" ", "b"]));
    }

    #[test]
    fn test_drop_duplicated_time_keeps_first() {
        let points = vec![
            AisPoint::new(1, 10, 10.0, 55.0, 0.0, 0.0),
            AisPoint::new(1, 20, 10.1, 55.0, 0.0, 0.0),
            AisPoint::new(1, 10, 99.0, 99.0, 9.0, 9.0),
            AisPoint::new(1, 30, 10.2, 55.0, 0.0, 0.0),
            AisPoint::new(1, 20, 88.0, 88.0, 8.0, 8.0),
        ];
        let cleaned = drop_duplicated_time(points);
        let times: Vec<_> = cleaned.iter().map(AisPoint::timestamp).collect();
        assert_eq!(times, vec![10, 20, 30]);
        assert_eq!(cleaned[0].lon(), 10.0);
        assert_eq!(cleaned[1].lon(), 10.1);
    }

    #[test]
    fn test_clean_trajectory_sorts_after_dedup() {
        let points = vec![
            AisPoint::new(1, 30, 3.0, 0.0, 0.0, 0.0),
            AisPoint::new(1, 10, 1.0, 0.0, 0.0, 0.0),
            AisPoint::new(1, 30, 4.0, 0.0, 0.0, 0.0),
            AisPoint::new(1, 20, 2.0, 0.0, 0.0, 0.0),
        ];
        let cleaned = clean_trajectory(points);
        let lons: Vec<_> = cleaned.iter().map(AisPoint::lon).collect();
        assert_eq!(lons, vec![1.0, 2.0, 3.0]);
    }
}
