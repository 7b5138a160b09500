//! Detect stays in an AIS CSV export and print them per vessel.
//!
//! ```text
//! RUST_LOG=info cargo run --example detect_from_csv -- aisdk-2023-01-01.csv [params.json] [stays.csv]
//! ```
use std::env;
use std::path::PathBuf;
use std::time::Instant;

use camino::Utf8PathBuf;
use moorage::moorage_errors::MoorageError;
use moorage::trajectories::csv_reader::CsvLayout;
use moorage::trajectories::stay_batch::total_stay_segments;
use moorage::trajectories::stay_export::export_stay_points;
use moorage::{StayDetection, StayParams, TrajectoryFile, TrajectorySet};

fn utf8_arg(arg: std::ffi::OsString) -> Result<Utf8PathBuf, MoorageError> {
    Utf8PathBuf::from_path_buf(PathBuf::from(arg))
        .map_err(|p| MoorageError::Utf8PathError(format!("{} is not valid UTF-8", p.display())))
}

fn main() -> Result<(), MoorageError> {
    env_logger::init();

    let mut args = env::args_os().skip(1);
    let Some(csv) = args.next() else {
        eprintln!("usage: detect_from_csv <ais.csv> [stay_params.json] [stay_points.csv|.json]");
        std::process::exit(2);
    };
    let csv = utf8_arg(csv)?;
    let params = match args.next() {
        Some(json) => StayParams::from_json_file(&utf8_arg(json)?)?,
        None => StayParams::default(),
    };
    println!("{params:#}\n");

    let trajs = TrajectorySet::new_from_csv(&csv, &CsvLayout::default())?;
    if let Some(stats) = trajs.point_count_stats() {
        println!("{} vessels, {} points", trajs.number_of_trajectories(), trajs.total_points());
        println!("{stats}\n");
    }

    let start = Instant::now();
    let stays = trajs.detect_all_stays(&params);
    println!("Execution time: {} ms\n", start.elapsed().as_millis());
    for vessel in &stays {
        println!("{vessel:#}");
    }
    println!(
        "\n{} stays over {} vessels",
        total_stay_segments(&stays),
        stays.len()
    );

    if let Some(output) = args.next() {
        let output = utf8_arg(output)?;
        let rows = export_stay_points(&stays, &output)?;
        println!("{rows} stay points written to {output}");
    }
    Ok(())
}
