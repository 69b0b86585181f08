//! Groups a CSV export of field measurements into samples and prints a
//! per-station summary.
//!
//! Usage: `cargo run --example sample_report -- measurements.csv`

use std::env;
use waterspy::{create_parameter_timeseries, read_measurement_table, SampleKind, WaterspyError};

fn main() -> Result<(), WaterspyError> {
    env_logger::init();
    configure_polars_display();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "measurements.csv".to_string());

    let table = read_measurement_table(&path)?;
    let samples = create_parameter_timeseries(&table, SampleKind::Parameters)?;

    println!("{} from {}", samples, path);
    println!("Stations: {:?}", samples.unique_stations());
    println!("Parameters: {:?}", samples.unique_parameters());
    println!("{}", samples.statistics()?);

    if let Some(first) = samples.unique_parameters().first() {
        let filtered = samples.filter_samples().parameters(&[first.as_str()]).call()?;
        println!("{}", filtered.wide_ts()?);
    }

    Ok(())
}

fn configure_polars_display() {
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
