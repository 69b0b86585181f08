//! Uploads a day of hourly pressure readings for a logger and reads them back.
//!
//! Expects a configuration file in the platform config directory, e.g.
//! `~/.config/waterspy/config.json` with at least `{"base_url": "..."}`.

use chrono::{Duration, TimeZone, Utc};
use waterspy::{
    get_groundwater_logger, ClientConfig, LoggerMeasurement, TimeSeries, WaterspyError,
    WatersyncClient,
};

fn main() -> Result<(), WaterspyError> {
    env_logger::init();

    let config = ClientConfig::load_default()?;
    let mut client = WatersyncClient::from_config(&config);
    client.login(None, None)?;

    let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let readings = TimeSeries::from_pairs(
        (0..24).map(|hour| (start + Duration::hours(hour), 1030.0 + hour as f64 * 0.25)),
    );

    let measurement = LoggerMeasurement {
        timeseries: readings,
        station: "PZ01".to_string(),
        logger: "AB123".to_string(),
        measurement_type: "pressure".to_string(),
        unit: "cmH2O".to_string(),
        logger_altitude: None,
    };
    measurement.upload(&client)?;

    let fetched = get_groundwater_logger()
        .client(&client)
        .station("PZ01")
        .measurement_type("pressure")
        .timestamp_start(start)
        .call()?;

    match fetched {
        Some(series) => println!("{}\n{}", series, series.timeseries.to_frame()?),
        None => println!("No records stored yet."),
    }

    Ok(())
}
