mod api;
mod client;
mod config;
mod error;
mod getters;
mod reshape;
mod types;
mod uploaders;
mod utils;

pub use client::{Token, WatersyncClient};
pub use config::ClientConfig;
pub use error::WaterspyError;
pub use getters::*;
pub use uploaders::*;

pub use api::endpoints::{Endpoints, ListTarget, OptionTarget};
pub use api::error::ApiError;
pub use api::request::{normalize_base_url, normalize_endpoint, WaterRequest};
pub use api::response::{Content, WaterResponse};

pub use types::error::ModelError;
pub use types::utc::IntoUtcDateTime;
pub use types::kinds::{SampleKind, SampleType};
pub use types::logger::{Logger, LoggerDeployment};
pub use types::measurement::{
    alkalinity_to_hco3, handle_if_below_detection_limit, Analyte, Measurement, Parameter,
};
pub use types::option::OptionEntry;
pub use types::project::Project;
pub use types::sample::Sample;
pub use types::sample_timeseries::SampleTimeseries;
pub use types::station::{Point, Station, StationDetail, StationType};
pub use types::timeseries::{
    GWLevelManualMeasurement, LoggerMeasurement, MeteoLoggerMeasurement, SubirriTimeseries,
    TimeSeries,
};

pub use reshape::error::ReshapeError;
pub use reshape::sampling_events::{
    create_parameter_timeseries, create_parameter_timeseries_from_rows, generate_samples,
    match_sampling_events_to_measurements, read_measurement_table, records_from_frame,
    sampling_events, EventMeasurement, MeasurementRow, SamplingEvent,
};

pub use utils::{parse_timestamp, round_to_day};
