pub mod error;
pub mod kinds;
pub mod logger;
pub mod measurement;
pub mod option;
pub mod project;
pub mod sample;
pub mod sample_timeseries;
pub mod station;
pub mod timeseries;
pub mod utc;
