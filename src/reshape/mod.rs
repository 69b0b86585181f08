pub mod error;
pub mod sampling_events;
