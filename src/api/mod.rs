pub mod endpoints;
pub mod error;
pub mod request;
pub mod response;
