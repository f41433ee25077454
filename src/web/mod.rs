mod error;
mod log;
pub mod midware;
pub mod routes;
pub mod serve;
pub mod types;

pub use error::{Error, WebResult, MISSING_API_KEY_MSG, PROVIDER_UNAVAILABLE_MSG};

pub const REQUEST_ID_HEADER: &str = "x-request-id";
