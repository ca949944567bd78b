pub mod base_types;
pub mod caregiver;
pub mod client;
pub mod config;
pub mod error;
pub mod json_serialisation;
pub mod service_tag;
pub mod session;
pub mod time;
mod utilities;

pub use utilities::CopyStr;
