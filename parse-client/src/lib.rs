pub mod client;
pub mod config;
pub mod error;

pub use crate::client::ParseClient;
pub use crate::config::ParseConfig;
pub use crate::error::ParseError;
pub use parse_analytics::{Analytics, EventData, Method, RequestExecutor};
