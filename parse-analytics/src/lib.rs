pub mod analytics;
pub mod executor;

pub use crate::analytics::{event_path, Analytics, EventData, APP_OPENED};
pub use crate::executor::RequestExecutor;
pub use http::Method;

pub mod prelude {
    pub use crate::analytics::*;
    pub use crate::executor::*;
    pub use http::Method;
}
