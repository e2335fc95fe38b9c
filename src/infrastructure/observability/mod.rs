mod init_tracing;
mod log_sanitizer;
mod request_id;
mod tracing_config;

pub use init_tracing::init_tracing;
pub use log_sanitizer::sanitize_log_text;
pub use request_id::{request_id_middleware, REQUEST_ID_HEADER};
pub use tracing_config::TracingConfig;
