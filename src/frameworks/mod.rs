pub mod config;
pub mod runtime;
pub mod telemetry;

pub use config::{ConfigError, SessionConfig};
pub use runtime::{SessionRuntime, StartupError, run};
pub use telemetry::init_tracing;
