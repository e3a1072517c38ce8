pub mod tracing;

pub use self::tracing::{LogFormat, init_tracing_subscriber};
