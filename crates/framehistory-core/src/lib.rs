//! Shared primitives for framehistory: tracing setup, HTML escaping and the
//! wall clock used to timestamp state envelopes.

pub mod clock;
pub mod escape;
pub mod tracing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use escape::html_escape;
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, build_subscriber, init_tracing};
