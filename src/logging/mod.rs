//! Pluggable logging sink (spec.md §6), backed by `tracing` by default.

mod sink;
mod tracing_sink;

pub use sink::Sink;
pub use tracing_sink::TracingSink;
