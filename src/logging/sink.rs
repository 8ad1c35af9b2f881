//! The logging sink contract: "receive a timestamped string" (spec.md §6).

/// A pluggable destination for human-readable simulation log lines. No
/// structured format is mandated; implementors decide how to render.
pub trait Sink: std::fmt::Debug {
    fn record(&mut self, time: i64, message: &str);
}
