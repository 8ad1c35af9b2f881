//! A [`Sink`] backed by the `tracing` ecosystem.

use super::sink::Sink;

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn record(&mut self, time: i64, message: &str) {
        tracing::info!(time, "{message}");
    }
}
