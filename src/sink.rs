//! Milestone logging sink
//!
//! The engine reports progress (windows, correlation rounds, matches,
//! removals) and recoverable anomalies through an optional [`LogSink`]. It
//! does not know where the messages end up; with no sink attached it behaves
//! identically.

/// Receiver for engine milestone messages
pub trait LogSink: Send + Sync {
    /// Record one message
    fn log(&self, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, message: &str) {
        self(message)
    }
}

/// Forwards messages to the `log` facade at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCrateSink;

impl LogSink for LogCrateSink {
    fn log(&self, message: &str) {
        log::info!("{}", message);
    }
}

/// Send `message` to `sink` if one is attached
pub(crate) fn emit(sink: Option<&dyn LogSink>, message: impl FnOnce() -> String) {
    if let Some(sink) = sink {
        sink.log(&message());
    }
}
