//! Capture of `tracing` events emitted while a closure runs.
//!
//! The subscriber is installed for the current thread only, so concurrent
//! tests do not see each other's output.

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::Level;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` and returns its output together with every event at `level` or
/// more severe, formatted one per line without timestamps.
pub fn capture_logs<F, T>(level: Level, f: F) -> (T, String)
where
    F: FnOnce() -> T,
{
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();
    let output = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock()).into_owned();
    (output, logs)
}

/// Runs `f` and returns its output with the warnings it emitted.
pub fn capture_warnings<F, T>(f: F) -> (T, String)
where
    F: FnOnce() -> T,
{
    capture_logs(Level::WARN, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{info, warn};

    #[test]
    fn keeps_events_at_or_above_the_level() {
        let ((), logs) = capture_warnings(|| {
            info!("quiet");
            warn!(key = "value", "loud");
        });
        assert!(logs.contains("loud"));
        assert!(logs.contains("key=\"value\""));
        assert!(!logs.contains("quiet"));
    }
}
