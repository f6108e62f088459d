//! Diagnostic output to the parent process.
//!
//! The host reads our stdout line by line. When that pipe breaks the host is
//! gone, and the tray must not outlive it. Logging is what failed, so the
//! process ends on the spot without another log line.

use std::io::{self, Write};

/// `io::Write` over stdout that aborts the process when a write fails.
///
/// Plugged into `tracing_subscriber` as its writer.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParentStdout;

impl Write for ParentStdout {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut stdout = io::stdout().lock();
        if stdout.write_all(buf).and_then(|()| stdout.flush()).is_err() {
            parent_died();
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if io::stdout().lock().flush().is_err() {
            parent_died();
        }
        Ok(())
    }
}

/// Kill-style termination; no exit code, no destructors, no logging.
pub fn parent_died() -> ! {
    std::process::abort()
}
