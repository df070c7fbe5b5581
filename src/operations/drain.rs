//! Output draining for child processes
//!
//! Each stream of a child is read on its own thread until end-of-file, and
//! every line is handed to a [`LineSink`] labelled with the stream it came
//! from.

use crate::error::ConfgitError;
use core::fmt;
use std::io::{BufRead as _, BufReader, Read};
use std::sync::Mutex;
use tracing::{info, warn};

/// Which output stream of the child a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    /// Label used when logging lines from this stream
    #[must_use]
    #[inline]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stdout => "OUTPUT",
            Self::Stderr => "ERROR",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Destination for drained output lines
///
/// Shared between the two drain threads of an invocation, so implementations
/// must tolerate concurrent calls.
pub trait LineSink: Send + Sync {
    fn accept(&self, stream: Stream, line: &str);
}

/// Sink that emits one `tracing` event per line
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LineSink for TracingSink {
    fn accept(&self, stream: Stream, line: &str) {
        info!(stream = %stream, "{}> {line}", stream.label());
    }
}

/// Sink that keeps every line in memory, in arrival order
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(Stream, String)>>,
}

impl MemorySink {
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines received so far
    #[must_use]
    #[inline]
    pub fn lines(&self) -> Vec<(Stream, String)> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// Lines received from one stream, in order
    #[must_use]
    #[inline]
    pub fn stream_lines(&self, stream: Stream) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(from, _)| *from == stream)
            .map(|(_, line)| line)
            .collect()
    }
}

impl LineSink for MemorySink {
    fn accept(&self, stream: Stream, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((stream, line.to_owned()));
        }
    }
}

/// Read `reader` to end-of-file, forwarding each line to `sink`
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected. A read
/// error ends the drain and is logged; it is never returned.
///
/// Returns the number of lines forwarded.
pub fn drain_lines<R: Read>(reader: R, stream: Stream, sink: &dyn LineSink) -> usize {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut forwarded = 0;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                sink.accept(stream, line.trim_end_matches(['\n', '\r']));
                forwarded += 1;
            }
            Err(source) => {
                let err = ConfgitError::DrainIo { stream, source };
                warn!("{err}");
                break;
            }
        }
    }

    forwarded
}
