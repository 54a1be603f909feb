//! Collaborator interfaces the pipeline consumes, plus their generic
//! implementations over `BufRead` / `Write` and in-memory buffers.
//!
//! Lines cross these interfaces without their terminator. Sources strip
//! `\n` or `\r\n`; sinks append exactly one `\n`.

use std::io::{self, BufRead, Write};

use crate::types::ReportEntry;

/// Yields one raw record line at a time.
pub trait DocumentSource {
    /// The next line, or `None` at end of input.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Accepts one serialized record line at a time.
pub trait DocumentSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Accepts one summary per patched document.
pub trait ReportSink {
    fn record(&mut self, entry: &ReportEntry) -> io::Result<()>;
}

// ---------------------------------------------------------------------------
// BufRead / Write adapters
// ---------------------------------------------------------------------------

/// Line source over any `BufRead`. Invalid UTF-8 is replaced with U+FFFD.
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> DocumentSource for LineReader<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.inner.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

/// Line sink over any `Write`; every line gets a single `\n`.
pub struct LineWriter<W: Write> {
    inner: W,
}

impl<W: Write> LineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> DocumentSink for LineWriter<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.inner.write_all(line.as_bytes())?;
        self.inner.write_all(b"\n")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Report sink over any `Write`, one rendered entry per line.
pub struct ReportWriter<W: Write> {
    inner: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ReportSink for ReportWriter<W> {
    fn record(&mut self, entry: &ReportEntry) -> io::Result<()> {
        writeln!(self.inner, "{entry}")
    }
}

// ---------------------------------------------------------------------------
// In-memory implementations
// ---------------------------------------------------------------------------

impl DocumentSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

impl ReportSink for Vec<ReportEntry> {
    fn record(&mut self, entry: &ReportEntry) -> io::Result<()> {
        self.push(entry.clone());
        Ok(())
    }
}

/// Discards every report entry (reports disabled).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReport;

impl ReportSink for NoReport {
    fn record(&mut self, _entry: &ReportEntry) -> io::Result<()> {
        Ok(())
    }
}
