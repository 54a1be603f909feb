//! Per-file audit reports.

use pfrepair_core::stream::{ReportSink, ReportWriter};
use pfrepair_core::{RepairError, ReportEntry};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const REPORT_SUFFIX: &str = ".repair_report.txt";

/// `<reports_dir>/<input file name>.repair_report.txt`.
pub fn report_path(reports_dir: &Path, input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    reports_dir.join(format!("{name}{REPORT_SUFFIX}"))
}

/// Report file opened for one input; one line per patched document.
pub struct FileReport {
    path: PathBuf,
    writer: ReportWriter<BufWriter<File>>,
    entries: u64,
}

impl FileReport {
    /// Create (or truncate) the report, making its folder if needed.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, RepairError> {
        let path = path.into();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| RepairError::io(dir, e))?;
        }
        let file = File::create(&path).map_err(|e| RepairError::io(&path, e))?;
        Ok(Self {
            path,
            writer: ReportWriter::new(BufWriter::new(file)),
            entries: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush to disk and return the number of entries written.
    pub fn finish(self) -> Result<u64, RepairError> {
        let mut inner = self.writer.into_inner();
        inner.flush().map_err(|e| RepairError::io(&self.path, e))?;
        Ok(self.entries)
    }
}

impl ReportSink for FileReport {
    fn record(&mut self, entry: &ReportEntry) -> io::Result<()> {
        self.writer.record(entry)?;
        self.entries += 1;
        Ok(())
    }
}
