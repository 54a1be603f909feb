//! One pack file in, one repaired pack file out.

use pfrepair_core::stream::{LineReader, LineWriter, NoReport};
use pfrepair_core::{FileStats, Pipeline, RepairError};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::backup::backup_input;
use crate::report::FileReport;

/// Where one input goes and what to write alongside it.
#[derive(Debug, Clone)]
pub struct FileJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub backup: bool,
    /// Report file path; `None` disables the report.
    pub report: Option<PathBuf>,
    /// Fail instead of overwriting an existing output.
    pub no_clobber: bool,
}

impl FileJob {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            backup: false,
            report: None,
            no_clobber: false,
        }
    }

    pub fn backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn report_to(mut self, report: Option<PathBuf>) -> Self {
        self.report = report;
        self
    }

    pub fn no_clobber(mut self, no_clobber: bool) -> Self {
        self.no_clobber = no_clobber;
        self
    }
}

/// Mirror `input`'s position under `input_root` into `output_root`. Inputs
/// outside `input_root` land directly in `output_root`.
pub fn output_path(input_root: &Path, output_root: &Path, input: &Path) -> PathBuf {
    match input.strip_prefix(input_root) {
        Ok(rel) => output_root.join(rel),
        Err(_) => output_root.join(input.file_name().unwrap_or(input.as_os_str())),
    }
}

/// Stream `job.input` through `pipeline` into `job.output`.
///
/// Order of effects: the input is opened, an output resolving to the input
/// file is refused, the output is created (failing
/// under no-clobber if it exists), the backup is copied, then lines are
/// streamed. The report, when enabled, is written even if nothing changed.
pub fn process_db_file(pipeline: &Pipeline, job: &FileJob) -> Result<FileStats, RepairError> {
    let input = File::open(&job.input).map_err(|e| RepairError::io(&job.input, e))?;
    if same_file(&job.input, &job.output) {
        return Err(RepairError::OutputIsInput(job.output.clone()));
    }

    if let Some(dir) = job.output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| RepairError::io(dir, e))?;
    }
    let output = open_output(&job.output, job.no_clobber)?;

    if job.backup {
        backup_input(&job.input, &job.output)?;
    }

    let mut source = LineReader::new(BufReader::new(input));
    let mut sink = LineWriter::new(BufWriter::new(output));

    let stats = match &job.report {
        Some(path) => {
            let mut report = FileReport::create(path)?;
            let stats = pipeline
                .run(&mut source, &mut sink, &mut report)
                .map_err(|e| RepairError::io(&job.input, e))?;
            report.finish()?;
            stats
        }
        None => pipeline
            .run(&mut source, &mut sink, &mut NoReport)
            .map_err(|e| RepairError::io(&job.input, e))?,
    };

    tracing::info!(input = %job.input.display(), output = %job.output.display(), %stats, "file processed");
    Ok(stats)
}

/// Both paths exist and resolve to the same file.
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn open_output(path: &Path, no_clobber: bool) -> Result<File, RepairError> {
    let mut opts = OpenOptions::new();
    opts.write(true);
    if no_clobber {
        opts.create_new(true);
    } else {
        opts.create(true).truncate(true);
    }
    opts.open(path).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => RepairError::OutputExists(path.to_path_buf()),
        _ => RepairError::io(path, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INPUT: &str = concat!(
        r#"{"type":"npc","name":"Imp","system":{"traits":{"dr":{"value":"5/good"}}}}"#,
        "\n",
        "\n",
        "garbage\r\n",
        r#"{"type":"loot","name":"Rope"}"#,
    );

    #[test]
    fn streams_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("packages/pf-familiars.db");
        fs::create_dir_all(input.parent().unwrap()).unwrap();
        fs::write(&input, INPUT).unwrap();
        let output = dir.path().join("out/pf-familiars.db");
        let report = dir.path().join("out/_reports/pf-familiars.db.repair_report.txt");

        let job = FileJob::new(&input, &output).backup(true).report_to(Some(report.clone()));
        let stats = process_db_file(&Pipeline::default(), &job).unwrap();

        assert_eq!(stats, FileStats { lines: 4, documents: 2, passed_through: 3, patched: 1 });
        let written = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.split_terminator('\n').collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains(r#""dr":{"value":["5/good"]}"#));
        assert_eq!(&lines[1..], ["", "garbage", r#"{"type":"loot","name":"Rope"}"#]);
        assert_eq!(fs::read_to_string(output.with_extension("db.bak")).unwrap(), INPUT);
        assert!(fs::read_to_string(report).unwrap().starts_with("Line 1: type=\"npc\""));
    }

    #[test]
    fn no_clobber_refuses_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.db");
        let output = dir.path().join("out.db");
        fs::write(&input, "{}\n").unwrap();
        fs::write(&output, "keep me").unwrap();

        let err = process_db_file(&Pipeline::default(), &FileJob::new(&input, &output).no_clobber(true))
            .unwrap_err();
        assert!(matches!(err, RepairError::OutputExists(_)));
        assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");
    }

    #[test]
    fn output_resolving_to_input_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("pf-familiars.db");
        fs::write(&input, INPUT).unwrap();
        let output = output_path(dir.path(), &dir.path().join("."), &input);

        let err = process_db_file(&Pipeline::default(), &FileJob::new(&input, &output).backup(true))
            .unwrap_err();
        assert!(matches!(err, RepairError::OutputIsInput(_)));
        assert_eq!(fs::read_to_string(&input).unwrap(), INPUT);
        assert!(!output.with_extension("db.bak").exists());
    }

    #[test]
    fn output_path_mirrors_layout() {
        assert_eq!(
            output_path(Path::new("packages"), Path::new("out"), Path::new("packages/sub/x.db")),
            PathBuf::from("out/sub/x.db")
        );
        assert_eq!(
            output_path(Path::new("packages"), Path::new("out"), Path::new("elsewhere/x.db")),
            PathBuf::from("out/x.db")
        );
    }
}
