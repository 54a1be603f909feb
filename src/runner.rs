//! Whole-run orchestration: select pack files, process each one, summarize.

use pfrepair_core::config::Config;
use pfrepair_core::{IdentifierDeduplicator, Pipeline, RepairError};
use pfrepair_feeds::{explicit_targets, output_path, process_db_file, report_path, Discovery, FileJob, Selection};
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Everything the command line decides about a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Input folder.
    pub packages: PathBuf,
    /// Output folder; mirrors the input layout.
    pub packages_processed: PathBuf,
    pub recursive: bool,
    /// Copy each input to `<output>.bak` before writing.
    pub backup: bool,
    /// Write `<output folder>/_reports/<name>.repair_report.txt`.
    pub reports: bool,
    /// Only repair documents with `type == "npc"`.
    pub only_npc: bool,
    /// Ignore the file-name allow-list.
    pub all_files: bool,
    /// Explicit file names under `packages`; each must exist.
    pub files: Vec<String>,
    pub no_clobber: bool,
    /// Deduplicate identifiers in every file, not only the configured ones.
    pub identifiers_all: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            packages: PathBuf::from("packages"),
            packages_processed: PathBuf::from("packages_processed"),
            recursive: false,
            backup: false,
            reports: false,
            only_npc: false,
            all_files: false,
            files: Vec::new(),
            no_clobber: false,
            identifiers_all: false,
        }
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed_files: usize,
    pub patched_docs: u64,
    pub output_dir: PathBuf,
    pub reports_dir: Option<PathBuf>,
}

/// Run the repair over every selected file, printing progress to `out`.
///
/// Target resolution happens before any output is written, so a missing
/// input folder or explicit file aborts with nothing produced.
pub fn run(config: &Config, opts: &RunOptions, out: &mut impl Write) -> Result<RunSummary, RepairError> {
    let targets = select_targets(config, opts)?;
    let mut summary = RunSummary {
        output_dir: opts.packages_processed.clone(),
        ..RunSummary::default()
    };

    if targets.is_empty() {
        print_no_targets(config, opts, out)?;
        return Ok(summary);
    }

    summary.reports_dir = opts
        .reports
        .then(|| opts.packages_processed.join(&config.output.reports_dir));

    let plain = Pipeline::from_config(config).only_npc(opts.only_npc);
    let deduplicating = plain
        .clone()
        .with_deduplicator(IdentifierDeduplicator::new(&config.identifiers));

    for (i, input) in targets.iter().enumerate() {
        let pipeline = if opts.identifiers_all || wants_identifiers(config, input) {
            &deduplicating
        } else {
            &plain
        };
        let job = FileJob::new(input, output_path(&opts.packages, &opts.packages_processed, input))
            .backup(opts.backup)
            .report_to(summary.reports_dir.as_deref().map(|dir| report_path(dir, input)))
            .no_clobber(opts.no_clobber);

        let stats = process_db_file(pipeline, &job)?;
        summary.processed_files += 1;
        summary.patched_docs += stats.patched;

        let rel = input.strip_prefix(&opts.packages).unwrap_or(input);
        say(
            out,
            format_args!("[{}/{}] {} -> patched_docs={}", i + 1, targets.len(), rel.display(), stats.patched),
        )?;
    }

    say(out, format_args!("\nDone."))?;
    say(out, format_args!("Processed files: {}", summary.processed_files))?;
    say(out, format_args!("Patched docs total: {}", summary.patched_docs))?;
    say(out, format_args!("Output folder: {}", summary.output_dir.display()))?;
    if let Some(dir) = &summary.reports_dir {
        say(out, format_args!("Reports folder: {}", dir.display()))?;
    }
    Ok(summary)
}

fn select_targets(config: &Config, opts: &RunOptions) -> Result<Vec<PathBuf>, RepairError> {
    if !opts.files.is_empty() {
        return explicit_targets(&opts.packages, &opts.files);
    }
    let selection = if opts.all_files {
        Selection::Unrestricted
    } else {
        Selection::AllowList(config.selection.target_files.clone())
    };
    Discovery::new(&opts.packages, config.selection.extension.as_str())
        .recursive(opts.recursive)
        .selection(selection)
        .discover()
}

fn wants_identifiers(config: &Config, input: &Path) -> bool {
    input
        .file_name()
        .and_then(OsStr::to_str)
        .is_some_and(|name| config.identifiers.files.iter().any(|f| f == name))
}

fn print_no_targets(config: &Config, opts: &RunOptions, out: &mut impl Write) -> Result<(), RepairError> {
    let ext = &config.selection.extension;
    if opts.all_files {
        return say(
            out,
            format_args!(
                "No .{ext} files found in {} (recursive={})",
                opts.packages.display(),
                opts.recursive
            ),
        );
    }
    say(out, format_args!("No target .{ext} files found. Looking for:"))?;
    for name in &config.selection.target_files {
        say(out, format_args!(" - {name}"))?;
    }
    say(
        out,
        format_args!("In folder: {} (recursive={})", opts.packages.display(), opts.recursive),
    )
}

fn say(out: &mut impl Write, line: std::fmt::Arguments<'_>) -> Result<(), RepairError> {
    writeln!(out, "{line}").map_err(|e| RepairError::io("<stdout>", e))
}
