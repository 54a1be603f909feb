//! Per-line repair pipeline.
//!
//! # Architecture
//!
//! ```text
//! raw line ──► parse ──► eligible? ──► ShapeNormalizer ──► IdentifierDeduplicator?
//!    │           │            │                                   │
//!    │       not an object    no                            changed? ──► serialize + report
//!    └───────────┴────────────┴──────────► written back byte-for-byte
//! ```
//!
//! Anything the pipeline does not change is written exactly as it was read,
//! so the output has the same line count and untouched records keep their
//! original formatting.

use serde_json::{Map, Value};
use std::fmt;
use std::io;

use crate::changelog::ChangeLog;
use crate::config::Config;
use crate::identifiers::IdentifierDeduplicator;
use crate::normalizer::ShapeNormalizer;
use crate::stream::{DocumentSink, DocumentSource, ReportSink};
use crate::types::{doc_type, ReportEntry, NPC};

/// What happened to one input line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Empty or whitespace-only line.
    Blank,
    /// Not JSON, or JSON that is not an object.
    Unparsed,
    /// A document filtered out by the eligibility filter.
    Skipped,
    /// An eligible document that needed no repair.
    Unchanged,
    /// A repaired document and the changes applied to it.
    Repaired {
        doc: Map<String, Value>,
        changes: Vec<String>,
    },
}

/// Line counters for one processed stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    pub lines: u64,
    /// Lines that parsed to a JSON object.
    pub documents: u64,
    /// Lines written back unchanged (blank, unparsed, skipped or clean).
    pub passed_through: u64,
    pub patched: u64,
}

impl fmt::Display for FileStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lines={} documents={} passed_through={} patched={}",
            self.lines, self.documents, self.passed_through, self.patched
        )
    }
}

/// Strings the repair components together for one input stream.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    normalizer: ShapeNormalizer,
    deduplicator: Option<IdentifierDeduplicator>,
    only_npc: bool,
}

impl Pipeline {
    pub fn new(normalizer: ShapeNormalizer) -> Self {
        Self {
            normalizer,
            deduplicator: None,
            only_npc: false,
        }
    }

    /// Normalizer from config, no deduplication, every document eligible.
    pub fn from_config(config: &Config) -> Self {
        Self::new(ShapeNormalizer::new(&config.normalizer))
    }

    pub fn with_deduplicator(mut self, deduplicator: IdentifierDeduplicator) -> Self {
        self.deduplicator = Some(deduplicator);
        self
    }

    /// Restrict repair to documents with `type == "npc"`.
    pub fn only_npc(mut self, only_npc: bool) -> Self {
        self.only_npc = only_npc;
        self
    }

    pub fn deduplicates(&self) -> bool {
        self.deduplicator.is_some()
    }

    pub fn is_eligible(&self, doc: &Map<String, Value>) -> bool {
        !self.only_npc || doc_type(doc) == Some(NPC)
    }

    /// Apply every configured component to `doc`. Returns whether it changed.
    pub fn repair_document(&self, doc: &mut Map<String, Value>, log: &mut ChangeLog) -> bool {
        let mark = log.mark();
        self.normalizer.normalize(doc, log);
        if let Some(dedup) = &self.deduplicator {
            dedup.deduplicate(doc, log);
        }
        log.changed_since(mark)
    }

    /// Classify and, where applicable, repair one raw line.
    pub fn repair_line(&self, raw: &str) -> LineOutcome {
        if raw.trim().is_empty() {
            return LineOutcome::Blank;
        }
        let mut doc = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(doc)) => doc,
            Ok(_) => return LineOutcome::Unparsed,
            Err(err) => {
                tracing::debug!(error = %err, "line is not JSON; passing through");
                return LineOutcome::Unparsed;
            }
        };
        if !self.is_eligible(&doc) {
            return LineOutcome::Skipped;
        }
        let mut log = ChangeLog::new();
        if self.repair_document(&mut doc, &mut log) {
            LineOutcome::Repaired {
                doc,
                changes: log.into_entries(),
            }
        } else {
            LineOutcome::Unchanged
        }
    }

    /// Stream `source` into `sink` line by line, recording one report entry
    /// per repaired document.
    pub fn run<S, K, R>(&self, source: &mut S, sink: &mut K, report: &mut R) -> io::Result<FileStats>
    where
        S: DocumentSource + ?Sized,
        K: DocumentSink + ?Sized,
        R: ReportSink + ?Sized,
    {
        let mut stats = FileStats::default();

        while let Some(raw) = source.next_line()? {
            stats.lines += 1;
            let line_no = stats.lines;

            match self.repair_line(&raw) {
                LineOutcome::Repaired { doc, changes } => {
                    stats.documents += 1;
                    match serde_json::to_string(&doc) {
                        Ok(text) => {
                            sink.write_line(&text)?;
                            report.record(&ReportEntry::new(line_no, &doc, changes))?;
                            stats.patched += 1;
                        }
                        Err(err) => {
                            tracing::warn!(line = line_no, error = %err, "could not serialize repaired document; keeping original");
                            sink.write_line(&raw)?;
                            stats.passed_through += 1;
                        }
                    }
                }
                outcome => {
                    if matches!(outcome, LineOutcome::Skipped | LineOutcome::Unchanged) {
                        stats.documents += 1;
                    }
                    if outcome == LineOutcome::Unparsed {
                        tracing::debug!(line = line_no, "unparsed line passed through");
                    }
                    sink.write_line(&raw)?;
                    stats.passed_through += 1;
                }
            }
        }

        sink.flush()?;
        Ok(stats)
    }
}
