//! pfrepair-feeds: filesystem adapters around the core pipeline.
//!
//! Finds pack files, backs them up, streams each one through a
//! [`pfrepair_core::Pipeline`] into the output folder and writes the
//! per-file audit report.
//!
//! # Architecture
//!
//! ```text
//! Discovery ──► FileJob ──► process_db_file ──► <out>/<rel>.db
//!                               │   │
//!                               │   └──► <out>/<rel>.db.bak   (--backup)
//!                               └──► <out>/_reports/<name>.repair_report.txt
//! ```

pub mod backup;
pub mod discover;
pub mod file;
pub mod report;

pub use discover::{explicit_targets, Discovery, Selection};
pub use file::{output_path, process_db_file, FileJob};
pub use report::{report_path, FileReport};
