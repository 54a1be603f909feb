//! pfrepair-core: document repair rules for Pathfinder 1e compendium packs.
//!
//! This crate holds everything that operates on a single document, plus the
//! per-line pipeline that strings the rules together. It never touches the
//! filesystem; file adapters live in `pfrepair-feeds`.
//!
//! # Architecture
//!
//! ```text
//! DocumentSource ──► Pipeline ──► DocumentSink
//!                      │  ├─ ShapeNormalizer
//!                      │  └─ IdentifierDeduplicator (select files)
//!                      └──► ReportSink
//! ```
//!
//! Both repair components are pure functions over one
//! `serde_json::Map` plus a [`ChangeLog`] accumulator.

pub mod changelog;
pub mod config;
pub mod error;
pub mod identifiers;
pub mod lists;
pub mod normalizer;
pub mod path;
pub mod pipeline;
pub mod stream;
pub mod types;
pub mod walk;

pub use changelog::ChangeLog;
pub use error::RepairError;
pub use identifiers::IdentifierDeduplicator;
pub use normalizer::ShapeNormalizer;
pub use pipeline::{FileStats, LineOutcome, Pipeline};
pub use types::{ActorKind, ReportEntry};
