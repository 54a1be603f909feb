//! pfrepair: repairs malformed records in Pathfinder 1e compendium packs.
//!
//! Pack files are NeDB JSON-lines databases (`*.db`). Some actor records
//! carry trait lists stored as strings, `null` list entries, plus-prefixed
//! numbers stored as strings and colliding item/action tags, all of which
//! break the character sheet. `pfrepair` writes a repaired copy of every
//! selected pack and, optionally, a per-file report of what it changed.
//!
//! # Architecture
//!
//! ```text
//! CLI ──► runner ──► pfrepair-feeds (discovery, backup, reports, file I/O)
//!                          │
//!                          └──► pfrepair-core (Pipeline, ShapeNormalizer,
//!                                              IdentifierDeduplicator)
//! ```
//!
//! The input folder is never modified.

pub mod runner;

pub use runner::{run, RunOptions, RunSummary};
