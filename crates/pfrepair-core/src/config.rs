//! Configuration types for pfrepair.
//!
//! [`Config::load`] layers an optional TOML file on top of the embedded
//! defaults. [`Config::defaults`] returns the same defaults without touching
//! the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::RepairError;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[selection]
extension    = "db"
target_files = [
    "pf-companions.db",
    "pf-eidolon-forms.db",
    "pf-familiars.db",
    "pf-merchants.db",
    "pf-traps-and-haunts.db",
]

[normalizer]
target_types = ["character", "npc"]
trait_keys   = ["eres", "dr", "dv", "di", "ci", "languages", "armorProf", "weaponProf"]

[identifiers]
files             = ["pf-eidolon-forms.db"]
missing_item_id   = "noid"
missing_action_id = "noactid"

[output]
reports_dir = "_reports"
"#;

/// File looked up in the working directory when no `--config` is given.
pub const LOCAL_CONFIG_FILE: &str = "pfrepair.toml";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    #[serde(default)]
    pub identifiers: IdentifiersConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[selection]` section: which pack files are eligible.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    /// File extension (without the dot) of pack files.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// File-name allow-list used unless `--all-files` is given.
    #[serde(default = "default_target_files")]
    pub target_files: Vec<String>,
}

fn default_extension() -> String { "db".to_string() }
fn default_target_files() -> Vec<String> {
    [
        "pf-companions.db",
        "pf-eidolon-forms.db",
        "pf-familiars.db",
        "pf-merchants.db",
        "pf-traps-and-haunts.db",
    ]
    .map(String::from)
    .to_vec()
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            target_files: default_target_files(),
        }
    }
}

/// `[normalizer]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct NormalizerConfig {
    /// Document `type` values that receive trait repair.
    #[serde(default = "default_target_types")]
    pub target_types: Vec<String>,
    /// Keys under `system.traits` whose entries are repaired.
    #[serde(default = "default_trait_keys")]
    pub trait_keys: Vec<String>,
}

fn default_target_types() -> Vec<String> { vec!["character".to_string(), "npc".to_string()] }
fn default_trait_keys() -> Vec<String> {
    ["eres", "dr", "dv", "di", "ci", "languages", "armorProf", "weaponProf"]
        .map(String::from)
        .to_vec()
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            target_types: default_target_types(),
            trait_keys: default_trait_keys(),
        }
    }
}

/// `[identifiers]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentifiersConfig {
    /// Pack files whose actors go through identifier deduplication.
    #[serde(default = "default_identifier_files")]
    pub files: Vec<String>,
    /// Suffix used when a renamed item carries no `_id`.
    #[serde(default = "default_missing_item_id")]
    pub missing_item_id: String,
    /// Suffix used when a renamed action carries no `_id`.
    #[serde(default = "default_missing_action_id")]
    pub missing_action_id: String,
}

fn default_identifier_files() -> Vec<String> { vec!["pf-eidolon-forms.db".to_string()] }
fn default_missing_item_id() -> String { "noid".to_string() }
fn default_missing_action_id() -> String { "noactid".to_string() }

impl Default for IdentifiersConfig {
    fn default() -> Self {
        Self {
            files: default_identifier_files(),
            missing_item_id: default_missing_item_id(),
            missing_action_id: default_missing_action_id(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Report folder name, relative to the output folder.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: String,
}

fn default_reports_dir() -> String { "_reports".to_string() }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            reports_dir: default_reports_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load the embedded defaults, then layer `explicit` (which must exist)
    /// or, failing that, `pfrepair.toml` from the working directory if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self, RepairError> {
        let (path, required) = match explicit {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(LOCAL_CONFIG_FILE), false),
        };

        tracing::debug!(path = %path.display(), required, "loading config");

        let cfg = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(
                config::File::from(path.as_path())
                    .format(config::FileFormat::Toml)
                    .required(required),
            )
            .build()?
            .try_deserialize()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
