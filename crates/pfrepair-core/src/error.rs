//! Fatal errors for a repair run.
//!
//! Per-line problems (unparseable JSON, non-object documents) are never
//! errors: the pipeline passes those lines through. Everything here aborts
//! the run.

use std::path::PathBuf;

/// An error that terminates the run.
#[derive(Debug, thiserror::Error)]
pub enum RepairError {
    #[error("packages folder not found: {}", .0.display())]
    InputFolderMissing(PathBuf),

    #[error("not found: {}", .0.display())]
    TargetMissing(PathBuf),

    #[error("output already exists (delete it first or change output folder): {}", .0.display())]
    OutputExists(PathBuf),

    #[error("output would overwrite its own input: {}", .0.display())]
    OutputIsInput(PathBuf),

    #[error("i/o error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration")]
    Config(#[from] config::ConfigError),
}

impl RepairError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RepairError::Io {
            path: path.into(),
            source,
        }
    }
}
