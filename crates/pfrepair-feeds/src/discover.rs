//! Pack file discovery.

use pfrepair_core::RepairError;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Which of the discovered pack files are processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Only files whose name is in the list.
    AllowList(Vec<String>),
    /// Every file with the pack extension.
    Unrestricted,
}

impl Selection {
    pub fn accepts(&self, file_name: &str) -> bool {
        match self {
            Selection::AllowList(names) => names.iter().any(|n| n == file_name),
            Selection::Unrestricted => true,
        }
    }
}

/// Finds pack files under one input folder.
#[derive(Debug, Clone)]
pub struct Discovery {
    root: PathBuf,
    extension: String,
    recursive: bool,
    selection: Selection,
}

impl Discovery {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            recursive: false,
            selection: Selection::Unrestricted,
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Matching files, sorted by path.
    pub fn discover(&self) -> Result<Vec<PathBuf>, RepairError> {
        if !self.root.is_dir() {
            return Err(RepairError::InputFolderMissing(self.root.clone()));
        }
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut found = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(true)
        {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(&self.root).to_path_buf();
                RepairError::io(path, err.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(OsStr::to_str) != Some(self.extension.as_str()) {
                continue;
            }
            let Some(name) = path.file_name().and_then(OsStr::to_str) else {
                continue;
            };
            if self.selection.accepts(name) {
                found.push(entry.into_path());
            }
        }

        found.sort();
        tracing::debug!(root = %self.root.display(), count = found.len(), "discovered pack files");
        Ok(found)
    }
}

/// Resolve `names` against `root`. Every one must be an existing file.
pub fn explicit_targets(root: &Path, names: &[String]) -> Result<Vec<PathBuf>, RepairError> {
    if !root.is_dir() {
        return Err(RepairError::InputFolderMissing(root.to_path_buf()));
    }
    names
        .iter()
        .map(|name| {
            let path = root.join(name);
            if path.is_file() {
                Ok(path)
            } else {
                Err(RepairError::TargetMissing(path))
            }
        })
        .collect()
}
