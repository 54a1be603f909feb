//! Input backups written next to the output file.

use pfrepair_core::RepairError;
use std::fs;
use std::path::{Path, PathBuf};

/// `<output>.bak`, e.g. `pf-familiars.db.bak`.
pub fn backup_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Copy `input` unmodified to `<output>.bak`.
pub fn backup_input(input: &Path, output: &Path) -> Result<PathBuf, RepairError> {
    let bak = backup_path(output);
    fs::copy(input, &bak).map_err(|e| RepairError::io(&bak, e))?;
    tracing::debug!(backup = %bak.display(), "input backed up");
    Ok(bak)
}
