//! Category labels encoded in paper folder names (`<label>_<n>`).

use std::collections::BTreeSet;
use std::path::Path;

use crate::IngestError;

/// Category of a paper folder: everything before the first `_`.
///
/// A folder without `_` is its own label.
pub fn label_of(folder: &str) -> &str {
    folder.split_once('_').map_or(folder, |(label, _)| label)
}

/// Names of the paper folders directly under `dir`, sorted.
///
/// Hidden entries (leading `.`) and plain files are skipped.
pub fn paper_folders(dir: &Path) -> Result<Vec<String>, IngestError> {
    let mut folders = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(IngestError::read(dir))? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if !entry.file_type()?.is_dir() {
            tracing::warn!(entry = %entry.path().display(), "skipping non-folder corpus entry");
            continue;
        }
        folders.push(name);
    }
    folders.sort();
    Ok(folders)
}

/// Sorted, de-duplicated labels of the given paper folders.
pub(crate) fn labels_from_folders(folders: &[String]) -> Vec<String> {
    folders
        .iter()
        .map(|f| label_of(f).to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
