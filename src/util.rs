use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;

/// Finds input files matching `pattern` directly under `dir`, sorted by
/// filename so that output order is reproducible across runs.
pub fn discover_input_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full_pattern = dir.join(pattern);
    let full_pattern = full_pattern
        .to_str()
        .with_context(|| format!("non-UTF-8 glob path: {}", full_pattern.display()))?
        .to_owned();

    let entries =
        glob(&full_pattern).with_context(|| format!("invalid glob pattern: {full_pattern}"))?;

    let mut files = Vec::new();
    for entry in entries {
        let path =
            entry.with_context(|| format!("failed to read glob entry for {full_pattern}"))?;
        files.push(path);
    }

    files.sort();
    Ok(files)
}

pub fn ensure_parent_directory(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
    }

    Ok(())
}
