use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn ensure_dir<P: AsRef<Path>>(p: P) -> std::io::Result<()> {
    if !p.as_ref().exists() {
        fs::create_dir_all(&p)?;
    }
    Ok(())
}

pub fn is_cursor_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            ext == "ani" || ext == "cur"
        })
        .unwrap_or(false)
}

/// Expands directories into the cursor files beneath them. Explicit file
/// arguments are kept whatever their extension.
pub fn collect_cursor_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(input) {
                let entry = entry?;
                let path = entry.path();
                if path.is_file() && is_cursor_file(path) {
                    found.push(path.to_path_buf());
                }
            }
            found.sort();
            log::debug!("Found {} cursor files in {}", found.len(), input.display());
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }

    Ok(files)
}
