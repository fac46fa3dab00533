//! Component L: recursive file discovery for directory inputs.

use std::path::{Path, PathBuf};

/// Expands `root` into the list of regular files it denotes: itself if it's
/// a file, or every file beneath it (recursively, in sorted order) if it's a
/// directory.
pub fn collect_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    collect_into(root, &mut out)?;
    Ok(out)
}

fn collect_into(path: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    if path.is_dir() {
        let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
            .map(|e| e.map(|e| e.path()))
            .collect::<Result<_, _>>()?;
        entries.sort();
        for entry in entries {
            collect_into(&entry, out)?;
        }
    } else {
        out.push(path.to_path_buf());
    }
    Ok(())
}
