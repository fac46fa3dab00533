//! Input path normalization: a single file keeps only its basename; several
//! files keep their path relative to the longest prefix of leading
//! components they all share. Mirrors `formatPathes` in
//! `internal/compressing/utiles.go`.

use std::path::{Path, PathBuf};

use crate::error::ArchiveError;

fn components_of(path: &Path) -> Vec<String> {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect()
}

/// The largest `i` such that every path's first `i` components are
/// identical, capped so each path keeps at least one trailing component of
/// its own.
fn common_prefix_len(component_lists: &[Vec<String>]) -> usize {
    let max_candidate = component_lists
        .iter()
        .map(|c| c.len().saturating_sub(1))
        .min()
        .unwrap_or(0);

    let mut prefix_len = max_candidate;
    'outer: for i in 0..max_candidate {
        let first = &component_lists[0][i];
        for comps in &component_lists[1..] {
            if &comps[i] != first {
                prefix_len = i;
                break 'outer;
            }
        }
    }
    prefix_len
}

/// Normalizes a set of input paths into the relative archive paths they
/// should be stored under. Errors with [`ArchiveError::NoCommonPrefix`] when
/// more than one file is given and they share no leading path component.
pub fn normalize_paths(paths: &[PathBuf]) -> Result<Vec<String>, ArchiveError> {
    if paths.is_empty() {
        return Err(ArchiveError::EmptyInput);
    }
    if paths.len() == 1 {
        let name = paths[0]
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Ok(vec![name]);
    }

    let component_lists: Vec<Vec<String>> = paths.iter().map(|p| components_of(p)).collect();
    let prefix_len = common_prefix_len(&component_lists);
    if prefix_len == 0 {
        return Err(ArchiveError::NoCommonPrefix);
    }

    Ok(component_lists
        .iter()
        .map(|comps| comps[prefix_len..].join("/"))
        .collect())
}
