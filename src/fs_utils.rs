//! Filesystem helpers: tree walking and path display
//!
//! - `normalize_path`: strips the Windows `\\?\` prefix from canonicalized paths
//! - `relative_display`: `/`-separated path relative to the scan root
//! - `collect_spec_files`: every test source under a root, sorted

use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;

use crate::config::ScanConfig;
use crate::error::{Result, SpecGuardError};

/// Normalize Windows paths by removing the `\\?\` prefix if present.
///
/// On Unix this is a no-op.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use specguard::fs_utils::normalize_path;
///
/// let path = PathBuf::from("/home/user/repo");
/// assert_eq!(normalize_path(&path), path);
/// ```
pub fn normalize_path(path: &Path) -> PathBuf {
    #[cfg(windows)]
    {
        let s = path.to_string_lossy();
        if let Some(stripped) = s.strip_prefix(r"\\?\UNC\") {
            return PathBuf::from(format!(r"\\{}", stripped));
        }
        if let Some(stripped) = s.strip_prefix(r"\\?\") {
            return PathBuf::from(stripped);
        }
    }
    path.to_path_buf()
}

/// Path of `file` relative to `root`, joined with `/` on every platform.
///
/// Falls back to the full path when `file` is not under `root`.
pub fn relative_display(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        normalize_path(file).display().to_string()
    } else {
        parts.join("/")
    }
}

/// Whether a file name carries one of the configured suffixes
pub fn has_spec_suffix(name: &str, suffixes: &[String]) -> bool {
    suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
}

/// Recursively collect test sources under `root`, sorted by path.
///
/// Hidden entries and ignore files are not honored: the tree is scanned as
/// it sits on disk. Directories named in `exclude_dirs` are never entered.
/// Unreadable directory entries are logged and skipped.
pub fn collect_spec_files(root: &Path, scan: &ScanConfig) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(SpecGuardError::FileNotFound {
            path: root.display().to_string(),
        });
    }
    if !root.is_dir() {
        return Err(SpecGuardError::NotADirectory {
            path: root.display().to_string(),
        });
    }

    let exclude_dirs = scan.exclude_dirs.clone();
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .ignore(false)
        .parents(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir
                && entry.depth() > 0
                && exclude_dirs
                    .iter()
                    .any(|name| entry.file_name().to_string_lossy() == name.as_str()))
        });

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if has_spec_suffix(&entry.file_name().to_string_lossy(), &scan.suffixes) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    tracing::debug!(root = %root.display(), files = files.len(), "collected spec files");
    Ok(files)
}
