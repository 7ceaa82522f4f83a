// NoteKit - platform/fs.rs
//
// Filesystem helpers shared by the app layer: lossy reads, recursive
// directory copies, and directory listings.

use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read the full content of a file as a string.
///
/// For files with invalid UTF-8, uses lossy conversion.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Copy `src` into `dest` recursively, creating directories as needed.
///
/// Existing files in `dest` are overwritten. Symlinks are followed. Returns
/// the number of files copied.
pub fn copy_dir_recursive(src: &Path, dest: &Path) -> io::Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    tracing::debug!(
        from = %src.display(),
        to = %dest.display(),
        files = copied,
        "Directory copied"
    );
    Ok(copied)
}

/// Names of the immediate child directories of `dir`, sorted.
pub fn list_child_dirs(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Names of every entry (files and directories) directly inside `dir`.
///
/// Entries whose names are not valid UTF-8 are skipped with a debug log.
pub fn list_entry_names(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                tracing::debug!(name = ?raw, "Skipping entry with non UTF-8 name");
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Find note files under `root`, skipping excluded directory names.
///
/// Unreadable entries are skipped and reported through the returned
/// warnings list rather than failing the whole walk.
pub fn discover_notes(
    root: &Path,
    extensions: &[&str],
    excluded_dirs: &[&str],
    max_depth: usize,
    max_files: usize,
) -> (Vec<PathBuf>, Vec<String>) {
    let mut files = Vec::new();
    let mut warnings = Vec::new();

    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !(e.file_type().is_dir()
                    && excluded_dirs.contains(&e.file_name().to_string_lossy().as_ref()))
        });

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warnings.push(e.to_string());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let matches_ext = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)));
        if !matches_ext {
            continue;
        }
        if files.len() >= max_files {
            warnings.push(format!(
                "Stopped after {max_files} notes; remaining files under '{}' were not scanned",
                root.display()
            ));
            break;
        }
        files.push(entry.into_path());
    }

    (files, warnings)
}
