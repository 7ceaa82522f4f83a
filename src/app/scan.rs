// NoteKit - app/scan.rs
//
// Batch timestamp scanning over files and directories.
//
// Directory arguments are expanded through note discovery; every file is
// then read and scanned on the rayon pool. Per-file read errors are
// non-fatal: they are logged and returned as warnings, and the remaining
// files are still scanned.

use crate::core::export::DocumentMatches;
use crate::core::scanner;
use crate::platform::fs;
use crate::util::constants;
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Retry limits for transient I/O errors.
const MAX_RETRIES: u32 = 3;
const RETRY_DELAYS_MS: [u64; 3] = [50, 100, 200];

/// Output of a batch scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// One entry per scanned file, in path order.
    pub documents: Vec<DocumentMatches>,

    /// Non-fatal problems (unreadable files, discovery limits).
    pub warnings: Vec<String>,
}

impl ScanReport {
    pub fn total_matches(&self) -> usize {
        self.documents.iter().map(|d| d.matches.len()).sum()
    }
}

/// Expand `inputs` into note files.
///
/// Files are taken as given, whatever their extension. Directories are
/// walked for note extensions. The result is sorted and deduplicated.
pub fn collect_files(inputs: &[PathBuf]) -> (Vec<PathBuf>, Vec<String>) {
    let mut files = Vec::new();
    let mut warnings = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let (found, dir_warnings) = fs::discover_notes(
                input,
                constants::NOTE_EXTENSIONS,
                constants::SCAN_EXCLUDED_DIRS,
                constants::DEFAULT_MAX_DEPTH,
                constants::DEFAULT_MAX_SCAN_FILES,
            );
            tracing::debug!(dir = %input.display(), files = found.len(), "Discovered notes");
            files.extend(found);
            warnings.extend(dir_warnings);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            warnings.push(format!("'{}' does not exist", input.display()));
        }
    }

    files.sort();
    files.dedup();
    (files, warnings)
}

/// Scan every file reachable from `inputs`.
pub fn scan_paths(inputs: &[PathBuf]) -> ScanReport {
    let (files, mut warnings) = collect_files(inputs);
    tracing::info!(files = files.len(), "Scanning for timestamps");

    let results: Vec<Result<DocumentMatches, String>> = files
        .par_iter()
        .map(|path| {
            let text = read_with_retry(path)
                .map_err(|e| format!("Cannot read '{}': {e}", path.display()))?;
            Ok(DocumentMatches {
                path: path.clone(),
                matches: scanner::scan_for_timestamps(&text),
            })
        })
        .collect();

    // par_iter().collect() keeps input order, so documents stay sorted.
    let mut documents = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(doc) => documents.push(doc),
            Err(msg) => {
                tracing::warn!("{msg}");
                warnings.push(msg);
            }
        }
    }

    let report = ScanReport {
        documents,
        warnings,
    };
    tracing::info!(
        documents = report.documents.len(),
        matches = report.total_matches(),
        "Scan complete"
    );
    report
}

/// Read a note with transient-error retries.
fn read_with_retry(path: &Path) -> io::Result<String> {
    let mut last_err: Option<io::Error> = None;

    for attempt in 0..MAX_RETRIES {
        match fs::read_file_lossy(path) {
            Ok(content) => return Ok(content),
            Err(e) if is_transient_error(&e) => {
                tracing::debug!(
                    file = %path.display(),
                    attempt = attempt + 1,
                    error = %e,
                    "Transient I/O error, retrying"
                );
                std::thread::sleep(Duration::from_millis(RETRY_DELAYS_MS[attempt as usize]));
                last_err = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_err.unwrap_or_else(|| io::Error::other("Unknown read error")))
}

fn is_transient_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_directory_in_path_order() {
        let dir = TempDir::new().unwrap();
        stdfs::write(dir.path().join("b.md"), "lunch 12:30").unwrap();
        stdfs::write(dir.path().join("a.md"), "9:00 - 9:30\nthen 10:00").unwrap();
        stdfs::write(dir.path().join("ignored.png"), "12:00").unwrap();
        stdfs::create_dir(dir.path().join(".obsidian")).unwrap();
        stdfs::write(dir.path().join(".obsidian/x.md"), "12:00").unwrap();

        let report = scan_paths(&[dir.path().to_path_buf()]);
        assert!(report.warnings.is_empty());
        let names: Vec<_> = report
            .documents
            .iter()
            .map(|d| d.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
        assert_eq!(report.total_matches(), 3);
    }

    #[test]
    fn test_explicit_file_any_extension() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("journal.log");
        stdfs::write(&file, "at 08:15").unwrap();

        let report = scan_paths(&[file.clone(), file]);
        assert_eq!(report.documents.len(), 1);
        assert_eq!(report.documents[0].matches[0].text, "08:15");
    }

    #[test]
    fn test_missing_input_is_a_warning() {
        let dir = TempDir::new().unwrap();
        let report = scan_paths(&[dir.path().join("nope.md")]);
        assert!(report.documents.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }
}
