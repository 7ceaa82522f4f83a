// NoteKit - app/renamer.rs
//
// Applies auto-numbering plans to the filesystem.
//
// Siblings are the entries (files and folders) of the target's parent
// directory. Renames never overwrite: an existing destination aborts a
// single rename and is skipped during a reincrement.

use crate::core::numbering::{self, GapStrategy, NumberingPlan, Rename};
use crate::platform::fs;
use crate::util::error::NumberingError;
use std::path::{Path, PathBuf};

/// What a numbering run changed.
#[derive(Debug, Default)]
pub struct NumberingOutcome {
    /// Renames actually performed, in order.
    pub renamed: Vec<(PathBuf, PathBuf)>,

    /// Final path of the selected entry (unchanged when nothing was done).
    pub target: PathBuf,

    /// Sibling renames that failed and were skipped.
    pub warnings: Vec<String>,
}

/// Split `path` into its parent directory and UTF-8 file name.
fn parent_and_name(path: &Path) -> Result<(PathBuf, String), NumberingError> {
    let parent = path
        .parent()
        .map(|p| if p.as_os_str().is_empty() { Path::new(".") } else { p })
        .ok_or_else(|| NumberingError::NoParent {
            path: path.to_path_buf(),
        })?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| NumberingError::InvalidName {
            path: path.to_path_buf(),
        })?;
    Ok((parent.to_path_buf(), name.to_string()))
}

/// Numbering state of the directory containing `path`.
pub fn inspect(path: &Path) -> Result<NumberingPlan, NumberingError> {
    let (parent, _) = parent_and_name(path)?;
    let siblings = sibling_names(&parent)?;
    Ok(NumberingPlan::from_names(siblings.iter().map(String::as_str)))
}

fn sibling_names(parent: &Path) -> Result<Vec<String>, NumberingError> {
    fs::list_entry_names(parent).map_err(|e| NumberingError::ReadDir {
        path: parent.to_path_buf(),
        source: e,
    })
}

/// Give `path` an auto-increment prefix.
///
/// When the directory has gaps a strategy is required; `None` yields
/// `GapsUnresolved` carrying the gaps so the caller can ask. Without gaps
/// the strategy is ignored and the next number is used.
pub fn number_path(
    path: &Path,
    strategy: Option<GapStrategy>,
    width: usize,
) -> Result<NumberingOutcome, NumberingError> {
    let (parent, name) = parent_and_name(path)?;
    let siblings = sibling_names(&parent)?;
    let plan = NumberingPlan::from_names(siblings.iter().map(String::as_str));

    let strategy = match (plan.has_gaps(), strategy) {
        (true, None) => {
            return Err(NumberingError::GapsUnresolved {
                gaps: plan.gaps,
                next: plan.next,
                truncated: plan.gaps_truncated,
            })
        }
        (true, Some(s)) => s,
        (false, _) => GapStrategy::Append,
    };
    tracing::debug!(
        file = %path.display(),
        ?strategy,
        gaps = plan.gaps.len(),
        next = plan.next,
        "Numbering entry"
    );

    let renames = numbering::plan_renames(&siblings, &name, strategy, width);
    let mut outcome = NumberingOutcome {
        target: path.to_path_buf(),
        ..Default::default()
    };

    for rename in renames {
        let is_target = rename.from == name;
        match apply_rename(&parent, &rename) {
            Ok((from, to)) => {
                if is_target {
                    outcome.target = to.clone();
                }
                outcome.renamed.push((from, to));
            }
            Err(e) if is_target => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping sibling rename");
                outcome.warnings.push(e.to_string());
            }
        }
    }

    if outcome.renamed.is_empty() {
        tracing::info!(file = %path.display(), "Nothing renamed");
    } else {
        tracing::info!(
            file = %outcome.target.display(),
            renamed = outcome.renamed.len(),
            "Numbering applied"
        );
    }
    Ok(outcome)
}

/// Remove the auto-increment prefix from `path`.
pub fn unnumber_path(path: &Path) -> Result<PathBuf, NumberingError> {
    let (parent, name) = parent_and_name(path)?;
    if !numbering::has_number_prefix(&name) {
        return Err(NumberingError::NotNumbered { name });
    }
    let rename = Rename {
        to: numbering::strip_number_prefix(&name).to_string(),
        from: name,
    };
    let (_, to) = apply_rename(&parent, &rename)?;
    tracing::info!(from = %path.display(), to = %to.display(), "Prefix removed");
    Ok(to)
}

fn apply_rename(parent: &Path, rename: &Rename) -> Result<(PathBuf, PathBuf), NumberingError> {
    let from = parent.join(&rename.from);
    let to = parent.join(&rename.to);
    // A case-only change on a case-insensitive filesystem reports `to` as
    // existing; the names differ so it is still a real rename.
    if to.exists() && !rename.from.eq_ignore_ascii_case(&rename.to) {
        return Err(NumberingError::TargetExists { path: to });
    }
    std::fs::rename(&from, &to).map_err(|e| NumberingError::Rename {
        from: from.clone(),
        to: to.clone(),
        source: e,
    })?;
    Ok((from, to))
}
