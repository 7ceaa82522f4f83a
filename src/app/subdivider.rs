// NoteKit - app/subdivider.rs
//
// Writes the sections of a markdown document into a sibling folder.
// The source document is read only; its preamble stays where it is.

use crate::core::model::Section;
use crate::core::subdivide;
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::SubdivideError;
use std::path::{Path, PathBuf};

/// Options for one subdivide run.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Heading level to split at; the shallowest level present when unset.
    pub level: Option<u8>,

    /// Output folder name; the document's stem when unset.
    pub folder_name: Option<String>,

    /// Prefix section files with `NNN - `.
    pub auto_increment: bool,
    pub pad_width: usize,

    /// Write into an existing folder, replacing same-named files.
    pub overwrite: bool,

    /// Plan only; nothing is written.
    pub dry_run: bool,

    /// Reviewed names replacing the proposed ones, one per section.
    pub names: Option<Vec<String>>,
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self {
            level: None,
            folder_name: None,
            auto_increment: true,
            pad_width: constants::DEFAULT_SECTION_PAD_WIDTH,
            overwrite: false,
            dry_run: false,
            names: None,
        }
    }
}

/// Files a subdivide run produced (or would produce, for a dry run).
#[derive(Debug)]
pub struct SubdivideOutcome {
    pub folder: PathBuf,
    pub files: Vec<PathBuf>,
    pub sections: Vec<Section>,
    pub written: bool,
}

/// Split `path` into one file per section.
pub fn subdivide(path: &Path, options: &SubdivideOptions) -> Result<SubdivideOutcome, SubdivideError> {
    let markdown = fs::read_file_lossy(path).map_err(|e| SubdivideError::Io {
        path: path.to_path_buf(),
        operation: "read",
        source: e,
    })?;

    let level = match options.level {
        Some(level) if !(1..=6).contains(&level) => {
            return Err(SubdivideError::InvalidLevel { level })
        }
        Some(level) => level,
        None => subdivide::top_level(&markdown).ok_or_else(|| SubdivideError::NoHeadings {
            path: path.to_path_buf(),
            level: None,
        })?,
    };

    let split = subdivide::split_sections(&markdown, level);
    if split.sections.is_empty() {
        return Err(SubdivideError::NoHeadings {
            path: path.to_path_buf(),
            level: Some(level),
        });
    }

    let names = match &options.names {
        Some(names) if names.len() != split.sections.len() => {
            return Err(SubdivideError::NameCountMismatch {
                expected: split.sections.len(),
                actual: names.len(),
            })
        }
        Some(names) => subdivide::dedupe_names(names),
        None => subdivide::proposed_names(&split.sections, options.auto_increment, options.pad_width),
    };

    if let Some(folder_name) = &options.folder_name {
        check_name(folder_name)?;
    }
    for name in &names {
        check_name(name)?;
    }

    let folder = output_folder(path, options.folder_name.as_deref());
    if folder.exists() && !options.overwrite {
        return Err(SubdivideError::TargetExists {
            path: folder,
            is_folder: true,
        });
    }

    let files: Vec<PathBuf> = names
        .iter()
        .map(|name| folder.join(format!("{name}.{}", constants::SECTION_FILE_EXTENSION)))
        .collect();

    tracing::info!(
        document = %path.display(),
        level,
        sections = split.sections.len(),
        folder = %folder.display(),
        dry_run = options.dry_run,
        "Subdividing document"
    );

    if !options.dry_run {
        std::fs::create_dir_all(&folder).map_err(|e| SubdivideError::Io {
            path: folder.clone(),
            operation: "create folder",
            source: e,
        })?;
        for (file, section) in files.iter().zip(&split.sections) {
            std::fs::write(file, &section.body).map_err(|e| SubdivideError::Io {
                path: file.clone(),
                operation: "write",
                source: e,
            })?;
            tracing::debug!(file = %file.display(), line = section.line_number, "Section written");
        }
    }

    Ok(SubdivideOutcome {
        folder,
        files,
        sections: split.sections,
        written: !options.dry_run,
    })
}

/// Reject names that are empty or could resolve outside the output folder.
fn check_name(name: &str) -> Result<(), SubdivideError> {
    let trimmed = name.trim();
    let unsafe_name = trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || name.contains(['/', '\\', '\0']);
    if unsafe_name {
        return Err(SubdivideError::UnsafeName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn output_folder(document: &Path, name: Option<&str>) -> PathBuf {
    let parent = document.parent().unwrap_or_else(|| Path::new(""));
    let name = match name {
        Some(name) => name.to_string(),
        None => document
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| constants::UNTITLED_SECTION_NAME.to_string()),
    };
    parent.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::TempDir;

    const DOC: &str = "Preamble.\n\n# Alpha\nA body.\n\n# Beta: two/three\nB body.\n## Deep\nstill B\n";

    fn write_doc(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("Big Note.md");
        stdfs::write(&path, DOC).unwrap();
        path
    }

    #[test]
    fn test_subdivide_writes_numbered_sections() {
        let dir = TempDir::new().unwrap();
        let doc = write_doc(&dir);

        let outcome = subdivide(&doc, &SubdivideOptions::default()).unwrap();
        assert_eq!(outcome.folder, dir.path().join("Big Note"));
        assert_eq!(
            outcome.files,
            vec![
                dir.path().join("Big Note/001 - Alpha.md"),
                dir.path().join("Big Note/002 - Beta two three.md"),
            ]
        );
        assert_eq!(
            stdfs::read_to_string(&outcome.files[1]).unwrap(),
            "# Beta: two/three\nB body.\n## Deep\nstill B\n"
        );
        assert_eq!(stdfs::read_to_string(&doc).unwrap(), DOC);
    }

    #[test]
    fn test_existing_folder_requires_overwrite() {
        let dir = TempDir::new().unwrap();
        let doc = write_doc(&dir);
        stdfs::create_dir(dir.path().join("Big Note")).unwrap();

        let err = subdivide(&doc, &SubdivideOptions::default()).unwrap_err();
        assert!(matches!(err, SubdivideError::TargetExists { is_folder: true, .. }));

        let options = SubdivideOptions {
            overwrite: true,
            ..Default::default()
        };
        assert_eq!(subdivide(&doc, &options).unwrap().files.len(), 2);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let doc = write_doc(&dir);
        let options = SubdivideOptions {
            dry_run: true,
            auto_increment: false,
            folder_name: Some("parts".to_string()),
            ..Default::default()
        };
        let outcome = subdivide(&doc, &options).unwrap();
        assert!(!outcome.written);
        assert_eq!(outcome.files[0], dir.path().join("parts/Alpha.md"));
        assert!(!dir.path().join("parts").exists());
    }

    #[test]
    fn test_level_and_name_validation() {
        let dir = TempDir::new().unwrap();
        let doc = write_doc(&dir);

        let bad_level = SubdivideOptions {
            level: Some(7),
            ..Default::default()
        };
        assert!(matches!(
            subdivide(&doc, &bad_level),
            Err(SubdivideError::InvalidLevel { level: 7 })
        ));

        let missing = SubdivideOptions {
            level: Some(3),
            ..Default::default()
        };
        assert!(matches!(
            subdivide(&doc, &missing),
            Err(SubdivideError::NoHeadings { level: Some(3), .. })
        ));

        let names = SubdivideOptions {
            names: Some(vec!["one".to_string()]),
            ..Default::default()
        };
        assert!(matches!(
            subdivide(&doc, &names),
            Err(SubdivideError::NameCountMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_unsafe_names_rejected_before_writing() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("Big Note.md");
        stdfs::write(&doc, "# A\n# B\n# C\n").unwrap();

        let options = SubdivideOptions {
            names: Some(vec![
                "../escaped".to_string(),
                "sub/missing".to_string(),
                "ok".to_string(),
            ]),
            ..Default::default()
        };
        let err = subdivide(&doc, &options).unwrap_err();
        assert!(matches!(err, SubdivideError::UnsafeName { ref name } if name == "../escaped"));
        assert!(!dir.path().join("escaped.md").exists());
        assert!(!dir.path().join("Big Note").exists());

        for bad in ["..", "  ", "a\\b"] {
            let options = SubdivideOptions {
                folder_name: Some(bad.to_string()),
                ..Default::default()
            };
            assert!(
                matches!(subdivide(&doc, &options), Err(SubdivideError::UnsafeName { .. })),
                "{bad:?} accepted"
            );
        }
        assert_eq!(stdfs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_document_without_headings() {
        let dir = TempDir::new().unwrap();
        let doc = dir.path().join("flat.md");
        stdfs::write(&doc, "just text\n").unwrap();
        assert!(matches!(
            subdivide(&doc, &SubdivideOptions::default()),
            Err(SubdivideError::NoHeadings { level: None, .. })
        ));
    }
}
