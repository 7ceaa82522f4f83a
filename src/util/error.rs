// NoteKit - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every variant keeps its cause so the
// full chain is available for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all NoteKit operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum NoteKitError {
    /// Auto-numbering failed.
    Numbering(NumberingError),

    /// Splitting a document by heading failed.
    Subdivide(SubdivideError),

    /// Opening or initialising a vault failed.
    Vault(VaultError),

    /// Moving the editor cursor to a match failed.
    Navigation(NavigationError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for NoteKitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numbering(e) => write!(f, "Numbering error: {e}"),
            Self::Subdivide(e) => write!(f, "Subdivide error: {e}"),
            Self::Vault(e) => write!(f, "Vault error: {e}"),
            Self::Navigation(e) => write!(f, "Navigation error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for NoteKitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Numbering(e) => Some(e),
            Self::Subdivide(e) => Some(e),
            Self::Vault(e) => Some(e),
            Self::Navigation(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Numbering errors
// ---------------------------------------------------------------------------

/// Errors related to `NN - ` prefix numbering.
#[derive(Debug)]
pub enum NumberingError {
    /// The target has no parent directory to number it within.
    NoParent { path: PathBuf },

    /// The target's file name is not valid UTF-8.
    InvalidName { path: PathBuf },

    /// Gaps exist and no strategy was chosen to resolve them.
    /// `truncated` is set when more gaps exist than `gaps` holds.
    GapsUnresolved {
        gaps: Vec<u32>,
        next: u32,
        truncated: bool,
    },

    /// Remove was requested on a name without a numeric prefix.
    NotNumbered { name: String },

    /// A rename would replace an existing sibling.
    TargetExists { path: PathBuf },

    /// Reading the parent directory failed.
    ReadDir { path: PathBuf, source: io::Error },

    /// The rename itself failed.
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Gaps listed in a `GapsUnresolved` message before eliding the rest.
const GAPS_SHOWN: usize = 20;

impl fmt::Display for NumberingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoParent { path } => {
                write!(f, "'{}' has no parent directory", path.display())
            }
            Self::InvalidName { path } => {
                write!(f, "'{}' does not have a UTF-8 file name", path.display())
            }
            Self::GapsUnresolved {
                gaps,
                next,
                truncated,
            } => {
                let mut list: Vec<String> = gaps
                    .iter()
                    .take(GAPS_SHOWN)
                    .map(u32::to_string)
                    .collect();
                if *truncated || gaps.len() > GAPS_SHOWN {
                    list.push("...".to_string());
                }
                write!(
                    f,
                    "Gaps detected in numbering: {}. Next sequential number: {next}. \
                     Choose --strategy fill-gap, append or reincrement-all.",
                    list.join(", ")
                )
            }
            Self::NotNumbered { name } => {
                write!(f, "'{name}' has no auto-increment prefix")
            }
            Self::TargetExists { path } => {
                write!(f, "'{}' already exists", path.display())
            }
            Self::ReadDir { path, source } => {
                write!(f, "Cannot list '{}': {source}", path.display())
            }
            Self::Rename { from, to, source } => write!(
                f,
                "Failed to rename '{}' to '{}': {source}",
                from.display(),
                to.display()
            ),
        }
    }
}

impl std::error::Error for NumberingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadDir { source, .. } => Some(source),
            Self::Rename { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<NumberingError> for NoteKitError {
    fn from(e: NumberingError) -> Self {
        Self::Numbering(e)
    }
}

// ---------------------------------------------------------------------------
// Subdivide errors
// ---------------------------------------------------------------------------

/// Errors related to splitting a document into section files.
#[derive(Debug)]
pub enum SubdivideError {
    /// The document contains no heading at the requested level.
    NoHeadings { path: PathBuf, level: Option<u8> },

    /// Heading level outside 1..=6.
    InvalidLevel { level: u8 },

    /// The output folder or a section file already exists.
    TargetExists { path: PathBuf, is_folder: bool },

    /// The number of names supplied does not match the number of sections.
    NameCountMismatch { expected: usize, actual: usize },

    /// A folder or section name is empty or would leave the output folder.
    UnsafeName { name: String },

    /// I/O error reading the document or writing a section.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for SubdivideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoHeadings { path, level } => match level {
                Some(l) => write!(f, "'{}' has no level-{l} headings", path.display()),
                None => write!(f, "'{}' has no headings", path.display()),
            },
            Self::InvalidLevel { level } => {
                write!(f, "Heading level {level} is out of range (1-6)")
            }
            Self::TargetExists { path, is_folder } => {
                let kind = if *is_folder { "folder" } else { "file" };
                write!(
                    f,
                    "The {kind} '{}' already exists. Use --force to override it.",
                    path.display()
                )
            }
            Self::NameCountMismatch { expected, actual } => {
                write!(f, "Expected {expected} section names, got {actual}")
            }
            Self::UnsafeName { name } => write!(
                f,
                "'{name}' is not a valid file name (empty, '.', '..' or contains a path separator)"
            ),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for SubdivideError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<SubdivideError> for NoteKitError {
    fn from(e: SubdivideError) -> Self {
        Self::Subdivide(e)
    }
}

// ---------------------------------------------------------------------------
// Vault errors
// ---------------------------------------------------------------------------

/// Errors related to opening a directory as a vault.
#[derive(Debug)]
pub enum VaultError {
    /// The target path does not exist or is not a directory.
    NotADirectory { path: PathBuf },

    /// A new vault needs a source vault to copy its configuration from.
    MissingSource,

    /// A plugin selection glob is invalid.
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// Copying the configuration directory failed.
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    /// The host instance could not be launched.
    Spawn {
        program: String,
        source: io::Error,
    },

    /// Listing the plugins directory failed.
    Plugins { path: PathBuf, source: io::Error },

    /// Writing the vault's `app.json` failed.
    AppJson { path: PathBuf, source: io::Error },
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotADirectory { path } => {
                write!(f, "'{}' is not a directory", path.display())
            }
            Self::MissingSource => write!(
                f,
                "A source vault is required to initialise a new vault (use --source)"
            ),
            Self::InvalidPattern { pattern, source } => {
                write!(f, "Invalid plugin pattern '{pattern}': {source}")
            }
            Self::Copy { from, to, source } => write!(
                f,
                "Failed to copy '{}' to '{}': {source}",
                from.display(),
                to.display()
            ),
            Self::Spawn { program, source } => {
                write!(f, "Failed to launch '{program}': {source}")
            }
            Self::Plugins { path, source } => {
                write!(f, "Could not read plugins directory '{}': {source}", path.display())
            }
            Self::AppJson { path, source } => {
                write!(f, "Could not update '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for VaultError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPattern { source, .. } => Some(source),
            Self::Copy { source, .. } => Some(source),
            Self::Spawn { source, .. } => Some(source),
            Self::Plugins { source, .. } => Some(source),
            Self::AppJson { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<VaultError> for NoteKitError {
    fn from(e: VaultError) -> Self {
        Self::Vault(e)
    }
}

// ---------------------------------------------------------------------------
// Navigation errors
// ---------------------------------------------------------------------------

/// Errors related to moving an editor to a timestamp match.
#[derive(Debug)]
pub enum NavigationError {
    /// The panel has no document associated with its matches.
    NoDocument,

    /// No open editor is bound to the expected document.
    NoActiveEditor { document: PathBuf },

    /// The requested match index does not exist.
    NoSuchMatch { index: usize, count: usize },

    /// The editor process could not be launched.
    Launch {
        program: String,
        source: io::Error,
    },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDocument => {
                write!(f, "Cannot jump: no file is associated with this view")
            }
            Self::NoActiveEditor { document } => write!(
                f,
                "Cannot jump: no active editor found for '{}'",
                document.display()
            ),
            Self::NoSuchMatch { index, count } => {
                write!(f, "Match {index} does not exist ({count} found)")
            }
            Self::Launch { program, source } => {
                write!(f, "Failed to launch editor '{program}': {source}")
            }
        }
    }
}

impl std::error::Error for NavigationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Launch { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<NavigationError> for NoteKitError {
    fn from(e: NavigationError) -> Self {
        Self::Navigation(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for NoteKitError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for NoteKitError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for NoteKit results.
pub type Result<T> = std::result::Result<T, NoteKitError>;
