// NoteKit - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "NoteKit";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "NoteKit";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Timestamp scanning
// =============================================================================

/// Maximum number of notes scanned in a single directory scan.
pub const DEFAULT_MAX_SCAN_FILES: usize = 5_000;

/// Maximum directory recursion depth when discovering notes.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// File extensions treated as notes during directory scans.
pub const NOTE_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// Directory names never descended into during a scan.
pub const SCAN_EXCLUDED_DIRS: &[&str] = &[".obsidian", ".git", ".trash", "node_modules"];

/// Maximum characters of a line shown in a list preview.
pub const MAX_PREVIEW_CHARS: usize = 160;

// =============================================================================
// Auto-numbering
// =============================================================================

/// Default zero-pad width of `NN - ` prefixes applied to files and folders.
pub const DEFAULT_NUMBER_PAD_WIDTH: usize = 2;

/// Upper bound on any configurable pad width.
pub const MAX_PAD_WIDTH: usize = 6;

/// Most gaps a numbering plan lists; further gaps are only flagged.
pub const MAX_TRACKED_GAPS: usize = 1_000;

// =============================================================================
// Subdivider
// =============================================================================

/// Default zero-pad width of section prefixes (`001 - `).
pub const DEFAULT_SECTION_PAD_WIDTH: usize = 3;

/// Name used when a heading sanitises to an empty string.
pub const UNTITLED_SECTION_NAME: &str = "Untitled";

/// Extension given to every written section file.
pub const SECTION_FILE_EXTENSION: &str = "md";

// =============================================================================
// Vault launcher
// =============================================================================

/// Host configuration directory that marks a directory as a vault.
pub const DEFAULT_VAULT_CONFIG_DIR: &str = ".obsidian";

/// Plugin subdirectory inside the host configuration directory.
pub const PLUGINS_DIR_NAME: &str = "plugins";

/// Host settings file rewritten to disable safe mode.
pub const APP_JSON_FILE_NAME: &str = "app.json";

/// URI scheme prefix used to ask the host to open a path.
pub const VAULT_OPEN_URI_PREFIX: &str = "obsidian://open?path=";

/// Default host executable name.
pub const DEFAULT_HOST_EXECUTABLE: &str = "obsidian";

/// Delay before the source vault is relaunched after initialising a new one.
pub const DEFAULT_RELAUNCH_DELAY_MS: u64 = 1_500;

/// Maximum configurable relaunch delay.
pub const MAX_RELAUNCH_DELAY_MS: u64 = 60_000;

// =============================================================================
// Editor navigation
// =============================================================================

/// Default editor command used by `notekit goto` when neither the config
/// nor `$EDITOR` provides one.
pub const DEFAULT_EDITOR_COMMAND: &str = "vi";

/// Default argument template for the editor command.
pub const DEFAULT_EDITOR_ARGS: &[&str] = &["+{line}", "{file}"];

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Accepted values for `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
