// NoteKit - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for NoteKit configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/notekit/ or %APPDATA%\NoteKit\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Full path of the default config file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub logging: LoggingSection,
    pub numbering: NumberingSection,
    pub subdivide: SubdivideSection,
    pub vault: VaultSection,
    pub editor: EditorSection,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// `[numbering]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct NumberingSection {
    pub pad_width: Option<usize>,
}

/// `[subdivide]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct SubdivideSection {
    pub auto_increment: Option<bool>,
    pub pad_width: Option<usize>,
}

/// `[vault]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct VaultSection {
    /// Host configuration directory name (e.g. ".obsidian").
    pub config_dir: Option<String>,
    /// Host executable launched with an open URI.
    pub executable: Option<String>,
    /// Vault whose configuration seeds new vaults.
    pub source: Option<String>,
    pub relaunch_delay_ms: Option<u64>,
}

/// `[editor]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct EditorSection {
    pub command: Option<String>,
    /// Argument template; `{file}`, `{line}` and `{column}` are substituted.
    pub args: Option<Vec<String>>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Numbering --
    pub number_pad_width: usize,

    // -- Subdivide --
    pub section_auto_increment: bool,
    pub section_pad_width: usize,

    // -- Vault --
    pub vault_config_dir: String,
    pub host_executable: String,
    pub source_vault: Option<PathBuf>,
    pub relaunch_delay_ms: u64,

    // -- Editor --
    /// None means "use $EDITOR, then the built-in default". Words after
    /// the program are passed ahead of `editor_args`.
    pub editor_command: Option<String>,
    pub editor_args: Vec<String>,

    // -- Logging --
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            number_pad_width: constants::DEFAULT_NUMBER_PAD_WIDTH,
            section_auto_increment: true,
            section_pad_width: constants::DEFAULT_SECTION_PAD_WIDTH,
            vault_config_dir: constants::DEFAULT_VAULT_CONFIG_DIR.to_string(),
            host_executable: constants::DEFAULT_HOST_EXECUTABLE.to_string(),
            source_vault: None,
            relaunch_delay_ms: constants::DEFAULT_RELAUNCH_DELAY_MS,
            editor_command: None,
            editor_args: constants::DEFAULT_EDITOR_ARGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate a config file.
///
/// Returns `AppConfig` with validated values and a list of non-fatal problems.
/// A missing file yields defaults with no problems (first run). An unreadable
/// or unparseable file yields defaults plus one problem so the user is told
/// without the command failing.
///
/// Logging is not initialised yet when this runs, so problems are only
/// returned, never logged here.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<ConfigError>) {
    let mut problems: Vec<ConfigError> = Vec::new();

    if !config_path.exists() {
        return (AppConfig::default(), problems);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            problems.push(ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            });
            return (AppConfig::default(), problems);
        }
    };

    match toml::from_str::<RawConfig>(&content) {
        Ok(raw) => {
            let config = validate(raw, &mut problems);
            (config, problems)
        }
        Err(e) => {
            problems.push(ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            });
            (AppConfig::default(), problems)
        }
    }
}

fn out_of_range(field: &str, value: impl ToString, expected: impl Into<String>) -> ConfigError {
    ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected: expected.into(),
    }
}

/// Validate each raw field against named constants; invalid values keep
/// their default and add a problem.
fn validate(raw: RawConfig, problems: &mut Vec<ConfigError>) -> AppConfig {
    let mut config = AppConfig::default();
    let width_range = format!("1-{}", constants::MAX_PAD_WIDTH);

    // -- Numbering: pad_width --
    if let Some(width) = raw.numbering.pad_width {
        if (1..=constants::MAX_PAD_WIDTH).contains(&width) {
            config.number_pad_width = width;
        } else {
            problems.push(out_of_range("numbering.pad_width", width, width_range.as_str()));
        }
    }

    // -- Subdivide --
    if let Some(auto) = raw.subdivide.auto_increment {
        config.section_auto_increment = auto;
    }
    if let Some(width) = raw.subdivide.pad_width {
        if (1..=constants::MAX_PAD_WIDTH).contains(&width) {
            config.section_pad_width = width;
        } else {
            problems.push(out_of_range("subdivide.pad_width", width, width_range.as_str()));
        }
    }

    // -- Vault --
    if let Some(dir) = raw.vault.config_dir {
        let trimmed = dir.trim();
        if trimmed.is_empty() || trimmed.contains('/') || trimmed.contains('\\') {
            problems.push(out_of_range(
                "vault.config_dir",
                &dir,
                "a single directory name",
            ));
        } else {
            config.vault_config_dir = trimmed.to_string();
        }
    }
    if let Some(exe) = raw.vault.executable.filter(|s| !s.trim().is_empty()) {
        config.host_executable = exe;
    }
    if let Some(source) = raw.vault.source.filter(|s| !s.trim().is_empty()) {
        config.source_vault = Some(PathBuf::from(source));
    }
    if let Some(delay) = raw.vault.relaunch_delay_ms {
        if delay <= constants::MAX_RELAUNCH_DELAY_MS {
            config.relaunch_delay_ms = delay;
        } else {
            problems.push(out_of_range(
                "vault.relaunch_delay_ms",
                delay,
                format!("0-{}", constants::MAX_RELAUNCH_DELAY_MS),
            ));
        }
    }

    // -- Editor --
    if let Some(cmd) = raw.editor.command.filter(|s| !s.trim().is_empty()) {
        config.editor_command = Some(cmd);
    }
    if let Some(args) = raw.editor.args {
        if args.iter().any(|a| a.contains("{file}")) {
            config.editor_args = args;
        } else {
            problems.push(out_of_range(
                "editor.args",
                format!("{args:?}"),
                "at least one argument containing {file}",
            ));
        }
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        let lower = level.to_lowercase();
        if constants::VALID_LOG_LEVELS.contains(&lower.as_str()) {
            config.log_level = Some(lower);
        } else {
            problems.push(out_of_range(
                "logging.level",
                level,
                constants::VALID_LOG_LEVELS.join(", "),
            ));
        }
    }

    // -- Logging: file --
    if let Some(file) = raw.logging.file.filter(|f| !f.is_empty()) {
        config.log_file = Some(PathBuf::from(file));
    }

    config
}
