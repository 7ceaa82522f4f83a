// NoteKit - app/vault.rs
//
// Open a directory as a vault in a new host instance.
//
// A directory that already holds the host config directory is opened
// directly. Otherwise it is initialised from a source vault first: the
// config directory is copied, unselected plugins are removed and safe mode
// is switched off, all best-effort after the copy itself.

use crate::platform::fs;
use crate::platform::launcher::{self, Launcher};
use crate::util::constants;
use crate::util::error::VaultError;
use glob::Pattern;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use unicode_normalization::UnicodeNormalization;

/// Settings for one open-vault run.
#[derive(Debug, Clone)]
pub struct VaultOptions {
    /// Host config directory name inside a vault.
    pub config_dir: String,

    /// Vault to copy configuration from when initialising.
    pub source: Option<PathBuf>,

    /// Plugins to keep; every plugin when empty.
    pub include: Vec<String>,

    /// Plugins to drop, applied after `include`.
    pub exclude: Vec<String>,

    /// Re-open the source vault after launching the new one.
    pub relaunch_source: bool,
    pub relaunch_delay: Duration,
}

impl Default for VaultOptions {
    fn default() -> Self {
        Self {
            config_dir: constants::DEFAULT_VAULT_CONFIG_DIR.to_string(),
            source: None,
            include: Vec::new(),
            exclude: Vec::new(),
            relaunch_source: false,
            relaunch_delay: Duration::from_millis(constants::DEFAULT_RELAUNCH_DELAY_MS),
        }
    }
}

/// What `open_path` did.
#[derive(Debug, Default)]
pub struct VaultOutcome {
    /// Normalised target path.
    pub path: PathBuf,

    /// The directory was turned into a vault on this run.
    pub initialised: bool,
    pub copied_files: usize,
    pub kept_plugins: Vec<String>,
    pub removed_plugins: Vec<String>,
    pub relaunched_source: bool,

    /// Best-effort steps that failed.
    pub warnings: Vec<String>,
}

/// Include/exclude glob patterns over plugin directory names.
#[derive(Debug, Clone, Default)]
pub struct PluginSelection {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl PluginSelection {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, VaultError> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    pub fn selects(&self, plugin: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|p| p.matches(plugin));
        included && !self.exclude.iter().any(|p| p.matches(plugin))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, VaultError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| VaultError::InvalidPattern {
                pattern: p.clone(),
                source: e,
            })
        })
        .collect()
}

/// NFC-normalise a path so composed and decomposed spellings agree.
pub fn normalise_path(path: &Path) -> PathBuf {
    PathBuf::from(path.to_string_lossy().nfc().collect::<String>())
}

/// Plugin directory names in `vault`, sorted.
///
/// A vault without a plugins directory has no plugins.
pub fn list_plugins(vault: &Path, config_dir: &str) -> Result<Vec<String>, VaultError> {
    let dir = vault.join(config_dir).join(constants::PLUGINS_DIR_NAME);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    fs::list_child_dirs(&dir).map_err(|e| VaultError::Plugins { path: dir, source: e })
}

/// Open `target` as a vault, initialising it from the source when needed.
pub fn open_path(
    target: &Path,
    options: &VaultOptions,
    launcher: &dyn Launcher,
) -> Result<VaultOutcome, VaultError> {
    let target = normalise_path(target);
    if !target.is_dir() {
        return Err(VaultError::NotADirectory { path: target });
    }
    // Validate patterns before touching anything.
    let selection = PluginSelection::new(&options.include, &options.exclude)?;

    let mut outcome = VaultOutcome {
        path: target.clone(),
        ..Default::default()
    };
    let target_config = target.join(&options.config_dir);

    if target_config.exists() {
        tracing::info!(vault = %target.display(), "Opening existing vault");
        spawn(launcher, &target)?;
        return Ok(outcome);
    }

    let source = options.source.as_deref().ok_or(VaultError::MissingSource)?;
    let source_config = source.join(&options.config_dir);
    tracing::info!(
        vault = %target.display(),
        source = %source.display(),
        "Initialising vault"
    );

    if source_config.is_dir() {
        // A failed copy leaves whatever was copied; initialisation carries
        // on so the new vault still gets safe mode off and a host instance.
        match fs::copy_dir_recursive(&source_config, &target_config) {
            Ok(copied) => outcome.copied_files = copied,
            Err(e) => {
                let err = VaultError::Copy {
                    from: source_config.clone(),
                    to: target_config.clone(),
                    source: e,
                };
                tracing::warn!(error = %err, "Vault configuration only partly copied");
                outcome.warnings.push(err.to_string());
            }
        }
        prune_plugins(&target_config, &selection, &mut outcome);
    } else {
        let msg = format!(
            "Source vault has no '{}' directory; nothing copied",
            options.config_dir
        );
        tracing::warn!(source = %source.display(), "{msg}");
        outcome.warnings.push(msg);
    }

    if let Err(e) = disable_safe_mode(&target_config) {
        tracing::warn!(error = %e, "Could not update app.json");
        outcome.warnings.push(e.to_string());
    }
    outcome.initialised = true;

    spawn(launcher, &target)?;

    if options.relaunch_source {
        std::thread::sleep(options.relaunch_delay);
        match launcher.spawn_uri(&launcher::vault_open_uri(source)) {
            Ok(()) => outcome.relaunched_source = true,
            Err(e) => {
                let msg = format!("Could not relaunch '{}': {e}", source.display());
                tracing::warn!("{msg}");
                outcome.warnings.push(msg);
            }
        }
    }

    Ok(outcome)
}

fn spawn(launcher: &dyn Launcher, vault: &Path) -> Result<(), VaultError> {
    let uri = launcher::vault_open_uri(vault);
    launcher
        .spawn_uri(&uri)
        .map_err(|e| VaultError::Spawn { program: uri, source: e })
}

/// Remove plugin directories that the selection rejects.
fn prune_plugins(config: &Path, selection: &PluginSelection, outcome: &mut VaultOutcome) {
    let plugins_dir = config.join(constants::PLUGINS_DIR_NAME);
    let plugins = match plugins_dir.is_dir().then(|| fs::list_child_dirs(&plugins_dir)) {
        None => return,
        Some(Ok(plugins)) => plugins,
        Some(Err(e)) => {
            let msg = format!("Cannot list '{}': {e}", plugins_dir.display());
            tracing::warn!("{msg}");
            outcome.warnings.push(msg);
            return;
        }
    };

    for plugin in plugins {
        if selection.selects(&plugin) {
            outcome.kept_plugins.push(plugin);
            continue;
        }
        let path = plugins_dir.join(&plugin);
        match std::fs::remove_dir_all(&path) {
            Ok(()) => {
                tracing::debug!(plugin = %plugin, "Plugin removed");
                outcome.removed_plugins.push(plugin);
            }
            Err(e) => {
                let msg = format!("Cannot remove plugin '{plugin}': {e}");
                tracing::warn!("{msg}");
                outcome.warnings.push(msg);
            }
        }
    }
}

/// Set `safeMode = false` in the vault's `app.json`.
///
/// A missing or unparseable file is replaced by a fresh object. Output is
/// tab-indented, as the host writes it.
fn disable_safe_mode(config: &Path) -> Result<(), VaultError> {
    let path = config.join(constants::APP_JSON_FILE_NAME);
    let mut value = std::fs::read_to_string(&path)
        .ok()
        .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).ok())
        .filter(serde_json::Value::is_object)
        .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

    if let Some(map) = value.as_object_mut() {
        map.insert("safeMode".to_string(), serde_json::Value::Bool(false));
    }

    let app_json_err = |e: io::Error| VaultError::AppJson {
        path: path.clone(),
        source: e,
    };
    std::fs::create_dir_all(config).map_err(app_json_err)?;

    let mut text = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut text, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| app_json_err(io::Error::from(e)))?;
    std::fs::write(&path, text).map_err(app_json_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs as stdfs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingLauncher {
        uris: RefCell<Vec<String>>,
    }

    impl Launcher for RecordingLauncher {
        fn spawn_uri(&self, uri: &str) -> io::Result<()> {
            self.uris.borrow_mut().push(uri.to_string());
            Ok(())
        }
    }

    fn source_vault(dir: &Path) -> PathBuf {
        let source = dir.join("source");
        let plugins = source.join(".obsidian/plugins");
        for name in ["calendar", "dataview", "templater-obsidian"] {
            stdfs::create_dir_all(plugins.join(name)).unwrap();
            stdfs::write(plugins.join(name).join("main.js"), "//").unwrap();
        }
        stdfs::write(source.join(".obsidian/app.json"), r#"{"safeMode": true, "x": 1}"#).unwrap();
        source
    }

    #[test]
    fn test_existing_vault_is_only_opened() {
        let dir = TempDir::new().unwrap();
        stdfs::create_dir_all(dir.path().join("vault/.obsidian")).unwrap();
        let launcher = RecordingLauncher::default();

        let outcome =
            open_path(&dir.path().join("vault"), &VaultOptions::default(), &launcher).unwrap();
        assert!(!outcome.initialised);
        assert_eq!(launcher.uris.borrow().len(), 1);
        assert!(launcher.uris.borrow()[0].starts_with("obsidian://open?path="));
    }

    #[test]
    fn test_initialise_copies_and_prunes() {
        let dir = TempDir::new().unwrap();
        let source = source_vault(dir.path());
        let target = dir.path().join("fresh");
        stdfs::create_dir(&target).unwrap();
        let launcher = RecordingLauncher::default();

        let options = VaultOptions {
            source: Some(source.clone()),
            include: vec!["*".to_string()],
            exclude: vec!["templater*".to_string()],
            ..Default::default()
        };
        let outcome = open_path(&target, &options, &launcher).unwrap();

        assert!(outcome.initialised);
        assert_eq!(outcome.kept_plugins, vec!["calendar", "dataview"]);
        assert_eq!(outcome.removed_plugins, vec!["templater-obsidian"]);
        assert!(outcome.warnings.is_empty());
        assert_eq!(
            list_plugins(&target, ".obsidian").unwrap(),
            vec!["calendar", "dataview"]
        );
        // The source keeps everything.
        assert_eq!(list_plugins(&source, ".obsidian").unwrap().len(), 3);

        let app: serde_json::Value = serde_json::from_str(
            &stdfs::read_to_string(target.join(".obsidian/app.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(app["safeMode"], false);
        assert_eq!(app["x"], 1);
        assert_eq!(launcher.uris.borrow().len(), 1);
    }

    #[test]
    fn test_relaunch_opens_source_second() {
        let dir = TempDir::new().unwrap();
        let source = source_vault(dir.path());
        let target = dir.path().join("fresh");
        stdfs::create_dir(&target).unwrap();
        let launcher = RecordingLauncher::default();

        let options = VaultOptions {
            source: Some(source.clone()),
            relaunch_source: true,
            relaunch_delay: Duration::ZERO,
            ..Default::default()
        };
        let outcome = open_path(&target, &options, &launcher).unwrap();
        assert!(outcome.relaunched_source);
        let uris = launcher.uris.borrow();
        assert_eq!(uris[1], launcher::vault_open_uri(&source));
    }

    #[test]
    fn test_unparseable_app_json_is_replaced() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join(".obsidian");
        stdfs::create_dir(&config).unwrap();
        stdfs::write(config.join("app.json"), "{not json").unwrap();

        disable_safe_mode(&config).unwrap();
        let app: serde_json::Value =
            serde_json::from_str(&stdfs::read_to_string(config.join("app.json")).unwrap()).unwrap();
        assert_eq!(app, serde_json::json!({ "safeMode": false }));
    }

    #[test]
    fn test_app_json_is_tab_indented() {
        let dir = TempDir::new().unwrap();
        disable_safe_mode(dir.path()).unwrap();
        let text = stdfs::read_to_string(dir.path().join("app.json")).unwrap();
        assert_eq!(text, "{\n\t\"safeMode\": false\n}");
    }

    #[test]
    fn test_app_json_failure_is_typed() {
        let dir = TempDir::new().unwrap();
        // A file where the config directory should be.
        let config = dir.path().join(".obsidian");
        stdfs::write(&config, "").unwrap();
        let err = disable_safe_mode(&config).unwrap_err();
        assert!(matches!(err, VaultError::AppJson { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_copy_still_initialises() {
        let dir = TempDir::new().unwrap();
        let source = source_vault(dir.path());
        std::os::unix::fs::symlink(
            dir.path().join("nowhere"),
            source.join(".obsidian/dangling"),
        )
        .unwrap();
        let target = dir.path().join("fresh");
        stdfs::create_dir(&target).unwrap();
        let launcher = RecordingLauncher::default();

        let options = VaultOptions {
            source: Some(source),
            ..Default::default()
        };
        let outcome = open_path(&target, &options, &launcher).unwrap();

        assert!(outcome.initialised);
        assert!(outcome.warnings.iter().any(|w| w.contains("Failed to copy")), "{:?}", outcome.warnings);
        let app: serde_json::Value = serde_json::from_str(
            &stdfs::read_to_string(target.join(".obsidian/app.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(app["safeMode"], false);
        assert_eq!(launcher.uris.borrow().len(), 1);
    }

    #[test]
    fn test_errors() {
        let dir = TempDir::new().unwrap();
        let launcher = RecordingLauncher::default();

        let missing = open_path(&dir.path().join("nope"), &VaultOptions::default(), &launcher);
        assert!(matches!(missing, Err(VaultError::NotADirectory { .. })));

        let no_source = open_path(dir.path(), &VaultOptions::default(), &launcher);
        assert!(matches!(no_source, Err(VaultError::MissingSource)));

        let bad = VaultOptions {
            include: vec!["[".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            open_path(dir.path(), &bad, &launcher),
            Err(VaultError::InvalidPattern { .. })
        ));
        assert!(launcher.uris.borrow().is_empty());
    }

    #[test]
    fn test_selection_defaults_to_all() {
        let all = PluginSelection::new(&[], &[]).unwrap();
        assert!(all.selects("anything"));
        let some = PluginSelection::new(&["data*".to_string()], &[]).unwrap();
        assert!(some.selects("dataview"));
        assert!(!some.selects("calendar"));
    }

    #[test]
    fn test_nfc_normalisation() {
        let decomposed = PathBuf::from("/tmp/Cafe\u{301}");
        assert_eq!(normalise_path(&decomposed), PathBuf::from("/tmp/Caf\u{e9}"));
    }
}
