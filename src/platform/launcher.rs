// NoteKit - platform/launcher.rs
//
// Detached process launching: host application instances (via open URIs)
// and external text editors.
//
// Children are spawned with null stdio and never waited on, so the CLI can
// exit while they keep running.

use crate::util::constants;
use regex::{Captures, Regex};
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

/// Capability to ask the host application to open a URI in a new instance.
pub trait Launcher {
    fn spawn_uri(&self, uri: &str) -> io::Result<()>;
}

/// Build the URI that opens `path` as a vault.
///
/// The path is percent-encoded in full, so separators become `%2F`.
pub fn vault_open_uri(path: &Path) -> String {
    let raw = path.to_string_lossy();
    format!(
        "{}{}",
        constants::VAULT_OPEN_URI_PREFIX,
        urlencoding::encode(&raw)
    )
}

/// Launches the host executable with the URI as its only argument.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    pub program: String,
}

impl ProcessLauncher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Launcher for ProcessLauncher {
    fn spawn_uri(&self, uri: &str) -> io::Result<()> {
        tracing::debug!(program = %self.program, uri, "Spawning host instance");
        spawn_detached(&self.program, &[uri.to_string()])
    }
}

/// Spawn `program` with `args`, detached from our stdio.
pub fn spawn_detached(program: &str, args: &[String]) -> io::Result<()> {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_child| ())
}

/// Spawn `program` with `args`, sharing the terminal.
///
/// Used for terminal editors that must own stdin/stdout; waits for the
/// editor to exit.
pub fn run_foreground(program: &str, args: &[String]) -> io::Result<()> {
    let status = Command::new(program).args(args).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("'{program}' exited with {status}"),
        ))
    }
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(file|line|column)\}").expect("placeholder regex is valid"))
}

/// Substitute `{file}`, `{line}` and `{column}` in an argument template.
///
/// Each argument is expanded in one pass, so placeholder text inside the
/// substituted file path is left alone. `line` and `column` are passed
/// through as given (1-based for most editors).
pub fn expand_editor_args(template: &[String], file: &Path, line: usize, column: usize) -> Vec<String> {
    let file = file.to_string_lossy();
    let line = line.to_string();
    let column = column.to_string();
    template
        .iter()
        .map(|arg| {
            placeholder_regex()
                .replace_all(arg, |caps: &Captures| match &caps[1] {
                    "file" => file.to_string(),
                    "line" => line.clone(),
                    _ => column.clone(),
                })
                .into_owned()
        })
        .collect()
}

/// Split an editor setting such as `code --wait` into program and leading
/// arguments. Whitespace separates words; quoting is not interpreted.
///
/// Returns `None` for a blank setting.
pub fn split_command(command: &str) -> Option<(String, Vec<String>)> {
    let mut words = command.split_whitespace().map(str::to_string);
    let program = words.next()?;
    Some((program, words.collect()))
}
