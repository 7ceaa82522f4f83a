// NoteKit - app/navigation.rs
//
// Holds the most recent scan result for a document and moves an editor to
// a selected match.
//
// The host's workspace is abstracted as a set of opaque leaf handles plus a
// predicate telling whether a leaf shows a given document. Nothing here
// inspects concrete view types.

use crate::core::model::TimestampMatch;
use crate::core::scanner::{Editor, Position};
use crate::platform::launcher;
use crate::util::error::NavigationError;
use std::path::{Path, PathBuf};

/// The host workspace: leaves that may show documents, each possibly with
/// an editor.
pub trait Workspace {
    /// Opaque leaf handle.
    type Leaf: Copy;
    type Editor: Editor;

    /// Every leaf currently showing a markdown document.
    fn leaves(&self) -> Vec<Self::Leaf>;

    /// Whether `leaf` is showing `document`.
    fn shows_document(&self, leaf: Self::Leaf, document: &Path) -> bool;

    /// Open `document` in a leaf, reusing an existing one when possible.
    ///
    /// Returns `None` when the host cannot open it.
    fn open_document(&mut self, document: &Path) -> Option<Self::Leaf>;

    /// Make `leaf` the active leaf.
    fn set_active(&mut self, leaf: Self::Leaf);

    /// Editor of the active leaf, if it has one.
    fn active_editor(&mut self) -> Option<&mut Self::Editor>;
}

/// Scan results bound to the document they came from.
///
/// Replaced wholesale on every scan; there is no incremental update.
#[derive(Debug, Default, Clone)]
pub struct TimestampPanel {
    matches: Vec<TimestampMatch>,
    document: Option<PathBuf>,
}

impl TimestampPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed matches and their source document.
    pub fn set_matches(&mut self, matches: Vec<TimestampMatch>, document: impl Into<PathBuf>) {
        self.matches = matches;
        self.document = Some(document.into());
    }

    /// Drop all state, e.g. when the source document is closed.
    pub fn clear(&mut self) {
        self.matches.clear();
        self.document = None;
    }

    pub fn matches(&self) -> &[TimestampMatch] {
        &self.matches
    }

    pub fn document(&self) -> Option<&Path> {
        self.document.as_deref()
    }

    /// Match by 1-based index, as shown to the user.
    pub fn get(&self, index: usize) -> Result<&TimestampMatch, NavigationError> {
        index
            .checked_sub(1)
            .and_then(|i| self.matches.get(i))
            .ok_or(NavigationError::NoSuchMatch {
                index,
                count: self.matches.len(),
            })
    }

    /// Jump to the match at 1-based `index` in `workspace`.
    pub fn activate<W: Workspace>(
        &self,
        workspace: &mut W,
        index: usize,
    ) -> Result<(), NavigationError> {
        let document = self.document.as_deref().ok_or(NavigationError::NoDocument)?;
        let tsm = self.get(index)?;
        jump_to_match(workspace, document, tsm)
    }
}

/// Activate the leaf showing `document` and put the cursor on `tsm`.
///
/// Falls back to asking the workspace to open the document when no leaf
/// shows it yet.
pub fn jump_to_match<W: Workspace>(
    workspace: &mut W,
    document: &Path,
    tsm: &TimestampMatch,
) -> Result<(), NavigationError> {
    let existing = workspace
        .leaves()
        .into_iter()
        .find(|leaf| workspace.shows_document(*leaf, document));

    let leaf = match existing {
        Some(leaf) => Some(leaf),
        None => workspace.open_document(document),
    };
    let Some(leaf) = leaf else {
        tracing::warn!(document = %document.display(), "No leaf could show the document");
        return Err(NavigationError::NoActiveEditor {
            document: document.to_path_buf(),
        });
    };
    workspace.set_active(leaf);

    let editor = workspace
        .active_editor()
        .ok_or_else(|| NavigationError::NoActiveEditor {
            document: document.to_path_buf(),
        })?;

    let line = tsm.line_number.saturating_sub(1);
    let from = Position {
        line,
        ch: tsm.start_char,
    };
    let to = Position {
        line,
        ch: tsm.end_char,
    };
    editor.set_cursor(from);
    editor.scroll_into_view(from, to, true);
    editor.focus();

    tracing::debug!(
        document = %document.display(),
        line = tsm.line_number,
        ch = tsm.start_char,
        "Jumped to timestamp"
    );
    Ok(())
}

// =============================================================================
// External editor
// =============================================================================

/// An editor process opened at the cursor position on focus.
///
/// Cursor and scroll requests are recorded; `focus` launches the command
/// with `{file}`, `{line}` and `{column}` substituted (both 1-based).
#[derive(Debug)]
pub struct ExternalEditor {
    pub command: String,
    pub args: Vec<String>,
    pub file: PathBuf,
    /// Run attached to the terminal and wait (terminal editors).
    pub foreground: bool,
    cursor: Position,
    launch_error: Option<NavigationError>,
}

impl ExternalEditor {
    pub fn new(command: impl Into<String>, args: Vec<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            args,
            file: file.into(),
            foreground: true,
            cursor: Position { line: 0, ch: 0 },
            launch_error: None,
        }
    }

    /// Arguments the next launch would use.
    pub fn launch_args(&self) -> Vec<String> {
        launcher::expand_editor_args(
            &self.args,
            &self.file,
            self.cursor.line + 1,
            self.cursor.ch + 1,
        )
    }

    /// Error from the last `focus`, if the launch failed.
    pub fn take_launch_error(&mut self) -> Option<NavigationError> {
        self.launch_error.take()
    }
}

impl Editor for ExternalEditor {
    fn set_cursor(&mut self, pos: Position) {
        self.cursor = pos;
    }

    fn scroll_into_view(&mut self, _from: Position, _to: Position, _center: bool) {
        // The launched editor scrolls to the cursor on open.
    }

    fn focus(&mut self) {
        let args = self.launch_args();
        let result = if self.foreground {
            launcher::run_foreground(&self.command, &args)
        } else {
            launcher::spawn_detached(&self.command, &args)
        };
        if let Err(e) = result {
            tracing::warn!(command = %self.command, error = %e, "Editor launch failed");
            self.launch_error = Some(NavigationError::Launch {
                program: self.command.clone(),
                source: e,
            });
        }
    }
}

/// A one-document workspace backed by an external editor.
#[derive(Debug)]
pub struct ExternalWorkspace {
    editor: ExternalEditor,
    active: bool,
}

impl ExternalWorkspace {
    pub fn new(editor: ExternalEditor) -> Self {
        Self {
            editor,
            active: false,
        }
    }

    pub fn editor_mut(&mut self) -> &mut ExternalEditor {
        &mut self.editor
    }
}

impl Workspace for ExternalWorkspace {
    type Leaf = ();
    type Editor = ExternalEditor;

    fn leaves(&self) -> Vec<()> {
        vec![()]
    }

    fn shows_document(&self, _leaf: (), document: &Path) -> bool {
        self.editor.file == document
    }

    fn open_document(&mut self, _document: &Path) -> Option<()> {
        None
    }

    fn set_active(&mut self, _leaf: ()) {
        self.active = true;
    }

    fn active_editor(&mut self) -> Option<&mut ExternalEditor> {
        self.active.then_some(&mut self.editor)
    }
}
