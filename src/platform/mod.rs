// NoteKit - platform/mod.rs
//
// Platform abstraction layer.
// Dependencies: standard library, directories, walkdir, urlencoding.
// Must NOT depend on: core, app, ui.

pub mod config;
pub mod fs;
pub mod launcher;
