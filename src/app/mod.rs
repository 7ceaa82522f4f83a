// NoteKit - app/mod.rs
//
// Application layer: filesystem-facing operations built on the core
// logic, plus editor navigation.
// Dependencies: core, platform.
// Must NOT depend on: ui.

pub mod navigation;
pub mod renamer;
pub mod scan;
pub mod subdivider;
pub mod vault;
