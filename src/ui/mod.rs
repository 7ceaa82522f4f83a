// NoteKit - ui/mod.rs
//
// UI layer: terminal presentation only.
// Dependencies: core (read-only models).
// Must NOT depend on: app, platform, direct I/O beyond the given writer.

pub mod timestamp_list;
