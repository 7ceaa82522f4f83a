// NoteKit - core/mod.rs
//
// Core logic layer: timestamp matching, numbering plans, heading splits,
// export writers.
// Dependencies: standard library, regex, chrono, serde, csv.
// Must NOT depend on: ui, platform, app, or filesystem access.

pub mod export;
pub mod model;
pub mod numbering;
pub mod scanner;
pub mod subdivide;
