// NoteKit - lib.rs
//
// Library entry point. The `notekit` binary in `main.rs` is a thin clap
// front end over these modules; integration tests use them directly.

pub mod app;
pub mod core;
pub mod platform;
pub mod ui;
pub mod util;
