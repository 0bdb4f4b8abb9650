// Library surface for headless/integration tests and reuse.
// main.rs only wires the terminal, config and logging around it.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod graph;
pub mod history;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod stopwatch;
pub mod ui;
pub mod util;

pub use error::{Error, Result};
