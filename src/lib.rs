// Library surface for the terminal binary and headless integration tests.
pub mod app;
pub mod app_dirs;
pub mod catalog;
pub mod config;
pub mod diff;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod runtime;
pub mod scorer;
pub mod session;
pub mod timer;
pub mod ui;

pub use app::App;
