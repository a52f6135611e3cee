// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod catalog;
pub mod config;
pub mod error;
pub mod highlight;
pub mod input;
pub mod logging;
pub mod presenter;
pub mod runtime;
pub mod score_store;
pub mod session;
pub mod stats;
pub mod timer;
pub mod ui;
