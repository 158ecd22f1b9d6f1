// Library target holds the whole program so the binary, integration tests
// and benchmarks share one module tree.

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod config;
pub mod event;
pub mod logging;
pub mod remote;
pub mod session;
pub mod store;
pub mod ui;
