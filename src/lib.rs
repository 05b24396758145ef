// Library surface for the binary, headless integration tests, and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod dictionary;
pub mod history;
pub mod logging;
pub mod metrics;
pub mod runtime;
pub mod session;
pub mod ui;
pub mod util;
pub mod word_sampler;

pub use runtime::TICK_RATE_MS;
