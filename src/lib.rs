// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod dial;
pub mod dial_gesture;
pub mod focus;
pub mod logging;
pub mod pomodoro;
pub mod runtime;
pub mod slide;
