// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod feedback;
pub mod gesture;
pub mod input;
pub mod item;
pub mod logging;
pub mod random;
pub mod render;
pub mod runtime;
pub mod scheduler;
pub mod scoring;
pub mod session;
pub mod timers;
