// Library surface for headless/integration tests and reuse.
// The bin keeps its screen types and rendering to itself; only the
// testable game core is exported here.
pub mod alphabet;
pub mod app_dirs;
pub mod audio;
pub mod catch;
pub mod config;
pub mod game;
pub mod round;
pub mod runtime;
pub mod score;
pub mod session;
pub mod speech;
pub mod stats;

/// Interval of the game's scheduler tick, in milliseconds.
pub const TICK_RATE_MS: u64 = 100;
