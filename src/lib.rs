//! Skyhop - an endless vertical platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integration, collisions, platform streaming, game state)
//! - `tuning`: Data-driven game balance
//! - `platform`: Browser input translation

pub mod platform;
pub mod sim;
pub mod tuning;

pub use sim::{FrameSnapshot, Session, SessionPhase, TickInput};
pub use tuning::{Tuning, TuningError};

/// Host constants that are not part of [`Tuning`]
pub mod consts {
    /// Frame spacing of the headless native demo (60 Hz)
    pub const DEMO_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Frames simulated by the headless native demo
    pub const DEMO_FRAMES: u64 = 3_600;
    /// Frames between progress lines in the headless demo
    pub const DEMO_LOG_INTERVAL: u64 = 600;
}
