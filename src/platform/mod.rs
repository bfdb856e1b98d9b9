//! Platform abstraction layer
//!
//! Browser-facing glue that stays testable on native:
//! - Keyboard code → logical action translation
//! - Held-key tracking and one-shot requests

pub mod input;

pub use input::{Action, InputState};
