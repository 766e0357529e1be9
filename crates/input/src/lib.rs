//! Input model: validated keys, tracked input state, and the handler seam the
//! windowing layer delivers events through.
//!
//! # Invariants
//! - Raw key codes are validated into [`Key`] before they touch any state.
//! - The first cursor sample after activation never yields a delta.
//! - Handlers are bound by ownership, never through process-wide state.

pub mod event;
pub mod key;
pub mod state;

pub use event::{InputEvent, InputHandler};
pub use key::{InputError, Key, KeyAction, Movement};
pub use state::InputState;

pub fn crate_info() -> &'static str {
    "quadcam-input v0.1.0"
}
