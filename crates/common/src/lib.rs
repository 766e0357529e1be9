//! Shared types for the quadcam workspace.
//!
//! # Invariants
//! - Window dimensions are never zero.

mod types;

pub use types::{WindowConfig, DEFAULT_HEIGHT, DEFAULT_TITLE, DEFAULT_WIDTH};

pub fn crate_info() -> &'static str {
    "quadcam-common v0.1.0"
}
