//! Euler-angle FPS camera.
//!
//! Mouse deltas accumulate into yaw/pitch, scroll adjusts the field of view,
//! held movement keys translate the position each frame, and the view matrix
//! is rebuilt on demand with a conventional right-handed look-at.
//!
//! # Invariants
//! - `front` and `up` are unit length after every update.
//! - Pitch stays within the configured limit (default ±89°).
//! - Field of view stays within the zoom range (default 1°..=45°).
//! - Diagonal movement is the unnormalised sum of the held directions.

mod camera;
mod config;
mod view;

pub use camera::{CameraState, CameraSystem, FrameTiming};
pub use config::{CameraConfig, CameraError};
pub use view::{look_at, direction_from_angles};

pub fn crate_info() -> &'static str {
    "quadcam-camera v0.1.0"
}
