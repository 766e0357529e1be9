use glam::{Mat4, Vec3};
use quadcam_common::WindowConfig;
use quadcam_input::{InputHandler, InputState, Key, KeyAction, Movement};

use crate::config::CameraConfig;
use crate::view::{direction_from_angles, look_at};

/// Camera orientation and position. Angles are in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    /// Accumulates without wrapping.
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        // Yaw 0° faces +X, so start at -90° to face -Z.
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            fov: 45.0,
        }
    }
}

impl CameraState {
    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize()
    }

    /// Add angle offsets, clamp pitch, and rebuild `front`.
    ///
    /// Returns `false` and leaves the state untouched when the new angles
    /// would not be finite.
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32, pitch_limit: f32) -> bool {
        let yaw = self.yaw + yaw_delta;
        let pitch = self.pitch + pitch_delta;
        if !yaw.is_finite() || !pitch.is_finite() {
            return false;
        }
        self.yaw = yaw;
        self.pitch = pitch.clamp(-pitch_limit, pitch_limit);
        self.front = direction_from_angles(self.yaw, self.pitch);
        true
    }

    /// Scrolling up (positive offset) narrows the field of view. A
    /// non-finite offset is ignored.
    pub fn zoom(&mut self, y_offset: f32, min: f32, max: f32) -> bool {
        if !y_offset.is_finite() {
            return false;
        }
        self.fov = (self.fov - y_offset).clamp(min, max);
        true
    }

    pub fn translate(&mut self, movement: Movement, distance: f32) {
        match movement {
            Movement::Forward => self.position += self.front * distance,
            Movement::Backward => self.position -= self.front * distance,
            Movement::StrafeLeft => self.position -= self.right() * distance,
            Movement::StrafeRight => self.position += self.right() * distance,
        }
    }
}

/// Seconds between frames, derived from a monotonic clock reading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTiming {
    pub delta_time: f32,
    pub last_frame: f32,
}

impl FrameTiming {
    /// Advance to `now` seconds and return the elapsed time. A clock that
    /// runs backwards yields zero.
    pub fn tick(&mut self, now: f32) -> f32 {
        self.delta_time = (now - self.last_frame).max(0.0);
        self.last_frame = now;
        self.delta_time
    }
}

/// Camera driven by input events and per-frame updates.
///
/// Owns the camera, input and timing state. The windowing layer forwards
/// events through [`InputHandler`] and calls [`CameraSystem::frame`] once per
/// frame.
#[derive(Debug, Clone)]
pub struct CameraSystem {
    state: CameraState,
    input: InputState,
    timing: FrameTiming,
    config: CameraConfig,
}

impl Default for CameraSystem {
    fn default() -> Self {
        Self::new(CameraConfig::default(), &WindowConfig::default())
    }
}

impl CameraSystem {
    pub fn new(config: CameraConfig, window: &WindowConfig) -> Self {
        let state = CameraState {
            fov: config.initial_fov,
            ..CameraState::default()
        };
        Self {
            state,
            input: InputState::new(window.center()),
            timing: FrameTiming::default(),
            config,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn timing(&self) -> FrameTiming {
        self.timing
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.input.is_pressed(key)
    }

    /// The next cursor sample re-anchors instead of rotating.
    pub fn reactivate_mouse(&mut self) {
        self.input.reactivate();
    }

    pub fn release_keys(&mut self) {
        self.input.release_all();
    }

    /// Advance frame timing to `now` seconds and apply held movement.
    pub fn frame(&mut self, now: f32) {
        let dt = self.timing.tick(now);
        self.update(dt);
    }

    /// Move along every held direction for `delta_time` seconds.
    ///
    /// Directions are summed without normalising, so diagonals are faster.
    pub fn update(&mut self, delta_time: f32) {
        let velocity = self.config.movement_speed * delta_time;
        for movement in self.input.held_movements() {
            self.state.translate(movement, velocity);
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        look_at(
            self.state.position,
            self.state.position + self.state.front,
            self.state.up,
        )
    }

    /// View matrix as 16 column-major floats.
    pub fn view_matrix_cols(&self) -> [f32; 16] {
        self.view_matrix().to_cols_array()
    }

    /// Field of view in degrees.
    pub fn fov(&self) -> f32 {
        self.state.fov
    }

    /// OpenGL-style perspective projection using the current zoom.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.state.fov.to_radians(),
            aspect,
            self.config.near,
            self.config.far,
        )
    }
}

impl InputHandler for CameraSystem {
    fn on_key(&mut self, key: Key, action: KeyAction) {
        if self.input.apply_key(key, action) {
            tracing::trace!(
                %key,
                ?action,
                held = self.input.pressed_count(),
                "key state changed"
            );
        }
    }

    fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let Some(delta) = self.input.cursor_delta(x as f32, y as f32) else {
            tracing::debug!(x, y, "cursor sample anchored or dropped");
            return;
        };
        let offset = delta * self.config.mouse_sensitivity;
        // Screen y grows downwards while pitch grows upwards.
        if !self
            .state
            .rotate(offset.x, -offset.y, self.config.pitch_limit)
        {
            tracing::debug!(x, y, "ignoring cursor move with non-finite rotation");
            return;
        }
        tracing::trace!(
            yaw = self.state.yaw,
            pitch = self.state.pitch,
            "camera rotated"
        );
    }

    fn on_scroll(&mut self, y_offset: f64) {
        if !self
            .state
            .zoom(y_offset as f32, self.config.zoom_min, self.config.zoom_max)
        {
            tracing::debug!(y_offset, "ignoring non-finite scroll");
            return;
        }
        tracing::trace!(fov = self.state.fov, "camera zoomed");
    }

    fn on_frame(&mut self, time: f32) {
        self.frame(time);
    }
}
