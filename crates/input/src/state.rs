use glam::Vec2;
use std::collections::HashSet;

use crate::key::{Key, KeyAction, Movement};

/// Keyboard and cursor state accumulated from input events.
#[derive(Debug, Clone)]
pub struct InputState {
    pressed: HashSet<Key>,
    last_cursor: Vec2,
    /// Set until the first cursor sample after activation has been seen.
    first_mouse: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(quadcam_common::WindowConfig::default().center())
    }
}

impl InputState {
    /// Start with no keys held and the cursor assumed at `initial_cursor`.
    pub fn new(initial_cursor: Vec2) -> Self {
        Self {
            pressed: HashSet::new(),
            last_cursor: initial_cursor,
            first_mouse: true,
        }
    }

    /// Apply a key transition. Returns true if the pressed set changed.
    pub fn apply_key(&mut self, key: Key, action: KeyAction) -> bool {
        match action {
            KeyAction::Pressed => self.pressed.insert(key),
            KeyAction::Released => self.pressed.remove(&key),
            KeyAction::Repeat => false,
        }
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn pressed_count(&self) -> usize {
        self.pressed.len()
    }

    /// Each movement with at least one bound key held, in
    /// [`Movement::ALL`] order so repeated frames sum identically.
    ///
    /// Two keys bound to the same movement yield it once.
    pub fn held_movements(&self) -> impl Iterator<Item = Movement> + '_ {
        Movement::ALL.into_iter().filter(|m| {
            self.pressed
                .iter()
                .any(|k| k.movement() == Some(*m))
        })
    }

    /// Record an absolute cursor position and return the offset from the
    /// previous one. The first sample after activation returns `None`.
    ///
    /// Non-finite positions, or positions whose offset overflows, are
    /// dropped without touching the stored cursor.
    pub fn cursor_delta(&mut self, x: f32, y: f32) -> Option<Vec2> {
        let current = Vec2::new(x, y);
        if !current.is_finite() {
            tracing::debug!(x, y, "ignoring non-finite cursor position");
            return None;
        }
        if self.first_mouse {
            self.last_cursor = current;
            self.first_mouse = false;
            return None;
        }
        let delta = current - self.last_cursor;
        if !delta.is_finite() {
            tracing::debug!(x, y, "ignoring cursor jump that overflows");
            return None;
        }
        self.last_cursor = current;
        Some(delta)
    }

    /// Treat the next cursor sample as the first one again, e.g. after the
    /// window regains focus.
    pub fn reactivate(&mut self) {
        tracing::debug!("cursor tracking reactivated");
        self.first_mouse = true;
    }

    pub fn first_mouse(&self) -> bool {
        self.first_mouse
    }

    pub fn last_cursor(&self) -> Vec2 {
        self.last_cursor
    }

    /// Release every key, e.g. when focus is lost mid-press.
    pub fn release_all(&mut self) {
        if !self.pressed.is_empty() {
            tracing::debug!(released = self.pressed.len(), "releasing held keys");
        }
        self.pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cursor_is_window_center() {
        let state = InputState::default();
        assert_eq!(state.last_cursor(), Vec2::new(400.0, 300.0));
        assert!(state.first_mouse());
    }

    #[test]
    fn press_release_repeat() {
        let mut state = InputState::default();
        assert!(state.apply_key(Key::W, KeyAction::Pressed));
        assert!(state.is_pressed(Key::W));
        assert!(!state.apply_key(Key::W, KeyAction::Repeat));
        assert!(state.is_pressed(Key::W));
        assert!(state.apply_key(Key::W, KeyAction::Released));
        assert!(!state.is_pressed(Key::W));
        assert!(!state.apply_key(Key::W, KeyAction::Released));
    }

    #[test]
    fn first_cursor_sample_has_no_delta() {
        let mut state = InputState::default();
        assert_eq!(state.cursor_delta(10.0, 20.0), None);
        assert_eq!(state.last_cursor(), Vec2::new(10.0, 20.0));
        assert_eq!(state.cursor_delta(15.0, 18.0), Some(Vec2::new(5.0, -2.0)));
    }

    #[test]
    fn reactivate_suppresses_next_delta() {
        let mut state = InputState::default();
        state.cursor_delta(0.0, 0.0);
        state.reactivate();
        assert_eq!(state.cursor_delta(500.0, 500.0), None);
        assert_eq!(state.cursor_delta(501.0, 500.0), Some(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn aliased_keys_yield_movement_once() {
        let mut state = InputState::default();
        state.apply_key(Key::W, KeyAction::Pressed);
        state.apply_key(Key::Up, KeyAction::Pressed);
        state.apply_key(Key::Escape, KeyAction::Pressed);
        let held: Vec<Movement> = state.held_movements().collect();
        assert_eq!(held, vec![Movement::Forward]);

        state.apply_key(Key::Right, KeyAction::Pressed);
        let held: Vec<Movement> = state.held_movements().collect();
        assert_eq!(held, vec![Movement::Forward, Movement::StrafeRight]);

        state.release_all();
        assert_eq!(state.pressed_count(), 0);
        assert_eq!(state.held_movements().count(), 0);
    }

    #[test]
    fn non_finite_cursor_is_dropped() {
        let mut state = InputState::default();
        assert_eq!(state.cursor_delta(f32::INFINITY, 0.0), None);
        assert!(state.first_mouse());

        state.cursor_delta(10.0, 10.0);
        assert_eq!(state.cursor_delta(f32::NAN, 0.0), None);
        assert_eq!(state.last_cursor(), Vec2::new(10.0, 10.0));

        state.cursor_delta(f32::MAX, 0.0);
        assert_eq!(state.cursor_delta(-f32::MAX, 0.0), None);
        assert_eq!(state.last_cursor(), Vec2::new(f32::MAX, 0.0));
        assert_eq!(state.cursor_delta(f32::MAX - 1.0, 0.0), Some(Vec2::ZERO));
    }
}
