use serde::{Deserialize, Serialize};

use crate::key::{Key, KeyAction};

/// A single input event as delivered by a windowing layer or read from a
/// recorded script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Key transition.
    Key { key: Key, action: KeyAction },
    /// Absolute cursor position in window coordinates.
    CursorMoved { x: f64, y: f64 },
    /// Vertical scroll offset in lines.
    Scroll { y_offset: f64 },
    /// Frame boundary at `time` seconds since start.
    Frame { time: f32 },
}

/// Receiver of input events.
///
/// The windowing layer holds the handler (or the struct that owns it) and
/// calls these directly, so no global registration is needed.
pub trait InputHandler {
    fn on_key(&mut self, key: Key, action: KeyAction);

    fn on_cursor_moved(&mut self, x: f64, y: f64);

    fn on_scroll(&mut self, y_offset: f64);

    /// Frame boundary. Handlers without per-frame work ignore it.
    fn on_frame(&mut self, _time: f32) {}

    /// Dispatch an [`InputEvent`] to the matching callback.
    fn handle(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Key { key, action } => self.on_key(key, action),
            InputEvent::CursorMoved { x, y } => self.on_cursor_moved(x, y),
            InputEvent::Scroll { y_offset } => self.on_scroll(y_offset),
            InputEvent::Frame { time } => self.on_frame(time),
        }
    }
}
