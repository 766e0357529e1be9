use glam::Vec2;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_TITLE: &str = "GLRendering";

/// Window size and title shared by the desktop app and the camera's
/// initial cursor position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            title: DEFAULT_TITLE.into(),
        }
    }
}

impl WindowConfig {
    /// Build a config, clamping zero dimensions to one pixel.
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            title: title.into(),
        }
    }

    /// Centre of the window in cursor coordinates.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_matches_demo() {
        let w = WindowConfig::default();
        assert_eq!(w.width, 800);
        assert_eq!(w.height, 600);
        assert_eq!(w.title, "GLRendering");
    }

    #[test]
    fn center_is_half_extent() {
        let w = WindowConfig::default();
        assert_eq!(w.center(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn zero_dimensions_are_clamped() {
        let w = WindowConfig::new(0, 0, "x");
        assert_eq!((w.width, w.height), (1, 1));
        assert_eq!(w.aspect(), 1.0);
    }
}
