use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a camera configuration.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid camera config: {0}")]
    InvalidConfig(String),
}

/// Tunable camera constants. Missing fields in a config file take the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Units per second.
    pub movement_speed: f32,
    /// Degrees of rotation per pixel of cursor travel.
    pub mouse_sensitivity: f32,
    /// Pitch is clamped to `[-pitch_limit, pitch_limit]` degrees.
    pub pitch_limit: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    pub initial_fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            movement_speed: 5.0,
            mouse_sensitivity: 0.05,
            pitch_limit: 89.0,
            zoom_min: 1.0,
            zoom_max: 45.0,
            initial_fov: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, CameraError> {
        let config: CameraConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CameraError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!("loaded camera config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, CameraError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), CameraError> {
        let invalid = |msg: String| -> Result<(), CameraError> { Err(CameraError::InvalidConfig(msg)) };

        if !(self.movement_speed.is_finite() && self.movement_speed > 0.0) {
            return invalid(format!(
                "movement_speed must be positive, got {}",
                self.movement_speed
            ));
        }
        if !(self.mouse_sensitivity.is_finite() && self.mouse_sensitivity > 0.0) {
            return invalid(format!(
                "mouse_sensitivity must be positive, got {}",
                self.mouse_sensitivity
            ));
        }
        // At 90° the front vector is parallel to up and the look-at basis collapses.
        if !(self.pitch_limit > 0.0 && self.pitch_limit < 90.0) {
            return invalid(format!(
                "pitch_limit must be in (0, 90), got {}",
                self.pitch_limit
            ));
        }
        if !(self.zoom_min > 0.0 && self.zoom_min < self.zoom_max && self.zoom_max < 180.0) {
            return invalid(format!(
                "zoom range must satisfy 0 < min < max < 180, got {}..{}",
                self.zoom_min, self.zoom_max
            ));
        }
        if !(self.zoom_min..=self.zoom_max).contains(&self.initial_fov) {
            return invalid(format!(
                "initial_fov {} outside zoom range {}..{}",
                self.initial_fov, self.zoom_min, self.zoom_max
            ));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return invalid(format!(
                "clip planes must satisfy 0 < near < far, got {}..{}",
                self.near, self.far
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_is_valid() {
        CameraConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = CameraConfig::from_json_str(r#"{"movement_speed": 2.5}"#).unwrap();
        assert_eq!(config.movement_speed, 2.5);
        assert_eq!(config.mouse_sensitivity, 0.05);
        assert_eq!(config.zoom_max, 45.0);
    }

    #[test]
    fn rejects_bad_values() {
        let cases = [
            r#"{"movement_speed": 0.0}"#,
            r#"{"mouse_sensitivity": -1.0}"#,
            r#"{"pitch_limit": 90.0}"#,
            r#"{"zoom_min": 50.0}"#,
            r#"{"initial_fov": 60.0}"#,
            r#"{"near": 10.0, "far": 1.0}"#,
        ];
        for json in cases {
            let err = CameraConfig::from_json_str(json).unwrap_err();
            assert!(
                matches!(err, CameraError::InvalidConfig(_)),
                "{json} gave {err}"
            );
        }
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = CameraConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, CameraError::Json(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let config = CameraConfig {
            mouse_sensitivity: 0.1,
            ..CameraConfig::default()
        };
        file.write_all(config.to_json_pretty().unwrap().as_bytes())
            .unwrap();

        let loaded = CameraConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CameraConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CameraError::Io(_)));
    }
}
