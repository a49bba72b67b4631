use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("global_scale must be finite and non-zero, got {0}")]
    InvalidScale(f32),
}

/// Knobs applied while turning a scene description into a model.
#[derive(serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LoadSettings {
    /// Multiplies every vertex position and morph position delta.
    pub global_scale: f32,
    /// Wrap `current_time` back to zero once it passes the last keyframe.
    pub loop_animation: bool,
    /// Scene to traverse. `None` picks the document's default scene.
    pub scene: Option<usize>,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            global_scale: 1.0,
            loop_animation: true,
            scene: None,
        }
    }
}

impl LoadSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: LoadSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::debug!("Loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    pub fn with_scale(mut self, global_scale: f32) -> Self {
        self.global_scale = global_scale;
        self
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if !self.global_scale.is_finite() || self.global_scale == 0.0 {
            return Err(SettingsError::InvalidScale(self.global_scale));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings = LoadSettings::from_json_str(r#"{ "global_scale": 0.5 }"#).unwrap();
        assert_eq!(settings.global_scale, 0.5);
        assert!(settings.loop_animation);
        assert_eq!(settings.scene, None);
    }

    #[test]
    fn rejects_zero_scale() {
        let err = LoadSettings::from_json_str(r#"{ "global_scale": 0.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidScale(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = LoadSettings::from_json_str("{ global_scale: }").unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }
}
