use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SketchError},
    mapping::BackgroundMode,
    params::SketchParams,
};

/// Session configuration, loadable from TOML or JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SketchConfig {
    /// Loaded images are resized to this width
    pub working_width: u32,
    /// Loaded images are resized to this height
    pub working_height: u32,
    pub background: BackgroundMode,
    /// Color each segment from the source image
    pub sample_colors: bool,
    /// Emit a tone per tick when a tone sink is attached
    pub sound: bool,
    pub params: SketchParams,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            working_width: 700,
            working_height: 700,
            background: BackgroundMode::Dark,
            sample_colors: false,
            sound: true,
            params: SketchParams::default(),
        }
    }
}

impl SketchConfig {
    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: SketchConfig = toml::from_str(content)?;
        config.validated()
    }

    /// Load configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        let config: SketchConfig = serde_json::from_str(content)?;
        config.validated()
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&fs::read_to_string(path)?),
            Some("json") => Self::from_json(&fs::read_to_string(path)?),
            _ => Err(SketchError::UnsupportedConfigFormat),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save configuration, choosing the format from the extension
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => self.to_toml()?,
            Some("json") => self.to_json()?,
            _ => return Err(SketchError::UnsupportedConfigFormat),
        };
        fs::write(path, content)?;
        Ok(())
    }

    fn validated(mut self) -> Result<Self> {
        if self.working_width == 0 || self.working_height == 0 {
            return Err(SketchError::Config(format!(
                "working size must be non-zero, got {}x{}",
                self.working_width, self.working_height
            )));
        }
        self.params = self.params.sanitized();
        Ok(self)
    }
}
