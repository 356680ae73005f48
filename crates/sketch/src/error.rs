use std::path::PathBuf;

use thiserror::Error;

use crate::drawing::DrawState;

#[derive(Error, Debug)]
pub enum SketchError {
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("No image loaded")]
    NoImageLoaded,

    #[error("No contours found. Try adjusting the Canny thresholds and reprocessing.")]
    NoCurves,

    #[error("Cannot {action} while {state}")]
    InvalidTransition { state: DrawState, action: &'static str },

    #[error("Error saving image to {}: {source}", path.display())]
    SaveFailure {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported config format. Please use .toml or .json files")]
    UnsupportedConfigFormat,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for SketchError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SketchError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SketchError>;
