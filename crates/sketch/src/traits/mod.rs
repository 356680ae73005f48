use image::GrayImage;
use crate::{error::Result, types::Curve};

/// Trait for mask-producing image stages (edge detection, morphology)
pub trait ImagePreprocessor: Send + Sync {
    /// Transform the input image into the next single-channel image
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage>;
}

/// Trait for contour tracing algorithms
pub trait ContourExtractor: Send + Sync {
    /// Trace every boundary in a binary mask as an independent curve
    fn extract_contours(&self, mask: &GrayImage) -> Result<Vec<Curve>>;
}

/// Trait for curve filtering and ordering stages
pub trait CurvePostProcessor: Send + Sync {
    fn process(&self, curves: &mut Vec<Curve>) -> Result<()>;
}
