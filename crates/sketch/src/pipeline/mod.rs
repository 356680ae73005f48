pub mod builder;

use image::{GrayImage, RgbImage};
use tracing::debug;
use crate::{
    error::{Result, SketchError},
    types::{CurveSet, Extraction},
    traits::{ImagePreprocessor, ContourExtractor, CurvePostProcessor},
};

/// Edge-to-curve pipeline: mask stages, a contour tracer, then curve stages
pub struct Pipeline {
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    contour_extractor: Box<dyn ContourExtractor>,
    postprocessors: Vec<Box<dyn CurvePostProcessor>>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Create a new pipeline with the given components
    pub fn new(
        preprocessors: Vec<Box<dyn ImagePreprocessor>>,
        contour_extractor: Box<dyn ContourExtractor>,
        postprocessors: Vec<Box<dyn CurvePostProcessor>>,
    ) -> Self {
        Self {
            preprocessors,
            contour_extractor,
            postprocessors,
        }
    }

    /// Process a grayscale image through the entire pipeline
    pub fn process(&self, image: &GrayImage) -> Result<Extraction> {
        if image.width() == 0 || image.height() == 0 {
            return Err(SketchError::InvalidImage(format!(
                "image has zero extent ({}x{})",
                image.width(),
                image.height()
            )));
        }

        // Step 1: Build the edge mask
        let mut mask = image.clone();
        for preprocessor in &self.preprocessors {
            mask = preprocessor.preprocess(&mask)?;
        }

        // Step 2: Trace boundaries
        let mut curves = self.contour_extractor.extract_contours(&mask)?;
        let traced = curves.len();

        // Step 3: Filter and order
        for postprocessor in &self.postprocessors {
            postprocessor.process(&mut curves)?;
        }

        debug!(traced, kept = curves.len(), "Traced contours");

        Ok(Extraction {
            edge_mask: mask,
            curves: CurveSet::new(curves),
            image_width: image.width(),
            image_height: image.height(),
        })
    }

    /// Convert a color source to intensity and process it
    pub fn process_rgb(&self, source: &RgbImage) -> Result<Extraction> {
        let gray = image::imageops::grayscale(source);
        self.process(&gray)
    }
}

/// Extract the edge mask and ordered curve set from a color source image
///
/// `low_threshold > high_threshold` is accepted; the thresholds are swapped.
pub fn extract(
    source: &RgbImage,
    low_threshold: u32,
    high_threshold: u32,
    min_curve_length: usize,
) -> Result<Extraction> {
    builder::PipelineBuilder::build_standard(low_threshold, high_threshold, min_curve_length)
        .process_rgb(source)
}
