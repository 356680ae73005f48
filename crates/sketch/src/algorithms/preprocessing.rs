use image::GrayImage;
use imageproc::distance_transform::Norm;
use tracing::warn;
use crate::{error::Result, traits::ImagePreprocessor};

/// Two-threshold hysteresis edge detector
///
/// Pixels with gradient magnitude above `high_threshold` are strong edges;
/// pixels above `low_threshold` survive only when connected to a strong edge.
/// When `low_threshold > high_threshold` the two are swapped.
#[derive(Debug, Clone)]
pub struct CannyEdgeDetector {
    pub low_threshold: u32,
    pub high_threshold: u32,
}

impl CannyEdgeDetector {
    pub fn new(low_threshold: u32, high_threshold: u32) -> Self {
        Self { low_threshold, high_threshold }
    }

    /// Thresholds in ascending order
    pub fn ordered_thresholds(&self) -> (u32, u32) {
        if self.low_threshold > self.high_threshold {
            (self.high_threshold, self.low_threshold)
        } else {
            (self.low_threshold, self.high_threshold)
        }
    }
}

impl Default for CannyEdgeDetector {
    fn default() -> Self {
        Self { low_threshold: 10, high_threshold: 60 }
    }
}

impl ImagePreprocessor for CannyEdgeDetector {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        if self.low_threshold > self.high_threshold {
            warn!(
                low = self.low_threshold,
                high = self.high_threshold,
                "Canny low threshold above high threshold, swapping"
            );
        }
        let (low, high) = self.ordered_thresholds();
        Ok(imageproc::edges::canny(image, low as f32, high as f32))
    }
}

/// Morphological dilation with a square structuring element
///
/// A radius of 1 is a single 3x3 pass, which closes one-pixel gaps between
/// edge fragments.
#[derive(Debug, Clone)]
pub struct DilatePreprocessor {
    pub radius: u8,
}

impl Default for DilatePreprocessor {
    fn default() -> Self {
        Self { radius: 1 }
    }
}

impl ImagePreprocessor for DilatePreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(imageproc::morphology::dilate(image, Norm::LInf, self.radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn bright_square() -> GrayImage {
        let mut img = GrayImage::new(60, 60);
        for y in 15..45 {
            for x in 15..45 {
                img.put_pixel(x, y, Luma([220u8]));
            }
        }
        img
    }

    #[test]
    fn test_canny_marks_square_boundary() {
        let edges = CannyEdgeDetector::default().preprocess(&bright_square()).unwrap();
        assert!(edges.pixels().any(|p| p[0] == 255));
        assert!(edges.pixels().all(|p| p[0] == 0 || p[0] == 255));
        // Interior of a flat region carries no gradient
        assert_eq!(edges.get_pixel(30, 30)[0], 0);
    }

    #[test]
    fn test_canny_on_flat_image_is_empty() {
        let flat = GrayImage::from_pixel(40, 40, Luma([128u8]));
        let edges = CannyEdgeDetector::default().preprocess(&flat).unwrap();
        assert!(edges.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_inverted_thresholds_are_swapped() {
        let image = bright_square();
        let ordered = CannyEdgeDetector::new(10, 60).preprocess(&image).unwrap();
        let inverted = CannyEdgeDetector::new(60, 10).preprocess(&image).unwrap();
        assert_eq!(ordered, inverted);
        assert_eq!(CannyEdgeDetector::new(60, 10).ordered_thresholds(), (10, 60));
    }

    #[test]
    fn test_dilate_grows_single_pixel() {
        let mut img = GrayImage::new(9, 9);
        img.put_pixel(4, 4, Luma([255u8]));

        let dilated = DilatePreprocessor::default().preprocess(&img).unwrap();
        let lit = dilated.pixels().filter(|p| p[0] == 255).count();
        assert_eq!(lit, 9);
        assert_eq!(dilated.get_pixel(3, 3)[0], 255);
        assert_eq!(dilated.get_pixel(2, 2)[0], 0);
    }
}
