use image::GrayImage;
use crate::{
    error::Result,
    traits::ContourExtractor,
    types::{Curve, Point},
};

/// Imageproc-based border follower
///
/// Returns every border (outer and hole) as a flat list; the nesting
/// hierarchy reported by `find_contours` is discarded.
#[derive(Debug, Clone, Default)]
pub struct ImageprocContourExtractor;

impl ContourExtractor for ImageprocContourExtractor {
    fn extract_contours(&self, mask: &GrayImage) -> Result<Vec<Curve>> {
        let contours = imageproc::contours::find_contours::<i32>(mask);

        let result = contours
            .into_iter()
            .map(|contour| {
                let points = contour
                    .points
                    .iter()
                    .map(|p| Point::new(p.x, p.y))
                    .collect();
                Curve::new(points)
            })
            .collect();

        Ok(result)
    }
}
