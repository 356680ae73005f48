//! Raster output surface.
//!
//! The canvas is an RGB buffer with the working dimensions of the source
//! image. It is only ever mutated by filling it with a background color or by
//! drawing straight segments between traced points.

use std::path::Path;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut, BresenhamLineIter};
use imageproc::rect::Rect;
use tracing::info;

use crate::{
    error::{Result, SketchError},
    types::Point,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Create a canvas uniformly filled with `background`
    pub fn reset(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
        }
    }

    /// Overwrite every pixel with `color`
    pub fn fill(&mut self, color: Rgb<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// Rasterize a straight, non anti-aliased segment
    ///
    /// Thickness 1 is a plain Bresenham line. Thicker strokes stamp a filled
    /// `thickness`×`thickness` square on every Bresenham pixel, offset by
    /// `(thickness - 1) / 2` up and left. Pixels that fall outside the canvas
    /// are clipped.
    pub fn draw_segment(&mut self, from: Point, to: Point, color: Rgb<u8>, thickness: u32) {
        let start = (from.x as f32, from.y as f32);
        let end = (to.x as f32, to.y as f32);

        if thickness <= 1 {
            draw_line_segment_mut(&mut self.image, start, end, color);
            return;
        }

        let offset = ((thickness - 1) / 2) as i32;
        for (x, y) in BresenhamLineIter::new(start, end) {
            let stamp = Rect::at(x - offset, y - offset).of_size(thickness, thickness);
            draw_filled_rect_mut(&mut self.image, stamp, color);
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    /// True when every pixel equals `color`
    pub fn is_filled_with(&self, color: Rgb<u8>) -> bool {
        self.image.pixels().all(|p| *p == color)
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Encode the canvas to `path`; the format follows the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.image.save(path).map_err(|source| SketchError::SaveFailure {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Image saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    const GREEN: Rgb<u8> = Rgb([0, 255, 0]);

    fn lit(canvas: &Canvas, color: Rgb<u8>) -> usize {
        canvas.image().pixels().filter(|p| **p == color).count()
    }

    #[test]
    fn test_reset_is_uniform() {
        let canvas = Canvas::reset(32, 16, GREEN);
        assert_eq!(canvas.dimensions(), (32, 16));
        assert!(canvas.is_filled_with(GREEN));
    }

    #[test]
    fn test_horizontal_segment_covers_endpoints() {
        let mut canvas = Canvas::reset(20, 20, BLACK);
        canvas.draw_segment(Point::new(2, 5), Point::new(12, 5), GREEN, 1);

        assert_eq!(lit(&canvas, GREEN), 11);
        assert_eq!(canvas.pixel(2, 5), Some(GREEN));
        assert_eq!(canvas.pixel(12, 5), Some(GREEN));
        assert_eq!(canvas.pixel(12, 6), Some(BLACK));
    }

    #[test]
    fn test_thick_segment_is_wider() {
        let mut thin = Canvas::reset(30, 30, BLACK);
        let mut thick = Canvas::reset(30, 30, BLACK);
        thin.draw_segment(Point::new(5, 15), Point::new(25, 15), GREEN, 1);
        thick.draw_segment(Point::new(5, 15), Point::new(25, 15), GREEN, 4);

        assert!(lit(&thick, GREEN) > lit(&thin, GREEN));
        assert_eq!(thick.pixel(15, 14), Some(GREEN));
        assert_eq!(thick.pixel(15, 17), Some(GREEN));
        assert_eq!(thick.pixel(15, 13), Some(BLACK));
        assert_eq!(thick.pixel(15, 18), Some(BLACK));
    }

    #[test]
    fn test_each_thickness_has_its_own_width() {
        let column_width = |thickness: u32| {
            let mut canvas = Canvas::reset(30, 30, BLACK);
            canvas.draw_segment(Point::new(5, 15), Point::new(25, 15), GREEN, thickness);
            (0..30).filter(|&y| canvas.pixel(15, y) == Some(GREEN)).count()
        };

        assert_eq!(column_width(1), 1);
        assert_eq!(column_width(2), 2);
        assert_eq!(column_width(3), 3);
        assert_eq!(column_width(4), 4);
        assert_ne!(column_width(2), column_width(3));
    }

    #[test]
    fn test_drawing_is_deterministic() {
        let mut a = Canvas::reset(40, 40, BLACK);
        let mut b = Canvas::reset(40, 40, BLACK);
        for canvas in [&mut a, &mut b] {
            canvas.draw_segment(Point::new(1, 3), Point::new(37, 29), GREEN, 3);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_segment_near_border_is_clipped() {
        let mut canvas = Canvas::reset(10, 10, BLACK);
        canvas.draw_segment(Point::new(0, 0), Point::new(9, 0), GREEN, 5);
        assert_eq!(canvas.pixel(0, 0), Some(GREEN));
        assert_eq!(canvas.pixel(9, 2), Some(GREEN));
    }

    #[test]
    fn test_fill_overwrites_strokes() {
        let mut canvas = Canvas::reset(10, 10, BLACK);
        canvas.draw_segment(Point::new(0, 0), Point::new(9, 9), GREEN, 1);
        canvas.fill(BLACK);
        assert!(canvas.is_filled_with(BLACK));
    }

    #[test]
    fn test_save_roundtrip_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut canvas = Canvas::reset(8, 8, BLACK);
        canvas.draw_segment(Point::new(0, 4), Point::new(7, 4), GREEN, 1);

        let path = dir.path().join("out.png");
        canvas.save(&path).unwrap();
        let reloaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(&reloaded, canvas.image());

        let bad = dir.path().join("missing").join("out.png");
        assert!(matches!(canvas.save(&bad), Err(SketchError::SaveFailure { .. })));
    }
}
