use geo_types::{Coord, LineString, Polygon};
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Integer pixel coordinate on the source image grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Integer midpoint, rounded towards negative infinity
    pub fn midpoint(self, other: Point) -> Point {
        Point {
            x: (self.x + other.x).div_euclid(2),
            y: (self.y + other.y).div_euclid(2),
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A traced boundary: an ordered run of points drawn as consecutive segments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    points: Vec<Point>,
    /// Enclosed area of the closed ring, cached for ordering
    area: f64,
}

impl Curve {
    pub fn new(points: Vec<Point>) -> Self {
        use geo::Area;

        let mut curve = Self { points, area: 0.0 };
        if curve.points.len() >= 3 {
            curve.area = curve.to_geo_polygon().unsigned_area();
        }
        curve
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of drawable segments
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Convert to a geo-types Polygon (the ring is closed implicitly)
    pub fn to_geo_polygon(&self) -> Polygon<f64> {
        let coords: Vec<Coord<f64>> = self
            .points
            .iter()
            .map(|p| Coord { x: p.x as f64, y: p.y as f64 })
            .collect();

        Polygon::new(LineString::new(coords), vec![])
    }
}

/// Curves in drawing order (largest enclosed area first)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurveSet {
    curves: Vec<Curve>,
}

impl CurveSet {
    pub fn new(curves: Vec<Curve>) -> Self {
        Self { curves }
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Curve> {
        self.curves.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Curve> {
        self.curves.iter()
    }

    /// Total number of segments across all curves
    pub fn segment_count(&self) -> usize {
        self.curves.iter().map(Curve::segment_count).sum()
    }
}

impl From<Vec<Curve>> for CurveSet {
    fn from(curves: Vec<Curve>) -> Self {
        Self::new(curves)
    }
}

impl<'a> IntoIterator for &'a CurveSet {
    type Item = &'a Curve;
    type IntoIter = std::slice::Iter<'a, Curve>;

    fn into_iter(self) -> Self::IntoIter {
        self.curves.iter()
    }
}

/// Output of one extraction run
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Dilated binary edge mask (0 or 255)
    pub edge_mask: GrayImage,
    pub curves: CurveSet,
    /// Original image dimensions
    pub image_width: u32,
    pub image_height: u32,
}
