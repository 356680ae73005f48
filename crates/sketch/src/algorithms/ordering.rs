use crate::{error::Result, traits::CurvePostProcessor, types::Curve};

/// Smallest curve length that still forms a segment
pub const MIN_CURVE_LENGTH_FLOOR: usize = 2;

/// Drops curves with fewer than `min_length` points
#[derive(Debug, Clone)]
pub struct MinLengthFilter {
    pub min_length: usize,
}

impl MinLengthFilter {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// Effective threshold, never below [`MIN_CURVE_LENGTH_FLOOR`]
    pub fn effective_min_length(&self) -> usize {
        self.min_length.max(MIN_CURVE_LENGTH_FLOOR)
    }
}

impl Default for MinLengthFilter {
    fn default() -> Self {
        Self { min_length: 10 }
    }
}

impl CurvePostProcessor for MinLengthFilter {
    fn process(&self, curves: &mut Vec<Curve>) -> Result<()> {
        let min_length = self.effective_min_length();
        curves.retain(|curve| curve.len() >= min_length);
        Ok(())
    }
}

/// Orders curves by enclosed area, largest first
///
/// The sort is stable: curves with equal area keep their trace order.
#[derive(Debug, Clone, Default)]
pub struct AreaSortProcessor;

impl CurvePostProcessor for AreaSortProcessor {
    fn process(&self, curves: &mut Vec<Curve>) -> Result<()> {
        curves.sort_by(|a, b| b.area().total_cmp(&a.area()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn rect(w: i32, h: i32, extra: usize) -> Curve {
        let mut points = vec![
            Point::new(0, 0),
            Point::new(w, 0),
            Point::new(w, h),
            Point::new(0, h),
        ];
        points.extend(std::iter::repeat(Point::new(0, h)).take(extra));
        Curve::new(points)
    }

    #[test]
    fn test_filter_respects_floor() {
        let mut curves = vec![
            Curve::new(vec![Point::new(0, 0)]),
            Curve::new(vec![Point::new(0, 0), Point::new(1, 1)]),
        ];
        MinLengthFilter::new(0).process(&mut curves).unwrap();
        assert_eq!(curves.len(), 1);
        assert_eq!(curves[0].len(), 2);
    }

    #[test]
    fn test_filter_drops_short_curves() {
        let mut curves = vec![rect(5, 5, 0), rect(5, 5, 8), rect(2, 2, 6)];
        MinLengthFilter::new(10).process(&mut curves).unwrap();
        assert_eq!(curves.len(), 2);
        assert!(curves.iter().all(|c| c.len() >= 10));
    }

    #[test]
    fn test_sort_is_descending_and_stable() {
        // Same area, distinguished by trailing point count
        let mut curves = vec![rect(2, 2, 1), rect(10, 10, 0), rect(2, 2, 2), rect(5, 5, 0)];
        AreaSortProcessor.process(&mut curves).unwrap();

        let areas: Vec<f64> = curves.iter().map(Curve::area).collect();
        assert_eq!(areas, vec![100.0, 25.0, 4.0, 4.0]);
        assert_eq!(curves[2].len(), 5);
        assert_eq!(curves[3].len(), 6);
    }
}
