//! Progressive drawing state machine.
//!
//! A [`Drawer`] owns the canvas, the ordered curve set and a cursor into it.
//! Each call to [`Drawer::step`] draws a bounded number of segments; the
//! caller decides the cadence. [`Drawer::finish_now`] drains the remainder in
//! one call and leaves the canvas exactly as the stepped run would.

use image::{Rgb, RgbImage};
use serde::Serialize;
use strum::{Display, IntoStaticStr};
use tracing::debug;

use crate::{
    canvas::Canvas,
    error::{Result, SketchError},
    mapping::ColorPolicy,
    types::{CurveSet, Point},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum DrawState {
    /// No curves loaded
    Idle,
    /// Curves loaded, cursor at the origin
    Ready,
    Running,
    Paused,
    Finished,
}

/// Position of the next segment to draw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrawCursor {
    pub curve_index: usize,
    pub point_index: usize,
}

impl DrawCursor {
    pub const ORIGIN: DrawCursor = DrawCursor { curve_index: 0, point_index: 0 };
}

/// Per-segment rendering settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeStyle {
    pub thickness: u32,
    pub policy: ColorPolicy,
}

impl StrokeStyle {
    pub fn new(thickness: u32, policy: ColorPolicy) -> Self {
        Self { thickness: thickness.max(1), policy }
    }

    pub fn fixed(color: Rgb<u8>) -> Self {
        Self::new(1, ColorPolicy::Fixed(color))
    }
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// The active curve index moved during this step
    pub curve_changed: bool,
    pub cursor: DrawCursor,
    pub segments_drawn: usize,
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct Drawer {
    source: RgbImage,
    curves: CurveSet,
    cursor: DrawCursor,
    state: DrawState,
    canvas: Canvas,
    background: Rgb<u8>,
}

impl Drawer {
    /// Empty drawer with a placeholder canvas
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            source: RgbImage::new(0, 0),
            curves: CurveSet::default(),
            cursor: DrawCursor::ORIGIN,
            state: DrawState::Idle,
            canvas: Canvas::reset(width, height, background),
            background,
        }
    }

    /// Drawer for `curves` traced from `source`, ready to start
    pub fn with_curves(source: RgbImage, curves: CurveSet, background: Rgb<u8>) -> Self {
        let mut drawer = Self::new(source.width(), source.height(), background);
        drawer.load(source, curves, background);
        drawer
    }

    /// Replace the source and curve set; resets progress and canvas
    pub fn load(&mut self, source: RgbImage, curves: CurveSet, background: Rgb<u8>) {
        let (width, height) = source.dimensions();
        self.source = source;
        self.curves = curves;
        self.background = background;
        self.canvas = Canvas::reset(width, height, background);
        self.cursor = DrawCursor::ORIGIN;
        self.state = DrawState::Ready;
    }

    /// Return to `Ready` (or `Idle` with nothing loaded) and clear the canvas
    pub fn reset(&mut self) {
        self.cursor = DrawCursor::ORIGIN;
        self.canvas.fill(self.background);
        self.state = if self.state == DrawState::Idle {
            DrawState::Idle
        } else {
            DrawState::Ready
        };
    }

    /// Change the background color and reset
    pub fn set_background(&mut self, background: Rgb<u8>) {
        self.background = background;
        self.reset();
    }

    /// Leave `Running` without touching the cursor
    pub fn halt(&mut self) {
        if self.state == DrawState::Running {
            self.state = DrawState::Paused;
        }
    }

    /// Start or resume
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            DrawState::Ready | DrawState::Paused => {
                if self.curves.is_empty() {
                    return Err(SketchError::NoCurves);
                }
                self.state = DrawState::Running;
                Ok(())
            }
            DrawState::Running => Ok(()),
            DrawState::Idle => Err(SketchError::NoImageLoaded),
            state => Err(SketchError::InvalidTransition { state, action: "start" }),
        }
    }

    pub fn pause(&mut self) -> Result<()> {
        match self.state {
            DrawState::Running => {
                self.state = DrawState::Paused;
                Ok(())
            }
            DrawState::Paused => Ok(()),
            state => Err(SketchError::InvalidTransition { state, action: "pause" }),
        }
    }

    /// Draw up to `max_segments` segments (at least one unit of budget)
    ///
    /// Exhausted or degenerate curves consume one unit of budget each while
    /// the cursor rolls over to the next curve.
    pub fn step(&mut self, max_segments: usize, style: &StrokeStyle) -> Result<StepOutcome> {
        if self.state != DrawState::Running {
            return Err(SketchError::InvalidTransition { state: self.state, action: "step" });
        }

        let budget = max_segments.max(1);
        let mut curve_changed = false;
        let mut segments_drawn = 0;

        for _ in 0..budget {
            match self.advance(style) {
                Advance::Drew => segments_drawn += 1,
                Advance::NextCurve => curve_changed = true,
                Advance::Done => break,
            }
        }

        if self.cursor.curve_index >= self.curves.len() {
            self.state = DrawState::Finished;
        }

        Ok(StepOutcome {
            curve_changed,
            cursor: self.cursor,
            segments_drawn,
            finished: self.state == DrawState::Finished,
        })
    }

    /// Whether [`Self::finish_now`] would be accepted in the current state
    pub fn check_finish(&self) -> Result<()> {
        match self.state {
            DrawState::Ready | DrawState::Running | DrawState::Paused => {}
            DrawState::Idle => return Err(SketchError::NoImageLoaded),
            state => return Err(SketchError::InvalidTransition { state, action: "finish" }),
        }
        if self.curves.is_empty() {
            return Err(SketchError::NoCurves);
        }
        Ok(())
    }

    /// Draw every remaining segment with one captured style
    pub fn finish_now(&mut self, style: &StrokeStyle) -> Result<usize> {
        self.check_finish()?;

        let style = *style;
        let mut segments_drawn = 0;
        loop {
            match self.advance(&style) {
                Advance::Drew => segments_drawn += 1,
                Advance::NextCurve => {}
                Advance::Done => break,
            }
        }

        self.cursor = DrawCursor { curve_index: self.curves.len(), point_index: 0 };
        self.state = DrawState::Finished;
        debug!(segments_drawn, "Drained remaining segments");
        Ok(segments_drawn)
    }

    /// One unit of work at the cursor
    fn advance(&mut self, style: &StrokeStyle) -> Advance {
        let Some(curve) = self.curves.get(self.cursor.curve_index) else {
            return Advance::Done;
        };

        let points = curve.points();
        if points.len() < 2 || self.cursor.point_index >= points.len() - 1 {
            self.cursor.curve_index += 1;
            self.cursor.point_index = 0;
            return Advance::NextCurve;
        }

        let from = points[self.cursor.point_index];
        let to = points[self.cursor.point_index + 1];
        let fallback = match style.policy {
            ColorPolicy::Fixed(color) => color,
            ColorPolicy::SampledFromSource => self.background,
        };
        let color = style.policy.segment_color(&self.source, from, to, fallback);

        self.canvas.draw_segment(from, to, color, style.thickness);
        self.cursor.point_index += 1;
        Advance::Drew
    }

    /// Point the next segment starts from, if any
    pub fn next_point(&self) -> Option<Point> {
        let curve = self.curves.get(self.cursor.curve_index)?;
        curve.points().get(self.cursor.point_index).copied()
    }

    /// Share of curves completed, in percent
    pub fn progress_percent(&self) -> f64 {
        if self.curves.is_empty() {
            return 0.0;
        }
        self.cursor.curve_index.min(self.curves.len()) as f64 / self.curves.len() as f64 * 100.0
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn cursor(&self) -> DrawCursor {
        self.cursor
    }

    pub fn curves(&self) -> &CurveSet {
        &self.curves
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn source(&self) -> &RgbImage {
        &self.source
    }

    pub fn background(&self) -> Rgb<u8> {
        self.background
    }
}

enum Advance {
    Drew,
    NextCurve,
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mapping::{ACCENT_GREEN, BLACK, WHITE}, types::Curve};

    fn curve(points: &[(i32, i32)]) -> Curve {
        Curve::new(points.iter().copied().map(Point::from).collect())
    }

    fn gradient_source(size: u32) -> RgbImage {
        RgbImage::from_fn(size, size, |x, y| Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 128]))
    }

    fn sample_curves() -> CurveSet {
        CurveSet::new(vec![
            curve(&[(2, 2), (30, 2), (30, 30), (2, 30), (2, 3)]),
            curve(&[(10, 10), (20, 12)]),
            curve(&[(5, 20), (8, 25), (12, 22), (15, 28)]),
        ])
    }

    fn running(curves: CurveSet) -> Drawer {
        let mut drawer = Drawer::with_curves(gradient_source(40), curves, BLACK);
        drawer.start().unwrap();
        drawer
    }

    #[test]
    fn test_new_drawer_is_idle() {
        let mut drawer = Drawer::new(16, 16, BLACK);
        assert_eq!(drawer.state(), DrawState::Idle);
        assert!(matches!(drawer.start(), Err(SketchError::NoImageLoaded)));
        drawer.reset();
        assert_eq!(drawer.state(), DrawState::Idle);
    }

    #[test]
    fn test_empty_curve_set_rejects_start() {
        let mut drawer = Drawer::with_curves(gradient_source(20), CurveSet::default(), BLACK);
        assert_eq!(drawer.state(), DrawState::Ready);
        assert!(matches!(drawer.start(), Err(SketchError::NoCurves)));
        assert_eq!(drawer.state(), DrawState::Ready);
    }

    #[test]
    fn test_two_point_curve_draws_one_segment_then_finishes() {
        let mut drawer = running(CurveSet::new(vec![curve(&[(1, 1), (6, 1)])]));
        let style = StrokeStyle::fixed(ACCENT_GREEN);

        let first = drawer.step(1, &style).unwrap();
        assert_eq!(first.segments_drawn, 1);
        assert_eq!(first.cursor, DrawCursor { curve_index: 0, point_index: 1 });
        assert!(!first.curve_changed);
        assert_eq!(drawer.state(), DrawState::Running);

        let second = drawer.step(1, &style).unwrap();
        assert_eq!(second.segments_drawn, 0);
        assert!(second.curve_changed);
        assert!(second.finished);
        assert_eq!(drawer.state(), DrawState::Finished);
        assert_eq!(drawer.canvas().pixel(3, 1), Some(ACCENT_GREEN));
    }

    #[test]
    fn test_two_point_curve_rolls_to_next_curve() {
        let mut drawer = running(CurveSet::new(vec![
            curve(&[(1, 1), (6, 1)]),
            curve(&[(1, 5), (6, 5)]),
        ]));
        let style = StrokeStyle::fixed(ACCENT_GREEN);

        drawer.step(1, &style).unwrap();
        let outcome = drawer.step(1, &style).unwrap();
        assert!(outcome.curve_changed);
        assert_eq!(outcome.cursor, DrawCursor { curve_index: 1, point_index: 0 });
        assert_eq!(drawer.state(), DrawState::Running);
    }

    #[test]
    fn test_degenerate_curve_is_skipped() {
        let mut drawer = running(CurveSet::new(vec![
            curve(&[(3, 3)]),
            curve(&[(1, 1), (4, 1)]),
        ]));
        let outcome = drawer.step(10, &StrokeStyle::fixed(WHITE)).unwrap();
        assert_eq!(outcome.segments_drawn, 1);
        assert!(outcome.finished);
    }

    #[test]
    fn test_zero_budget_is_clamped_to_one() {
        let mut drawer = running(sample_curves());
        let outcome = drawer.step(0, &StrokeStyle::fixed(ACCENT_GREEN)).unwrap();
        assert_eq!(outcome.segments_drawn, 1);
    }

    #[test]
    fn test_no_steps_leave_state_untouched() {
        let style = StrokeStyle::fixed(ACCENT_GREEN);
        let mut drawer = running(sample_curves());
        drawer.step(3, &style).unwrap();
        drawer.pause().unwrap();

        let canvas = drawer.canvas().clone();
        let cursor = drawer.cursor();
        assert_eq!(cursor, DrawCursor { curve_index: 0, point_index: 3 });
        assert!(!canvas.is_filled_with(BLACK));

        assert!(drawer.step(5, &style).is_err());
        drawer.pause().unwrap();
        drawer.start().unwrap();
        drawer.pause().unwrap();

        assert_eq!(drawer.state(), DrawState::Paused);
        assert_eq!(drawer.cursor(), cursor);
        assert_eq!(drawer.canvas(), &canvas);
    }

    #[test]
    fn test_step_requires_running() {
        let mut drawer = Drawer::with_curves(gradient_source(40), sample_curves(), BLACK);
        let err = drawer.step(5, &StrokeStyle::fixed(WHITE)).unwrap_err();
        assert!(matches!(err, SketchError::InvalidTransition { state: DrawState::Ready, .. }));
    }

    #[test]
    fn test_pause_preserves_cursor() {
        let mut drawer = running(sample_curves());
        let style = StrokeStyle::fixed(ACCENT_GREEN);
        drawer.step(3, &style).unwrap();
        let cursor = drawer.cursor();

        drawer.pause().unwrap();
        assert_eq!(drawer.state(), DrawState::Paused);
        assert!(drawer.step(3, &style).is_err());
        assert_eq!(drawer.cursor(), cursor);

        drawer.start().unwrap();
        drawer.step(1, &style).unwrap();
        assert_eq!(drawer.cursor().point_index, cursor.point_index + 1);
    }

    #[test]
    fn test_reset_restores_origin_and_background() {
        let mut drawer = running(sample_curves());
        drawer.step(6, &StrokeStyle::fixed(ACCENT_GREEN)).unwrap();
        drawer.pause().unwrap();

        drawer.reset();
        assert_eq!(drawer.state(), DrawState::Ready);
        assert_eq!(drawer.cursor(), DrawCursor::ORIGIN);
        assert!(drawer.canvas().is_filled_with(BLACK));
        assert_eq!(drawer.curves().len(), 3);
    }

    #[test]
    fn test_stepped_and_finish_now_match() {
        for style in [
            StrokeStyle::new(1, ColorPolicy::Fixed(ACCENT_GREEN)),
            StrokeStyle::new(3, ColorPolicy::SampledFromSource),
        ] {
            let mut stepped = running(sample_curves());
            let mut drained = running(sample_curves());

            // Shared starting cursor part way through the first curve
            stepped.step(2, &style).unwrap();
            drained.step(2, &style).unwrap();
            drained.pause().unwrap();

            while stepped.state() == DrawState::Running {
                stepped.step(3, &style).unwrap();
            }
            drained.finish_now(&style).unwrap();

            assert_eq!(stepped.canvas(), drained.canvas());
            assert_eq!(stepped.cursor(), drained.cursor());
            assert_eq!(drained.state(), DrawState::Finished);
        }
    }

    #[test]
    fn test_finish_now_draws_every_segment() {
        let mut drawer = Drawer::with_curves(gradient_source(40), sample_curves(), BLACK);
        let drawn = drawer.finish_now(&StrokeStyle::fixed(ACCENT_GREEN)).unwrap();
        assert_eq!(drawn, sample_curves().segment_count());
        assert_eq!(drawer.progress_percent(), 100.0);
        assert!(drawer.finish_now(&StrokeStyle::fixed(ACCENT_GREEN)).is_err());
    }

    #[test]
    fn test_sampled_policy_uses_source_colors() {
        let mut drawer = running(CurveSet::new(vec![curve(&[(4, 4), (4, 10)])]));
        drawer.step(1, &StrokeStyle::new(1, ColorPolicy::SampledFromSource)).unwrap();

        let expected = *drawer.source().get_pixel(4, 7);
        assert_eq!(drawer.canvas().pixel(4, 4), Some(expected));
        assert_eq!(drawer.canvas().pixel(4, 10), Some(expected));
    }

    #[test]
    fn test_next_point_and_progress() {
        let mut drawer = running(sample_curves());
        assert_eq!(drawer.next_point(), Some(Point::new(2, 2)));
        assert_eq!(drawer.progress_percent(), 0.0);

        // Four segments plus the roll-over land on the second curve
        drawer.step(5, &StrokeStyle::fixed(WHITE)).unwrap();
        assert_eq!(drawer.next_point(), Some(Point::new(10, 10)));
        assert!((drawer.progress_percent() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_background_refills_canvas() {
        let mut drawer = running(sample_curves());
        drawer.step(4, &StrokeStyle::fixed(ACCENT_GREEN)).unwrap();
        drawer.halt();
        drawer.set_background(WHITE);
        assert!(drawer.canvas().is_filled_with(WHITE));
        assert_eq!(drawer.cursor(), DrawCursor::ORIGIN);
        assert_eq!(drawer.state(), DrawState::Ready);
    }
}
