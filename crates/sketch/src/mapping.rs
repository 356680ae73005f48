//! Color and audio mapping.
//!
//! Pure functions consulted by the drawing loop: the stroke color for a
//! segment, the palette for each background mode, and the tone frequency for a
//! vertical position.

use image::{Rgb, RgbImage};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::types::Point;

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const ACCENT_GREEN: Rgb<u8> = Rgb([0, 255, 0]);

/// Background/stroke pairing
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, IntoStaticStr,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BackgroundMode {
    /// Black background, bright green strokes
    #[default]
    Dark,
    /// White background, black strokes
    Light,
}

impl BackgroundMode {
    pub fn background(self) -> Rgb<u8> {
        match self {
            Self::Dark => BLACK,
            Self::Light => WHITE,
        }
    }

    pub fn stroke(self) -> Rgb<u8> {
        match self {
            Self::Dark => ACCENT_GREEN,
            Self::Light => BLACK,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human readable background name
    pub fn background_name(self) -> &'static str {
        match self {
            Self::Dark => "black",
            Self::Light => "white",
        }
    }
}

/// Rule for the color of each drawn segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorPolicy {
    Fixed(Rgb<u8>),
    /// Source pixel at the segment midpoint
    SampledFromSource,
}

impl ColorPolicy {
    /// Resolve the color of the segment `from -> to`
    ///
    /// Sampling coordinates are clamped into `source`; a source without
    /// pixels falls back to `fallback`.
    pub fn segment_color(&self, source: &RgbImage, from: Point, to: Point, fallback: Rgb<u8>) -> Rgb<u8> {
        match self {
            Self::Fixed(color) => *color,
            Self::SampledFromSource => sample_midpoint_color(source, from, to).unwrap_or(fallback),
        }
    }
}

/// Source color at the integer midpoint of a segment
pub fn sample_midpoint_color(source: &RgbImage, from: Point, to: Point) -> Option<Rgb<u8>> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let mid = from.midpoint(to);
    let x = mid.x.clamp(0, width as i32 - 1) as u32;
    let y = mid.y.clamp(0, height as i32 - 1) as u32;
    Some(*source.get_pixel(x, y))
}

/// Tone for the bottom row
pub const MIN_FREQUENCY_HZ: u32 = 300;
/// Tone for the top row
pub const MAX_FREQUENCY_HZ: u32 = 2000;

/// Map a row to a tone: the top row is highest, the bottom row lowest
pub fn map_vertical_position_to_frequency(y: i32, image_height: u32) -> u32 {
    if image_height == 0 {
        return MAX_FREQUENCY_HZ;
    }

    let fraction = (y as f64 / image_height as f64).clamp(0.0, 1.0);
    let span = (MAX_FREQUENCY_HZ - MIN_FREQUENCY_HZ) as f64;
    (MAX_FREQUENCY_HZ as f64 - fraction * span) as u32
}
