//! Numeric drawing parameters.
//!
//! Values arrive as free text from the shell. Anything that does not parse
//! falls back to the field default; anything below the field minimum is
//! raised to it. Either correction produces feedback text for the field, so
//! the engine itself only ever sees valid numbers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq, Hash
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ParamKind {
    /// Canny low threshold
    LowThreshold,
    /// Canny high threshold
    HighThreshold,
    /// Minimum points per curve
    MinCurveLength,
    /// Stroke thickness in pixels
    LineThickness,
    /// Segments drawn per tick
    SegmentsPerTick,
}

impl ParamKind {
    pub fn default_value(self) -> u32 {
        match self {
            Self::LowThreshold => 10,
            Self::HighThreshold => 60,
            Self::MinCurveLength => 10,
            Self::LineThickness => 1,
            Self::SegmentsPerTick => 500,
        }
    }

    pub fn min_value(self) -> u32 {
        match self {
            Self::LowThreshold | Self::HighThreshold => 0,
            Self::MinCurveLength => 2,
            Self::LineThickness | Self::SegmentsPerTick => 1,
        }
    }
}

/// A validated field value plus the text to write back, if it was corrected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedParam {
    pub value: u32,
    pub feedback: Option<String>,
}

/// Parse raw field text for `kind`
pub fn parse_param(kind: ParamKind, raw: &str) -> ParsedParam {
    match raw.trim().parse::<i64>() {
        Ok(value) if value < kind.min_value() as i64 => {
            let value = kind.min_value();
            ParsedParam { value, feedback: Some(value.to_string()) }
        }
        Ok(value) if value <= u32::MAX as i64 => ParsedParam {
            value: value as u32,
            feedback: None,
        },
        _ => {
            let value = kind.default_value();
            ParsedParam { value, feedback: Some(value.to_string()) }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SketchParams {
    pub low_threshold: u32,
    pub high_threshold: u32,
    pub min_curve_length: u32,
    pub line_thickness: u32,
    pub segments_per_tick: u32,
}

impl Default for SketchParams {
    fn default() -> Self {
        Self {
            low_threshold: ParamKind::LowThreshold.default_value(),
            high_threshold: ParamKind::HighThreshold.default_value(),
            min_curve_length: ParamKind::MinCurveLength.default_value(),
            line_thickness: ParamKind::LineThickness.default_value(),
            segments_per_tick: ParamKind::SegmentsPerTick.default_value(),
        }
    }
}

impl SketchParams {
    pub fn get(&self, kind: ParamKind) -> u32 {
        match kind {
            ParamKind::LowThreshold => self.low_threshold,
            ParamKind::HighThreshold => self.high_threshold,
            ParamKind::MinCurveLength => self.min_curve_length,
            ParamKind::LineThickness => self.line_thickness,
            ParamKind::SegmentsPerTick => self.segments_per_tick,
        }
    }

    /// Store `value`, raised to the field minimum
    pub fn set(&mut self, kind: ParamKind, value: u32) {
        let value = value.max(kind.min_value());
        match kind {
            ParamKind::LowThreshold => self.low_threshold = value,
            ParamKind::HighThreshold => self.high_threshold = value,
            ParamKind::MinCurveLength => self.min_curve_length = value,
            ParamKind::LineThickness => self.line_thickness = value,
            ParamKind::SegmentsPerTick => self.segments_per_tick = value,
        }
    }

    /// Parse and store raw field text, returning the feedback text if corrected
    pub fn apply_input(&mut self, kind: ParamKind, raw: &str) -> Option<String> {
        let parsed = parse_param(kind, raw);
        self.set(kind, parsed.value);
        parsed.feedback
    }

    /// Copy with every field raised to its minimum
    pub fn sanitized(mut self) -> Self {
        use strum::IntoEnumIterator;

        for kind in ParamKind::iter() {
            self.set(kind, self.get(kind));
        }
        self
    }
}
