use std::path::Path;

use image::{GrayImage, RgbImage};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr, VariantNames};
use tracing::{debug, info};

use crate::{
    audio::{ToneSink, TICK_TONE_MS},
    canvas::Canvas,
    config::SketchConfig,
    drawing::{DrawCursor, DrawState, Drawer, StepOutcome, StrokeStyle},
    error::{Result, SketchError},
    io,
    mapping::{map_vertical_position_to_frequency, BackgroundMode, ColorPolicy},
    params::{ParamKind, SketchParams},
    pipeline,
    status::{StatusSink, TracingStatus},
    types::CurveSet,
};

#[derive(
    Debug, Clone,
    Serialize, Deserialize, JsonSchema,
    Display, VariantNames, IntoStaticStr,
    PartialEq
)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SketchCommand {
    /// Load a source image and extract its curves
    LoadImage { path: String },
    /// Re-run extraction with the current parameters
    Reprocess,
    /// Swap between dark and light backgrounds, then re-extract
    ToggleBackground,
    /// Set a numeric parameter from raw field text
    SetParam { param: ParamKind, value: String },
    /// Sample stroke colors from the source image
    SetColorSampling { enabled: bool },
    /// Emit a tone per tick
    SetSound { enabled: bool },
    /// Start or resume drawing
    Start,
    Pause,
    /// Clear the canvas and rewind to the first curve
    Reset,
    /// Draw everything that remains in one go
    FinishNow,
    /// Advance one tick
    Tick,
    /// Write the canvas to an image file
    Save { path: String },
}

impl SketchCommand {
    /// Get the JSON schema for all commands
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(SketchCommand)
    }

    /// Get a list of all available command names
    pub fn command_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }

    /// Get a description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Self::LoadImage { .. } => "Load an image, resize it to the working size and extract curves",
            Self::Reprocess => "Re-extract curves with the current thresholds and minimum length",
            Self::ToggleBackground => "Toggle black/white background and re-extract",
            Self::SetParam { .. } => "Set a numeric parameter; invalid text is corrected",
            Self::SetColorSampling { .. } => "Color strokes from the source image instead of the accent color",
            Self::SetSound { .. } => "Enable or disable the per-tick tone",
            Self::Start => "Start or resume progressive drawing",
            Self::Pause => "Pause drawing, keeping the current position",
            Self::Reset => "Clear the canvas and rewind to the first curve",
            Self::FinishNow => "Draw all remaining segments immediately",
            Self::Tick => "Draw the next batch of segments",
            Self::Save { .. } => "Save the canvas as PNG or JPEG",
        }
    }
}

/// One drawing session: source image, curves, canvas and settings
pub struct SketchSession<S: StatusSink = TracingStatus> {
    working_size: (u32, u32),
    params: SketchParams,
    background: BackgroundMode,
    sample_colors: bool,
    sound_enabled: bool,
    source: Option<RgbImage>,
    edge_mask: Option<GrayImage>,
    drawer: Drawer,
    tone_sink: Option<Box<dyn ToneSink>>,
    status: S,
}

impl SketchSession<TracingStatus> {
    pub fn new(config: &SketchConfig) -> Self {
        Self::with_status(config, TracingStatus)
    }
}

impl Default for SketchSession<TracingStatus> {
    fn default() -> Self {
        Self::new(&SketchConfig::default())
    }
}

impl<S: StatusSink> SketchSession<S> {
    pub fn with_status(config: &SketchConfig, status: S) -> Self {
        let working_size = (config.working_width, config.working_height);
        Self {
            working_size,
            params: config.params.sanitized(),
            background: config.background,
            sample_colors: config.sample_colors,
            sound_enabled: config.sound,
            source: None,
            edge_mask: None,
            drawer: Drawer::new(working_size.0, working_size.1, config.background.background()),
            tone_sink: None,
            status,
        }
    }

    /// Attach an audio sink; it is dropped after its first failure
    pub fn set_tone_sink(&mut self, sink: Box<dyn ToneSink>) {
        self.tone_sink = Some(sink);
    }

    pub fn take_tone_sink(&mut self) -> Option<Box<dyn ToneSink>> {
        self.tone_sink.take()
    }

    pub fn execute(&mut self, command: SketchCommand) -> Result<()> {
        debug!(%command, "Executing command");
        match command {
            SketchCommand::LoadImage { path } => self.load_image(path),
            SketchCommand::Reprocess => self.process_edges().map(|_| ()),
            SketchCommand::ToggleBackground => self.toggle_background(),
            SketchCommand::SetParam { param, value } => {
                self.set_param(param, &value);
                Ok(())
            }
            SketchCommand::SetColorSampling { enabled } => {
                self.sample_colors = enabled;
                Ok(())
            }
            SketchCommand::SetSound { enabled } => {
                self.sound_enabled = enabled;
                Ok(())
            }
            SketchCommand::Start => self.start(),
            SketchCommand::Pause => self.pause(),
            SketchCommand::Reset => {
                self.reset();
                Ok(())
            }
            SketchCommand::FinishNow => self.finish_now(),
            SketchCommand::Tick => self.tick().map(|_| ()),
            SketchCommand::Save { path } => self.save(path),
        }
    }

    /// Load an image file; on failure the previous image stays active
    pub fn load_image<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.drawer.halt();

        let image = match io::load_image(path, self.working_size) {
            Ok(image) => image,
            Err(err) => {
                self.status.warning(&format!("Could not read image file: {err}"));
                return Err(err);
            }
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.status.status(&format!("Loaded {name}"));
        self.set_image(image)
    }

    /// Use an already decoded image as the source
    pub fn set_image(&mut self, image: RgbImage) -> Result<()> {
        if image.width() == 0 || image.height() == 0 {
            let err = SketchError::InvalidImage(format!(
                "image has zero extent ({}x{})",
                image.width(),
                image.height()
            ));
            self.status.warning(&err.to_string());
            return Err(err);
        }

        self.drawer.halt();
        self.source = Some(image);
        self.process_edges().map(|_| ())
    }

    /// Re-extract curves from the current source and reset the drawing
    ///
    /// Without a source this only refreshes the placeholder canvas.
    pub fn process_edges(&mut self) -> Result<usize> {
        self.drawer.halt();

        let Some(source) = self.source.as_ref() else {
            self.drawer.set_background(self.background.background());
            return Ok(0);
        };

        let extraction = pipeline::extract(
            source,
            self.params.low_threshold,
            self.params.high_threshold,
            self.params.min_curve_length as usize,
        )?;

        let count = extraction.curves.len();
        self.drawer.load(source.clone(), extraction.curves, self.background.background());
        self.edge_mask = Some(extraction.edge_mask);

        info!(count, min_length = self.params.min_curve_length, "Extracted curves");
        self.status.status(&format!(
            "Found {count} contours (min length {}).",
            self.params.min_curve_length
        ));
        Ok(count)
    }

    pub fn toggle_background(&mut self) -> Result<()> {
        self.background = self.background.toggled();
        self.status.status(&format!(
            "Background set to {}.",
            self.background.background_name()
        ));
        self.process_edges().map(|_| ())
    }

    /// Set a parameter from raw text; returns corrected field text if any
    ///
    /// Extraction parameters take effect on the next [`Self::process_edges`];
    /// thickness and speed apply from the next tick.
    pub fn set_param(&mut self, kind: ParamKind, raw: &str) -> Option<String> {
        let feedback = self.params.apply_input(kind, raw);
        if let Some(text) = &feedback {
            debug!(param = %kind, raw, corrected = %text, "Corrected parameter input");
        }
        feedback
    }

    pub fn set_color_sampling(&mut self, enabled: bool) {
        self.sample_colors = enabled;
    }

    pub fn set_sound(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
    }

    pub fn start(&mut self) -> Result<()> {
        let resuming = self.drawer.state() == DrawState::Paused;
        match self.drawer.start() {
            Ok(()) => {
                if resuming {
                    self.status.status(&format!(
                        "Resumed at contour {} of {}.",
                        self.drawer.cursor().curve_index,
                        self.drawer.curves().len()
                    ));
                }
                Ok(())
            }
            Err(err) => {
                self.status.warning(&err.to_string());
                Err(err)
            }
        }
    }

    pub fn pause(&mut self) -> Result<()> {
        self.drawer.pause()?;
        self.status.status(&format!(
            "Paused at contour {} of {}.",
            self.drawer.cursor().curve_index,
            self.drawer.curves().len()
        ));
        Ok(())
    }

    pub fn reset(&mut self) {
        self.drawer.reset();
        if self.drawer.curves().is_empty() {
            self.status.status("Canvas reset.");
        } else {
            self.status.status(&format!(
                "Canvas reset. {} contours ready.",
                self.drawer.curves().len()
            ));
        }
    }

    /// Drain all remaining segments with the style in effect right now
    pub fn finish_now(&mut self) -> Result<()> {
        if let Err(err) = self.drawer.check_finish() {
            self.status.warning(&err.to_string());
            return Err(err);
        }

        let style = self.stroke_style();
        self.status.status("Finishing remaining drawing...");
        self.drawer.finish_now(&style)?;
        self.status.status("Drawing complete.");
        Ok(())
    }

    /// Advance one tick; `None` when not running
    pub fn tick(&mut self) -> Result<Option<StepOutcome>> {
        if self.drawer.state() != DrawState::Running {
            return Ok(None);
        }

        self.emit_tick_tone();

        let style = self.stroke_style();
        let outcome = self.drawer.step(self.params.segments_per_tick as usize, &style)?;

        if outcome.finished {
            self.status.status("Drawing complete.");
        } else if outcome.curve_changed {
            self.status.status(&format!(
                "Drawing... {:.0}% (Contour {}/{})",
                self.drawer.progress_percent(),
                outcome.cursor.curve_index,
                self.drawer.curves().len()
            ));
        }

        Ok(Some(outcome))
    }

    fn emit_tick_tone(&mut self) {
        if !self.sound_enabled {
            return;
        }
        let Some(point) = self.drawer.next_point() else {
            return;
        };
        let Some(sink) = self.tone_sink.as_mut() else {
            return;
        };

        let frequency = map_vertical_position_to_frequency(point.y, self.drawer.canvas().height());
        if let Err(err) = sink.emit_tone(frequency, TICK_TONE_MS) {
            // Audio never interrupts drawing; the sink is retired for the session
            debug!(%err, "Disabling tone output");
            self.tone_sink = None;
        }
    }

    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        match self.drawer.canvas().save(path) {
            Ok(()) => {
                self.status.status(&format!("Image saved to {}", path.display()));
                Ok(())
            }
            Err(err) => {
                self.status.warning(&err.to_string());
                Err(err)
            }
        }
    }

    /// Style captured for the next batch of segments
    pub fn stroke_style(&self) -> StrokeStyle {
        let policy = if self.sample_colors {
            ColorPolicy::SampledFromSource
        } else {
            ColorPolicy::Fixed(self.background.stroke())
        };
        StrokeStyle::new(self.params.line_thickness, policy)
    }

    /// Dilated edge mask of the last extraction, as RGB
    pub fn edge_preview(&self) -> Option<RgbImage> {
        self.edge_mask.as_ref().map(io::mask_to_rgb)
    }

    pub fn edge_mask(&self) -> Option<&GrayImage> {
        self.edge_mask.as_ref()
    }

    pub fn state(&self) -> DrawState {
        self.drawer.state()
    }

    pub fn cursor(&self) -> DrawCursor {
        self.drawer.cursor()
    }

    pub fn canvas(&self) -> &Canvas {
        self.drawer.canvas()
    }

    pub fn curves(&self) -> &CurveSet {
        self.drawer.curves()
    }

    pub fn progress_percent(&self) -> f64 {
        self.drawer.progress_percent()
    }

    pub fn params(&self) -> &SketchParams {
        &self.params
    }

    pub fn background_mode(&self) -> BackgroundMode {
        self.background
    }

    pub fn has_tone_sink(&self) -> bool {
        self.tone_sink.is_some()
    }

    pub fn status_sink(&self) -> &S {
        &self.status
    }
}
