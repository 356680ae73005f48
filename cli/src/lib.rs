use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sketch::{
    BackgroundMode, DrawState, SketchCommand, SketchConfig, SketchError, SketchSession, StatusSink,
};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum SketchCliError {
    #[error(transparent)]
    Sketch(#[from] SketchError),
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Unsupported script format. Please use .json files")]
    UnsupportedFileFormat,
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub low_threshold: Option<u32>,
    pub high_threshold: Option<u32>,
    pub min_curve_length: Option<u32>,
    pub line_thickness: Option<u32>,
    pub segments_per_tick: Option<u32>,
    pub light_background: bool,
    pub sample_colors: bool,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut SketchConfig) {
        let params = &mut config.params;
        if let Some(v) = self.low_threshold {
            params.low_threshold = v;
        }
        if let Some(v) = self.high_threshold {
            params.high_threshold = v;
        }
        if let Some(v) = self.min_curve_length {
            params.min_curve_length = v;
        }
        if let Some(v) = self.line_thickness {
            params.line_thickness = v;
        }
        if let Some(v) = self.segments_per_tick {
            params.segments_per_tick = v;
        }
        *params = params.sanitized();

        if self.light_background {
            config.background = BackgroundMode::Light;
        }
        if self.sample_colors {
            config.sample_colors = true;
        }
    }
}

/// Load the config file if given, then apply overrides
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<SketchConfig, SketchCliError> {
    let mut config = match path {
        Some(path) => SketchConfig::from_file(path)?,
        None => SketchConfig::default(),
    };
    overrides.apply(&mut config);
    Ok(config)
}

/// A list of session commands replayed in order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CommandScript {
    pub commands: Vec<SketchCommand>,
}

impl CommandScript {
    pub fn from_json(content: &str) -> Result<Self, SketchCliError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SketchCliError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&fs::read_to_string(path)?),
            _ => Err(SketchCliError::UnsupportedFileFormat),
        }
    }

    /// Run every command; failures are logged and skipped
    pub fn run<S: StatusSink>(&self, session: &mut SketchSession<S>) -> ScriptReport {
        let mut report = ScriptReport::default();
        for (index, command) in self.commands.iter().enumerate() {
            match session.execute(command.clone()) {
                Ok(()) => report.succeeded += 1,
                Err(err) => {
                    warn!(index, %command, %err, "Command failed");
                    report.failures.push((index, err.to_string()));
                }
            }
        }
        report
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptReport {
    pub succeeded: usize,
    pub failures: Vec<(usize, String)>,
}

/// Writes numbered canvas snapshots every `every` ticks
#[derive(Debug, Clone)]
pub struct FrameRecorder {
    dir: PathBuf,
    every: usize,
    written: usize,
}

impl FrameRecorder {
    pub fn new<P: Into<PathBuf>>(dir: P, every: usize) -> Result<Self, SketchCliError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, every: every.max(1), written: 0 })
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// True when tick number `tick` is already snapshotted by the cadence
    pub fn covers(&self, tick: usize) -> bool {
        tick > 0 && tick % self.every == 0
    }

    fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{index:05}.png"))
    }

    /// Snapshot after tick number `tick` (1-based) when it falls on the cadence
    pub fn on_tick<S: StatusSink>(
        &mut self,
        tick: usize,
        session: &SketchSession<S>,
    ) -> Result<(), SketchCliError> {
        if self.covers(tick) {
            self.write(session)?;
        }
        Ok(())
    }

    pub fn write<S: StatusSink>(&mut self, session: &SketchSession<S>) -> Result<(), SketchCliError> {
        let path = self.frame_path(self.written);
        session.canvas().save(&path)?;
        debug!(path = %path.display(), "Wrote frame");
        self.written += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub ticks: usize,
    pub segments: usize,
    pub curves: usize,
}

/// The tick scheduler: start the session and tick until it finishes
///
/// With `finish_now` the remainder is drained in a single call instead. An
/// image without contours renders nothing; the session has already reported
/// it and the background canvas is left as the result.
pub fn render<S: StatusSink>(
    session: &mut SketchSession<S>,
    mut frames: Option<&mut FrameRecorder>,
    finish_now: bool,
) -> Result<RenderSummary, SketchCliError> {
    let mut summary = RenderSummary {
        curves: session.curves().len(),
        ..RenderSummary::default()
    };

    let started = if finish_now {
        session.finish_now()
    } else {
        session.start()
    };
    match started {
        Ok(()) => {}
        Err(SketchError::NoCurves) => {
            warn!("Nothing to draw");
            if let Some(frames) = frames {
                frames.write(session)?;
            }
            return Ok(summary);
        }
        Err(err) => return Err(err.into()),
    }

    if finish_now {
        summary.segments = session.curves().segment_count();
    } else {
        while session.state() == DrawState::Running {
            let Some(outcome) = session.tick()? else {
                break;
            };
            summary.ticks += 1;
            summary.segments += outcome.segments_drawn;
            if let Some(frames) = frames.as_deref_mut() {
                frames.on_tick(summary.ticks, session)?;
            }
        }
    }

    if let Some(frames) = frames {
        if !frames.covers(summary.ticks) {
            frames.write(session)?;
        }
    }
    Ok(summary)
}
