//! # Contour Sketch Library
//!
//! Turns a raster image into a hand-drawn looking line sketch. Boundaries are
//! extracted with a two-threshold edge detector and a border follower, then
//! painted onto a canvas a few segments at a time so the drawing can be
//! animated, paused, resumed or finished in one go.
//!
//! ## Core Features
//!
//! - **Pipeline System**: Canny edges, dilation, flat contour tracing, length
//!   filtering and area ordering composed from trait objects
//! - **Progressive Drawing**: a tick-driven state machine with pause, reset and
//!   finish-now
//! - **Color Policies**: fixed accent strokes or colors sampled from the source
//! - **Sessions**: a single owner for image, curves, canvas and settings,
//!   scriptable through serializable commands
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sketch::{SketchConfig, SketchSession};
//!
//! let mut session = SketchSession::new(&SketchConfig::default());
//! session.load_image("portrait.jpg")?;
//! session.start()?;
//!
//! // The caller owns the cadence: one tick per frame
//! while session.tick()?.is_some_and(|outcome| !outcome.finished) {}
//!
//! session.save("sketch.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Pipeline
//!
//! ```rust,no_run
//! use sketch::{Pipeline, algorithms::*};
//!
//! let pipeline = Pipeline::builder()
//!     .add_preprocessor(CannyEdgeDetector::new(20, 80))
//!     .add_preprocessor(DilatePreprocessor { radius: 2 })
//!     .with_min_length(25)
//!     .with_area_ordering()
//!     .build();
//!
//! let image = image::open("portrait.jpg")?.to_luma8();
//! let extraction = pipeline.process(&image)?;
//! println!("{} curves", extraction.curves.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod canvas;
pub mod mapping;
pub mod drawing;
pub mod audio;
pub mod params;
pub mod config;
pub mod status;
pub mod io;
pub mod session;

// Re-exports for convenience
pub use error::{SketchError, Result};
pub use types::{Curve, CurveSet, Extraction, Point};
pub use traits::*;
pub use pipeline::{Pipeline, builder::PipelineBuilder, extract};
pub use canvas::Canvas;
pub use mapping::{BackgroundMode, ColorPolicy, map_vertical_position_to_frequency};
pub use drawing::{DrawCursor, DrawState, Drawer, StepOutcome, StrokeStyle};
pub use audio::{ToneError, ToneSink, WavToneRecorder};
pub use params::{ParamKind, SketchParams};
pub use config::SketchConfig;
pub use status::{StatusLog, StatusSink, TracingStatus};
pub use session::{SketchCommand, SketchSession};
