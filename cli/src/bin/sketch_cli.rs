use clap::{Args, Parser, Subcommand};
use cli::{CommandScript, ConfigOverrides, FrameRecorder, render, resolve_config};
use color_eyre::eyre::{Result, eyre};
use sketch::{SketchCommand, SketchConfig, SketchSession, WavToneRecorder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct SketchArgs {
    /// Path to a TOML or JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Lower Canny hysteresis threshold
    #[arg(long)]
    low: Option<u32>,
    /// Upper Canny hysteresis threshold
    #[arg(long)]
    high: Option<u32>,
    /// Drop contours with fewer points than this
    #[arg(long)]
    min_length: Option<u32>,
    /// Stroke thickness in pixels
    #[arg(long)]
    thickness: Option<u32>,
    /// Segments drawn per tick
    #[arg(long)]
    speed: Option<u32>,
    /// Draw dark strokes on a white background
    #[arg(long)]
    light: bool,
    /// Color strokes from the source image
    #[arg(long)]
    sample_colors: bool,
}

impl SketchArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            low_threshold: self.low,
            high_threshold: self.high,
            min_curve_length: self.min_length,
            line_thickness: self.thickness,
            segments_per_tick: self.speed,
            light_background: self.light,
            sample_colors: self.sample_colors,
        }
    }

    fn config(&self) -> Result<SketchConfig> {
        Ok(resolve_config(self.config.as_deref(), &self.overrides())?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract contours from an image and draw them progressively
    Render {
        /// Source image (PNG, JPEG)
        #[arg(short, long)]
        input: PathBuf,
        /// Where to save the finished canvas
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        sketch: SketchArgs,
        /// Directory for intermediate canvas snapshots
        #[arg(long)]
        frames_dir: Option<PathBuf>,
        /// Write a snapshot every N ticks
        #[arg(long, default_value = "10")]
        frame_every: usize,
        /// Record the per-tick tones into a WAV file
        #[arg(long)]
        tone_track: Option<PathBuf>,
        /// Draw everything in one go instead of ticking
        #[arg(long)]
        finish_now: bool,
    },
    /// Write the dilated edge mask and report the contour count
    Edges {
        /// Source image (PNG, JPEG)
        #[arg(short, long)]
        input: PathBuf,
        /// Where to save the edge mask
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        sketch: SketchArgs,
        /// Dump the extracted curves as JSON
        #[arg(long)]
        curves_out: Option<PathBuf>,
    },
    /// Replay a JSON array of session commands
    Script {
        /// Path to the JSON command file
        #[arg(long)]
        commands: PathBuf,
        #[command(flatten)]
        sketch: SketchArgs,
    },
    /// Print the JSON schema of session commands
    Schema,
    /// Write a default configuration file
    InitConfig {
        /// Destination (.toml or .json)
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Render {
            input,
            output,
            sketch,
            frames_dir,
            frame_every,
            tone_track,
            finish_now,
        } => {
            render_sketch(
                input,
                output,
                sketch,
                frames_dir.as_deref(),
                *frame_every,
                tone_track.as_deref(),
                *finish_now,
            )?;
        }
        Commands::Edges { input, output, sketch, curves_out } => {
            export_edges(input, output, sketch, curves_out.as_deref())?;
        }
        Commands::Script { commands, sketch } => {
            run_script(commands, sketch)?;
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&SketchCommand::schema())?);
        }
        Commands::InitConfig { output } => {
            SketchConfig::default().to_file(output)?;
            info!("Wrote default configuration to {}", output.display());
        }
    }

    Ok(())
}

fn render_sketch(
    input: &Path,
    output: &Path,
    args: &SketchArgs,
    frames_dir: Option<&Path>,
    frame_every: usize,
    tone_track: Option<&Path>,
    finish_now: bool,
) -> Result<()> {
    let config = args.config()?;
    let mut session = SketchSession::new(&config);

    if let Some(path) = tone_track {
        if finish_now {
            warn!("Tone track ignored: finishing immediately emits no ticks");
        } else {
            match WavToneRecorder::create(path) {
                Ok(recorder) => session.set_tone_sink(Box::new(recorder)),
                Err(e) => warn!("Could not open tone track {}: {}", path.display(), e),
            }
        }
    }

    session.load_image(input)?;

    let mut frames = frames_dir
        .map(|dir| FrameRecorder::new(dir, frame_every))
        .transpose()?;

    let summary = render(&mut session, frames.as_mut(), finish_now)?;
    info!(
        "Drew {} segments across {} contours in {} ticks",
        summary.segments, summary.curves, summary.ticks
    );
    if let Some(frames) = &frames {
        info!("Wrote {} frames", frames.written());
    }

    // Dropping the recorder finalizes the WAV header
    drop(session.take_tone_sink());

    session.save(output)?;
    Ok(())
}

fn export_edges(
    input: &Path,
    output: &Path,
    args: &SketchArgs,
    curves_out: Option<&Path>,
) -> Result<()> {
    let config = args.config()?;
    let mut session = SketchSession::new(&config);
    session.load_image(input)?;

    let preview = session
        .edge_preview()
        .ok_or_else(|| eyre!("No edge mask was produced for {}", input.display()))?;
    preview.save(output)?;
    info!(
        "Edge mask saved to {} ({} contours)",
        output.display(),
        session.curves().len()
    );

    if let Some(path) = curves_out {
        fs::write(path, serde_json::to_string_pretty(session.curves())?)?;
        info!("Curves written to {}", path.display());
    }
    Ok(())
}

fn run_script(commands: &Path, args: &SketchArgs) -> Result<()> {
    let config = args.config()?;
    let script = CommandScript::from_file(commands)?;
    info!("Running {} commands from {}", script.commands.len(), commands.display());

    let mut session = SketchSession::new(&config);
    let report = script.run(&mut session);

    if report.failures.is_empty() {
        info!("All {} commands succeeded", report.succeeded);
    } else {
        for (index, err) in &report.failures {
            warn!("Command {} failed: {}", index, err);
        }
        warn!(
            "{} commands succeeded, {} failed",
            report.succeeded,
            report.failures.len()
        );
    }
    Ok(())
}
