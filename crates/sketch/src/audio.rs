//! Tone output for drawing ticks.
//!
//! Audio is best effort. A sink reports failures through [`ToneError`] and
//! the session decides to drop the sink; nothing here interrupts drawing.

use std::f32::consts::PI;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use thiserror::Error;

/// Length of the tone emitted per tick
pub const TICK_TONE_MS: u32 = 15;

#[derive(Error, Debug)]
pub enum ToneError {
    #[error("Audio unavailable: {0}")]
    Unavailable(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

/// Destination for per-tick tones
pub trait ToneSink {
    fn emit_tone(&mut self, frequency_hz: u32, duration_ms: u32) -> Result<(), ToneError>;
}

/// Writes each tone as a sine burst into a mono WAV file
pub struct WavToneRecorder {
    writer: hound::WavWriter<BufWriter<File>>,
    sample_rate: u32,
    amplitude: f32,
}

impl WavToneRecorder {
    pub const SAMPLE_RATE: u32 = 44_100;

    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ToneError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: Self::SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let writer = hound::WavWriter::create(path, spec)?;
        Ok(Self {
            writer,
            sample_rate: Self::SAMPLE_RATE,
            amplitude: 0.3,
        })
    }

    /// Flush samples and patch the header; also happens on drop
    pub fn finalize(self) -> Result<(), ToneError> {
        self.writer.finalize()?;
        Ok(())
    }
}

impl ToneSink for WavToneRecorder {
    fn emit_tone(&mut self, frequency_hz: u32, duration_ms: u32) -> Result<(), ToneError> {
        let samples = (self.sample_rate as u64 * duration_ms as u64 / 1000) as u32;
        let step = 2.0 * PI * frequency_hz as f32 / self.sample_rate as f32;

        for n in 0..samples {
            let value = (step * n as f32).sin() * self.amplitude * i16::MAX as f32;
            self.writer.write_sample(value as i16)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_writes_expected_sample_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticks.wav");

        let mut recorder = WavToneRecorder::create(&path).unwrap();
        recorder.emit_tone(2000, TICK_TONE_MS).unwrap();
        recorder.emit_tone(300, TICK_TONE_MS).unwrap();
        recorder.finalize().unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, WavToneRecorder::SAMPLE_RATE);
        assert_eq!(reader.len(), 2 * (44_100 * 15 / 1000));
    }

    #[test]
    fn test_recorder_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = WavToneRecorder::create(dir.path().join("nope").join("t.wav"));
        assert!(result.is_err());
    }
}
