//! Answer recording and playback.
//!
//! Audio is always mono 16-bit little-endian PCM at 44.1 kHz. Capture and playback
//! run on worker threads and stop cooperatively: the worker checks a shared flag
//! between buffers.

pub mod player;
pub mod recorder;
pub mod wav;

pub use player::{CommandPlayback, Playback, PlaybackOutcome, PlaybackSink};
pub use recorder::{CaptureSource, CommandCapture, Recording, RecordingSummary};

use std::path::PathBuf;
use thiserror::Error;

pub const SAMPLE_RATE: u32 = 44_100;
pub const CHANNELS: u16 = 1;
pub const BITS_PER_SAMPLE: u16 = 16;
pub const BYTES_PER_FRAME: usize = (CHANNELS as usize) * (BITS_PER_SAMPLE as usize / 8);
pub const FRAMES_PER_BUFFER: usize = 1024;
pub const BUFFER_BYTES: usize = FRAMES_PER_BUFFER * BYTES_PER_FRAME;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No recording found.")]
    NoRecording(PathBuf),

    #[error("Unsupported WAV file: {0}")]
    UnsupportedFormat(String),

    #[error("Audio command is empty")]
    EmptyCommand,

    #[error("Failed to start '{program}': {source}")]
    Command {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Audio worker panicked")]
    WorkerPanicked,
}

/// Length of `bytes` of PCM in seconds.
pub fn duration_secs(bytes: usize) -> f64 {
    (bytes / BYTES_PER_FRAME) as f64 / SAMPLE_RATE as f64
}

/// Splits a configured command line into program and arguments.
fn split_command(command: &[String]) -> Result<(&String, &[String]), AudioError> {
    command.split_first().ok_or(AudioError::EmptyCommand)
}
