//! Playing back a recorded answer on a worker thread.

use super::{AudioError, BUFFER_BYTES, split_command, wav};
use std::io::{self, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

/// Destination for raw PCM in the fixed recording format.
pub trait PlaybackSink: Send {
    fn write_chunk(&mut self, pcm: &[u8]) -> io::Result<()>;

    /// Called once after the last chunk; waits for buffered audio to drain.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Pipes raw PCM into an external playback program, e.g.
/// `aplay -q -f S16_LE -c 1 -r 44100 -t raw`.
pub struct CommandPlayback {
    child: Child,
    stdin: Option<ChildStdin>,
}

impl CommandPlayback {
    pub fn spawn(command: &[String]) -> Result<Self, AudioError> {
        let (program, args) = split_command(command)?;
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| AudioError::Command {
                program: program.clone(),
                source,
            })?;
        let stdin = child.stdin.take();
        Ok(Self { child, stdin })
    }
}

impl PlaybackSink for CommandPlayback {
    fn write_chunk(&mut self, pcm: &[u8]) -> io::Result<()> {
        match self.stdin.as_mut() {
            Some(stdin) => stdin.write_all(pcm),
            None => Err(io::Error::new(io::ErrorKind::BrokenPipe, "playback program has no stdin")),
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        // closing stdin lets the program drain and exit
        drop(self.stdin.take());
        self.child.wait()?;
        Ok(())
    }
}

impl Drop for CommandPlayback {
    fn drop(&mut self) {
        if self.stdin.is_some() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Finished,
    Stopped,
}

/// A playback in progress.
pub struct Playback {
    stop: Arc<AtomicBool>,
    worker: JoinHandle<Result<PlaybackOutcome, AudioError>>,
}

impl Playback {
    /// Reads the recording and starts streaming it to `sink`.
    /// Fails with `NoRecording` before anything is spawned if the file is missing.
    pub fn start(path: &Path, mut sink: Box<dyn PlaybackSink>) -> Result<Self, AudioError> {
        let pcm = wav::read_wav(path)?;
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let worker = thread::spawn(move || -> Result<PlaybackOutcome, AudioError> {
            for chunk in pcm.chunks(BUFFER_BYTES) {
                if flag.load(Ordering::SeqCst) {
                    log::debug!("Playback stopped");
                    return Ok(PlaybackOutcome::Stopped);
                }
                sink.write_chunk(chunk)?;
            }
            sink.finish()?;
            Ok(PlaybackOutcome::Finished)
        });
        log::info!("Playing {:?}", path);
        Ok(Self { stop, worker })
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Stops after the current buffer and waits for the worker.
    pub fn stop(self) -> Result<PlaybackOutcome, AudioError> {
        self.stop.store(true, Ordering::SeqCst);
        self.wait()
    }

    pub fn wait(self) -> Result<PlaybackOutcome, AudioError> {
        self.worker.join().map_err(|_| AudioError::WorkerPanicked)?
    }
}
