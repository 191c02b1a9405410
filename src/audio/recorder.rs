//! Capturing an answer to a WAV file on a worker thread.

use super::{AudioError, BUFFER_BYTES, duration_secs, split_command, wav};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

/// A blocking source of raw PCM in the fixed recording format.
pub trait CaptureSource: Send {
    /// Reads up to `buf.len()` bytes. `Ok(0)` means the source has ended.
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Streams raw PCM from an external capture program's stdout, e.g.
/// `arecord -q -f S16_LE -c 1 -r 44100 -t raw`.
pub struct CommandCapture {
    child: Child,
    stdout: ChildStdout,
}

impl CommandCapture {
    pub fn spawn(command: &[String]) -> Result<Self, AudioError> {
        let (program, args) = split_command(command)?;
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| AudioError::Command {
                program: program.clone(),
                source,
            })?;
        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(AudioError::Io(io::Error::other("capture program has no stdout")));
            }
        };
        log::debug!("Started capture program {}", program);
        Ok(Self { child, stdout })
    }
}

impl CaptureSource for CommandCapture {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stdout.read(buf)
    }
}

impl Drop for CommandCapture {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordingSummary {
    pub path: PathBuf,
    pub bytes: usize,
}

impl RecordingSummary {
    pub fn duration_secs(&self) -> f64 {
        duration_secs(self.bytes)
    }
}

/// A recording in progress.
pub struct Recording {
    stop: Arc<AtomicBool>,
    worker: JoinHandle<Result<RecordingSummary, AudioError>>,
}

impl Recording {
    /// Starts capturing from `source` on a worker thread. Nothing is written until the
    /// recording stops.
    pub fn start(mut source: Box<dyn CaptureSource>, path: impl Into<PathBuf>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let path = path.into();
        let worker = thread::spawn(move || {
            let result = capture_loop(source.as_mut(), &flag, &path);
            drop(source);
            result
        });
        log::info!("Recording started");
        Self { stop, worker }
    }

    /// True once the worker has exited, e.g. because the source ended.
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Asks the capture loop to stop after the current buffer and waits for the file.
    pub fn stop(self) -> Result<RecordingSummary, AudioError> {
        self.stop.store(true, Ordering::SeqCst);
        self.worker.join().map_err(|_| AudioError::WorkerPanicked)?
    }
}

fn capture_loop(source: &mut dyn CaptureSource, stop: &AtomicBool, path: &Path) -> Result<RecordingSummary, AudioError> {
    let mut frames = Vec::new();
    let mut buf = vec![0u8; BUFFER_BYTES];
    let mut interrupted = None;

    while !stop.load(Ordering::SeqCst) {
        match source.read_chunk(&mut buf) {
            Ok(0) => {
                log::warn!("Capture source ended before the recording was stopped");
                break;
            }
            Ok(n) => frames.extend_from_slice(&buf[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                log::error!("Capture failed after {} bytes: {}", frames.len(), e);
                interrupted = Some(e);
                break;
            }
        }
    }

    // Whatever was captured is kept even if the source failed.
    wav::write_wav(path, &frames)?;
    let summary = RecordingSummary {
        path: path.to_path_buf(),
        bytes: frames.len(),
    };
    log::info!("Saved {:.1}s recording to {:?}", summary.duration_secs(), path);

    match interrupted {
        Some(e) => Err(e.into()),
        None => Ok(summary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Endless silence, one short sleep per buffer like a real device.
    struct Silence;

    impl CaptureSource for Silence {
        fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            thread::sleep(Duration::from_millis(1));
            buf.fill(0);
            Ok(buf.len())
        }
    }

    /// Yields a fixed byte sequence, then ends.
    struct Finite(Vec<u8>);

    impl CaptureSource for Finite {
        fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.0.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0.drain(..n);
            Ok(n)
        }
    }

    struct Broken;

    impl CaptureSource for Broken {
        fn read_chunk(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device unplugged"))
        }
    }

    #[test]
    fn test_stop_flag_ends_capture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recording.wav");

        let recording = Recording::start(Box::new(Silence), &path);
        thread::sleep(Duration::from_millis(20));
        let summary = recording.stop().unwrap();

        assert!(summary.bytes > 0);
        assert_eq!(summary.bytes % BUFFER_BYTES, 0);
        assert_eq!(wav::read_wav(&path).unwrap().len(), summary.bytes);
    }

    #[test]
    fn test_source_end_finishes_recording() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recording.wav");
        let pcm: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();

        let recording = Recording::start(Box::new(Finite(pcm.clone())), &path);
        while !recording.is_finished() {
            thread::sleep(Duration::from_millis(1));
        }
        let summary = recording.stop().unwrap();

        assert_eq!(summary.bytes, pcm.len());
        assert_eq!(wav::read_wav(&path).unwrap(), pcm);
    }

    #[test]
    fn test_source_error_still_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recording.wav");

        let recording = Recording::start(Box::new(Broken), &path);
        while !recording.is_finished() {
            thread::sleep(Duration::from_millis(1));
        }
        let result = recording.stop();

        assert!(matches!(result, Err(AudioError::Io(_))));
        assert!(wav::read_wav(&path).unwrap().is_empty());
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!(matches!(CommandCapture::spawn(&[]), Err(AudioError::EmptyCommand)));
    }

    #[test]
    fn test_summary_duration() {
        let summary = RecordingSummary {
            path: PathBuf::from("recording.wav"),
            bytes: 88_200,
        };
        assert_eq!(summary.duration_secs(), 1.0);
    }
}
