//! Audio capture lifecycle
//!
//! One capture session at a time. Acquisition can fail synchronously
//! (microphone permission denied); that failure is surfaced to the
//! caller and the recorder stays in its pre-start state. Stop releases
//! the capture source unconditionally and yields the accumulated clip.
//! There is no auto-stop timer and no distinct cancel path; reset
//! discards whatever was captured.

use gyaan_common::{Error, Result};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// A source of audio chunks, acquired for the duration of one recording.
///
/// Real deployments back this with the browser/OS capture device; tests
/// use a scripted fake.
pub trait CaptureSource: Send + Sync {
    /// Acquire the underlying device. Fails synchronously when
    /// permission is denied.
    fn acquire(&mut self) -> Result<()>;

    /// Pull whatever audio has accumulated since the last read.
    fn read_chunk(&mut self) -> Result<Vec<u8>>;

    /// Release the device. Must be safe to call when not acquired.
    fn release(&mut self);
}

/// Recorder state, visible to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
}

/// A finished clip: raw bytes plus wall-clock duration
#[derive(Debug, Clone)]
pub struct Clip {
    pub bytes: Vec<u8>,
    pub duration: Duration,
}

/// Drives one capture source through start/poll/stop/reset
pub struct Recorder<S: CaptureSource> {
    source: S,
    state: RecorderState,
    chunks: Vec<u8>,
    started_at: Option<Instant>,
}

impl<S: CaptureSource> Recorder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: RecorderState::Idle,
            chunks: Vec::new(),
            started_at: None,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Begin recording. Permission failures from the source propagate
    /// and leave the recorder idle with nothing captured.
    pub fn start(&mut self) -> Result<()> {
        if self.state == RecorderState::Recording {
            return Err(Error::InvalidInput("recording already in progress".to_string()));
        }

        self.source.acquire()?;
        self.chunks.clear();
        self.started_at = Some(Instant::now());
        self.state = RecorderState::Recording;
        info!("Recording started");
        Ok(())
    }

    /// Pull pending audio from the source into the clip buffer
    pub fn poll(&mut self) -> Result<()> {
        if self.state != RecorderState::Recording {
            return Ok(());
        }
        let chunk = self.source.read_chunk()?;
        debug!(bytes = chunk.len(), "Captured audio chunk");
        self.chunks.extend_from_slice(&chunk);
        Ok(())
    }

    /// Stop recording and yield the clip.
    ///
    /// The capture source is released unconditionally, even when the
    /// final read fails.
    pub fn stop(&mut self) -> Result<Clip> {
        if self.state != RecorderState::Recording {
            return Err(Error::InvalidInput("no recording in progress".to_string()));
        }

        let final_read = self.source.read_chunk();
        self.source.release();
        self.state = RecorderState::Idle;

        if let Ok(chunk) = final_read {
            self.chunks.extend_from_slice(&chunk);
        }

        let duration = self
            .started_at
            .take()
            .map(|t| t.elapsed())
            .unwrap_or_default();
        let bytes = std::mem::take(&mut self.chunks);
        info!(bytes = bytes.len(), ?duration, "Recording stopped");

        Ok(Clip { bytes, duration })
    }

    /// Discard captured state and return to idle. Releases the source
    /// if a recording was in flight.
    pub fn reset(&mut self) {
        if self.state == RecorderState::Recording {
            self.source.release();
        }
        self.state = RecorderState::Idle;
        self.chunks.clear();
        self.started_at = None;
    }
}
