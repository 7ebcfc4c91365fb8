use serde::{Deserialize, Serialize};

use crate::{Result, TimelineError};

/// Handle to a finalized voice recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipHandle {
    pub id: u64,
    pub mime_type: String,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
}

impl ClipHandle {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            mime_type: "audio/webm".to_string(),
            duration_seconds: None,
        }
    }
}

/// Host audio capture and playback. Start and stop are requests; the host
/// reports back through the timeline's `on_capture_*` callbacks.
pub trait VoiceCapture {
    /// Whether the host offers a capture API at all. Queried once.
    fn is_supported(&self) -> bool;
    fn start_recording(&mut self);
    fn stop_recording(&mut self);
    fn play_clip(&mut self, clip: &ClipHandle);
    fn stop_clip(&mut self);
}

/// Tracks the capture lifecycle on top of a [`VoiceCapture`] backend.
#[derive(Debug)]
pub struct Recorder<C> {
    capture: C,
    supported: bool,
    capturing: bool,
    clip: Option<ClipHandle>,
}

impl<C: VoiceCapture> Recorder<C> {
    pub fn new(capture: C) -> Self {
        let supported = capture.is_supported();
        if !supported {
            tracing::warn!("voice capture unavailable, recording disabled");
        }
        Self {
            capture,
            supported,
            capturing: false,
            clip: None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn clip(&self) -> Option<&ClipHandle> {
        self.clip.as_ref()
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }

    pub fn capture_mut(&mut self) -> &mut C {
        &mut self.capture
    }

    /// Asks the device to start. Any previous clip is discarded.
    pub fn start(&mut self) -> Result<()> {
        if !self.supported {
            return Err(TimelineError::RecordingUnsupported);
        }
        self.clip = None;
        self.capturing = true;
        self.capture.start_recording();
        Ok(())
    }

    /// Asks the device to stop and finalize. No-op when nothing is running.
    pub fn stop(&mut self) {
        if self.capturing {
            self.capturing = false;
            self.capture.stop_recording();
        }
    }

    /// The device failed; whatever was in flight is gone.
    pub fn fail(&mut self) {
        self.capturing = false;
    }

    pub fn finalize(&mut self, clip: ClipHandle) {
        self.capturing = false;
        tracing::info!(clip = clip.id, "voice clip finalized");
        self.clip = Some(clip);
    }

    pub fn play(&mut self) -> Result<()> {
        let clip = self.clip.as_ref().ok_or(TimelineError::NoClip)?;
        self.capture.play_clip(clip);
        Ok(())
    }

    pub fn stop_playback(&mut self) {
        self.capture.stop_clip();
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeCapture;
    use super::*;

    #[test]
    fn unsupported_capture_refuses_to_start() {
        let mut recorder = Recorder::new(FakeCapture {
            unsupported: true,
            ..Default::default()
        });
        assert!(matches!(
            recorder.start(),
            Err(TimelineError::RecordingUnsupported)
        ));
        assert!(recorder.capture().calls.is_empty());
    }

    #[test]
    fn stop_only_reaches_the_device_once() {
        let mut recorder = Recorder::new(FakeCapture::default());
        recorder.start().unwrap();
        recorder.stop();
        recorder.stop();
        assert_eq!(recorder.capture().calls, vec!["start", "stop"]);
    }

    #[test]
    fn new_recording_discards_previous_clip() {
        let mut recorder = Recorder::new(FakeCapture::default());
        assert!(matches!(recorder.play(), Err(TimelineError::NoClip)));

        recorder.start().unwrap();
        recorder.stop();
        recorder.finalize(ClipHandle::new(7));
        recorder.play().unwrap();
        assert_eq!(recorder.capture().played, vec![7]);

        recorder.start().unwrap();
        assert!(recorder.clip().is_none());
    }
}
