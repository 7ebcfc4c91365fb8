use serde::{Deserialize, Serialize};

/// Host video element. The timeline only ever commands it; progress and
/// duration come back through the timeline's `on_progress`/`on_duration`.
pub trait VideoPlayback {
    /// Jumps to a fraction of the total duration.
    fn seek_to(&mut self, fraction: f64);
    fn set_playing(&mut self, playing: bool);
}

/// What the timeline knows about the loaded media.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaState {
    pub source: Option<String>,
    /// Seconds; zero until the media has loaded.
    pub duration: f64,
    /// Fraction of the duration already played.
    pub progress: f64,
}

impl MediaState {
    pub fn is_loaded(&self) -> bool {
        self.duration > 0.0
    }

    /// Horizontal position of the progress marker as a fraction of the bar.
    pub fn marker_position(&self) -> f64 {
        if self.progress.is_finite() {
            self.progress.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn position_seconds(&self) -> f64 {
        self.marker_position() * self.duration
    }
}
