use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::gesture::PointerEvent;
use crate::player::VideoPlayback;
use crate::record::{ClipHandle, VoiceCapture};
use crate::region::Region;
use crate::status::{Control, PlaybackStatus};
use crate::timeline::Timeline;
use crate::zoom::WheelEvent;
use crate::{EngineConfig, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    Surface { left: f64, width: f64 },
    Pointer(PointerEvent),
    Wheel(WheelEvent),
    ResetZoom,
    Tick { at_ms: u64 },
    Duration { seconds: f64 },
    Progress { fraction: f64 },
    Seek { fraction: f64 },
    Region { region: Option<Region> },
    Status { status: PlaybackStatus },
    Control { control: Control },
    CaptureStarted,
    CaptureStopped { clip: ClipHandle },
    CaptureError { message: String },
    VoiceEnded,
    EditUrl { text: String, at_ms: u64 },
    ConfirmUrl,
    Load { url: String },
}

/// A recorded sequence of host events that can be replayed against a
/// [`Timeline`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    #[serde(default)]
    pub config: EngineConfig,
    pub events: Vec<ScriptEvent>,
}

impl InputScript {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let script: Self = serde_json::from_str(json)?;
        script.config.validate()?;
        Ok(script)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

/// Observable state of a timeline at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: PlaybackStatus,
    pub region: Option<Region>,
    pub zoom: f64,
    pub progress: f64,
    pub duration: f64,
    pub source: Option<String>,
    pub clip: Option<ClipHandle>,
}

impl Snapshot {
    pub fn of<V: VideoPlayback, C: VoiceCapture>(timeline: &Timeline<V, C>) -> Self {
        Self {
            status: timeline.status(),
            region: timeline.region(),
            zoom: timeline.zoom(),
            progress: timeline.progress(),
            duration: timeline.media().duration,
            source: timeline.media().source.clone(),
            clip: timeline.clip().cloned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub applied: usize,
    /// Requests the timeline refused, with their position in the script.
    pub rejected: Vec<(usize, String)>,
}

/// Feeds every event to the timeline in order. Refused status requests are
/// recorded rather than aborting the replay.
pub fn replay<V: VideoPlayback, C: VoiceCapture>(
    timeline: &mut Timeline<V, C>,
    events: &[ScriptEvent],
) -> ReplayReport {
    let mut report = ReplayReport::default();
    for (index, event) in events.iter().enumerate() {
        let outcome = match event {
            ScriptEvent::Surface { left, width } => {
                timeline.measure_surface(*left, *width);
                Ok(())
            }
            ScriptEvent::Pointer(pointer) => {
                timeline.handle_pointer(pointer);
                Ok(())
            }
            ScriptEvent::Wheel(wheel) => {
                timeline.on_wheel(wheel);
                Ok(())
            }
            ScriptEvent::ResetZoom => {
                timeline.reset_zoom();
                Ok(())
            }
            ScriptEvent::Tick { at_ms } => {
                timeline.tick(*at_ms);
                Ok(())
            }
            ScriptEvent::Duration { seconds } => {
                timeline.on_duration(*seconds);
                Ok(())
            }
            ScriptEvent::Progress { fraction } => {
                timeline.on_progress(*fraction);
                Ok(())
            }
            ScriptEvent::Seek { fraction } => {
                timeline.set_progress(*fraction);
                Ok(())
            }
            ScriptEvent::Region { region } => {
                timeline.set_region(*region);
                Ok(())
            }
            ScriptEvent::Status { status } => timeline.set_status(*status),
            ScriptEvent::Control { control } => timeline.press_control(*control),
            ScriptEvent::CaptureStarted => {
                timeline.on_capture_started();
                Ok(())
            }
            ScriptEvent::CaptureStopped { clip } => {
                timeline.on_capture_stopped(clip.clone());
                Ok(())
            }
            ScriptEvent::CaptureError { message } => {
                timeline.on_capture_error(message.clone());
                Ok(())
            }
            ScriptEvent::VoiceEnded => {
                timeline.on_voice_ended();
                Ok(())
            }
            ScriptEvent::EditUrl { text, at_ms } => {
                timeline.edit_url(text.clone(), *at_ms);
                Ok(())
            }
            ScriptEvent::ConfirmUrl => {
                timeline.confirm_url();
                Ok(())
            }
            ScriptEvent::Load { url } => {
                timeline.load_source(url.clone());
                Ok(())
            }
        };

        match outcome {
            Ok(()) => report.applied += 1,
            Err(err) => {
                tracing::warn!(index, %err, "script event rejected");
                report.rejected.push((index, err.to_string()));
            }
        }
    }
    report
}
