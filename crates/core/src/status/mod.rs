
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Result, TimelineError};

/// The mutually exclusive mode of the whole application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    #[default]
    Idle,
    PlayingVideo,
    /// Recording was requested and the capture device has not confirmed yet.
    AttemptingRecord,
    RecordingVoice,
    PlayingVoice,
}

impl PlaybackStatus {
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }

    pub fn is_recording(self) -> bool {
        matches!(self, Self::AttemptingRecord | Self::RecordingVoice)
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::PlayingVideo => "playing video",
            Self::AttemptingRecord => "starting to record",
            Self::RecordingVoice => "recording voice",
            Self::PlayingVoice => "playing voice",
        };
        f.write_str(label)
    }
}

/// A status change that was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: PlaybackStatus,
    pub to: PlaybackStatus,
}

/// Holds the current status and enforces the transition table.
///
/// Every non-idle mode can only be entered from `Idle` and only left back to
/// `Idle`; requests that would jump between two active modes are rejected
/// instead of overwriting the running one. The single exception is the
/// device confirming a pending recording, which is reported through
/// [`StatusMachine::confirm_recording`].
#[derive(Debug, Clone, Default)]
pub struct StatusMachine {
    status: PlaybackStatus,
}

impl StatusMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Applies a user request. `Ok(None)` means the request was already
    /// satisfied. Asking for `RecordingVoice` from idle yields
    /// `AttemptingRecord`; the device has to confirm the rest.
    pub fn request(&mut self, requested: PlaybackStatus) -> Result<Option<Transition>> {
        let current = self.status;
        let target = match (current, requested) {
            (_, PlaybackStatus::Idle) => PlaybackStatus::Idle,
            (PlaybackStatus::Idle, PlaybackStatus::RecordingVoice)
            | (PlaybackStatus::Idle, PlaybackStatus::AttemptingRecord) => {
                PlaybackStatus::AttemptingRecord
            }
            (current, PlaybackStatus::RecordingVoice | PlaybackStatus::AttemptingRecord)
                if current.is_recording() =>
            {
                return Ok(None)
            }
            (PlaybackStatus::Idle, other) => other,
            (current, requested) if current == requested => return Ok(None),
            (current, requested) => {
                return Err(TimelineError::StatusConflict { current, requested })
            }
        };
        Ok(self.apply(target))
    }

    /// The capture device started. Only meaningful while a recording is
    /// pending.
    pub fn confirm_recording(&mut self) -> Option<Transition> {
        (self.status == PlaybackStatus::AttemptingRecord)
            .then(|| self.apply(PlaybackStatus::RecordingVoice))
            .flatten()
    }

    /// Returns to idle from whatever mode is active.
    pub fn force_idle(&mut self) -> Option<Transition> {
        self.apply(PlaybackStatus::Idle)
    }

    fn apply(&mut self, to: PlaybackStatus) -> Option<Transition> {
        let from = self.status;
        if from == to {
            return None;
        }
        self.status = to;
        tracing::debug!(%from, %to, "status changed");
        Some(Transition { from, to })
    }
}

/// The three transport buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Video,
    Recording,
    VoicePlayback,
}

impl Control {
    pub const ALL: [Control; 3] = [Control::Video, Control::Recording, Control::VoicePlayback];

    /// The status this control switches into.
    pub fn active_status(self) -> PlaybackStatus {
        match self {
            Self::Video => PlaybackStatus::PlayingVideo,
            Self::Recording => PlaybackStatus::RecordingVoice,
            Self::VoicePlayback => PlaybackStatus::PlayingVoice,
        }
    }

    fn owns(self, status: PlaybackStatus) -> bool {
        match self {
            Self::Recording => status.is_recording(),
            other => status == other.active_status(),
        }
    }

    /// Status to request when the control is pressed, or `None` when the
    /// control is disabled in the current status.
    pub fn toggle(self, status: PlaybackStatus) -> Option<PlaybackStatus> {
        if self.owns(status) {
            Some(PlaybackStatus::Idle)
        } else if status.is_idle() {
            Some(self.active_status())
        } else {
            None
        }
    }

    pub fn view(self, status: PlaybackStatus) -> ControlView {
        let active = self.owns(status);
        let label = match (self, active) {
            (Self::Video, true) => "Stop",
            (Self::Video, false) => "Play",
            (Self::Recording, true) => "Stop recording",
            (Self::Recording, false) => "Start recording",
            (Self::VoicePlayback, true) => "Stop voice",
            (Self::VoicePlayback, false) => "Play voice",
        };
        ControlView {
            control: self,
            label,
            enabled: active || status.is_idle(),
        }
    }
}

/// What a transport button shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlView {
    pub control: Control,
    pub label: &'static str,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_goes_through_the_pending_state() {
        let mut machine = StatusMachine::new();
        let t = machine.request(PlaybackStatus::RecordingVoice).unwrap().unwrap();
        assert_eq!(t.to, PlaybackStatus::AttemptingRecord);
        assert_eq!(machine.request(PlaybackStatus::RecordingVoice).unwrap(), None);

        let t = machine.confirm_recording().unwrap();
        assert_eq!(t.from, PlaybackStatus::AttemptingRecord);
        assert_eq!(machine.status(), PlaybackStatus::RecordingVoice);
        assert_eq!(machine.confirm_recording(), None);
    }

    #[test]
    fn conflicting_requests_are_rejected() {
        let mut machine = StatusMachine::new();
        machine.request(PlaybackStatus::PlayingVideo).unwrap();

        let err = machine.request(PlaybackStatus::RecordingVoice).unwrap_err();
        assert!(matches!(
            err,
            TimelineError::StatusConflict {
                current: PlaybackStatus::PlayingVideo,
                requested: PlaybackStatus::RecordingVoice,
            }
        ));
        assert_eq!(machine.status(), PlaybackStatus::PlayingVideo);
        assert!(format!("{err}").contains("playing video"));
    }

    #[test]
    fn every_mode_returns_to_idle() {
        for status in [
            PlaybackStatus::PlayingVideo,
            PlaybackStatus::RecordingVoice,
            PlaybackStatus::PlayingVoice,
        ] {
            let mut machine = StatusMachine::new();
            machine.request(status).unwrap();
            let t = machine.request(PlaybackStatus::Idle).unwrap().unwrap();
            assert_eq!(t.to, PlaybackStatus::Idle);
            assert_eq!(machine.force_idle(), None);
        }
    }

    #[test]
    fn repeated_requests_are_no_ops() {
        let mut machine = StatusMachine::new();
        assert_eq!(machine.request(PlaybackStatus::Idle).unwrap(), None);
        machine.request(PlaybackStatus::PlayingVoice).unwrap();
        assert_eq!(machine.request(PlaybackStatus::PlayingVoice).unwrap(), None);
    }

    #[test]
    fn controls_toggle_their_own_mode() {
        assert_eq!(
            Control::Video.toggle(PlaybackStatus::Idle),
            Some(PlaybackStatus::PlayingVideo)
        );
        assert_eq!(
            Control::Video.toggle(PlaybackStatus::PlayingVideo),
            Some(PlaybackStatus::Idle)
        );
        assert_eq!(Control::Video.toggle(PlaybackStatus::RecordingVoice), None);
        assert_eq!(
            Control::Recording.toggle(PlaybackStatus::AttemptingRecord),
            Some(PlaybackStatus::Idle)
        );
    }

    #[test]
    fn control_views_follow_status() {
        let view = Control::Recording.view(PlaybackStatus::RecordingVoice);
        assert_eq!(view.label, "Stop recording");
        assert!(view.enabled);

        let view = Control::VoicePlayback.view(PlaybackStatus::RecordingVoice);
        assert_eq!(view.label, "Play voice");
        assert!(!view.enabled);

        assert!(Control::ALL
            .iter()
            .all(|c| c.view(PlaybackStatus::Idle).enabled));
    }
}
