//! Core library for the voice-over clip editor.
//!
//! The crate holds the interactive timeline engine: it turns pointer and wheel
//! input into a zoom level, a playhead position and an optional selected
//! region, and keeps them consistent with the playback status of the
//! application. The host provides the video element and the audio capture
//! device through the [`VideoPlayback`] and [`VoiceCapture`] traits; all
//! other state lives in [`Timeline`].

pub mod axis;
pub mod config;
pub mod error;
pub mod gesture;
pub mod input;
pub mod player;
pub mod record;
pub mod region;
pub mod script;
pub mod signal;
pub mod status;
pub mod timeline;
pub mod zoom;

pub use config::{EdgeCrossing, EngineConfig, GestureConfig, InputConfig, RegionConfig, ZoomConfig};
pub use error::{Result, TimelineError};
pub use gesture::{HitTarget, PointerEvent, PointerGestureStream, PointerPhase, Surface};
pub use player::{MediaState, VideoPlayback};
pub use record::{ClipHandle, Recorder, VoiceCapture};
pub use region::{Region, RegionModel};
pub use script::{InputScript, ReplayReport, ScriptEvent, Snapshot};
pub use status::{Control, PlaybackStatus, StatusMachine, Transition};
pub use timeline::{SharedTimeline, Timeline};
pub use zoom::{WheelEvent, ZoomController};
