use std::sync::{Arc, Mutex, MutexGuard};

use crate::axis::{self, Tick};
use crate::gesture::{GestureEvent, HitTarget, PointerButton, PointerEvent, PointerGestureStream};
use crate::input::UrlInput;
use crate::player::{MediaState, VideoPlayback};
use crate::record::{ClipHandle, Recorder, VoiceCapture};
use crate::region::{DragMode, Edge, Region, RegionDragEngine, RegionModel, RegionSource};
use crate::signal::{Listeners, SubscriptionId};
use crate::status::{Control, ControlView, PlaybackStatus, StatusMachine, Transition};
use crate::zoom::{WheelEvent, ZoomController};
use crate::{EngineConfig, Result, TimelineError};

mod selection;

pub use selection::{Press, Release, Tracked};

/// Owns every piece of interactive state and is the only place it is
/// written. Collaborators are driven through [`VideoPlayback`] and
/// [`VoiceCapture`]; observers are notified through subscriptions.
pub struct Timeline<V, C> {
    config: EngineConfig,
    video: V,
    recorder: Recorder<C>,
    media: MediaState,
    url: UrlInput,
    gestures: PointerGestureStream,
    zoom: ZoomController,
    region: RegionModel,
    drag: RegionDragEngine,
    press: Option<Press>,
    status: StatusMachine,
    status_listeners: Listeners<Transition>,
    zoom_listeners: Listeners<f64>,
    commit_listeners: Listeners<Option<Region>>,
    seek_listeners: Listeners<f64>,
    error_listeners: Listeners<TimelineError>,
}

impl<V: VideoPlayback, C: VoiceCapture> Timeline<V, C> {
    pub fn new(config: EngineConfig, video: V, capture: C) -> Result<Self> {
        config.validate()?;
        let recorder = Recorder::new(capture);
        tracing::info!(recording = recorder.is_supported(), "timeline ready");

        Ok(Self {
            video,
            recorder,
            media: MediaState::default(),
            url: UrlInput::new(&config.input),
            gestures: PointerGestureStream::new(&config.gesture),
            zoom: ZoomController::new(&config.zoom),
            region: RegionModel::new(),
            drag: RegionDragEngine::new(config.region.edge_crossing),
            press: None,
            status: StatusMachine::new(),
            status_listeners: Listeners::new(),
            zoom_listeners: Listeners::new(),
            commit_listeners: Listeners::new(),
            seek_listeners: Listeners::new(),
            error_listeners: Listeners::new(),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status.status()
    }

    /// Region as currently drawn, including a drag or selection in progress.
    pub fn region(&self) -> Option<Region> {
        self.region.current()
    }

    pub fn committed_region(&self) -> Option<Region> {
        self.region.committed()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom.zoom()
    }

    pub fn progress(&self) -> f64 {
        self.media.progress
    }

    pub fn media(&self) -> &MediaState {
        &self.media
    }

    /// Marker position, following the pointer while the marker is dragged.
    pub fn marker_position(&self) -> f64 {
        match self.press {
            Some(Press::Scrubbing { live: Some(position) }) => position,
            _ => self.media.marker_position(),
        }
    }

    pub fn clip(&self) -> Option<&ClipHandle> {
        self.recorder.clip()
    }

    pub fn controls(&self) -> [ControlView; 3] {
        let status = self.status();
        Control::ALL.map(|control| control.view(status))
    }

    pub fn ticks(&self) -> Vec<Tick> {
        axis::layout(self.media.duration, self.zoom())
    }

    pub fn video(&self) -> &V {
        &self.video
    }

    pub fn capture(&self) -> &C {
        self.recorder.capture()
    }

    pub fn url_text(&self) -> &str {
        self.url.text()
    }

    pub fn is_gesture_active(&self) -> bool {
        self.press.is_some() || self.drag.is_dragging()
    }

    // Layout and time

    pub fn measure_surface(&mut self, left: f64, width: f64) {
        self.gestures.surface_mut().measure(left, width);
    }

    pub fn unmount_surface(&mut self) {
        self.gestures.surface_mut().unmount();
    }

    /// Lets timers run: hold detection and the URL debounce.
    pub fn tick(&mut self, now_ms: u64) {
        self.advance_press(now_ms);
        if let Some(url) = self.url.poll(now_ms) {
            self.load_source(url);
        }
    }

    // Pointer input

    /// Feeds a raw pointer event. Returns whether the host should suppress
    /// its default handling of it.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        if !self.media.is_loaded() && !self.is_gesture_active() {
            return false;
        }
        self.advance_press(event.at_ms);

        let in_gesture = self.is_gesture_active();
        let routed = self.gestures.route(event);
        match routed.gesture {
            Some(GestureEvent::Down {
                button: PointerButton::Primary,
                client_x,
                fraction,
                target,
                at_ms,
                ..
            }) => self.press(target, client_x, fraction, at_ms),
            Some(GestureEvent::Down { .. }) | None => {}
            Some(GestureEvent::RightClick { .. }) => {
                self.cancel_gestures();
                self.commit_region(None);
            }
            Some(GestureEvent::Move {
                client_x,
                fraction,
                surface_width,
                ..
            }) => self.track(client_x, fraction, surface_width),
            Some(GestureEvent::Up { fraction, .. }) => self.release(fraction),
        }
        routed.prevent_default || in_gesture
    }

    fn press(&mut self, target: HitTarget, client_x: f64, fraction: Option<f64>, at_ms: u64) {
        // A new press always supersedes whatever is still in flight.
        self.cancel_gestures();

        let hold_delay_ms = self.config.gesture.hold_delay_ms;
        let mode = match target {
            HitTarget::Background => {
                self.press = fraction.map(|anchor| Press::pending(anchor, at_ms, hold_delay_ms));
                return;
            }
            HitTarget::Marker => {
                self.press = Some(Press::scrubbing());
                return;
            }
            HitTarget::RegionBody => DragMode::Move,
            HitTarget::RegionStartHandle => DragMode::Resize(Edge::Start),
            HitTarget::RegionEndHandle => DragMode::Resize(Edge::End),
            HitTarget::Outside => return,
        };
        self.drag.begin(mode, client_x, self.region.current());
    }

    fn track(&mut self, client_x: f64, fraction: f64, surface_width: f64) {
        if self.drag.is_dragging() {
            if let Some(live) = self.drag.track(client_x, surface_width) {
                self.region.set_live(live, RegionSource::Drag);
            }
            return;
        }
        if let Some(Tracked::Region(live)) = self.press.as_mut().and_then(|p| p.track(fraction)) {
            self.region.set_live(live, RegionSource::Selection);
        }
    }

    fn release(&mut self, fraction: Option<f64>) {
        if self.drag.is_dragging() {
            if let Some(region) = self.drag.finish() {
                self.commit_region(Some(region));
            }
            return;
        }
        let Some(press) = self.press.take() else {
            return;
        };
        match press.release(fraction) {
            Release::Click(position) => self.set_progress(position),
            Release::Select(Some(region)) => self.commit_region(Some(region)),
            Release::Scrub(Some(position)) => self.set_progress(position),
            Release::Select(None) | Release::Scrub(None) => {}
        }
    }

    fn advance_press(&mut self, now_ms: u64) {
        let Some(press) = self.press.as_mut() else {
            return;
        };
        if !press.advance(now_ms) {
            return;
        }
        tracing::debug!("press held, selecting region");
        if let Press::Selecting {
            live: Some(live), ..
        } = *press
        {
            self.region.set_live(live, RegionSource::Selection);
        }
    }

    fn cancel_gestures(&mut self) {
        self.drag.cancel();
        self.press = None;
        self.region.discard_live();
    }

    // Region

    /// Programmatic region change. The value is ordered and kept inside the
    /// bar before it is stored. Regions with a non-finite edge are ignored.
    pub fn set_region(&mut self, region: Option<Region>) {
        if let Some(r) = region.filter(|r| !r.is_finite()) {
            tracing::warn!(start = r.start, end = r.end, "ignoring non-finite region");
            return;
        }
        let region = region.map(|r| {
            Region::spanning(r.start.clamp(0.0, 1.0), r.end.clamp(0.0, 1.0))
        });
        self.region.set_external(region);
    }

    fn commit_region(&mut self, region: Option<Region>) {
        match region {
            Some(r) => tracing::info!(start = r.start, end = r.end, "region committed"),
            None => tracing::info!("region cleared"),
        }
        self.region.set_external(region);
        self.commit_listeners.notify(&region);
    }

    // Zoom

    pub fn on_wheel(&mut self, event: &WheelEvent) -> Option<f64> {
        let zoom = self.zoom.observe(event)?;
        self.zoom_listeners.notify(&zoom);
        Some(zoom)
    }

    pub fn reset_zoom(&mut self) -> f64 {
        let zoom = self.zoom.reset();
        self.zoom_listeners.notify(&zoom);
        zoom
    }

    // Media

    pub fn edit_url(&mut self, text: impl Into<String>, now_ms: u64) {
        self.url.edit(text, now_ms);
    }

    pub fn confirm_url(&mut self) {
        if let Some(url) = self.url.confirm() {
            self.load_source(url);
        }
    }

    /// Switches to new media. Everything tied to the old media is reset.
    pub fn load_source(&mut self, url: impl Into<String>) {
        let url = url.into();
        tracing::info!(%url, "loading media");
        self.cancel_gestures();
        if let Some(transition) = self.status.force_idle() {
            self.apply_transition(transition);
        }
        self.media = MediaState {
            source: Some(url),
            duration: 0.0,
            progress: 0.0,
        };
        self.region.set_external(None);
    }

    pub fn on_duration(&mut self, seconds: f64) {
        if seconds.is_finite() && seconds >= 0.0 {
            self.media.duration = seconds;
        }
    }

    /// Periodic progress report from the video element. Playback past the end
    /// of the region stops and rewinds to its start.
    pub fn on_progress(&mut self, fraction: f64) {
        if !fraction.is_finite() {
            return;
        }
        self.media.progress = fraction;

        if self.status() != PlaybackStatus::PlayingVideo {
            return;
        }
        let Some(region) = self.region.current() else {
            return;
        };
        if fraction > region.end {
            tracing::info!(progress = fraction, end = region.end, "region end reached");
            if let Some(transition) = self.status.force_idle() {
                self.apply_transition(transition);
            }
            self.seek(region.start);
        }
    }

    /// Manual seek. Always stops whatever is running and is never clipped to
    /// the region.
    pub fn set_progress(&mut self, fraction: f64) {
        if !fraction.is_finite() {
            return;
        }
        if let Some(transition) = self.status.force_idle() {
            self.apply_transition(transition);
        }
        self.seek(fraction.clamp(0.0, 1.0));
    }

    fn seek(&mut self, fraction: f64) {
        tracing::debug!(fraction, "seek");
        self.video.seek_to(fraction);
        self.media.progress = fraction;
        self.seek_listeners.notify(&fraction);
    }

    // Status

    pub fn set_status(&mut self, requested: PlaybackStatus) -> Result<()> {
        if self.status().is_idle() {
            self.preflight(requested)?;
        }
        match self.status.request(requested) {
            Ok(Some(transition)) => {
                self.apply_transition(transition);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => {
                tracing::warn!(%err, "status request rejected");
                Err(err)
            }
        }
    }

    /// A transport button was pressed.
    pub fn press_control(&mut self, control: Control) -> Result<()> {
        let current = self.status();
        match control.toggle(current) {
            Some(requested) => self.set_status(requested),
            None => Err(TimelineError::StatusConflict {
                current,
                requested: control.active_status(),
            }),
        }
    }

    fn preflight(&self, requested: PlaybackStatus) -> Result<()> {
        match requested {
            PlaybackStatus::RecordingVoice | PlaybackStatus::AttemptingRecord
                if !self.recorder.is_supported() =>
            {
                Err(TimelineError::RecordingUnsupported)
            }
            PlaybackStatus::PlayingVoice if self.recorder.clip().is_none() => {
                Err(TimelineError::NoClip)
            }
            _ => Ok(()),
        }
    }

    fn apply_transition(&mut self, transition: Transition) {
        match transition.from {
            PlaybackStatus::PlayingVideo => self.video.set_playing(false),
            PlaybackStatus::AttemptingRecord | PlaybackStatus::RecordingVoice
                if !transition.to.is_recording() =>
            {
                self.recorder.stop()
            }
            PlaybackStatus::PlayingVoice => self.recorder.stop_playback(),
            _ => {}
        }

        let entered = match transition.to {
            PlaybackStatus::PlayingVideo => {
                if let Some(region) = self.region.current() {
                    self.seek(region.start);
                }
                self.video.set_playing(true);
                Ok(())
            }
            PlaybackStatus::AttemptingRecord => self.recorder.start(),
            PlaybackStatus::PlayingVoice => self.recorder.play(),
            PlaybackStatus::RecordingVoice | PlaybackStatus::Idle => Ok(()),
        };

        tracing::info!(from = %transition.from, to = %transition.to, "status");
        self.status_listeners.notify(&transition);

        if let Err(err) = entered {
            self.report(err);
            if let Some(transition) = self.status.force_idle() {
                self.apply_transition(transition);
            }
        }
    }

    fn report(&mut self, err: TimelineError) {
        tracing::warn!(%err, "timeline error");
        self.error_listeners.notify(&err);
    }

    // Capture device callbacks

    pub fn on_capture_started(&mut self) {
        match self.status.confirm_recording() {
            Some(transition) => self.apply_transition(transition),
            None => {
                // The request was withdrawn before the device came up.
                tracing::warn!("capture started without a pending request, stopping it");
                self.recorder.capture_mut().stop_recording();
            }
        }
    }

    pub fn on_capture_stopped(&mut self, clip: ClipHandle) {
        self.recorder.finalize(clip);
        if self.status().is_recording() {
            if let Some(transition) = self.status.force_idle() {
                self.apply_transition(transition);
            }
        }
    }

    pub fn on_capture_error(&mut self, message: impl Into<String>) {
        self.recorder.fail();
        if self.status().is_recording() {
            if let Some(transition) = self.status.force_idle() {
                self.apply_transition(transition);
            }
        }
        self.report(TimelineError::Device(message.into()));
    }

    pub fn on_voice_ended(&mut self) {
        if self.status() == PlaybackStatus::PlayingVoice {
            if let Some(transition) = self.status.force_idle() {
                self.apply_transition(transition);
            }
        }
    }

    // Subscriptions

    pub fn subscribe_region<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Option<Region>) + Send + 'static,
    {
        self.region.subscribe(callback)
    }

    /// Called once per finished gesture with the value it committed.
    pub fn subscribe_commits<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Option<Region>) + Send + 'static,
    {
        self.commit_listeners.subscribe(callback)
    }

    pub fn subscribe_status<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Transition) + Send + 'static,
    {
        self.status_listeners.subscribe(callback)
    }

    pub fn subscribe_zoom<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&f64) + Send + 'static,
    {
        self.zoom_listeners.subscribe(callback)
    }

    pub fn subscribe_seeks<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&f64) + Send + 'static,
    {
        self.seek_listeners.subscribe(callback)
    }

    pub fn subscribe_errors<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&TimelineError) + Send + 'static,
    {
        self.error_listeners.subscribe(callback)
    }

    /// Removes a callback registered through any `subscribe_*` method.
    /// Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.region.unsubscribe(id)
            || self.commit_listeners.unsubscribe(id)
            || self.status_listeners.unsubscribe(id)
            || self.zoom_listeners.unsubscribe(id)
            || self.seek_listeners.unsubscribe(id)
            || self.error_listeners.unsubscribe(id)
    }
}

impl<V, C> std::fmt::Debug for Timeline<V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("status", &self.status.status())
            .field("region", &self.region.current())
            .field("zoom", &self.zoom.zoom())
            .field("media", &self.media)
            .field("press", &self.press)
            .field("drag", &self.drag.active())
            .finish()
    }
}

/// Thread-safe handle that serializes every write to one [`Timeline`].
pub struct SharedTimeline<V, C> {
    shared: Arc<Mutex<Timeline<V, C>>>,
}

impl<V, C> Clone for SharedTimeline<V, C> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<V, C> SharedTimeline<V, C> {
    pub fn new(timeline: Timeline<V, C>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(timeline)),
        }
    }

    /// Runs `f` with exclusive access to the timeline.
    pub fn with<R>(&self, f: impl FnOnce(&mut Timeline<V, C>) -> R) -> Result<R> {
        let mut timeline = self.lock()?;
        Ok(f(&mut timeline))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Timeline<V, C>>> {
        self.shared.lock().map_err(|_| TimelineError::LockPoisoned)
    }
}

impl<V, C> std::fmt::Debug for SharedTimeline<V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedTimeline").finish()
    }
}
