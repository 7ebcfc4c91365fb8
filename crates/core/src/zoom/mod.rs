use serde::{Deserialize, Serialize};

use crate::signal::{Distinct, Throttle};
use crate::ZoomConfig;

/// Zoom factor of the un-zoomed timeline.
pub const INITIAL_ZOOM: f64 = 1.0;

/// A wheel or trackpad scroll over the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    #[serde(default)]
    pub delta_x: f64,
    #[serde(default)]
    pub delta_y: f64,
    pub at_ms: u64,
}

impl WheelEvent {
    pub fn vertical(delta_y: f64, at_ms: u64) -> Self {
        Self {
            delta_x: 0.0,
            delta_y,
            at_ms,
        }
    }

    /// Euclidean length of the scroll, signed by the product of the signs of
    /// its non-zero axes.
    pub fn signed_magnitude(&self) -> f64 {
        let sign: f64 = [self.delta_x, self.delta_y]
            .iter()
            .filter(|d| **d != 0.0)
            .map(|d| d.signum())
            .product();
        self.delta_x.hypot(self.delta_y) * sign
    }
}

/// Turns wheel input into a zoom factor of `base^exponent`, floored at 1.
#[derive(Debug, Clone)]
pub struct ZoomController {
    base: f64,
    sensitivity: f64,
    throttle: Throttle,
    exponent: f64,
    emitted: Distinct<f64>,
    zoom: f64,
}

impl ZoomController {
    pub fn new(config: &ZoomConfig) -> Self {
        Self {
            base: config.base,
            sensitivity: config.sensitivity,
            throttle: Throttle::new(config.wheel_throttle_ms),
            exponent: 0.0,
            emitted: Distinct::seeded(INITIAL_ZOOM),
            zoom: INITIAL_ZOOM,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Feeds one wheel event. Returns the new zoom factor when it changed;
    /// throttled events and no-op scrolls return `None`.
    pub fn observe(&mut self, event: &WheelEvent) -> Option<f64> {
        if !self.throttle.accept(event.at_ms) {
            return None;
        }
        let delta = event.signed_magnitude();
        if !delta.is_finite() {
            return None;
        }

        // Scrolling out past the floor must not bank a deficit that later
        // scroll-ins have to pay back.
        self.exponent = (self.exponent + delta * self.sensitivity).max(0.0);
        let zoom = self.base.powf(self.exponent).max(INITIAL_ZOOM);

        let zoom = self.emitted.pass(zoom)?;
        self.zoom = zoom;
        Some(zoom)
    }

    /// Returns to the un-zoomed floor. Always emits, even when already there.
    pub fn reset(&mut self) -> f64 {
        self.exponent = 0.0;
        self.emitted = Distinct::seeded(INITIAL_ZOOM);
        self.zoom = INITIAL_ZOOM;
        tracing::debug!("zoom reset");
        INITIAL_ZOOM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ZoomController {
        ZoomController::new(&ZoomConfig::default())
    }

    #[test]
    fn same_direction_scrolls_zoom_in_monotonically() {
        let mut zoom = controller();
        let first = zoom.observe(&WheelEvent::vertical(100.0, 0)).unwrap();
        let second = zoom.observe(&WheelEvent::vertical(100.0, 100)).unwrap();

        assert!(first > INITIAL_ZOOM);
        assert!(second > first);
        assert!((first - 1.02).abs() < 1e-12);

        assert_eq!(zoom.reset(), 1.0);
        assert_eq!(zoom.zoom(), 1.0);
    }

    #[test]
    fn never_drops_below_floor() {
        let mut zoom = controller();
        zoom.observe(&WheelEvent::vertical(300.0, 0));
        for i in 1..50 {
            zoom.observe(&WheelEvent::vertical(-1_000.0, i * 50));
            assert!(zoom.zoom() >= 1.0);
        }
        assert_eq!(zoom.zoom(), 1.0);

        // No banked deficit: the next scroll-in moves immediately.
        assert!(zoom.observe(&WheelEvent::vertical(100.0, 10_000)).unwrap() > 1.0);
    }

    #[test]
    fn throttles_bursts() {
        let mut zoom = controller();
        assert!(zoom.observe(&WheelEvent::vertical(100.0, 0)).is_some());
        assert!(zoom.observe(&WheelEvent::vertical(100.0, 5)).is_none());
        assert!(zoom.observe(&WheelEvent::vertical(100.0, 20)).is_some());
    }

    #[test]
    fn opposing_axes_flip_the_sign() {
        let diagonal = WheelEvent {
            delta_x: -3.0,
            delta_y: 4.0,
            at_ms: 0,
        };
        assert_eq!(diagonal.signed_magnitude(), -5.0);
        assert_eq!(WheelEvent::vertical(-7.0, 0).signed_magnitude(), -7.0);
        assert_eq!(WheelEvent::vertical(0.0, 0).signed_magnitude(), 0.0);
    }

    #[test]
    fn repeated_values_are_not_reemitted() {
        let mut zoom = controller();
        assert_eq!(zoom.observe(&WheelEvent::vertical(0.0, 0)), None);
        assert_eq!(zoom.observe(&WheelEvent::vertical(-50.0, 100)), None);
    }

    #[test]
    fn reset_restarts_accumulation_from_the_floor() {
        let mut zoom = controller();
        for i in 0..5 {
            zoom.observe(&WheelEvent::vertical(100.0, i * 100));
        }
        zoom.reset();
        let next = zoom.observe(&WheelEvent::vertical(100.0, 1_000)).unwrap();
        assert!((next - 1.02).abs() < 1e-12);
    }
}
