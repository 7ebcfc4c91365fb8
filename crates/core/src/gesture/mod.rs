use serde::{Deserialize, Serialize};

use crate::signal::Throttle;
use crate::GestureConfig;

/// Horizontal extent of the timeline surface in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBounds {
    pub left: f64,
    pub width: f64,
}

/// The measured timeline surface. Unmounted surfaces have no bounds.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    bounds: Option<SurfaceBounds>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current layout. Called whenever the surface resizes or
    /// scrolls so conversions always use fresh geometry.
    pub fn measure(&mut self, left: f64, width: f64) {
        self.bounds = Some(SurfaceBounds { left, width });
    }

    pub fn unmount(&mut self) {
        self.bounds = None;
    }

    pub fn bounds(&self) -> Option<SurfaceBounds> {
        self.bounds.filter(|b| b.width > 0.0 && b.width.is_finite() && b.left.is_finite())
    }

    /// Fraction of the surface width at `client_x`. Not clamped: positions
    /// left or right of the bar map below 0 or above 1.
    pub fn fraction_at(&self, client_x: f64) -> Option<f64> {
        let bounds = self.bounds()?;
        let fraction = (client_x - bounds.left) / bounds.width;
        fraction.is_finite().then_some(fraction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    Other(u8),
}

impl From<u8> for PointerButton {
    fn from(index: u8) -> Self {
        match index {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

/// The element under the pointer when it was pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitTarget {
    /// Anywhere in the document outside the timeline surface.
    #[default]
    Outside,
    /// Empty timeline background.
    Background,
    RegionBody,
    RegionStartHandle,
    RegionEndHandle,
    Marker,
}

impl HitTarget {
    pub fn is_inside(self) -> bool {
        self != Self::Outside
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// A raw pointer event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    #[serde(default)]
    pub button: u8,
    pub client_x: f64,
    #[serde(default)]
    pub client_y: f64,
    #[serde(default)]
    pub target: HitTarget,
    pub at_ms: u64,
}

impl PointerEvent {
    pub fn down(button: u8, client_x: f64, target: HitTarget, at_ms: u64) -> Self {
        Self {
            phase: PointerPhase::Down,
            button,
            client_x,
            client_y: 0.0,
            target,
            at_ms,
        }
    }

    pub fn moved(client_x: f64, at_ms: u64) -> Self {
        Self {
            phase: PointerPhase::Move,
            button: 0,
            client_x,
            client_y: 0.0,
            target: HitTarget::Outside,
            at_ms,
        }
    }

    pub fn up(client_x: f64, at_ms: u64) -> Self {
        Self {
            phase: PointerPhase::Up,
            button: 0,
            client_x,
            client_y: 0.0,
            target: HitTarget::Outside,
            at_ms,
        }
    }
}

/// Typed gesture event emitted by [`PointerGestureStream`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Down {
        button: PointerButton,
        client_x: f64,
        client_y: f64,
        /// `None` while the surface is unmeasured.
        fraction: Option<f64>,
        target: HitTarget,
        at_ms: u64,
    },
    /// Only emitted when the surface could be measured.
    Move {
        client_x: f64,
        fraction: f64,
        surface_width: f64,
        at_ms: u64,
    },
    Up {
        client_x: f64,
        fraction: Option<f64>,
        at_ms: u64,
    },
    /// A throttled secondary-button press inside the surface.
    RightClick { at_ms: u64 },
}

/// Outcome of routing one raw event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Routed {
    pub gesture: Option<GestureEvent>,
    /// The host should suppress its default handling (text selection,
    /// context menu).
    pub prevent_default: bool,
}

impl Routed {
    fn dropped() -> Self {
        Self {
            gesture: None,
            prevent_default: false,
        }
    }
}

/// Turns raw pointer input into typed gesture events for one timeline
/// surface. Presses are only taken from inside the surface; moves and
/// releases are observed document-wide.
#[derive(Debug, Clone)]
pub struct PointerGestureStream {
    surface: Surface,
    right_clicks: Throttle,
}

impl PointerGestureStream {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            surface: Surface::new(),
            right_clicks: Throttle::new(config.right_click_throttle_ms),
        }
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn route(&mut self, event: &PointerEvent) -> Routed {
        match event.phase {
            PointerPhase::Down => self.route_down(event),
            PointerPhase::Move => {
                let Some(bounds) = self.surface.bounds() else {
                    return Routed::dropped();
                };
                let Some(fraction) = self.surface.fraction_at(event.client_x) else {
                    return Routed::dropped();
                };
                Routed {
                    gesture: Some(GestureEvent::Move {
                        client_x: event.client_x,
                        fraction,
                        surface_width: bounds.width,
                        at_ms: event.at_ms,
                    }),
                    prevent_default: false,
                }
            }
            PointerPhase::Up => Routed {
                gesture: Some(GestureEvent::Up {
                    client_x: event.client_x,
                    fraction: self.surface.fraction_at(event.client_x),
                    at_ms: event.at_ms,
                }),
                prevent_default: false,
            },
        }
    }

    fn route_down(&mut self, event: &PointerEvent) -> Routed {
        if !event.target.is_inside() {
            return Routed::dropped();
        }

        let button = PointerButton::from(event.button);
        let gesture = if button == PointerButton::Secondary {
            self.right_clicks
                .accept(event.at_ms)
                .then_some(GestureEvent::RightClick { at_ms: event.at_ms })
        } else {
            Some(GestureEvent::Down {
                button,
                client_x: event.client_x,
                client_y: event.client_y,
                fraction: self.surface.fraction_at(event.client_x),
                target: event.target,
                at_ms: event.at_ms,
            })
        };

        Routed {
            gesture,
            prevent_default: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream() -> PointerGestureStream {
        let mut stream = PointerGestureStream::new(&GestureConfig::default());
        stream.surface_mut().measure(100.0, 400.0);
        stream
    }

    #[test]
    fn converts_moves_with_fresh_geometry() {
        let mut stream = stream();
        let routed = stream.route(&PointerEvent::moved(300.0, 0));
        assert!(matches!(
            routed.gesture,
            Some(GestureEvent::Move { fraction, .. }) if fraction == 0.5
        ));

        stream.surface_mut().measure(200.0, 200.0);
        let routed = stream.route(&PointerEvent::moved(300.0, 1));
        assert!(matches!(
            routed.gesture,
            Some(GestureEvent::Move { fraction, surface_width, .. })
                if fraction == 0.5 && surface_width == 200.0
        ));
    }

    #[test]
    fn unmeasured_surface_drops_moves() {
        let mut stream = PointerGestureStream::new(&GestureConfig::default());
        assert_eq!(stream.route(&PointerEvent::moved(10.0, 0)).gesture, None);

        stream.surface_mut().measure(0.0, 0.0);
        assert_eq!(stream.route(&PointerEvent::moved(10.0, 0)).gesture, None);
    }

    #[test]
    fn releases_are_observed_outside_the_surface() {
        let mut stream = stream();
        let routed = stream.route(&PointerEvent::up(900.0, 5));
        assert!(matches!(
            routed.gesture,
            Some(GestureEvent::Up { fraction: Some(f), .. }) if f > 1.0
        ));
    }

    #[test]
    fn presses_outside_are_ignored_and_inside_prevent_default() {
        let mut stream = stream();
        let outside = stream.route(&PointerEvent::down(0, 150.0, HitTarget::Outside, 0));
        assert_eq!(outside, Routed::dropped());

        let inside = stream.route(&PointerEvent::down(0, 150.0, HitTarget::Background, 0));
        assert!(inside.prevent_default);
        assert!(matches!(
            inside.gesture,
            Some(GestureEvent::Down { button: PointerButton::Primary, .. })
        ));
    }

    #[test]
    fn right_clicks_are_throttled() {
        let mut stream = stream();
        let mut accepted = Vec::new();
        for at in [0, 200, 600, 700, 1_100] {
            let routed = stream.route(&PointerEvent::down(2, 150.0, HitTarget::Background, at));
            assert!(routed.prevent_default);
            if let Some(GestureEvent::RightClick { at_ms }) = routed.gesture {
                accepted.push(at_ms);
            }
        }
        assert_eq!(accepted, vec![0, 600, 1_100]);
    }
}
