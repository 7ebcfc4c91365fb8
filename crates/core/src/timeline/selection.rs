use crate::region::Region;

/// Per-gesture context for a primary press that did not grab the region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Press {
    /// Pressed on the background; still undecided between click and hold.
    /// `last` is the most recent pointer position seen meanwhile.
    Pending {
        anchor: f64,
        deadline_ms: u64,
        last: Option<f64>,
    },
    /// Held long enough to draw a new region from `anchor`.
    Selecting { anchor: f64, live: Option<Region> },
    /// Dragging the progress marker.
    Scrubbing { live: Option<f64> },
}

/// Live value produced by a pointer move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tracked {
    Region(Region),
    Marker(f64),
}

/// What a press amounted to once released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    Click(f64),
    Select(Option<Region>),
    Scrub(Option<f64>),
}

impl Press {
    pub fn pending(anchor: f64, at_ms: u64, hold_delay_ms: u64) -> Self {
        Self::Pending {
            anchor: anchor.clamp(0.0, 1.0),
            deadline_ms: at_ms.saturating_add(hold_delay_ms),
            last: None,
        }
    }

    pub fn scrubbing() -> Self {
        Self::Scrubbing { live: None }
    }

    /// Promotes a pending press once its hold delay is over. Movement made
    /// before the promotion becomes the other edge of the selection.
    pub fn advance(&mut self, now_ms: u64) -> bool {
        match *self {
            Self::Pending {
                anchor,
                deadline_ms,
                last,
            } if now_ms >= deadline_ms => {
                *self = Self::Selecting {
                    anchor,
                    live: last.map(|position| Region::spanning(anchor, position)),
                };
                true
            }
            _ => false,
        }
    }

    /// Applies a pointer move. Pending presses only remember it.
    pub fn track(&mut self, fraction: f64) -> Option<Tracked> {
        let position = fraction.clamp(0.0, 1.0);
        match self {
            Self::Pending { last, .. } => {
                *last = Some(position);
                None
            }
            Self::Selecting { anchor, live } => {
                let region = Region::spanning(*anchor, position);
                *live = Some(region);
                Some(Tracked::Region(region))
            }
            Self::Scrubbing { live } => {
                *live = Some(position);
                Some(Tracked::Marker(position))
            }
        }
    }

    /// Resolves the press. `at` is where the pointer was released, if the
    /// surface could be measured at that point.
    pub fn release(self, at: Option<f64>) -> Release {
        let at = at.filter(|f| f.is_finite()).map(|f| f.clamp(0.0, 1.0));
        match self {
            Self::Pending { anchor, .. } => Release::Click(at.unwrap_or(anchor)),
            Self::Selecting { anchor, live } => match at {
                Some(end) if live.is_some() || end != anchor => {
                    Release::Select(Some(Region::spanning(anchor, end)))
                }
                _ => Release::Select(live),
            },
            Self::Scrubbing { live } => Release::Scrub(live.map(|last| at.unwrap_or(last))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn early_release_is_a_click_where_the_pointer_let_go() {
        let mut press = Press::pending(0.4, 1_000, 100);
        assert!(!press.advance(1_099));
        assert_eq!(press.track(0.9), None);
        assert_eq!(press.release(Some(0.9)), Release::Click(0.9));
        assert_eq!(press.release(None), Release::Click(0.4));
    }

    #[test]
    fn movement_before_the_hold_becomes_the_other_edge() {
        let mut press = Press::pending(0.4, 0, 100);
        press.track(0.6);
        assert!(press.advance(100));
        assert_eq!(
            press,
            Press::Selecting {
                anchor: 0.4,
                live: Some(Region::new(0.4, 0.6)),
            }
        );
        assert_eq!(
            press.release(Some(0.6)),
            Release::Select(Some(Region::new(0.4, 0.6)))
        );
    }

    #[test]
    fn reverse_hold_drag_is_ordered() {
        let mut press = Press::pending(0.7, 0, 100);
        assert!(press.advance(100));
        assert!(!press.advance(200));
        press.track(0.5);
        press.track(0.3);
        assert_eq!(
            press.release(Some(0.3)),
            Release::Select(Some(Region::new(0.3, 0.7)))
        );
    }

    #[test]
    fn positions_outside_the_bar_are_clamped() {
        let mut press = Press::pending(-0.2, 0, 100);
        press.advance(100);
        assert_eq!(
            press.track(1.4),
            Some(Tracked::Region(Region::new(0.0, 1.0)))
        );

        let mut scrub = Press::scrubbing();
        assert_eq!(scrub.track(-3.0), Some(Tracked::Marker(0.0)));
        assert_eq!(scrub.release(None), Release::Scrub(Some(0.0)));
    }

    #[test]
    fn hold_without_movement_selects_nothing() {
        let mut press = Press::pending(0.5, 0, 100);
        press.advance(150);
        assert_eq!(press.release(Some(0.5)), Release::Select(None));
        assert_eq!(press.release(None), Release::Select(None));
    }
}
