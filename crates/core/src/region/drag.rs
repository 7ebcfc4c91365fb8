use serde::{Deserialize, Serialize};

use super::Region;
use crate::EdgeCrossing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Start,
    End,
}

impl Edge {
    pub fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// Which part of the region a press grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    Resize(Edge),
}

/// Per-gesture context, alive from press to release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionDrag {
    pub mode: DragMode,
    pub base: Region,
    pub down_x: f64,
    pub live: Option<Region>,
}

impl RegionDrag {
    fn project(&self, delta: f64, crossing: EdgeCrossing) -> Region {
        match self.mode {
            DragMode::Move => self.base.translated_within_unit(delta),
            DragMode::Resize(edge) => {
                let moved = (self.base.edge(edge) + delta).clamp(0.0, 1.0);
                let other = self.base.edge(edge.opposite());
                let resized = self.base.with_edge(edge, moved);
                match crossing {
                    EdgeCrossing::Allow => resized,
                    EdgeCrossing::Swap => resized.normalized(),
                    EdgeCrossing::Clamp => {
                        let bounded = match edge {
                            Edge::Start => moved.min(other),
                            Edge::End => moved.max(other),
                        };
                        self.base.with_edge(edge, bounded)
                    }
                }
            }
        }
    }
}

/// Move and resize handling for an existing region. A press captures the
/// region as it was at that moment, every move offsets that snapshot by the
/// pointer's travel, and the release commits the last live value once.
#[derive(Debug, Clone)]
pub struct RegionDragEngine {
    crossing: EdgeCrossing,
    active: Option<RegionDrag>,
}

impl RegionDragEngine {
    pub fn new(crossing: EdgeCrossing) -> Self {
        Self {
            crossing,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&RegionDrag> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a gesture, superseding any gesture still in flight. Does nothing
    /// when there is no usable region to grab.
    pub fn begin(&mut self, mode: DragMode, down_x: f64, base: Option<Region>) -> bool {
        self.active = base.filter(Region::is_finite).map(|base| RegionDrag {
            mode,
            base,
            down_x,
            live: None,
        });
        self.active.is_some()
    }

    /// Applies one pointer move and returns the live region.
    pub fn track(&mut self, move_x: f64, surface_width: f64) -> Option<Region> {
        let crossing = self.crossing;
        let drag = self.active.as_mut()?;
        if !(surface_width > 0.0) {
            return None;
        }
        let delta = (move_x - drag.down_x) / surface_width;
        if !delta.is_finite() {
            return None;
        }
        let live = drag.project(delta, crossing);
        drag.live = Some(live);
        Some(live)
    }

    /// Ends the gesture. Yields the value to commit, if the pointer moved.
    pub fn finish(&mut self) -> Option<Region> {
        self.active.take().and_then(|drag| drag.live)
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }
}
