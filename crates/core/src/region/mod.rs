use serde::{Deserialize, Serialize};

use crate::signal::{Signal, SubscriptionId};

pub mod drag;

pub use drag::{DragMode, Edge, RegionDrag, RegionDragEngine};

/// A sub-interval of the media, as fractions of its total duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub start: f64,
    pub end: f64,
}

impl Region {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Builds a region spanning two positions given in any order.
    pub fn spanning(a: f64, b: f64) -> Self {
        if a > b {
            Self::new(b, a)
        } else {
            Self::new(a, b)
        }
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn normalized(self) -> Self {
        Self::spanning(self.start, self.end)
    }

    pub fn edge(&self, edge: Edge) -> f64 {
        match edge {
            Edge::Start => self.start,
            Edge::End => self.end,
        }
    }

    pub fn with_edge(mut self, edge: Edge, value: f64) -> Self {
        match edge {
            Edge::Start => self.start = value,
            Edge::End => self.end = value,
        }
        self
    }

    /// Shifts both edges by `delta`, keeping the region inside `[0, 1]`
    /// without changing its width.
    pub fn translated_within_unit(&self, delta: f64) -> Self {
        let width = self.width();
        let start = if width >= 1.0 {
            self.start
        } else {
            (self.start + delta).clamp(0.0, 1.0 - width)
        };
        Self::new(start, start + width)
    }

    pub fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }
}

/// Where the current region value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSource {
    /// A committed value: programmatic setter, right-click clear, or the
    /// final value of a gesture.
    External,
    /// Live value of a move/resize drag in progress.
    Drag,
    /// Live value of a hold-to-select gesture in progress.
    Selection,
}

/// Authoritative current region. Every source writes through here and the
/// most recent write wins.
#[derive(Debug)]
pub struct RegionModel {
    current: Signal<Option<Region>>,
    committed: Option<Region>,
    last_source: RegionSource,
}

impl Default for RegionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionModel {
    pub fn new() -> Self {
        Self {
            current: Signal::new(None),
            committed: None,
            last_source: RegionSource::External,
        }
    }

    /// The value a renderer should draw, including uncommitted live values.
    pub fn current(&self) -> Option<Region> {
        *self.current.get()
    }

    /// The last committed value, ignoring any gesture in progress.
    pub fn committed(&self) -> Option<Region> {
        self.committed
    }

    pub fn last_source(&self) -> RegionSource {
        self.last_source
    }

    pub fn set_external(&mut self, region: Option<Region>) -> bool {
        self.committed = region;
        self.write(region, RegionSource::External)
    }

    pub fn set_live(&mut self, region: Region, source: RegionSource) -> bool {
        self.write(Some(region), source)
    }

    /// Drops an uncommitted live value, falling back to the committed one.
    pub fn discard_live(&mut self) -> bool {
        if self.last_source == RegionSource::External {
            return false;
        }
        self.write(self.committed, RegionSource::External)
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Option<Region>) + Send + 'static,
    {
        self.current.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.current.unsubscribe(id)
    }

    fn write(&mut self, region: Option<Region>, source: RegionSource) -> bool {
        self.last_source = source;
        self.current.set(region)
    }
}
