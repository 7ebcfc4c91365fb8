use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies a registered callback so it can be removed again. Ids are
/// unique across every registry in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

type Callback<T> = Box<dyn FnMut(&T) + Send>;

/// Registry of callbacks invoked in registration order.
pub struct Listeners<T> {
    callbacks: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }
}

impl<T> Listeners<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&T) + Send + 'static,
    {
        let id = SubscriptionId::next();
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Removes a callback. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub fn notify(&mut self, value: &T) {
        for (_, callback) in &mut self.callbacks {
            callback(value);
        }
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

/// Always-current value plus the callbacks observing it.
#[derive(Debug)]
pub struct Signal<T> {
    value: T,
    listeners: Listeners<T>,
}

impl<T: Clone + PartialEq> Signal<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: initial,
            listeners: Listeners::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Stores `value` and notifies subscribers if it differs from the current
    /// one. Returns whether a notification went out.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.listeners.notify(&self.value);
        true
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&T) + Send + 'static,
    {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

/// Leading-edge throttle: accepts an event only when at least `interval_ms`
/// have passed since the last accepted one.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: u64,
    last_accepted: Option<u64>,
}

impl Throttle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_accepted: None,
        }
    }

    pub fn accept(&mut self, now_ms: u64) -> bool {
        let open = self
            .last_accepted
            .map(|last| now_ms.saturating_sub(last) >= self.interval_ms)
            .unwrap_or(true);
        if open {
            self.last_accepted = Some(now_ms);
        }
        open
    }
}

/// Drops values equal to the previously passed one.
#[derive(Debug, Clone)]
pub struct Distinct<T> {
    last: Option<T>,
}

impl<T: Clone + PartialEq> Distinct<T> {
    /// Starts out as if `value` had already been passed.
    pub fn seeded(value: T) -> Self {
        Self { last: Some(value) }
    }

    pub fn pass(&mut self, value: T) -> Option<T> {
        if self.last.as_ref() == Some(&value) {
            return None;
        }
        self.last = Some(value.clone());
        Some(value)
    }
}

/// Holds the latest value until either the quiet period elapses or the value
/// is confirmed explicitly, whichever happens first.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    delay_ms: u64,
    pending: Option<(T, u64)>,
}

impl<T> Debounce<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Replaces any pending value and restarts the quiet period.
    pub fn push(&mut self, value: T, now_ms: u64) {
        self.pending = Some((value, now_ms.saturating_add(self.delay_ms)));
    }

    /// Releases the pending value if its quiet period has elapsed.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now_ms >= *deadline => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Releases the pending value immediately.
    pub fn confirm(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
