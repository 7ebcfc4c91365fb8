/// Roughly how many ticks an un-zoomed axis should show.
pub const IDEAL_TICKS_PER_ZOOM: f64 = 20.0;

/// Used when even the largest step in [`TICK_STEPS`] is too fine.
const FALLBACK_STEP_SECONDS: f64 = 3_840.0;

/// Candidate spacings between ticks, in seconds.
pub const TICK_STEPS: [f64; 27] = [
    1.0, 2.0, 5.0, 10.0, 15.0, 20.0, 30.0, 40.0, 60.0, 120.0, 180.0, 240.0, 300.0, 360.0, 420.0,
    480.0, 540.0, 600.0, 660.0, 720.0, 780.0, 840.0, 900.0, 960.0, 1_020.0, 1_080.0, 1_140.0,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Position along the bar as a fraction of its width.
    pub position: f64,
    pub seconds: f64,
}

/// Number of ticks the axis aims for at a zoom factor.
pub fn ideal_tick_count(zoom: f64) -> u32 {
    (zoom.max(1.0) * IDEAL_TICKS_PER_ZOOM).round() as u32
}

/// Smallest step that keeps the tick count at or below the ideal.
pub fn tick_step(duration: f64, zoom: f64) -> f64 {
    let ideal = ideal_tick_count(zoom).max(1) as f64;
    let fraction = duration / ideal;
    TICK_STEPS
        .iter()
        .copied()
        .find(|step| *step >= fraction)
        .unwrap_or(FALLBACK_STEP_SECONDS)
}

/// Lays out ticks evenly across the bar. Empty until the duration is known.
pub fn layout(duration: f64, zoom: f64) -> Vec<Tick> {
    if !(duration > 0.0) || !duration.is_finite() {
        return Vec::new();
    }
    let count = (duration / tick_step(duration, zoom)).floor() as u32;
    (0..count)
        .map(|i| {
            let position = f64::from(i) / f64::from(count);
            Tick {
                position,
                seconds: position * duration,
            }
        })
        .collect()
}
