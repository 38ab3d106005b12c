use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

#[derive(Debug, Clone)]
enum Mode {
    /// Wall-clock delta, clamped.
    Measured { dt_min: Duration, dt_max: Duration },
    /// Every tick reports the same delta.
    Fixed(Duration),
}

/// Frame clock producing `FrameTime` snapshots for the scene tick loop.
///
/// Measured delta time is clamped so a stall (debugger, minimised window)
/// does not hand the scene one huge step. A fixed clock ignores wall time
/// entirely, for headless and replayable runs.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    mode: Mode,
}

impl FrameClock {
    /// Creates a measuring clock with default clamps (0.1 ms .. 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a measuring clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            mode: Mode::Measured { dt_min, dt_max },
        }
    }

    /// Creates a clock that reports `dt` on every tick.
    pub fn fixed(dt: Duration) -> Self {
        Self {
            last: Instant::now(),
            frame_index: 0,
            mode: Mode::Fixed(dt),
        }
    }

    /// Resets the clock baseline, e.g. after a scene transition.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = match &self.mode {
            Mode::Measured { dt_min, dt_max } => now.saturating_duration_since(self.last).clamp(*dt_min, *dt_max),
            Mode::Fixed(dt) => *dt,
        };
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
