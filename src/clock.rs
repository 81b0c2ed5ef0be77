//! Frame timing for the simulation loop.
//!
//! Two pieces: [`FrameClock`] measures real wall-clock deltas between host
//! frames, and [`StepAccumulator`] converts those uneven deltas into a whole
//! number of fixed-size physics steps so simulation behavior does not depend
//! on the host's frame rate.
//!
//! # Example
//!
//! ```
//! use wordfall::clock::{FrameClock, StepAccumulator};
//!
//! let mut clock = FrameClock::new();
//! let mut steps = StepAccumulator::new(1.0 / 60.0);
//!
//! // In the host frame loop:
//! let delta = clock.tick();
//! for _ in 0..steps.advance(delta) {
//!     // session.step(steps.fixed_dt()) ...
//! }
//! ```

use std::time::Instant;

/// Longest delta a single frame is allowed to report, in seconds.
///
/// Hosts stall (window dragged, tab hidden, debugger attached); when they
/// resume, simulating the whole gap at once would launch every word through
/// the floor. Anything longer than this is treated as a stall and truncated.
const MAX_FRAME_DELTA: f32 = 0.1;

/// Wall-clock frame timer.
///
/// Call [`tick`](FrameClock::tick) once per host frame; it returns the
/// seconds since the previous tick, truncated to [`MAX_FRAME_DELTA`].
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            frame_count: 0,
        }
    }

    /// Advance to the next frame and return the delta in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;
        delta.min(MAX_FRAME_DELTA)
    }

    /// Seconds since the clock was created.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Total ticks so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-timestep accumulator.
///
/// Banks fractional frame deltas and pays them out as whole physics steps of
/// `fixed_dt` seconds. At most [`max_substeps`](StepAccumulator::new) steps
/// are returned per frame; any remaining debt beyond that is dropped so a
/// slow frame cannot snowball into ever-longer catch-up work.
#[derive(Debug, Clone)]
pub struct StepAccumulator {
    fixed_dt: f32,
    accumulated: f32,
    max_substeps: u32,
}

impl StepAccumulator {
    /// Accumulator stepping `fixed_dt` seconds at a time, allowing up to 4
    /// catch-up steps per frame.
    pub fn new(fixed_dt: f32) -> Self {
        Self {
            fixed_dt,
            accumulated: 0.0,
            max_substeps: 4,
        }
    }

    /// The size of one physics step in seconds.
    #[inline]
    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Bank `delta` seconds and return how many fixed steps to run now.
    pub fn advance(&mut self, delta: f32) -> u32 {
        self.accumulated += delta.max(0.0);
        let mut steps = (self.accumulated / self.fixed_dt) as u32;
        if steps > self.max_substeps {
            steps = self.max_substeps;
            self.accumulated = 0.0;
        } else {
            self.accumulated -= steps as f32 * self.fixed_dt;
        }
        steps
    }

    /// Forget any banked time. Used when a session restarts.
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_tick_measures_time() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let delta = clock.tick();
        assert!(delta > 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_tick_truncates_stalls() {
        let mut clock = FrameClock::new();
        // Simulate a stall by backdating the last frame
        clock.last_frame = Instant::now() - Duration::from_secs(5);
        let delta = clock.tick();
        assert!(delta <= MAX_FRAME_DELTA);
    }

    #[test]
    fn test_accumulator_whole_steps() {
        let mut acc = StepAccumulator::new(1.0 / 60.0);
        // Exactly two steps worth of time
        assert_eq!(acc.advance(2.0 / 60.0), 2);
        // Nothing banked afterwards
        assert_eq!(acc.advance(0.0), 0);
    }

    #[test]
    fn test_accumulator_banks_fractions() {
        let mut acc = StepAccumulator::new(1.0 / 60.0);
        assert_eq!(acc.advance(0.5 / 60.0), 0);
        assert_eq!(acc.advance(0.6 / 60.0), 1);
    }

    #[test]
    fn test_accumulator_caps_catch_up() {
        let mut acc = StepAccumulator::new(1.0 / 60.0);
        // A full second of debt still yields at most 4 steps and no carryover
        assert_eq!(acc.advance(1.0), 4);
        assert_eq!(acc.advance(0.0), 0);
    }

    #[test]
    fn test_accumulator_ignores_negative_delta() {
        let mut acc = StepAccumulator::new(1.0 / 60.0);
        assert_eq!(acc.advance(-1.0), 0);
        assert_eq!(acc.advance(1.0 / 60.0), 1);
    }

    #[test]
    fn test_reset_clears_bank() {
        let mut acc = StepAccumulator::new(1.0 / 60.0);
        acc.advance(0.9 / 60.0);
        acc.reset();
        assert_eq!(acc.advance(0.5 / 60.0), 0);
    }
}
