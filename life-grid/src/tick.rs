//! Wall-clock rate limiting for simulation steps.

use crate::config::WorldConfig;
use log::info;
use std::thread::sleep;
use std::time::{Duration, Instant};

/// Decides when the next tick is due at a target rate.
///
/// Checking is separate from consuming: [`TickClock::is_tick_due`] never
/// changes state, so a caller may look without acting on it.
#[derive(Clone, Copy, Debug)]
pub struct TickClock {
    ticks_per_sec: f64,
    last_tick: Instant,
}

impl TickClock {
    pub fn new(ticks_per_sec: f64) -> Self {
        Self::starting_at(ticks_per_sec, Instant::now())
    }

    pub fn starting_at(ticks_per_sec: f64, now: Instant) -> Self {
        Self {
            ticks_per_sec: Self::clamp_rate(ticks_per_sec),
            last_tick: now,
        }
    }

    pub fn ticks_per_sec(&self) -> f64 {
        self.ticks_per_sec
    }

    /// Returns the rate actually applied after clamping.
    pub fn set_ticks_per_sec(&mut self, ticks_per_sec: f64) -> f64 {
        self.ticks_per_sec = Self::clamp_rate(ticks_per_sec);
        info!("tick rate set to {:.2}/s", self.ticks_per_sec);
        self.ticks_per_sec
    }

    pub fn speed_up(&mut self) -> f64 {
        self.set_ticks_per_sec(self.ticks_per_sec * WorldConfig::TICK_RATE_STEP)
    }

    pub fn slow_down(&mut self) -> f64 {
        self.set_ticks_per_sec(self.ticks_per_sec / WorldConfig::TICK_RATE_STEP)
    }

    pub fn time_between_ticks(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.ticks_per_sec)
    }

    pub fn next_tick_at(&self) -> Instant {
        self.last_tick + self.time_between_ticks()
    }

    pub fn is_tick_due(&self) -> bool {
        self.is_tick_due_at(Instant::now())
    }

    pub fn is_tick_due_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_tick) > self.time_between_ticks()
    }

    pub fn consume_tick(&mut self) {
        self.consume_tick_at(Instant::now());
    }

    pub fn consume_tick_at(&mut self, now: Instant) {
        self.last_tick = now;
    }

    /// Blocks until the next tick is due, then consumes it.
    pub fn sleep_till_next_tick(&mut self) {
        let elapsed = self.last_tick.elapsed();
        let total = self.time_between_ticks();
        if total > elapsed {
            sleep(total - elapsed);
        }
        self.consume_tick();
    }

    fn clamp_rate(ticks_per_sec: f64) -> f64 {
        if ticks_per_sec.is_nan() {
            return WorldConfig::MIN_TICKS_PER_SEC;
        }
        ticks_per_sec.clamp(WorldConfig::MIN_TICKS_PER_SEC, WorldConfig::MAX_TICKS_PER_SEC)
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(WorldConfig::DEFAULT_TICKS_PER_SEC)
    }
}
