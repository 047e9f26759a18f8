//! Monotonic time adapter.
//!
//! The controller's timers run on virtual time; the main loop uses this
//! adapter to measure how much real time passed between ticks.
//!
//! - **`espidf` feature on `target_os = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **otherwise** — uses `std::time::Instant` for
//!   host-side simulation.

use core::time::Duration;

pub struct MonotonicClock {
    #[cfg(not(all(feature = "espidf", target_os = "espidf")))]
    start: std::time::Instant,
    last_us: u64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        let mut clock = Self {
            #[cfg(not(all(feature = "espidf", target_os = "espidf")))]
            start: std::time::Instant::now(),
            last_us: 0,
        };
        clock.last_us = clock.uptime_us();
        clock
    }

    /// Microseconds since boot (monotonic).
    #[cfg(all(feature = "espidf", target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        // SAFETY: esp_timer_get_time has no preconditions once the
        // ESP-IDF runtime is up, which binstart guarantees.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since construction (monotonic).
    #[cfg(not(all(feature = "espidf", target_os = "espidf")))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    /// Time since the previous call (or since construction).
    pub fn lap(&mut self) -> Duration {
        let now = self.uptime_us();
        let elapsed = now.saturating_sub(self.last_us);
        self.last_us = now;
        Duration::from_micros(elapsed)
    }
}
