use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Millisecond time source. Readings wrap around like a 32-bit tick counter.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

/// Milliseconds between `since` and `now`, tolerant of counter wraparound.
pub fn elapsed(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u32 {
        self.origin.elapsed().as_millis() as u32
    }
}

/// Hand-driven clock; clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u32>>,
}

impl ManualClock {
    pub fn starting_at(ms: u32) -> Self {
        Self {
            now: Rc::new(Cell::new(ms)),
        }
    }

    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_survives_wraparound() {
        assert_eq!(elapsed(10, u32::MAX - 4), 15);
        assert_eq!(elapsed(5000, 2000), 3000);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::starting_at(100);
        let handle = clock.clone();
        handle.advance(250);
        assert_eq!(clock.now_ms(), 350);
        clock.set(u32::MAX);
        handle.advance(2);
        assert_eq!(clock.now_ms(), 1);
    }

    #[test]
    fn system_clock_does_not_run_backwards() {
        let clock = SystemClock::new();
        let first = clock.now_ms();
        assert!(elapsed(clock.now_ms(), first) < 60_000);
    }
}
