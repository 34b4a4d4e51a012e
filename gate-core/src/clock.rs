use chrono::{Local, NaiveTime, Timelike};
use std::sync::atomic::{AtomicU32, Ordering};

const SECONDS_PER_DAY: u32 = 86_400;

/// Source of boarding times. Implementations return minute-granular times of day.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveTime;
}

/// Local wall clock, truncated to the minute
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        truncate_to_minute(Local::now().time())
    }
}

/// Manually driven clock for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    seconds: AtomicU32,
}

impl FixedClock {
    pub fn at(hour: u32, minute: u32) -> Self {
        Self {
            seconds: AtomicU32::new((hour * 3600 + minute * 60) % SECONDS_PER_DAY),
        }
    }

    /// Moves the clock forward, wrapping at midnight.
    pub fn advance_minutes(&self, minutes: u32) {
        let _ = self
            .seconds
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |s| {
                Some((s + minutes * 60) % SECONDS_PER_DAY)
            });
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        let seconds = self.seconds.load(Ordering::SeqCst);
        truncate_to_minute(
            NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or(NaiveTime::MIN),
        )
    }
}

pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}
