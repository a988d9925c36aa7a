//! Shared helpers for unit tests in `src/` and integration tests in `tests/`.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

/// Reference instant used by fixtures: 2025-03-01 09:00 UTC.
pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Deterministic clock that advances one second per reading.
///
/// Successive records therefore get strictly increasing timestamps, which
/// keeps newest-first listings stable in tests.
#[derive(Debug)]
pub struct SteppingClock {
    start: DateTime<Utc>,
    ticks: AtomicI64,
}

impl SteppingClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            start,
            ticks: AtomicI64::new(0),
        }
    }

    pub fn shared() -> Arc<dyn Clock> {
        Arc::new(Self::starting_at(fixture_timestamp()))
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.start + chrono::Duration::seconds(tick)
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock {
    pub utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepping_clock_is_strictly_increasing() {
        let clock = SteppingClock::starting_at(fixture_timestamp());
        let first = clock.utc();
        let second = clock.utc();
        assert_eq!(first, fixture_timestamp());
        assert_eq!(second - first, chrono::Duration::seconds(1));
    }
}
