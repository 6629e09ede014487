//! Helpers shared by the integration test binaries.

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use std::sync::atomic::{AtomicI64, Ordering};

/// Clock that advances one second per reading so creation order is strict.
#[derive(Debug)]
pub struct TickingClock {
    start: DateTime<Utc>,
    ticks: AtomicI64,
}

impl Default for TickingClock {
    fn default() -> Self {
        Self {
            start: Utc
                .with_ymd_and_hms(2026, 6, 1, 12, 0, 0)
                .single()
                .unwrap_or_default(),
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for TickingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.start + TimeDelta::seconds(self.ticks.fetch_add(1, Ordering::SeqCst))
    }
}
