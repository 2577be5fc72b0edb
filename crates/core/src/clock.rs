use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};

/// Source of "now" for timestamps and today/past checks.
pub trait Clock: Send + Sync {
    /// Instant used for `created_at`, `updated_at` and `cancelled_at`.
    fn now(&self) -> DateTime<Utc>;

    /// Wall-clock date and time at the shop.
    fn local_now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.local_now().date()
    }
}

/// The host clock; the shop is assumed to share the server's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    local_now: NaiveDateTime,
}

impl FixedClock {
    /// Frozen at `local_now`, with the shop taken to be on UTC.
    pub fn at(local_now: NaiveDateTime) -> Self {
        Self {
            now: local_now.and_utc(),
            local_now,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn local_now(&self) -> NaiveDateTime {
        self.local_now
    }
}
