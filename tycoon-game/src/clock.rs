//! Wall-clock abstraction so calendar logic can be driven deterministically.
use chrono::{
    DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveTime, Offset, TimeZone, Utc,
};
use std::cell::Cell;
use std::rc::Rc;

/// Source of the current instant.
///
/// Instants carry the caller's UTC offset: comparisons are absolute, while
/// calendar questions ("what day is it?") are answered in that offset.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Calendar date of [`Clock::now`] in the clock's own offset.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Hand-driven clock for tests and simulations. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<FixedOffset>>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Clock starting at midnight UTC on the given date.
    #[must_use]
    pub fn at_midnight(date: NaiveDate) -> Self {
        Self::new(start_of_day(date, Utc.fix()))
    }

    pub fn set(&self, instant: DateTime<FixedOffset>) {
        self.now.set(instant);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.get()
    }
}

/// Midnight that begins the calendar day after `now`, in `now`'s offset.
#[must_use]
pub fn start_of_next_day(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    now.date_naive()
        .succ_opt()
        .map_or_else(|| now + Duration::days(1), |next| start_of_day(next, *now.offset()))
}

fn start_of_day(date: NaiveDate, offset: FixedOffset) -> DateTime<FixedOffset> {
    let midnight = date.and_time(NaiveTime::MIN);
    offset
        .from_local_datetime(&midnight)
        .single()
        .unwrap_or_else(|| offset.from_utc_datetime(&midnight))
}
