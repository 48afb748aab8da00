use chrono::{Local, NaiveDateTime};

/// Source of local wall-clock time. Injected wherever output depends on the
/// time of day so that tests can pin it.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Clock pinned to `hour:minute` on an arbitrary fixed date.
    pub fn at(hour: u32, minute: u32) -> Self {
        let time = chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .unwrap_or_default();
        Self(time)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
