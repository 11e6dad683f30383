use chrono::{Local, NaiveDate, NaiveDateTime, Utc};

/// Source of "now" for attendance dating and job scheduling.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall clock, either in UTC or in the host's local timezone.
pub struct SystemClock {
    use_utc: bool,
}

impl SystemClock {
    pub fn new(use_utc: bool) -> Self {
        Self { use_utc }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        if self.use_utc {
            Utc::now().naive_utc()
        } else {
            Local::now().naive_local()
        }
    }
}

#[cfg(test)]
pub use fixed::FixedClock;
