use std::fmt;

use serde::{Deserialize, Serialize};

pub const MINUTES_PER_HOUR: u8 = 60;
pub const HOURS_PER_DAY: u8 = 24;
pub const DAYS_PER_MONTH: u8 = 30;
pub const MONTHS_PER_YEAR: u8 = 12;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ClockError {
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: u32 },
}

/// A point on the simulation calendar. Months are a fixed 30 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarTime {
    pub year: u32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
}

impl CalendarTime {
    pub fn new(year: u32, month: u8, day: u8, hour: u8, minute: u8) -> Result<Self, ClockError> {
        let out_of_range = |field, value: u32| Err(ClockError::OutOfRange { field, value });

        if year < 1 {
            return out_of_range("year", year);
        }
        if !(1..=MONTHS_PER_YEAR).contains(&month) {
            return out_of_range("month", month.into());
        }
        if !(1..=DAYS_PER_MONTH).contains(&day) {
            return out_of_range("day", day.into());
        }
        if hour >= HOURS_PER_DAY {
            return out_of_range("hour", hour.into());
        }
        if minute >= MINUTES_PER_HOUR {
            return out_of_range("minute", minute.into());
        }

        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
        })
    }

    fn advance_minute(&mut self) {
        self.minute += 1;
        if self.minute < MINUTES_PER_HOUR {
            return;
        }
        self.minute = 0;

        self.hour += 1;
        if self.hour < HOURS_PER_DAY {
            return;
        }
        self.hour = 0;

        self.day += 1;
        if self.day <= DAYS_PER_MONTH {
            return;
        }
        self.day = 1;

        self.month += 1;
        if self.month <= MONTHS_PER_YEAR {
            return;
        }
        self.month = 1;
        self.year = self.year.saturating_add(1);
    }
}

impl Default for CalendarTime {
    fn default() -> Self {
        Self {
            year: 1,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
        }
    }
}

impl fmt::Display for CalendarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Y{}-{:02}-{:02} {:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }
}

#[derive(Debug, Clone)]
pub struct Clock {
    now: CalendarTime,
    paused: bool,
}

impl Clock {
    pub fn new(start: CalendarTime) -> Self {
        Self {
            now: start,
            paused: false,
        }
    }

    /// Advances the calendar by one minute. Returns `false` and does nothing
    /// while paused.
    pub fn tick(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.now.advance_minute();
        true
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn now(&self) -> CalendarTime {
        self.now
    }

    pub fn hour(&self) -> u8 {
        self.now.hour
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(CalendarTime::default())
    }
}
