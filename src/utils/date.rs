// src/utils/date.rs

//! Date helpers for the academic-year directory in board URLs.

use chrono::{Datelike, Local, NaiveDate};

/// Source of the current date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// `Clock` reading the local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// `Clock` that always returns the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Academic year containing `date`.
///
/// Months before `start_month` belong to the previous year's session.
pub fn academic_year(date: NaiveDate, start_month: u32) -> i32 {
    if date.month() >= start_month {
        date.year()
    } else {
        date.year() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_academic_year_rollover() {
        assert_eq!(academic_year(date(2024, 3, 31), 4), 2023);
        assert_eq!(academic_year(date(2024, 4, 1), 4), 2024);
        assert_eq!(academic_year(date(2024, 12, 31), 4), 2024);
        assert_eq!(academic_year(date(2025, 1, 1), 4), 2024);
    }

    #[test]
    fn test_academic_year_january_start() {
        assert_eq!(academic_year(date(2024, 1, 1), 1), 2024);
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(date(2024, 5, 1));
        assert_eq!(clock.today(), date(2024, 5, 1));
    }
}
