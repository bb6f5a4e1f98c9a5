use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// How the closing date splits its calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearDaySplit {
    /// Days from 1 January up to and including the closing date
    pub days_passed: u32,
    pub days_remaining: u32,
    pub days_in_year: u32,
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn year_day_split(date: NaiveDate) -> YearDaySplit {
    let days_in_year = if is_leap_year(date.year()) { 366 } else { 365 };
    let days_passed = date.ordinal();
    YearDaySplit {
        days_passed,
        days_remaining: days_in_year - days_passed,
        days_in_year,
    }
}

impl YearDaySplit {
    /// Share of an annual tax bill falling on the days already passed.
    pub fn elapsed_share(&self, annual_amount: Money) -> Money {
        annual_amount * Decimal::from(self.days_passed) / Decimal::from(self.days_in_year)
    }
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}
