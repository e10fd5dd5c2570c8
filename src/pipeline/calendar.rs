//! US federal holiday calendar
//!
//! Holidays are pure functions of a year: each rule yields a nominal date
//! which may then be shifted to the nearest workday. The calendar collects
//! the observed dates of every rule that fall inside a date range.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// How a nominal holiday date moves when it lands on a weekend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observance {
    /// Always observed on the nominal date
    None,
    /// Saturday moves back to Friday, Sunday moves forward to Monday
    NearestWorkday,
}

impl Observance {
    fn apply(self, date: NaiveDate) -> Option<NaiveDate> {
        match (self, date.weekday()) {
            (Observance::NearestWorkday, Weekday::Sat) => date.pred_opt(),
            (Observance::NearestWorkday, Weekday::Sun) => date.succ_opt(),
            _ => Some(date),
        }
    }
}

/// Where a holiday falls within its year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRule {
    /// A fixed month and day
    Fixed { month: u32, day: u32 },
    /// The n-th (1-based) given weekday of a month
    NthWeekday { month: u32, weekday: Weekday, n: u8 },
    /// The last given weekday of a month
    LastWeekday { month: u32, weekday: Weekday },
}

impl DateRule {
    fn nominal(self, year: i32) -> Option<NaiveDate> {
        match self {
            DateRule::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day),
            DateRule::NthWeekday { month, weekday, n } => {
                NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
            }
            DateRule::LastWeekday { month, weekday } => last_weekday_of_month(year, month, weekday),
        }
    }
}

/// A single named holiday
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HolidayRule {
    pub name: &'static str,
    pub rule: DateRule,
    pub observance: Observance,
    /// First year the holiday was observed, if it has not always existed
    pub first_year: Option<i32>,
}

impl HolidayRule {
    const fn new(name: &'static str, rule: DateRule, observance: Observance) -> Self {
        Self {
            name,
            rule,
            observance,
            first_year: None,
        }
    }

    const fn since(self, year: i32) -> Self {
        Self {
            first_year: Some(year),
            ..self
        }
    }

    /// Observed date of this holiday for the given year's occurrence.
    ///
    /// The result can fall in the neighbouring year: New Year's Day on a
    /// Saturday is observed on December 31st of the previous year.
    pub fn observed_in(&self, year: i32) -> Option<NaiveDate> {
        if self.first_year.is_some_and(|first| year < first) {
            return None;
        }
        self.rule
            .nominal(year)
            .and_then(|date| self.observance.apply(date))
    }
}

/// The ten standing US federal holidays
pub const US_FEDERAL_HOLIDAYS: [HolidayRule; 10] = [
    HolidayRule::new(
        "New Year's Day",
        DateRule::Fixed { month: 1, day: 1 },
        Observance::NearestWorkday,
    ),
    HolidayRule::new(
        "Martin Luther King Jr. Day",
        DateRule::NthWeekday {
            month: 1,
            weekday: Weekday::Mon,
            n: 3,
        },
        Observance::None,
    )
    .since(1986),
    HolidayRule::new(
        "Washington's Birthday",
        DateRule::NthWeekday {
            month: 2,
            weekday: Weekday::Mon,
            n: 3,
        },
        Observance::None,
    ),
    HolidayRule::new(
        "Memorial Day",
        DateRule::LastWeekday {
            month: 5,
            weekday: Weekday::Mon,
        },
        Observance::None,
    ),
    HolidayRule::new(
        "Independence Day",
        DateRule::Fixed { month: 7, day: 4 },
        Observance::NearestWorkday,
    ),
    HolidayRule::new(
        "Labor Day",
        DateRule::NthWeekday {
            month: 9,
            weekday: Weekday::Mon,
            n: 1,
        },
        Observance::None,
    ),
    HolidayRule::new(
        "Columbus Day",
        DateRule::NthWeekday {
            month: 10,
            weekday: Weekday::Mon,
            n: 2,
        },
        Observance::None,
    ),
    HolidayRule::new(
        "Veterans Day",
        DateRule::Fixed { month: 11, day: 11 },
        Observance::NearestWorkday,
    ),
    HolidayRule::new(
        "Thanksgiving Day",
        DateRule::NthWeekday {
            month: 11,
            weekday: Weekday::Thu,
            n: 4,
        },
        Observance::None,
    ),
    HolidayRule::new(
        "Christmas Day",
        DateRule::Fixed { month: 12, day: 25 },
        Observance::NearestWorkday,
    ),
];

/// Calendar of US federal holidays with weekend observance shifts
#[derive(Debug, Clone)]
pub struct UsFederalHolidayCalendar {
    rules: Vec<HolidayRule>,
}

impl Default for UsFederalHolidayCalendar {
    fn default() -> Self {
        Self::new()
    }
}

impl UsFederalHolidayCalendar {
    pub fn new() -> Self {
        Self {
            rules: US_FEDERAL_HOLIDAYS.to_vec(),
        }
    }

    pub fn rules(&self) -> &[HolidayRule] {
        &self.rules
    }

    /// Observed holiday dates between `start` and `end`, both inclusive.
    pub fn holidays(&self, start: NaiveDate, end: NaiveDate) -> BTreeSet<NaiveDate> {
        self.observed(start, end)
            .into_iter()
            .map(|(date, _)| date)
            .collect()
    }

    /// Observed holidays between `start` and `end` with their names, sorted by date.
    pub fn observed(&self, start: NaiveDate, end: NaiveDate) -> Vec<(NaiveDate, &'static str)> {
        if start > end {
            return Vec::new();
        }

        // Observance can push a holiday across a year boundary
        let mut observed: Vec<(NaiveDate, &'static str)> = (start.year() - 1..=end.year() + 1)
            .flat_map(|year| {
                self.rules
                    .iter()
                    .filter_map(move |rule| rule.observed_in(year).map(|date| (date, rule.name)))
            })
            .filter(|(date, _)| *date >= start && *date <= end)
            .collect();

        observed.sort();
        observed
    }

    /// Name of the holiday observed on `date`, if any
    pub fn holiday_name(&self, date: NaiveDate) -> Option<&'static str> {
        self.observed(date, date).first().map(|(_, name)| *name)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_name(date).is_some()
    }
}

fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
    let back = (7 + last_day.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    last_day.checked_sub_days(Days::new(u64::from(back)))
}
