use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// Date format the operator types at the prompts
pub const INPUT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a `dd/mm/yyyy` date typed by the operator
pub fn parse_input_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), INPUT_DATE_FORMAT).ok()
}

/// Check if it's weekend (Saturday or Sunday)
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Holiday/weekend predicate the date logic is evaluated against
pub trait BusinessCalendar {
    fn is_business_day(&self, date: NaiveDate) -> bool;
}

impl<C: BusinessCalendar + ?Sized> BusinessCalendar for &C {
    fn is_business_day(&self, date: NaiveDate) -> bool {
        (**self).is_business_day(date)
    }
}

/// Calendar where only Saturdays and Sundays are closed
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl BusinessCalendar for WeekendCalendar {
    fn is_business_day(&self, date: NaiveDate) -> bool {
        !is_weekend(date)
    }
}

/// Weekends plus US federal holidays (with observed days), optionally
/// extended with extra closure dates
#[derive(Debug, Clone, Default)]
pub struct UsFederalCalendar {
    extra_holidays: BTreeSet<NaiveDate>,
}

impl UsFederalCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra_holidays<I>(mut self, dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.extra_holidays.extend(dates);
        self
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        if self.extra_holidays.contains(&date) {
            return true;
        }
        // A Saturday New Year's Day is observed on December 31 of the prior year
        federal_holidays(date.year()).contains(&date)
            || federal_holidays(date.year() + 1).contains(&date)
    }
}

impl BusinessCalendar for UsFederalCalendar {
    fn is_business_day(&self, date: NaiveDate) -> bool {
        !is_weekend(date) && !self.is_holiday(date)
    }
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let mut day = first_of_next.pred_opt()?;
    while day.weekday() != weekday {
        day = day.pred_opt()?;
    }
    Some(day)
}

/// Saturday holidays are observed on Friday, Sunday holidays on Monday
fn observed(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

/// Federal holidays of `year`, both the actual and the observed dates
pub fn federal_holidays(year: i32) -> BTreeSet<NaiveDate> {
    let mut fixed = vec![(1, 1), (7, 4), (11, 11), (12, 25)];
    if year >= 2021 {
        fixed.push((6, 19));
    }

    let mut days = BTreeSet::new();
    for (month, day) in fixed {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            days.insert(date);
            days.insert(observed(date));
        }
    }

    let floating = [
        nth_weekday(year, 1, Weekday::Mon, 3),  // Martin Luther King Jr. Day
        nth_weekday(year, 2, Weekday::Mon, 3),  // Washington's Birthday
        last_weekday(year, 5, Weekday::Mon),    // Memorial Day
        nth_weekday(year, 9, Weekday::Mon, 1),  // Labor Day
        nth_weekday(year, 10, Weekday::Mon, 2), // Columbus Day
        nth_weekday(year, 11, Weekday::Thu, 4), // Thanksgiving
    ];
    days.extend(floating.into_iter().flatten());
    days
}

/// Stepping to the closest business day on either side of a date
pub struct BusinessDay;

impl BusinessDay {
    /// First business day on or after `date`
    pub fn next<C: BusinessCalendar>(calendar: &C, mut date: NaiveDate) -> NaiveDate {
        while !calendar.is_business_day(date) {
            date += Duration::days(1);
        }
        date
    }

    /// Last business day on or before `date`
    pub fn previous<C: BusinessCalendar>(calendar: &C, mut date: NaiveDate) -> NaiveDate {
        while !calendar.is_business_day(date) {
            date -= Duration::days(1);
        }
        date
    }
}

/// Format duration for logging
pub fn format_duration(duration_ms: f64) -> String {
    if duration_ms < 1000.0 {
        format!("{:.1}ms", duration_ms)
    } else if duration_ms < 60000.0 {
        format!("{:.1}s", duration_ms / 1000.0)
    } else {
        let minutes = (duration_ms / 60000.0).floor();
        let seconds = (duration_ms % 60000.0) / 1000.0;
        format!("{}m{:.1}s", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_input_date() {
        assert_eq!(parse_input_date("15/03/2024"), Some(date(2024, 3, 15)));
        assert_eq!(parse_input_date(" 01/12/2023 "), Some(date(2023, 12, 1)));
        assert_eq!(parse_input_date("2024-03-15"), None);
        assert_eq!(parse_input_date("31/02/2024"), None);
        assert_eq!(parse_input_date(""), None);
    }

    #[test]
    fn test_federal_holidays_2024() {
        let cal = UsFederalCalendar::new();
        assert!(cal.is_holiday(date(2024, 1, 1)));
        assert!(cal.is_holiday(date(2024, 1, 15))); // MLK
        assert!(cal.is_holiday(date(2024, 5, 27))); // Memorial Day
        assert!(cal.is_holiday(date(2024, 6, 19)));
        assert!(cal.is_holiday(date(2024, 11, 28))); // Thanksgiving
        assert!(!cal.is_holiday(date(2024, 3, 15)));
    }

    #[test]
    fn test_observed_holidays() {
        let cal = UsFederalCalendar::new();
        // July 4th 2026 is a Saturday
        assert!(cal.is_holiday(date(2026, 7, 3)));
        // New Year's Day 2022 was a Saturday
        assert!(cal.is_holiday(date(2021, 12, 31)));
        // Christmas 2022 was a Sunday
        assert!(cal.is_holiday(date(2022, 12, 26)));
    }

    #[test]
    fn test_business_day_next_and_previous() {
        let cal = UsFederalCalendar::new();
        // Saturday before MLK day 2024 -> Tuesday
        assert_eq!(BusinessDay::next(&cal, date(2024, 1, 13)), date(2024, 1, 16));
        assert_eq!(BusinessDay::previous(&cal, date(2024, 1, 15)), date(2024, 1, 12));
        // Already a business day
        assert_eq!(BusinessDay::next(&cal, date(2024, 3, 13)), date(2024, 3, 13));
        assert_eq!(BusinessDay::previous(&cal, date(2024, 3, 13)), date(2024, 3, 13));
    }

    #[test]
    fn test_synthetic_calendar() {
        struct ClosedOn(NaiveDate);
        impl BusinessCalendar for ClosedOn {
            fn is_business_day(&self, date: NaiveDate) -> bool {
                date != self.0
            }
        }

        let cal = ClosedOn(date(2024, 3, 13));
        assert_eq!(BusinessDay::next(&cal, date(2024, 3, 13)), date(2024, 3, 14));
        assert_eq!(BusinessDay::previous(&cal, date(2024, 3, 13)), date(2024, 3, 12));
    }

    #[test]
    fn test_extra_holidays() {
        let cal = UsFederalCalendar::new().with_extra_holidays([date(2025, 1, 9)]);
        assert!(!cal.is_business_day(date(2025, 1, 9)));
        assert!(WeekendCalendar.is_business_day(date(2025, 1, 9)));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(12.34), "12.3ms");
        assert_eq!(format_duration(2500.0), "2.5s");
        assert_eq!(format_duration(90000.0), "1m30.0s");
    }
}
