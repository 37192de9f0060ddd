use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{CalendarDate, RuleSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: CalendarDate,
    pub eligible: bool,
}

/// A month laid out for a Sunday-first, 7-column grid. Leading `None`
/// cells pad the first week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub cells: Vec<Option<CalendarDay>>,
}

impl MonthView {
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.cells.iter().flatten()
    }

    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|c| c.is_none()).count()
    }
}

/// A day can be picked when it is not before `today` and the rules allow its weekday.
pub fn is_eligible(date: CalendarDate, today: CalendarDate, rules: &RuleSet) -> bool {
    date >= today && rules.weekdays.allows(date.weekday_index())
}

/// `month` is 1-based. Out-of-range months produce an empty grid.
pub fn eligible_days(year: i32, month: u32, today: CalendarDate, rules: &RuleSet) -> MonthView {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return MonthView {
            year,
            month,
            label: String::new(),
            cells: vec![],
        };
    };

    let leading = first.weekday().num_days_from_sunday() as usize;
    let mut cells: Vec<Option<CalendarDay>> = vec![None; leading];

    cells.extend(
        first
            .iter_days()
            .take_while(|d| d.month() == month)
            .map(|d| {
                let date = CalendarDate::from(d);
                Some(CalendarDay {
                    date,
                    eligible: is_eligible(date, today, rules),
                })
            }),
    );

    MonthView {
        year,
        month,
        label: first.format("%B %Y").to_string(),
        cells,
    }
}

/// The month currently on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarNavigator {
    year: i32,
    month: u32,
}

impl CalendarNavigator {
    pub fn starting_at(date: CalendarDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn show(&mut self, date: CalendarDate) {
        self.year = date.year();
        self.month = date.month();
    }

    pub fn advance_month(&mut self) {
        if self.month == 12 {
            self.month = 1;
            self.year += 1;
        } else {
            self.month += 1;
        }
    }

    pub fn retreat_month(&mut self) {
        if self.month == 1 {
            self.month = 12;
            self.year -= 1;
        } else {
            self.month -= 1;
        }
    }

    pub fn view(&self, today: CalendarDate, rules: &RuleSet) -> MonthView {
        eligible_days(self.year, self.month, today, rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse_key(s).unwrap()
    }

    #[test]
    fn test_grid_starts_with_weekday_blanks() {
        // May 1st 2025 is a Thursday
        let view = eligible_days(2025, 5, date("2025-05-01"), &RuleSet::interview_default());
        assert_eq!(view.leading_blanks(), 4);
        assert_eq!(view.days().count(), 31);
        assert_eq!(view.cells.len(), 35);
        assert_eq!(view.label, "May 2025");
    }

    #[test]
    fn test_leap_february() {
        let view = eligible_days(2024, 2, date("2024-01-01"), &RuleSet::interview_default());
        assert_eq!(view.days().count(), 29);
        assert_eq!(view.days().last().map(|d| d.date), Some(date("2024-02-29")));
    }

    #[test]
    fn test_only_rule_weekdays_are_eligible() {
        let rules = RuleSet::interview_default();
        let view = eligible_days(2025, 6, date("2025-06-01"), &rules);
        for day in view.days() {
            let weekday = day.date.weekday_index();
            assert_eq!(day.eligible, matches!(weekday, 1 | 3 | 5), "{}", day.date);
        }
    }

    #[test]
    fn test_past_dates_are_never_eligible() {
        let rules = RuleSet::interview_default();
        let today = date("2025-05-21"); // Wednesday
        assert!(is_eligible(today, today, &rules));
        assert!(!is_eligible(date("2025-05-19"), today, &rules)); // Monday, past
        assert!(is_eligible(date("2025-05-23"), today, &rules));

        let view = eligible_days(2025, 4, today, &rules);
        assert!(view.days().all(|d| !d.eligible));
    }

    #[test]
    fn test_invalid_month_is_empty() {
        let view = eligible_days(2025, 13, date("2025-01-01"), &RuleSet::interview_default());
        assert!(view.cells.is_empty());
    }

    #[test]
    fn test_month_navigation_wraps_years() {
        let mut nav = CalendarNavigator::starting_at(date("2025-01-15"));
        nav.retreat_month();
        assert_eq!((nav.year(), nav.month()), (2024, 12));
        nav.advance_month();
        assert_eq!((nav.year(), nav.month()), (2025, 1));

        let mut nav = CalendarNavigator::starting_at(date("2025-12-02"));
        nav.advance_month();
        assert_eq!((nav.year(), nav.month()), (2026, 1));
    }
}
