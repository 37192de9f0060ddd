use serde::Serialize;

use crate::models::{BookingLedger, CalendarDate, RuleSet, SlotRule, TimeOfDay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub time: TimeOfDay,
    pub is_booked: bool,
}

/// What a caller should tell the user about a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotSummary {
    NoneDefined,
    AllBooked,
    Available { count: usize },
}

/// Slots of one day in ascending time order. Booked slots are flagged, not removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySlots {
    pub date: CalendarDate,
    pub slots: Vec<Slot>,
}

impl DaySlots {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn find(&self, time: TimeOfDay) -> Option<&Slot> {
        self.slots.iter().find(|s| s.time == time)
    }

    pub fn available(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|s| !s.is_booked)
    }

    pub fn summary(&self) -> SlotSummary {
        if self.slots.is_empty() {
            return SlotSummary::NoneDefined;
        }
        match self.available().count() {
            0 => SlotSummary::AllBooked,
            count => SlotSummary::Available { count },
        }
    }

    pub fn message(&self) -> &'static str {
        match self.summary() {
            SlotSummary::NoneDefined => "No time slots defined for this date.",
            SlotSummary::AllBooked => "No time slots available for this date.",
            SlotSummary::Available { .. } => "Select a time slot.",
        }
    }
}

/// Every slot the rules offer on `date`, flagged against the ledger.
///
/// A weekday the rules exclude yields an empty list rather than an error;
/// deciding whether a date can be picked at all is the navigator's job.
pub fn generate(date: CalendarDate, rules: &RuleSet, ledger: &BookingLedger) -> DaySlots {
    if !rules.weekdays.allows(date.weekday_index()) {
        return DaySlots {
            date,
            slots: vec![],
        };
    }

    let booked = ledger.booked_on(date);
    let slots = candidate_times(&rules.slots)
        .into_iter()
        .map(|time| Slot {
            time,
            is_booked: booked.contains(&time),
        })
        .collect();

    DaySlots { date, slots }
}

fn candidate_times(rule: &SlotRule) -> Vec<TimeOfDay> {
    match rule {
        SlotRule::Fixed { times } => times.clone(),
        SlotRule::Interval {
            start_hour,
            end_hour,
            slot_minutes,
        } => {
            let end = *end_hour as u16 * 60;
            let mut times = Vec::new();
            for hour in *start_hour..*end_hour {
                times.extend(TimeOfDay::new(hour, 0));
                // Half-hour slot must finish before closing
                if *slot_minutes <= 30 && hour as u16 * 60 + 30 + slot_minutes <= end {
                    times.extend(TimeOfDay::new(hour, 30));
                }
            }
            times
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use crate::models::WeekdayRule;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse_key(s).unwrap()
    }

    fn time(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn interval(start_hour: u8, end_hour: u8, slot_minutes: u16) -> RuleSet {
        RuleSet::new(
            WeekdayRule::Except(BTreeSet::new()),
            SlotRule::Interval {
                start_hour,
                end_hour,
                slot_minutes,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_fixed_slots_flag_booked() {
        let rules = RuleSet::interview_default();
        let ledger = BookingLedger::from_json(r#"{"2025-05-23": ["4:00 PM"]}"#).unwrap();

        let day = generate(date("2025-05-23"), &rules, &ledger);

        assert_eq!(
            day.slots,
            vec![
                Slot { time: time("11:00 AM"), is_booked: false },
                Slot { time: time("4:00 PM"), is_booked: true },
            ]
        );
    }

    #[test]
    fn test_interval_half_hour_slots() {
        let rules = interval(10, 19, 30);
        let ledger =
            BookingLedger::from_json(r#"{"2025-05-27": ["10:00 AM", "2:00 PM"]}"#).unwrap();

        let day = generate(date("2025-05-27"), &rules, &ledger);

        assert_eq!(day.slots.len(), 18);
        assert_eq!(day.slots.first().map(|s| s.time), Some(time("10:00 AM")));
        assert_eq!(day.slots.last().map(|s| s.time), Some(time("6:30 PM")));
        let booked: Vec<String> = day
            .slots
            .iter()
            .filter(|s| s.is_booked)
            .map(|s| s.time.display())
            .collect();
        assert_eq!(booked, vec!["10:00 AM", "2:00 PM"]);
    }

    #[test]
    fn test_interval_hourly_slots_skip_half_hours() {
        let day = generate(date("2025-05-27"), &interval(9, 12, 60), &BookingLedger::new());
        let times: Vec<String> = day.slots.iter().map(|s| s.time.display()).collect();
        assert_eq!(times, vec!["9:00 AM", "10:00 AM", "11:00 AM"]);
    }

    #[test]
    fn test_interval_last_half_hour_must_fit() {
        // 15-minute slots still emit :30, and 11:30 + 15 fits before noon
        let day = generate(date("2025-05-27"), &interval(11, 12, 15), &BookingLedger::new());
        assert_eq!(day.slots.len(), 2);
    }

    #[test]
    fn test_excluded_weekday_is_empty_not_error() {
        let rules = RuleSet::interview_default();
        // 2025-05-27 is a Tuesday
        let day = generate(date("2025-05-27"), &rules, &BookingLedger::new());
        assert!(day.is_empty());
        assert_eq!(day.summary(), SlotSummary::NoneDefined);
    }

    #[test]
    fn test_empty_fixed_list() {
        let rules = RuleSet::new(
            WeekdayRule::Except(BTreeSet::new()),
            SlotRule::Fixed { times: vec![] },
        )
        .unwrap();
        let day = generate(date("2025-05-23"), &rules, &BookingLedger::new());
        assert!(day.is_empty());
    }

    #[test]
    fn test_summary_distinguishes_all_booked() {
        let rules = RuleSet::interview_default();
        let ledger =
            BookingLedger::from_json(r#"{"2025-05-23": ["11:00 AM", "04:00 PM"]}"#).unwrap();
        let day = generate(date("2025-05-23"), &rules, &ledger);
        assert_eq!(day.slots.len(), 2);
        assert_eq!(day.summary(), SlotSummary::AllBooked);
        assert_eq!(day.message(), "No time slots available for this date.");
    }

    proptest! {
        #[test]
        fn prop_booked_flag_matches_ledger(
            start in 0u8..23,
            span in 1u8..8,
            minutes in prop::sample::select(vec![15u16, 20, 30, 60]),
            booked_hours in prop::collection::vec(0u8..24, 0..6),
            day_offset in 0i64..365,
        ) {
            let end = (start + span).min(24);
            let rules = interval(start, end, minutes);
            let base = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
            let d = CalendarDate::from(base + chrono::Duration::days(day_offset));

            let mut ledger = BookingLedger::new();
            for h in &booked_hours {
                ledger.insert(d, TimeOfDay::new(*h, 0).unwrap());
            }

            let first = generate(d, &rules, &ledger);
            let second = generate(d, &rules, &ledger);
            prop_assert_eq!(&first, &second);

            for slot in &first.slots {
                prop_assert_eq!(slot.is_booked, ledger.is_booked(d, slot.time));
            }
            for pair in first.slots.windows(2) {
                prop_assert!(pair[0].time < pair[1].time);
            }
            for h in start..end {
                let on_the_hour = TimeOfDay::new(h, 0).unwrap();
                prop_assert!(first.find(on_the_hour).is_some());
            }
        }
    }
}
