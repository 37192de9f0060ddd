use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::calendar::TimeOfDay;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("invalid rule set json: {0}")]
    Json(String),

    #[error("invalid weekday index: {0} (expected 0=Sunday..6=Saturday)")]
    Weekday(u8),

    #[error("start hour {start} must be before end hour {end} (end at most 24)")]
    Hours { start: u8, end: u8 },

    #[error("slot duration of {0} minutes must divide an hour evenly")]
    Duration(u16),
}

/// Which weekdays are bookable. Indices are 0=Sunday..6=Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekdayRule {
    Only(BTreeSet<u8>),
    Except(BTreeSet<u8>),
}

impl WeekdayRule {
    pub fn allows(&self, weekday: u8) -> bool {
        match self {
            WeekdayRule::Only(days) => days.contains(&weekday),
            WeekdayRule::Except(days) => !days.contains(&weekday),
        }
    }

    fn indices(&self) -> &BTreeSet<u8> {
        match self {
            WeekdayRule::Only(days) | WeekdayRule::Except(days) => days,
        }
    }
}

/// How the slots of an eligible day are produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotRule {
    Fixed {
        times: Vec<TimeOfDay>,
    },
    /// Half-open `[start_hour, end_hour)` cut into slots of `slot_minutes`.
    Interval {
        start_hour: u8,
        end_hour: u8,
        slot_minutes: u16,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub weekdays: WeekdayRule,
    pub slots: SlotRule,
}

impl RuleSet {
    /// Validates the rule set and normalizes fixed slot lists to ascending,
    /// duplicate-free order.
    pub fn new(weekdays: WeekdayRule, slots: SlotRule) -> Result<Self, RuleError> {
        if let Some(bad) = weekdays.indices().iter().find(|d| **d > 6) {
            return Err(RuleError::Weekday(*bad));
        }

        let slots = match slots {
            SlotRule::Fixed { mut times } => {
                times.sort();
                times.dedup();
                SlotRule::Fixed { times }
            }
            SlotRule::Interval {
                start_hour,
                end_hour,
                slot_minutes,
            } => {
                if start_hour >= end_hour || end_hour > 24 {
                    return Err(RuleError::Hours {
                        start: start_hour,
                        end: end_hour,
                    });
                }
                if slot_minutes == 0 || 60 % slot_minutes != 0 {
                    return Err(RuleError::Duration(slot_minutes));
                }
                SlotRule::Interval {
                    start_hour,
                    end_hour,
                    slot_minutes,
                }
            }
        };

        Ok(Self { weekdays, slots })
    }

    pub fn from_json(s: &str) -> Result<Self, RuleError> {
        let raw: RuleSet = serde_json::from_str(s).map_err(|e| RuleError::Json(e.to_string()))?;
        Self::new(raw.weekdays, raw.slots)
    }

    /// Monday, Wednesday and Friday at 11:00 AM and 4:00 PM.
    pub fn interview_default() -> Self {
        let times = [(11, 0), (16, 0)]
            .iter()
            .filter_map(|(h, m)| TimeOfDay::new(*h, *m))
            .collect();
        Self {
            weekdays: WeekdayRule::Only(BTreeSet::from([1, 3, 5])),
            slots: SlotRule::Fixed { times },
        }
    }

    /// Length of one appointment. Fixed lists are treated as hour-long slots.
    pub fn slot_minutes(&self) -> u16 {
        match self.slots {
            SlotRule::Fixed { .. } => 60,
            SlotRule::Interval { slot_minutes, .. } => slot_minutes,
        }
    }

    pub fn to_human_readable(&self) -> String {
        let days = match &self.weekdays {
            WeekdayRule::Only(days) if days.is_empty() => "No days".to_string(),
            WeekdayRule::Only(days) => join_day_names(days),
            WeekdayRule::Except(days) if days.is_empty() => "Every day".to_string(),
            WeekdayRule::Except(days) => format!("Every day except {}", join_day_names(days)),
        };

        let slots = match &self.slots {
            SlotRule::Fixed { times } if times.is_empty() => "no slots defined".to_string(),
            SlotRule::Fixed { times } => times
                .iter()
                .map(TimeOfDay::display)
                .collect::<Vec<_>>()
                .join(", "),
            SlotRule::Interval {
                start_hour,
                end_hour,
                slot_minutes,
            } => format!("{start_hour:02}:00-{end_hour:02}:00 every {slot_minutes} min"),
        };

        format!("{days}: {slots}")
    }
}

fn join_day_names(days: &BTreeSet<u8>) -> String {
    days.iter()
        .filter_map(|d| DAY_NAMES.get(*d as usize))
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixed_rules() {
        let json = r#"{"weekdays":{"only":[1,3,5]},"slots":{"kind":"fixed","times":["04:00 PM","11:00 AM"]}}"#;
        let rules = RuleSet::from_json(json).unwrap();
        assert_eq!(rules, RuleSet::interview_default());
    }

    #[test]
    fn test_parse_interval_rules() {
        let json = r#"{"weekdays":{"except":[0,6]},"slots":{"kind":"interval","start_hour":10,"end_hour":19,"slot_minutes":30}}"#;
        let rules = RuleSet::from_json(json).unwrap();
        assert!(rules.weekdays.allows(2));
        assert!(!rules.weekdays.allows(0));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(RuleSet::from_json("not json"), Err(RuleError::Json(_))));
    }

    #[test]
    fn test_rejects_bad_weekday() {
        let result = RuleSet::new(
            WeekdayRule::Only(BTreeSet::from([7])),
            SlotRule::Fixed { times: vec![] },
        );
        assert_eq!(result, Err(RuleError::Weekday(7)));
    }

    #[test]
    fn test_rejects_inverted_hours() {
        let result = RuleSet::new(
            WeekdayRule::Except(BTreeSet::new()),
            SlotRule::Interval {
                start_hour: 19,
                end_hour: 10,
                slot_minutes: 30,
            },
        );
        assert!(matches!(result, Err(RuleError::Hours { .. })));
    }

    #[test]
    fn test_rejects_duration_not_dividing_hour() {
        let result = RuleSet::new(
            WeekdayRule::Except(BTreeSet::new()),
            SlotRule::Interval {
                start_hour: 9,
                end_hour: 17,
                slot_minutes: 45,
            },
        );
        assert_eq!(result, Err(RuleError::Duration(45)));
    }

    #[test]
    fn test_fixed_times_are_sorted_and_deduplicated() {
        let t = |s: &str| TimeOfDay::parse(s).unwrap();
        let rules = RuleSet::new(
            WeekdayRule::Only(BTreeSet::from([1])),
            SlotRule::Fixed {
                times: vec![t("4:00 PM"), t("11:00 AM"), t("04:00 PM")],
            },
        )
        .unwrap();
        assert_eq!(
            rules.slots,
            SlotRule::Fixed {
                times: vec![t("11:00 AM"), t("4:00 PM")]
            }
        );
    }

    #[test]
    fn test_to_human_readable() {
        assert_eq!(
            RuleSet::interview_default().to_human_readable(),
            "Mon, Wed, Fri: 11:00 AM, 4:00 PM"
        );

        let rules = RuleSet::from_json(
            r#"{"weekdays":{"except":[0,6]},"slots":{"kind":"interval","start_hour":9,"end_hour":17,"slot_minutes":60}}"#,
        )
        .unwrap();
        assert_eq!(
            rules.to_human_readable(),
            "Every day except Sun, Sat: 09:00-17:00 every 60 min"
        );
    }
}
