use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::models::calendar::{CalendarDate, ParseError, TimeOfDay};

static EMPTY: BTreeSet<TimeOfDay> = BTreeSet::new();

/// Times already committed, keyed by date. A read-only snapshot as far as
/// slot generation and selection are concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookingLedger {
    booked: BTreeMap<CalendarDate, BTreeSet<TimeOfDay>>,
}

impl BookingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from `{"YYYY-MM-DD": ["H:MM AM", ...]}` fixtures.
    #[cfg(test)]
    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let raw: std::collections::HashMap<String, Vec<String>> = serde_json::from_str(s)?;
        let mut ledger = Self::new();
        for (key, times) in raw {
            let date = CalendarDate::parse_key(&key)?;
            for time in times {
                ledger.insert(date, TimeOfDay::parse(&time)?);
            }
        }
        Ok(ledger)
    }

    /// Parses one stored `(date key, time key)` row and records it.
    pub fn insert_keys(&mut self, date: &str, time: &str) -> Result<(), ParseError> {
        let date = CalendarDate::parse_key(date)?;
        let time = TimeOfDay::parse(time)?;
        self.insert(date, time);
        Ok(())
    }

    pub fn insert(&mut self, date: CalendarDate, time: TimeOfDay) {
        self.booked.entry(date).or_default().insert(time);
    }

    pub fn booked_on(&self, date: CalendarDate) -> &BTreeSet<TimeOfDay> {
        self.booked.get(&date).unwrap_or(&EMPTY)
    }

    pub fn is_booked(&self, date: CalendarDate, time: TimeOfDay) -> bool {
        self.booked_on(date).contains(&time)
    }

    pub fn is_empty(&self) -> bool {
        self.booked.values().all(BTreeSet::is_empty)
    }
}
