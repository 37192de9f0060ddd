use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid date key: {0} (expected YYYY-MM-DD)")]
    Date(String),

    #[error("invalid time: {0}")]
    Time(String),
}

/// A day on the calendar with no time-of-day component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// `month` is 1-based. Returns `None` for days that do not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// 0 = Sunday .. 6 = Saturday
    pub fn weekday_index(&self) -> u8 {
        self.0.weekday().num_days_from_sunday() as u8
    }

    /// Canonical ledger key, always zero padded: `2025-05-03`.
    pub fn key(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }

    pub fn parse_key(s: &str) -> Result<Self, ParseError> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        let well_formed = parts.len() == 3
            && parts.iter().zip([4, 2, 2]).all(|(part, width)| {
                part.len() == width && part.bytes().all(|b| b.is_ascii_digit())
            });
        if !well_formed {
            return Err(ParseError::Date(s.to_string()));
        }
        let year: i32 = parts[0].parse().map_err(|_| ParseError::Date(s.to_string()))?;
        let month: u32 = parts[1].parse().map_err(|_| ParseError::Date(s.to_string()))?;
        let day: u32 = parts[2].parse().map_err(|_| ParseError::Date(s.to_string()))?;
        Self::from_ymd(year, month, day).ok_or_else(|| ParseError::Date(s.to_string()))
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// Long form used on confirmations, e.g. `Fri May 23 2025`.
    pub fn to_long_string(&self) -> String {
        self.0.format("%a %b %d %Y").to_string()
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_key(s)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_key(&s).map_err(serde::de::Error::custom)
    }
}

/// A wall-clock time in the single local zone.
///
/// Equality and ordering work on the normalized (hour, minute) value, so
/// `"04:00 PM"` and `"4:00 PM"` parse to the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            minutes: hour as u16 * 60 + minute as u16,
        })
    }

    pub fn hour(&self) -> u8 {
        (self.minutes / 60) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.minutes % 60) as u8
    }

    /// Canonical display form: `4:00 PM`, `12:30 AM`.
    pub fn display(&self) -> String {
        let (hour12, meridiem) = match self.hour() {
            0 => (12, "AM"),
            h @ 1..=11 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        format!("{hour12}:{:02} {meridiem}", self.minute())
    }

    /// 24-hour storage key: `16:00`.
    pub fn key(&self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }

    /// Accepts `4:00 PM`, `04:00 pm` and 24-hour `16:00`.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let err = || ParseError::Time(s.to_string());
        let trimmed = s.trim();

        let (clock, meridiem) = match trimmed.rsplit_once(' ') {
            Some((clock, m)) => (clock.trim(), Some(m.to_ascii_uppercase())),
            None => (trimmed, None),
        };

        let (h, m) = clock.split_once(':').ok_or_else(err)?;
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if m.len() != 2 || h.is_empty() || h.len() > 2 || !digits(h) || !digits(m) {
            return Err(err());
        }
        let hour: u8 = h.parse().map_err(|_| err())?;
        let minute: u8 = m.parse().map_err(|_| err())?;

        let hour = match meridiem.as_deref() {
            None => hour,
            Some("AM") if (1..=12).contains(&hour) => hour % 12,
            Some("PM") if (1..=12).contains(&hour) => hour % 12 + 12,
            Some(_) => return Err(err()),
        };

        Self::new(hour, minute).ok_or_else(err)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_key_is_zero_padded() {
        let date = CalendarDate::from_ymd(2025, 5, 3).unwrap();
        assert_eq!(date.key(), "2025-05-03");
    }

    #[test]
    fn test_date_key_roundtrip() {
        let date = CalendarDate::parse_key("2025-05-23").unwrap();
        assert_eq!(date, CalendarDate::from_ymd(2025, 5, 23).unwrap());
        assert_eq!(date.to_string(), "2025-05-23");
    }

    #[test]
    fn test_date_key_rejects_unpadded_and_invalid() {
        assert!(CalendarDate::parse_key("2025-5-23").is_err());
        assert!(CalendarDate::parse_key("2025-02-30").is_err());
        assert!(CalendarDate::parse_key("not a date").is_err());
    }

    #[test]
    fn test_date_key_rejects_signed_fields() {
        assert!(CalendarDate::parse_key("2025-+5-23").is_err());
        assert!(CalendarDate::parse_key("2025-05-+3").is_err());
        assert!(CalendarDate::parse_key("+025-05-23").is_err());
    }

    #[test]
    fn test_weekday_index_starts_sunday() {
        // 2025-05-25 is a Sunday, 2025-05-23 a Friday
        assert_eq!(CalendarDate::parse_key("2025-05-25").unwrap().weekday_index(), 0);
        assert_eq!(CalendarDate::parse_key("2025-05-23").unwrap().weekday_index(), 5);
    }

    #[test]
    fn test_dates_order_chronologically() {
        let a = CalendarDate::parse_key("2024-12-31").unwrap();
        let b = CalendarDate::parse_key("2025-01-01").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_time_display_is_twelve_hour() {
        assert_eq!(TimeOfDay::new(16, 0).unwrap().display(), "4:00 PM");
        assert_eq!(TimeOfDay::new(11, 0).unwrap().display(), "11:00 AM");
        assert_eq!(TimeOfDay::new(0, 30).unwrap().display(), "12:30 AM");
        assert_eq!(TimeOfDay::new(12, 0).unwrap().display(), "12:00 PM");
    }

    #[test]
    fn test_time_padded_and_unpadded_are_equal() {
        assert_eq!(
            TimeOfDay::parse("04:00 PM").unwrap(),
            TimeOfDay::parse("4:00 PM").unwrap()
        );
        assert_eq!(TimeOfDay::parse("4:00 pm").unwrap(), TimeOfDay::parse("16:00").unwrap());
    }

    #[test]
    fn test_time_parse_rejects_garbage() {
        assert!(TimeOfDay::parse("13:00 PM").is_err());
        assert!(TimeOfDay::parse("0:30 AM").is_err());
        assert!(TimeOfDay::parse("25:00").is_err());
        assert!(TimeOfDay::parse("4:0 PM").is_err());
        assert!(TimeOfDay::parse("noon").is_err());
        assert!(TimeOfDay::parse("+4:00 PM").is_err());
    }

    #[test]
    fn test_time_serde_uses_display_form() {
        let time = TimeOfDay::parse("14:30").unwrap();
        assert_eq!(serde_json::to_string(&time).unwrap(), "\"2:30 PM\"");
        let back: TimeOfDay = serde_json::from_str("\"02:30 PM\"").unwrap();
        assert_eq!(back, time);
    }
}
