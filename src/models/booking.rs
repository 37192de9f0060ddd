use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::calendar::{CalendarDate, TimeOfDay};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterDetails {
    pub name: String,
    pub email: String,
    pub role: String,
}

/// The finalized choice handed to the store and notifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRequest {
    pub id: String,
    pub date: CalendarDate,
    pub time: TimeOfDay,
    pub requester: RequesterDetails,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub id: String,
    pub date: CalendarDate,
    pub time: TimeOfDay,
    pub requester: RequesterDetails,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "cancelled" => BookingStatus::Cancelled,
            _ => BookingStatus::Confirmed,
        }
    }
}
