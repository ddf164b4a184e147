use serde::{Deserialize, Serialize};

use super::Booking;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingEventKind {
    Created,
    Updated,
    Canceled,
}

impl BookingEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingEventKind::Created => "created",
            BookingEventKind::Updated => "updated",
            BookingEventKind::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(BookingEventKind::Created),
            "updated" => Some(BookingEventKind::Updated),
            "canceled" => Some(BookingEventKind::Canceled),
            _ => None,
        }
    }
}

/// A change to a booking, fanned out to notifiers and SSE subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingEvent {
    pub id: i64,
    pub kind: BookingEventKind,
    pub booking: Booking,
    pub created_at: String,
}
