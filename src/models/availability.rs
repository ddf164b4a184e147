use serde::{Deserialize, Serialize};

use super::Booking;

/// Outcome of checking a candidate stay against existing bookings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OverlapResult {
    pub overlap: bool,
    pub conflicts: Vec<Booking>,
}

impl OverlapResult {
    pub fn from_conflicts(conflicts: Vec<Booking>) -> Self {
        Self {
            overlap: !conflicts.is_empty(),
            conflicts,
        }
    }

    pub fn conflict_ids(&self) -> Vec<&str> {
        self.conflicts.iter().map(|b| b.id.as_str()).collect()
    }
}

/// A booked stay as shown to the calendar widget, dates normalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnavailableRange {
    pub booking_id: String,
    pub check_in: String,
    pub check_out: String,
}
