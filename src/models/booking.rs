use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: String,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub nationality: Option<String>,
    pub adults: i32,
    pub children: i32,
    pub has_pets: bool,
    pub check_in_date: String,
    pub check_out_date: String,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub special_requests: Option<String>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub is_test: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    pub fn is_canceled(&self) -> bool {
        self.status == BookingStatus::Canceled
    }

    pub fn guest_count(&self) -> i32 {
        self.adults + self.children
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Booked,
    Canceled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Booked => "booked",
            BookingStatus::Canceled => "canceled",
        }
    }

    /// Missing or unrecognized statuses count as booked.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "canceled" | "cancelled" => BookingStatus::Canceled,
            _ => BookingStatus::Booked,
        }
    }
}

/// Body of a guest-intake form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSubmission {
    pub id: Option<String>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub nationality: Option<String>,
    #[serde(default = "default_adults")]
    pub adults: i32,
    #[serde(default)]
    pub children: i32,
    #[serde(default)]
    pub has_pets: bool,
    pub check_in_date: String,
    pub check_out_date: String,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub special_requests: Option<String>,
    #[serde(default)]
    pub is_test: bool,
}

fn default_adults() -> i32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(BookingStatus::parse("canceled"), BookingStatus::Canceled);
        assert_eq!(BookingStatus::parse("Cancelled"), BookingStatus::Canceled);
        assert_eq!(BookingStatus::parse("booked"), BookingStatus::Booked);
        assert_eq!(BookingStatus::parse(""), BookingStatus::Booked);
        assert_eq!(BookingStatus::parse("pending"), BookingStatus::Booked);
    }

    #[test]
    fn test_submission_defaults() {
        let json = r#"{"guest_name":"Ana","guest_email":"ana@example.com","check_in_date":"2024-01-01","check_out_date":"2024-01-03"}"#;
        let sub: BookingSubmission = serde_json::from_str(json).unwrap();
        assert_eq!(sub.adults, 1);
        assert_eq!(sub.children, 0);
        assert!(!sub.has_pets);
        assert!(!sub.is_test);
        assert!(sub.id.is_none());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&BookingStatus::Canceled).unwrap();
        assert_eq!(json, r#""canceled""#);
    }
}
