use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use crate::dates::{format_date, normalize_date, parse_stay_date};
use crate::models::{Booking, UnavailableRange};

/// Active stays that have not fully ended by `today`.
///
/// A stay checking out today is still listed; one that checked out
/// yesterday is not.
pub fn unavailable_ranges(bookings: &[Booking], today: NaiveDate) -> Vec<UnavailableRange> {
    let today = format_date(today);

    let mut ranges: Vec<UnavailableRange> = bookings
        .iter()
        .filter(|b| !b.is_canceled())
        .map(|b| UnavailableRange {
            booking_id: b.id.clone(),
            check_in: normalize_date(&b.check_in_date),
            check_out: normalize_date(&b.check_out_date),
        })
        .filter(|r| r.check_out >= today)
        .collect();

    ranges.sort_by(|a, b| a.check_in.cmp(&b.check_in));
    ranges
}

/// Every booked night, sorted and deduplicated.
///
/// The checkout day is not a booked night, so it stays open for a same-day
/// turnover check-in. Ranges whose dates do not parse are skipped.
pub fn unavailable_dates(ranges: &[UnavailableRange]) -> Vec<String> {
    let mut nights = BTreeSet::new();

    for range in ranges {
        let (Ok(start), Ok(end)) = (
            parse_stay_date(&range.check_in),
            parse_stay_date(&range.check_out),
        ) else {
            tracing::warn!(
                booking_id = %range.booking_id,
                check_in = %range.check_in,
                check_out = %range.check_out,
                "skipping unparseable stay dates"
            );
            continue;
        };

        let mut night = start;
        while night < end {
            nights.insert(night);
            night += Duration::days(1);
        }
    }

    nights.into_iter().map(format_date).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use chrono::Utc;

    fn booking(id: &str, check_in: &str, check_out: &str) -> Booking {
        let now = Utc::now().naive_utc();
        Booking {
            id: id.to_string(),
            guest_name: "Guest".to_string(),
            guest_email: "guest@example.com".to_string(),
            guest_phone: None,
            nationality: None,
            adults: 1,
            children: 0,
            has_pets: false,
            check_in_date: check_in.to_string(),
            check_out_date: check_out.to_string(),
            check_in_time: None,
            check_out_time: None,
            special_requests: None,
            status: BookingStatus::Booked,
            is_test: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_drops_past_and_canceled() {
        let mut canceled = booking("bk-3", "2024-03-10", "2024-03-12");
        canceled.status = BookingStatus::Canceled;
        let bookings = vec![
            booking("bk-1", "2024-02-01", "2024-02-05"),
            booking("bk-2", "2024-03-01", "2024-03-04"),
            canceled,
        ];

        let ranges = unavailable_ranges(&bookings, date("2024-02-20"));
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].booking_id, "bk-2");
    }

    #[test]
    fn test_keeps_stay_checking_out_today() {
        let bookings = vec![booking("bk-1", "2024-02-01", "2024-02-05")];
        let ranges = unavailable_ranges(&bookings, date("2024-02-05"));
        assert_eq!(ranges.len(), 1);

        let ranges = unavailable_ranges(&bookings, date("2024-02-06"));
        assert!(ranges.is_empty());
    }

    #[test]
    fn test_normalizes_and_sorts() {
        let bookings = vec![
            booking("bk-2", "04-01-2024", "04-03-2024"),
            booking("bk-1", "2024-03-20", "2024-03-22"),
        ];
        let ranges = unavailable_ranges(&bookings, date("2024-03-01"));
        assert_eq!(ranges[0].booking_id, "bk-1");
        assert_eq!(ranges[1].check_in, "2024-04-01");
        assert_eq!(ranges[1].check_out, "2024-04-03");
    }

    #[test]
    fn test_dates_exclude_checkout_day() {
        let ranges = vec![UnavailableRange {
            booking_id: "bk-1".to_string(),
            check_in: "2024-01-30".to_string(),
            check_out: "2024-02-02".to_string(),
        }];
        assert_eq!(
            unavailable_dates(&ranges),
            vec!["2024-01-30", "2024-01-31", "2024-02-01"]
        );
    }

    #[test]
    fn test_dates_dedupe_and_skip_garbage() {
        let ranges = vec![
            UnavailableRange {
                booking_id: "bk-1".to_string(),
                check_in: "2024-01-01".to_string(),
                check_out: "2024-01-03".to_string(),
            },
            UnavailableRange {
                booking_id: "bk-2".to_string(),
                check_in: "2024-01-02".to_string(),
                check_out: "2024-01-04".to_string(),
            },
            UnavailableRange {
                booking_id: "bk-3".to_string(),
                check_in: "soon".to_string(),
                check_out: "later".to_string(),
            },
        ];
        assert_eq!(
            unavailable_dates(&ranges),
            vec!["2024-01-01", "2024-01-02", "2024-01-03"]
        );
    }
}
