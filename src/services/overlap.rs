//! Stay overlap detection.
//!
//! Stays are half-open night ranges `[check_in, check_out)`. A new guest may
//! check in on the day another checks out (same-day turnover), so shared
//! boundary days never count as a conflict.

use crate::dates::normalize_date;
use crate::models::{Booking, OverlapResult};

/// Find every active booking that shares a night with the candidate stay.
///
/// Canceled bookings and the booking named by `exclude_id` (the one being
/// updated) are skipped. Dates are normalized and then compared as
/// `YYYY-MM-DD` strings.
pub fn has_overlap(
    new_check_in: &str,
    new_check_out: &str,
    existing: &[Booking],
    exclude_id: Option<&str>,
) -> OverlapResult {
    let new_in = normalize_date(new_check_in);
    let new_out = normalize_date(new_check_out);

    let conflicts = existing
        .iter()
        .filter(|b| exclude_id != Some(b.id.as_str()))
        .filter(|b| !b.is_canceled())
        .filter(|b| {
            let ex_in = normalize_date(&b.check_in_date);
            let ex_out = normalize_date(&b.check_out_date);
            ranges_conflict(&new_in, &new_out, &ex_in, &ex_out)
        })
        .cloned()
        .collect();

    OverlapResult::from_conflicts(conflicts)
}

// All arguments must already be normalized.
fn ranges_conflict(new_in: &str, new_out: &str, ex_in: &str, ex_out: &str) -> bool {
    let intersects = new_in < ex_out && new_out > ex_in;
    let turnover = new_in == ex_out || new_out == ex_in;
    intersects && !turnover
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
            adults: 2,
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

    #[test]
    fn test_booking_does_not_conflict_with_itself() {
        let b = booking("bk-1", "2024-01-01", "2024-01-05");
        let result = has_overlap(
            &b.check_in_date,
            &b.check_out_date,
            std::slice::from_ref(&b),
            Some("bk-1"),
        );
        assert!(!result.overlap);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_same_day_turnover_allowed() {
        let existing = vec![booking("bk-1", "2024-01-01", "2024-01-05")];

        let after = has_overlap("2024-01-05", "2024-01-10", &existing, None);
        assert!(!after.overlap);

        let before = has_overlap("2023-12-28", "2024-01-01", &existing, None);
        assert!(!before.overlap);
    }

    #[test]
    fn test_partial_overlap_detected() {
        let existing = vec![booking("bk-1", "2024-01-01", "2024-01-05")];
        let result = has_overlap("2024-01-03", "2024-01-07", &existing, None);
        assert!(result.overlap);
        assert_eq!(result.conflict_ids(), vec!["bk-1"]);
    }

    #[test]
    fn test_containment_detected() {
        let existing = vec![booking("bk-1", "2024-01-01", "2024-01-10")];
        let inside = has_overlap("2024-01-03", "2024-01-05", &existing, None);
        assert!(inside.overlap);

        let around = has_overlap("2023-12-30", "2024-01-12", &existing, None);
        assert!(around.overlap);
    }

    #[test]
    fn test_identical_range_detected() {
        let existing = vec![booking("bk-1", "2024-01-01", "2024-01-05")];
        let result = has_overlap("2024-01-01", "2024-01-05", &existing, None);
        assert!(result.overlap);
    }

    #[test]
    fn test_disjoint_ranges() {
        let existing = vec![booking("bk-1", "2024-01-01", "2024-01-05")];
        let result = has_overlap("2024-02-01", "2024-02-05", &existing, None);
        assert!(!result.overlap);
    }

    #[test]
    fn test_canceled_bookings_ignored() {
        let mut b = booking("bk-1", "2024-01-01", "2024-01-05");
        b.status = BookingStatus::Canceled;
        let result = has_overlap("2024-01-02", "2024-01-04", &[b], None);
        assert!(!result.overlap);
    }

    #[test]
    fn test_mixed_formats_compare_after_normalization() {
        let existing = vec![booking("bk-1", "01-01-2024", "01-05-2024")];
        let result = has_overlap("2024-01-03", "2024-01-07", &existing, None);
        assert!(result.overlap);
        assert_eq!(result.conflict_ids(), vec!["bk-1"]);

        let candidate_us = has_overlap("01-03-2024", "01-07-2024", &existing, None);
        assert!(candidate_us.overlap);
    }

    #[test]
    fn test_empty_collection() {
        let result = has_overlap("2024-01-01", "2024-01-05", &[], None);
        assert_eq!(result, OverlapResult::default());
    }

    #[test]
    fn test_collects_every_conflict_in_order() {
        let existing = vec![
            booking("bk-1", "2024-01-01", "2024-01-04"),
            booking("bk-2", "2024-01-04", "2024-01-06"),
            booking("bk-3", "2024-01-10", "2024-01-12"),
            booking("bk-4", "2024-01-06", "2024-01-08"),
        ];
        let result = has_overlap("2024-01-02", "2024-01-07", &existing, None);
        assert_eq!(result.conflict_ids(), vec!["bk-1", "bk-2", "bk-4"]);
    }

    #[test]
    fn test_exclude_only_skips_named_booking() {
        let existing = vec![
            booking("bk-1", "2024-01-01", "2024-01-05"),
            booking("bk-2", "2024-01-03", "2024-01-08"),
        ];
        let result = has_overlap("2024-01-02", "2024-01-04", &existing, Some("bk-1"));
        assert_eq!(result.conflict_ids(), vec!["bk-2"]);
    }
}
