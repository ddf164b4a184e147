use chrono::{NaiveDate, Utc};
use rusqlite::Connection;

use crate::dates::{format_date, parse_stay_date};
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::{Booking, BookingEventKind, BookingStatus, BookingSubmission, OverlapResult};
use crate::services::overlap::has_overlap;

/// Longest stay accepted from the form.
pub const MAX_STAY_NIGHTS: i64 = 365;

/// Parse a candidate stay and require check-in strictly before check-out.
///
/// The overlap detector does not special-case zero-night or reversed
/// ranges, so every caller runs this first.
pub fn validate_stay(check_in: &str, check_out: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let check_in = parse_stay_date(check_in)
        .map_err(|e| AppError::Validation(format!("check-in: {e}")))?;
    let check_out = parse_stay_date(check_out)
        .map_err(|e| AppError::Validation(format!("check-out: {e}")))?;

    if check_in >= check_out {
        return Err(AppError::Validation(
            "check-out must be after check-in".to_string(),
        ));
    }
    let nights = (check_out - check_in).num_days();
    if nights > MAX_STAY_NIGHTS {
        return Err(AppError::Validation(format!(
            "stay of {nights} nights exceeds the {MAX_STAY_NIGHTS}-night maximum"
        )));
    }
    Ok((check_in, check_out))
}

/// Reject submissions the overlap check cannot reason about.
///
/// Zero-night, reversed and overlong stays are rejected via [`validate_stay`].
pub fn validate_submission(sub: &BookingSubmission) -> AppResult<()> {
    if sub.guest_name.trim().is_empty() {
        return Err(AppError::Validation("guest name is required".to_string()));
    }
    if !sub.guest_email.contains('@') {
        return Err(AppError::Validation(format!(
            "invalid email address: {}",
            sub.guest_email
        )));
    }
    if sub.adults < 1 {
        return Err(AppError::Validation(
            "at least one adult guest is required".to_string(),
        ));
    }
    if sub.children < 0 {
        return Err(AppError::Validation(
            "children cannot be negative".to_string(),
        ));
    }

    validate_stay(&sub.check_in_date, &sub.check_out_date)?;
    Ok(())
}

/// Overlap check against the stored bookings, without writing anything.
pub fn check_availability(
    conn: &Connection,
    check_in: &str,
    check_out: &str,
    exclude_id: Option<&str>,
) -> AppResult<OverlapResult> {
    let existing = queries::get_active_bookings(conn)?;
    Ok(has_overlap(check_in, check_out, &existing, exclude_id))
}

/// Create a booking, or update it when the submission names an existing id.
///
/// The caller must hold the connection for the whole call so that the
/// overlap check and the write cannot interleave with another submission.
pub fn submit_booking(
    conn: &Connection,
    sub: BookingSubmission,
) -> AppResult<(Booking, BookingEventKind)> {
    validate_submission(&sub)?;

    // Rows are stored canonical.
    let (check_in, check_out) = validate_stay(&sub.check_in_date, &sub.check_out_date)?;
    let check_in = format_date(check_in);
    let check_out = format_date(check_out);

    let existing_booking = match sub.id.as_deref() {
        Some(id) => Some(
            queries::get_booking_by_id(conn, id)?
                .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?,
        ),
        None => None,
    };

    if let Some(existing) = &existing_booking {
        if existing.is_canceled() {
            return Err(AppError::Validation(format!(
                "booking {} has been canceled",
                existing.id
            )));
        }
    }

    let result = check_availability(conn, &check_in, &check_out, sub.id.as_deref())?;
    if result.overlap {
        tracing::info!(
            check_in = %check_in,
            check_out = %check_out,
            conflicts = ?result.conflict_ids(),
            "rejected overlapping booking"
        );
        return Err(AppError::Conflict(result.conflicts));
    }

    let now = Utc::now().naive_utc();
    let (id, created_at, status) = match &existing_booking {
        Some(b) => (b.id.clone(), b.created_at, b.status),
        None => (uuid::Uuid::new_v4().to_string(), now, BookingStatus::Booked),
    };

    let booking = Booking {
        id,
        guest_name: sub.guest_name.trim().to_string(),
        guest_email: sub.guest_email.trim().to_string(),
        guest_phone: sub.guest_phone,
        nationality: sub.nationality,
        adults: sub.adults,
        children: sub.children,
        has_pets: sub.has_pets,
        check_in_date: check_in,
        check_out_date: check_out,
        check_in_time: sub.check_in_time,
        check_out_time: sub.check_out_time,
        special_requests: sub.special_requests,
        status,
        is_test: sub.is_test,
        created_at,
        updated_at: now,
    };

    let kind = if existing_booking.is_some() {
        queries::update_booking(conn, &booking)?;
        BookingEventKind::Updated
    } else {
        queries::create_booking(conn, &booking)?;
        BookingEventKind::Created
    };

    tracing::info!(
        booking_id = %booking.id,
        check_in = %booking.check_in_date,
        check_out = %booking.check_out_date,
        kind = kind.as_str(),
        "booking saved"
    );

    Ok((booking, kind))
}

/// Soft-delete a booking. Canceling twice is not an error; the flag is
/// false when the booking was already canceled.
pub fn cancel_booking(conn: &Connection, id: &str) -> AppResult<(Booking, bool)> {
    let booking = queries::get_booking_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

    if booking.is_canceled() {
        return Ok((booking, false));
    }

    queries::update_booking_status(conn, id, BookingStatus::Canceled)?;
    tracing::info!(booking_id = %id, "booking canceled");

    let canceled = queries::get_booking_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;
    Ok((canceled, true))
}

pub fn cleanup_test_bookings(conn: &Connection) -> AppResult<usize> {
    let deleted = queries::delete_test_bookings(conn)?;
    tracing::info!(deleted, "removed test bookings");
    Ok(deleted)
}
