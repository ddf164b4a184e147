use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingEvent, BookingEventKind, BookingStatus};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const BOOKING_COLUMNS: &str = "id, guest_name, guest_email, guest_phone, nationality, adults, children, has_pets, \
     check_in_date, check_out_date, check_in_time, check_out_time, special_requests, status, is_test, \
     created_at, updated_at";

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    let created_at = booking.created_at.format(TIMESTAMP_FORMAT).to_string();
    let updated_at = booking.updated_at.format(TIMESTAMP_FORMAT).to_string();

    conn.execute(
        &format!(
            "INSERT INTO bookings ({BOOKING_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
        ),
        params![
            booking.id,
            booking.guest_name,
            booking.guest_email,
            booking.guest_phone,
            booking.nationality,
            booking.adults,
            booking.children,
            booking.has_pets,
            booking.check_in_date,
            booking.check_out_date,
            booking.check_in_time,
            booking.check_out_time,
            booking.special_requests,
            booking.status.as_str(),
            booking.is_test,
            created_at,
            updated_at,
        ],
    )?;
    Ok(())
}

/// Overwrite the guest and stay fields of an existing booking. Status and
/// `created_at` are left alone.
pub fn update_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<bool> {
    let updated_at = booking.updated_at.format(TIMESTAMP_FORMAT).to_string();

    let count = conn.execute(
        "UPDATE bookings SET
           guest_name = ?1, guest_email = ?2, guest_phone = ?3, nationality = ?4,
           adults = ?5, children = ?6, has_pets = ?7,
           check_in_date = ?8, check_out_date = ?9, check_in_time = ?10, check_out_time = ?11,
           special_requests = ?12, is_test = ?13, updated_at = ?14
         WHERE id = ?15",
        params![
            booking.guest_name,
            booking.guest_email,
            booking.guest_phone,
            booking.nationality,
            booking.adults,
            booking.children,
            booking.has_pets,
            booking.check_in_date,
            booking.check_out_date,
            booking.check_in_time,
            booking.check_out_time,
            booking.special_requests,
            booking.is_test,
            updated_at,
            booking.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Every non-canceled booking. Dates are stored as text in mixed formats, so
/// no date filtering happens in SQL.
pub fn get_active_bookings(conn: &Connection) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE status != 'canceled' ORDER BY created_at ASC"
    ))?;

    let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_all_bookings(
    conn: &Connection,
    status_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<Booking>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings WHERE status = ?1 ORDER BY check_in_date DESC LIMIT ?2"
            ),
            vec![
                Box::new(BookingStatus::parse(status).as_str()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            format!("SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY check_in_date DESC LIMIT ?1"),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
) -> anyhow::Result<bool> {
    let now = Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string();
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now, id],
    )?;
    Ok(count > 0)
}

pub fn delete_test_bookings(conn: &Connection) -> anyhow::Result<usize> {
    conn.execute(
        "DELETE FROM booking_events WHERE booking_id IN (SELECT id FROM bookings WHERE is_test = 1)",
        [],
    )?;
    let count = conn.execute("DELETE FROM bookings WHERE is_test = 1", [])?;
    Ok(count)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let status_str: Option<String> = row.get(13)?;
    let created_at_str: String = row.get(15)?;
    let updated_at_str: String = row.get(16)?;

    Ok(Booking {
        id: row.get(0)?,
        guest_name: row.get(1)?,
        guest_email: row.get(2)?,
        guest_phone: row.get(3)?,
        nationality: row.get(4)?,
        adults: row.get(5)?,
        children: row.get(6)?,
        has_pets: row.get(7)?,
        check_in_date: row.get(8)?,
        check_out_date: row.get(9)?,
        check_in_time: row.get(10)?,
        check_out_time: row.get(11)?,
        special_requests: row.get(12)?,
        status: BookingStatus::parse(status_str.as_deref().unwrap_or_default()),
        is_test: row.get(14)?,
        created_at: parse_timestamp(&created_at_str),
        updated_at: parse_timestamp(&updated_at_str),
    })
}

fn parse_timestamp(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap_or_else(|e| {
        tracing::warn!(value = %s, error = %e, "unparseable timestamp, using current time");
        Utc::now().naive_utc()
    })
}

// ── Booking events ──

pub fn insert_booking_event(
    conn: &Connection,
    kind: BookingEventKind,
    booking: &Booking,
) -> anyhow::Result<BookingEvent> {
    let payload = serde_json::to_string(booking)?;
    let created_at = Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string();

    conn.execute(
        "INSERT INTO booking_events (booking_id, kind, payload, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![booking.id, kind.as_str(), payload, created_at],
    )?;

    Ok(BookingEvent {
        id: conn.last_insert_rowid(),
        kind,
        booking: booking.clone(),
        created_at,
    })
}

pub fn get_booking_events_since(conn: &Connection, last_id: i64) -> anyhow::Result<Vec<BookingEvent>> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, payload, created_at FROM booking_events WHERE id > ?1 ORDER BY id ASC LIMIT 500",
    )?;

    let rows = stmt.query_map(params![last_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut events = vec![];
    for row in rows {
        let (id, kind_str, payload, created_at) = row?;
        let Some(kind) = BookingEventKind::parse(&kind_str) else {
            tracing::warn!(event_id = id, kind = %kind_str, "skipping booking event with unknown kind");
            continue;
        };
        let booking: Booking = serde_json::from_str(&payload)?;
        events.push(BookingEvent {
            id,
            kind,
            booking,
            created_at,
        });
    }
    Ok(events)
}
