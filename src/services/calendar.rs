use crate::dates::parse_stay_date;
use crate::models::Booking;

const PRODID: &str = "-//Staybook//Guest Intake//EN";

/// A single booking as a standalone calendar file.
pub fn generate_ics(booking: &Booking, property_name: &str) -> String {
    let mut out = calendar_header();
    push_event(&mut out, booking, property_name);
    out.push_str("END:VCALENDAR\r\n");
    out
}

/// All active bookings in one calendar, for subscription by calendar apps.
pub fn generate_feed(bookings: &[Booking], property_name: &str) -> String {
    let mut out = calendar_header();
    out.push_str(&format!("X-WR-CALNAME:{}\r\n", escape_text(property_name)));
    for booking in bookings.iter().filter(|b| !b.is_canceled()) {
        push_event(&mut out, booking, property_name);
    }
    out.push_str("END:VCALENDAR\r\n");
    out
}

fn calendar_header() -> String {
    format!("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:{PRODID}\r\nCALSCALE:GREGORIAN\r\n")
}

fn push_event(out: &mut String, booking: &Booking, property_name: &str) {
    // All-day events; DTEND is exclusive, which matches the checkout day.
    let dtstart = ics_date(&booking.check_in_date);
    let dtend = ics_date(&booking.check_out_date);
    let dtstamp = booking.updated_at.format("%Y%m%dT%H%M%SZ").to_string();
    let uid = format!("{}@staybook", booking.id);

    let summary = format!("{} @ {}", booking.guest_name, property_name);

    let mut description = format!(
        "Guests: {} ({} adults, {} children)",
        booking.guest_count(),
        booking.adults,
        booking.children
    );
    if booking.has_pets {
        description.push_str("\nWith pets");
    }
    if let Some(requests) = booking.special_requests.as_deref().filter(|r| !r.is_empty()) {
        description.push_str(&format!("\nRequests: {requests}"));
    }

    out.push_str(&format!(
        "BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART;VALUE=DATE:{dtstart}\r\n\
         DTEND;VALUE=DATE:{dtend}\r\n\
         SUMMARY:{}\r\n\
         DESCRIPTION:{}\r\n\
         TRANSP:OPAQUE\r\n\
         END:VEVENT\r\n",
        escape_text(&summary),
        escape_text(&description),
    ));
}

// Stored dates may be MM-DD-YYYY; unparseable ones are emitted with dashes stripped.
fn ics_date(raw: &str) -> String {
    match parse_stay_date(raw) {
        Ok(date) => date.format("%Y%m%d").to_string(),
        Err(_) => raw.replace('-', ""),
    }
}

fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
}
