use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::services::calendar::{generate_feed, generate_ics};
use crate::state::AppState;

const CALENDAR_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

// GET /calendar/:booking_id
pub async fn download_ics(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> AppResult<Response> {
    // Strip .ics suffix if present
    let booking_id = raw_id.strip_suffix(".ics").unwrap_or(&raw_id);

    let booking = {
        let db = state.db()?;
        queries::get_booking_by_id(&db, booking_id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?
    };

    let ics = generate_ics(&booking, &state.config.property_name);
    let filename = format!("booking-{booking_id}.ics");

    Ok((
        [
            (header::CONTENT_TYPE, CALENDAR_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        ics,
    )
        .into_response())
}

// GET /calendar/feed.ics
pub async fn calendar_feed(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let bookings = {
        let db = state.db()?;
        queries::get_active_bookings(&db)?
    };

    let feed = generate_feed(&bookings, &state.config.property_name);
    Ok(([(header::CONTENT_TYPE, CALENDAR_CONTENT_TYPE)], feed).into_response())
}
