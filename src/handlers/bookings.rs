use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::dates::{format_date, today_in};
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::{Booking, BookingEventKind, BookingSubmission, OverlapResult, UnavailableRange};
use crate::services::availability::{unavailable_dates, unavailable_ranges};
use crate::services::booking;
use crate::services::events::publish_booking_event;
use crate::state::AppState;

// POST /api/bookings
pub async fn submit_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BookingSubmission>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    // Lock held across check and write.
    let (saved, kind) = {
        let db = state.db()?;
        booking::submit_booking(&db, body)?
    };

    publish_booking_event(&state, kind, &saved).await;

    let status = match kind {
        BookingEventKind::Created => StatusCode::CREATED,
        _ => StatusCode::OK,
    };
    Ok((status, Json(saved)))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let db = state.db()?;
    queries::get_booking_by_id(&db, &id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
}

// POST /api/bookings/check
#[derive(Deserialize)]
pub struct CheckRequest {
    pub check_in: String,
    pub check_out: String,
    pub exclude_id: Option<String>,
}

pub async fn check_dates(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CheckRequest>,
) -> AppResult<Json<OverlapResult>> {
    booking::validate_stay(&body.check_in, &body.check_out)?;

    let db = state.db()?;
    let result = booking::check_availability(
        &db,
        &body.check_in,
        &body.check_out,
        body.exclude_id.as_deref(),
    )?;
    Ok(Json(result))
}

// GET /api/availability
#[derive(Serialize)]
pub struct AvailabilityResponse {
    today: String,
    timezone: String,
    ranges: Vec<UnavailableRange>,
    dates: Vec<String>,
}

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<AvailabilityResponse>> {
    let bookings = {
        let db = state.db()?;
        queries::get_active_bookings(&db)?
    };

    let today = today_in(state.config.timezone);
    let ranges = unavailable_ranges(&bookings, today);
    let dates = unavailable_dates(&ranges);

    Ok(Json(AvailabilityResponse {
        today: format_date(today),
        timezone: state.config.timezone.name().to_string(),
        ranges,
        dates,
    }))
}
