use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::sse::{Event, Sse};
use axum::Json;
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::{Booking, BookingEvent, BookingEventKind};
use crate::services::booking;
use crate::services::events::publish_booking_event;
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> AppResult<()> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty() || token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let status_filter = query.status.as_deref().filter(|s| !s.is_empty());

    let db = state.db()?;
    let bookings = queries::get_all_bookings(&db, status_filter, limit)?;
    Ok(Json(bookings))
}

// POST /api/admin/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    check_auth(&headers, &state.config.admin_token)?;

    let (canceled, changed) = {
        let db = state.db()?;
        booking::cancel_booking(&db, &id)?
    };

    if changed {
        publish_booking_event(&state, BookingEventKind::Canceled, &canceled).await;
    }

    Ok(Json(canceled))
}

// POST /api/admin/cleanup
pub async fn cleanup_test_data(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Json<serde_json::Value>> {
    check_auth(&headers, &state.config.admin_token)?;

    let db = state.db()?;
    let deleted = booking::cleanup_test_bookings(&db)?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

// GET /api/admin/events (SSE)
#[derive(Deserialize)]
pub struct SseQuery {
    pub token: Option<String>,
    pub last_id: Option<i64>,
}

pub async fn events_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SseQuery>,
) -> AppResult<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>> {
    // Auth via query param (EventSource can't set headers)
    let token = query.token.as_deref().unwrap_or("");
    if token.is_empty() || token != state.config.admin_token {
        return Err(AppError::Unauthorized);
    }

    let last_id = query.last_id.unwrap_or(0);

    // Subscribe before reading catch-up events.
    let rx = state.events_tx.subscribe();

    let catchup_events = {
        let db = state.db()?;
        queries::get_booking_events_since(&db, last_id)?
    };
    let newest_catchup = catchup_events.last().map(|e| e.id).unwrap_or(last_id);

    let catchup_stream = tokio_stream::iter(catchup_events.into_iter().map(to_sse_event));

    let live_stream = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(event) if event.id > newest_catchup => Some(to_sse_event(event)),
        Ok(_) => None,
        Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "SSE subscriber lagged");
            None
        }
    });

    let keepalive_stream = tokio_stream::wrappers::IntervalStream::new(tokio::time::interval(
        Duration::from_secs(30),
    ))
    .map(|_| Ok::<_, Infallible>(Event::default().comment("keepalive")));

    let combined = catchup_stream.chain(live_stream);
    let merged = combined.merge(keepalive_stream);

    Ok(Sse::new(merged))
}

fn to_sse_event(event: BookingEvent) -> Result<Event, Infallible> {
    let data = serde_json::to_string(&event).unwrap_or_default();
    Ok(Event::default()
        .id(event.id.to_string())
        .event("booking_event")
        .data(data))
}
