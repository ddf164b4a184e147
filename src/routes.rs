use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.config.cors_allow_origin.as_deref());

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/bookings", post(handlers::bookings::submit_booking))
        .route("/api/bookings/check", post(handlers::bookings::check_dates))
        .route("/api/bookings/:id", get(handlers::bookings::get_booking))
        .route("/api/availability", get(handlers::bookings::get_availability))
        .route("/api/admin/bookings", get(handlers::admin::get_bookings))
        .route(
            "/api/admin/bookings/:id/cancel",
            post(handlers::admin::cancel_booking),
        )
        .route("/api/admin/cleanup", post(handlers::admin::cleanup_test_data))
        .route("/api/admin/events", get(handlers::admin::events_stream))
        .route("/calendar/feed.ics", get(handlers::calendar::calendar_feed))
        .route(
            "/calendar/:booking_id",
            get(handlers::calendar::download_ics),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    match allow_origin.and_then(|o| HeaderValue::from_str(o).ok()) {
        Some(origin) => layer.allow_origin(origin),
        None => layer.allow_origin(Any),
    }
}
