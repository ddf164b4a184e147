use std::sync::Arc;

use crate::db::queries;
use crate::models::{Booking, BookingEventKind};
use crate::state::AppState;

/// Record a booking change, push it to live subscribers, then notify
/// stakeholders. Failures are logged; the booking itself is already saved.
pub async fn publish_booking_event(state: &Arc<AppState>, kind: BookingEventKind, booking: &Booking) {
    let recorded = match state.db() {
        Ok(db) => queries::insert_booking_event(&db, kind, booking),
        Err(e) => Err(anyhow::anyhow!(e.to_string())),
    };

    let event = match recorded {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(error = %e, booking_id = %booking.id, "failed to record booking event");
            return;
        }
    };

    // No receivers is fine
    let _ = state.events_tx.send(event.clone());

    if let Err(e) = state.notifier.notify(&event).await {
        tracing::error!(error = %e, event_id = event.id, "failed to notify stakeholders");
    }
}
