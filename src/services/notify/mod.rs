pub mod webhook;

use async_trait::async_trait;

use crate::models::BookingEvent;

#[async_trait]
pub trait BookingNotifier: Send + Sync {
    async fn notify(&self, event: &BookingEvent) -> anyhow::Result<()>;
}

/// Used when no webhook is configured.
pub struct LogNotifier;

#[async_trait]
impl BookingNotifier for LogNotifier {
    async fn notify(&self, event: &BookingEvent) -> anyhow::Result<()> {
        tracing::info!(
            event_id = event.id,
            kind = event.kind.as_str(),
            booking_id = %event.booking.id,
            guest = %event.booking.guest_name,
            check_in = %event.booking.check_in_date,
            check_out = %event.booking.check_out_date,
            "booking event"
        );
        Ok(())
    }
}
