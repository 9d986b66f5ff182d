use async_trait::async_trait;
use kernel::event::{BookingEvent, EventPublisher};

/// Default publisher: announces booking facts on the log stream. A real
/// deployment can swap in a queue-backed publisher through the registry
/// without touching the scheduling service.
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: BookingEvent) {
        match event {
            BookingEvent::Created(booking) => {
                tracing::info!(
                    booking_id = %booking.booking_id,
                    facility_id = %booking.facility_id,
                    kind = booking.kind.as_str(),
                    total_fee = %booking.fees.total,
                    "booking created"
                );
            }
            BookingEvent::Cancelled(booking_id) => {
                tracing::info!(booking_id = %booking_id, "booking cancelled");
            }
        }
    }
}
