use crate::model::booking::Booking;
use crate::model::id::BookingId;
use async_trait::async_trait;

/// Facts the scheduling service announces after a commit. Collaborators
/// (payment recording, notifications) subscribe by implementing
/// [`EventPublisher`]; how they deliver is their concern.
#[derive(Debug, Clone)]
pub enum BookingEvent {
    Created(Booking),
    Cancelled(BookingId),
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: BookingEvent);
}
