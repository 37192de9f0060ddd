use async_trait::async_trait;

use crate::models::BookingRequest;

/// Tells the outside world about a confirmed booking (email, chat, calendar sync).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn booking_confirmed(&self, request: &BookingRequest) -> anyhow::Result<()>;
}

/// Records confirmations in the log only.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn booking_confirmed(&self, request: &BookingRequest) -> anyhow::Result<()> {
        tracing::info!(
            booking_id = %request.id,
            date = %request.date,
            time = %request.time,
            name = %request.requester.name,
            email = %request.requester.email,
            role = %request.requester.role,
            "booking confirmed"
        );
        Ok(())
    }
}
