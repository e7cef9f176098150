use tracing::{info, warn};

use crate::events::CirculationEvent;

/// Trait for circulation event observation
pub trait CirculationObserver: Send {
    /// Called after a state change has been applied
    fn on_event(&self, event: &CirculationEvent);
}

/// Logs every circulation event through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CirculationObserver for TracingObserver {
    fn on_event(&self, event: &CirculationEvent) {
        match event {
            CirculationEvent::CheckedOut { isbn, member, at } => {
                info!(%isbn, %member, %at, "book checked out");
            }
            CirculationEvent::Reserved { isbn, member, position } => {
                info!(%isbn, %member, position, "member queued for reservation");
            }
            CirculationEvent::Returned { isbn, member } => {
                info!(%isbn, %member, "book returned");
            }
            CirculationEvent::Transferred { isbn, from, to } => {
                info!(%isbn, %from, %to, "book handed to next reservation");
            }
            CirculationEvent::ReservationSkipped { isbn, member } => {
                warn!(%isbn, %member, "dropped reservation for unknown member");
            }
        }
    }
}
