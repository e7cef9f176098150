use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{Isbn, MemberId};

/// State changes reported to observers of a circulation desk
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum CirculationEvent {
    /// A member took an available book
    CheckedOut { isbn: Isbn, member: MemberId, at: DateTime<Utc> },
    /// A member joined the reservation queue of a checked-out book
    Reserved {
        isbn: Isbn,
        member: MemberId,
        /// One-based place in the queue
        position: usize,
    },
    /// A member handed a book back
    Returned { isbn: Isbn, member: MemberId },
    /// A returned book went straight to the head of its reservation queue
    Transferred { isbn: Isbn, from: MemberId, to: MemberId },
    /// A queued member could not be resolved and was dropped from the queue
    ReservationSkipped { isbn: Isbn, member: MemberId },
}
