use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{error::CirculationError, ids::MemberId};

/// Which kind of record a lookup failed to find
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum EntityKind {
    Book,
    Member,
}

/// Result of a borrow or return request
///
/// Every request produces one of these; none of them is fatal and only the
/// success variants change any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Outcome {
    /// The book or member does not exist
    NotFound(EntityKind),
    /// The book was available and is now held by the member
    BorrowedSuccessfully,
    /// The book is checked out; the member joined its reservation queue
    QueuedForReservation,
    /// The book went back on the shelf
    ReturnedSuccessfully,
    /// The book was returned and handed to the next queued member
    ReturnedAndTransferred(MemberId),
    /// The member does not hold this book
    NotBorrowedByThisMember,
}

impl Outcome {
    /// Whether the request changed state
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::NotFound(_) | Self::NotBorrowedByThisMember)
    }
}

impl From<CirculationError> for Outcome {
    fn from(error: CirculationError) -> Self {
        match error {
            CirculationError::BookNotFound(_) => Self::NotFound(EntityKind::Book),
            CirculationError::MemberNotFound(_) => Self::NotFound(EntityKind::Member),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(EntityKind::Book) => f.write_str("Book not found."),
            Self::NotFound(EntityKind::Member) => f.write_str("Member not found."),
            Self::BorrowedSuccessfully => f.write_str("Book borrowed successfully."),
            Self::QueuedForReservation => f.write_str(
                "Book is currently checked out. You have been added to the reservation list.",
            ),
            Self::ReturnedSuccessfully => f.write_str("Book returned successfully."),
            Self::ReturnedAndTransferred(next) => write!(
                f,
                "Book returned successfully. Book reserved for next member in queue ({next})."
            ),
            Self::NotBorrowedByThisMember => {
                f.write_str("This book was not borrowed by this member.")
            }
        }
    }
}
