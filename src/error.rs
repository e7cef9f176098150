use thiserror::Error;

use crate::ids::{Isbn, MemberId};

/// Lookup failures raised by the circulation desk
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CirculationError {
    /// No book with this ISBN is in the catalog
    #[error("Book not found: {0}")]
    BookNotFound(Isbn),
    /// No member with this ID is on the roster
    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),
}
