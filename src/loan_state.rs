use serde::{Deserialize, Serialize};

use crate::ids::MemberId;

/// Loan state of a single book
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum LoanState {
    /// Book is on the shelf and can be borrowed
    #[default]
    Available,
    /// Book is held by a member; later requests queue behind them
    CheckedOut(MemberId),
}

impl LoanState {
    /// Get a human-readable description of the state
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Available => "Book is available for checkout".to_string(),
            Self::CheckedOut(holder) => format!("Book is checked out by member {holder}"),
        }
    }

    /// The member holding the book, if any
    #[must_use]
    pub fn holder(&self) -> Option<MemberId> {
        match self {
            Self::Available => None,
            Self::CheckedOut(holder) => Some(*holder),
        }
    }
}
