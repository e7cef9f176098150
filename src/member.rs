use std::{collections::HashMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{Isbn, MemberId};

/// A registered library member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    /// Display name
    name: String,
    /// Contact details, e.g. a phone number
    contact: String,
    /// Primary key within the roster
    id: MemberId,
    /// Every ISBN this member has borrowed, oldest first; never pruned
    history: Vec<Isbn>,
    /// Active loans and when each started
    loans: HashMap<Isbn, DateTime<Utc>>,
}

impl Member {
    /// Create a member with no history and no loans
    #[must_use]
    pub fn new(name: impl Into<String>, contact: impl Into<String>, id: MemberId) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
            id,
            history: Vec::new(),
            loans: HashMap::new(),
        }
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact details
    #[must_use]
    pub fn contact(&self) -> &str {
        &self.contact
    }

    /// Roster key
    #[must_use]
    pub fn id(&self) -> MemberId {
        self.id
    }

    /// Borrowing history in chronological order
    #[must_use]
    pub fn history(&self) -> &[Isbn] {
        &self.history
    }

    /// Active loans with their borrow timestamps, in no particular order
    pub fn loans(&self) -> impl Iterator<Item = (&Isbn, &DateTime<Utc>)> {
        self.loans.iter()
    }

    /// When the member borrowed `isbn`, if they currently hold it
    #[must_use]
    pub fn borrowed_at(&self, isbn: &str) -> Option<DateTime<Utc>> {
        self.loans.get(isbn).copied()
    }

    /// Whether the member currently holds `isbn`
    #[must_use]
    pub fn holds(&self, isbn: &str) -> bool {
        self.loans.contains_key(isbn)
    }

    /// Start a loan: stamp it and append it to the history
    pub(crate) fn start_loan(&mut self, isbn: Isbn, at: DateTime<Utc>) {
        self.history.push(isbn.clone());
        self.loans.insert(isbn, at);
    }

    /// Take over the loans and history of the record this one replaces, or
    /// start with none when there is no such record
    pub(crate) fn inherit_circulation(&mut self, previous: Option<&Self>) {
        match previous {
            Some(previous) => {
                self.history.clone_from(&previous.history);
                self.loans.clone_from(&previous.loans);
            }
            None => {
                self.history.clear();
                self.loans.clear();
            }
        }
    }

    /// End a loan, returning when it started; history is left untouched
    pub(crate) fn end_loan(&mut self, isbn: &str) -> Option<DateTime<Utc>> {
        self.loans.remove(isbn)
    }
}

/// A single active loan as shown to callers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoanView {
    pub isbn: Isbn,
    pub borrowed_at: DateTime<Utc>,
}

/// Caller-facing snapshot of a member
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MemberView {
    pub name: String,
    pub contact: String,
    pub id: MemberId,
    pub history: Vec<Isbn>,
    /// Sorted by ISBN
    pub loans: Vec<LoanView>,
}

impl From<&Member> for MemberView {
    fn from(member: &Member) -> Self {
        let mut loans: Vec<LoanView> = member
            .loans
            .iter()
            .map(|(isbn, at)| LoanView { isbn: isbn.clone(), borrowed_at: *at })
            .collect();
        loans.sort_by(|a, b| a.isbn.cmp(&b.isbn));

        Self {
            name: member.name.clone(),
            contact: member.contact.clone(),
            id: member.id,
            history: member.history.clone(),
            loans,
        }
    }
}

impl fmt::Display for MemberView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Member {}: {} ({})", self.id, self.name, self.contact)?;
        if self.loans.is_empty() {
            writeln!(f, "  No books currently borrowed")?;
        }
        for loan in &self.loans {
            writeln!(f, "  Borrowed {} on {}", loan.isbn, loan.borrowed_at.format("%Y-%m-%d %H:%M"))?;
        }
        let history: Vec<&str> = self.history.iter().map(Isbn::as_str).collect();
        write!(f, "  History: [{}]", history.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_end_loan_keeps_history() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single().unwrap_or_default();
        let mut member = Member::new("John Doe", "555-1234", MemberId::new(1));

        member.start_loan(Isbn::new("X"), at);
        assert!(member.holds("X"));
        assert_eq!(member.borrowed_at("X"), Some(at));

        assert_eq!(member.end_loan("X"), Some(at));
        assert!(!member.holds("X"));
        assert_eq!(member.history(), &[Isbn::new("X")]);
    }

    #[test]
    fn test_end_loan_unknown_isbn() {
        let mut member = Member::new("Jane Smith", "555-5678", MemberId::new(2));
        assert_eq!(member.end_loan("nope"), None);
        assert!(member.history().is_empty());
    }

    #[test]
    fn test_view_sorts_loans() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single().unwrap_or_default();
        let mut member = Member::new("John Doe", "555-1234", MemberId::new(1));
        member.start_loan(Isbn::new("B"), at);
        member.start_loan(Isbn::new("A"), at);

        let view = MemberView::from(&member);
        let isbns: Vec<&str> = view.loans.iter().map(|l| l.isbn.as_str()).collect();
        assert_eq!(isbns, ["A", "B"]);
        assert_eq!(view.history, [Isbn::new("B"), Isbn::new("A")]);
    }
}
