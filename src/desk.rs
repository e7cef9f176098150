use std::{
    collections::{HashMap, VecDeque},
    fmt,
};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    book::{Book, BookView},
    catalog::Catalog,
    clock::{Clock, SystemClock},
    error::CirculationError,
    events::CirculationEvent,
    fine::{Fine, overdue_fine},
    ids::{Isbn, MemberId},
    loan_state::LoanState,
    member::{Member, MemberView},
    observers::CirculationObserver,
    outcome::Outcome,
    report::{ShelfEntry, ShelfReport},
    roster::Roster,
};

/// The circulation engine: catalog, roster and per-book reservation queues
///
/// Each ISBN is either [`LoanState::Available`] or checked out to exactly
/// one member, with a FIFO queue of members waiting for it. Borrowing a
/// checked-out book joins its queue; returning a book with a non-empty queue
/// hands it straight to the head of that queue.
pub struct CirculationDesk<C = SystemClock> {
    /// Books by ISBN
    catalog: Catalog,
    /// Members by ID
    roster: Roster,
    /// Waiting members per ISBN; a queue only exists while non-empty
    reservations: HashMap<Isbn, VecDeque<MemberId>>,
    /// Source of borrow timestamps and fine reference time
    clock: C,
    /// Registered event observers
    observers: Vec<Box<dyn CirculationObserver>>,
}

// Manual implementation of Debug for CirculationDesk
impl<C: Clock> fmt::Debug for CirculationDesk<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CirculationDesk")
            .field("catalog", &self.catalog)
            .field("roster", &self.roster)
            .field("reservations", &self.reservations)
            .field("clock", &self.clock)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl CirculationDesk<SystemClock> {
    /// Create an empty desk stamped by the system clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for CirculationDesk<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> CirculationDesk<C> {
    /// Create an empty desk reading time from `clock`
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            catalog: Catalog::new(),
            roster: Roster::new(),
            reservations: HashMap::new(),
            clock,
            observers: Vec::new(),
        }
    }

    /// Register an observer to be notified of every state change
    pub fn register_observer(&mut self, observer: Box<dyn CirculationObserver>) {
        self.observers.push(observer);
    }

    /// All catalogued books
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// All registered members
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Add a book, replacing any book with the same ISBN
    ///
    /// Availability is owned by the desk: a new ISBN goes on the shelf as
    /// available, whatever the record says, and a replacement keeps the
    /// availability of the book it replaces. Loans and reservation queues for
    /// that ISBN are left as they are.
    pub fn add_book(&mut self, mut book: Book) -> Option<Book> {
        let available =
            self.catalog.find(book.isbn().as_str()).is_none_or(Book::is_available);
        book.set_available(available);
        let replaced = self.catalog.add_book(book);
        if let Some(old) = &replaced {
            debug!(isbn = %old.isbn(), "replaced existing book");
        }
        replaced
    }

    /// Add a member, replacing any member with the same ID
    ///
    /// Loans and history are owned by the desk: a new member starts with
    /// none, and a replacement updates name and contact only while the
    /// previous record's loans and borrowing history carry over.
    pub fn add_member(&mut self, mut member: Member) -> Option<Member> {
        member.inherit_circulation(self.roster.find(member.id()));
        let replaced = self.roster.add_member(member);
        if let Some(old) = &replaced {
            debug!(member = %old.id(), "replaced existing member");
        }
        replaced
    }

    /// Look up a book by ISBN
    #[must_use]
    pub fn book(&self, isbn: &str) -> Option<&Book> {
        self.catalog.find(isbn)
    }

    /// Look up a member by ID
    #[must_use]
    pub fn member(&self, member_id: MemberId) -> Option<&Member> {
        self.roster.find(member_id)
    }

    /// Snapshot of a member's details, loans and history
    ///
    /// # Errors
    ///
    /// Returns [`CirculationError::MemberNotFound`] for an unknown ID.
    pub fn member_view(&self, member_id: MemberId) -> Result<MemberView, CirculationError> {
        self.roster
            .find(member_id)
            .map(MemberView::from)
            .ok_or(CirculationError::MemberNotFound(member_id))
    }

    /// Every book whose title, author or category contains `query`, or whose
    /// ISBN equals it, ordered by ISBN
    #[must_use]
    pub fn search_books(&self, query: &str) -> Vec<BookView> {
        let mut matches: Vec<BookView> = self.catalog.search(query).map(BookView::from).collect();
        matches.sort_by(|a, b| a.isbn.cmp(&b.isbn));
        debug!(query, matches = matches.len(), "catalog search");
        matches
    }

    /// Borrow a book, or join its reservation queue if it is checked out
    ///
    /// A member may queue for a book they already hold, and may queue more
    /// than once; neither is rejected.
    pub fn borrow(&mut self, member_id: MemberId, isbn: &str) -> Outcome {
        let isbn = match self.resolve(member_id, isbn) {
            Ok(isbn) => isbn,
            Err(error) => {
                debug!(%error, "borrow rejected");
                return error.into();
            }
        };

        if self.catalog.find(isbn.as_str()).is_some_and(Book::is_available) {
            self.check_out(member_id, isbn);
            Outcome::BorrowedSuccessfully
        } else {
            self.enqueue(member_id, isbn);
            Outcome::QueuedForReservation
        }
    }

    /// Return a book held by the member
    ///
    /// If other members are waiting, the book is handed to the first of them
    /// before this call returns, so it is never observed Available while its
    /// queue is non-empty.
    pub fn return_book(&mut self, member_id: MemberId, isbn: &str) -> Outcome {
        let isbn = match self.resolve(member_id, isbn) {
            Ok(isbn) => isbn,
            Err(error) => {
                debug!(%error, "return rejected");
                return error.into();
            }
        };

        let ended =
            self.roster.find_mut(member_id).and_then(|member| member.end_loan(isbn.as_str()));
        if ended.is_none() {
            debug!(%isbn, member = %member_id, "return rejected: not borrowed by this member");
            return Outcome::NotBorrowedByThisMember;
        }

        self.release_and_reassign(member_id, isbn)
    }

    /// Total fine owed by a member for the books they currently hold
    ///
    /// The clock is sampled once for all loans.
    ///
    /// # Errors
    ///
    /// Returns [`CirculationError::MemberNotFound`] for an unknown ID.
    pub fn compute_fine(&self, member_id: MemberId) -> Result<Fine, CirculationError> {
        self.compute_fine_at(member_id, self.clock.now())
    }

    /// Total fine owed by a member as of `now`
    ///
    /// # Errors
    ///
    /// Returns [`CirculationError::MemberNotFound`] for an unknown ID.
    pub fn compute_fine_at(
        &self,
        member_id: MemberId,
        now: DateTime<Utc>,
    ) -> Result<Fine, CirculationError> {
        let member =
            self.roster.find(member_id).ok_or(CirculationError::MemberNotFound(member_id))?;
        Ok(member.loans().map(|(_, borrowed_at)| overdue_fine(*borrowed_at, now)).sum())
    }

    /// Loan state of a book, or `None` if the ISBN is not catalogued
    #[must_use]
    pub fn loan_state(&self, isbn: &str) -> Option<LoanState> {
        self.catalog.find(isbn)?;
        Some(self.holder_of(isbn).map_or(LoanState::Available, LoanState::CheckedOut))
    }

    /// The member currently holding `isbn`
    #[must_use]
    pub fn holder_of(&self, isbn: &str) -> Option<MemberId> {
        self.roster.iter().find(|member| member.holds(isbn)).map(Member::id)
    }

    /// Members waiting for `isbn`, head of the queue first
    #[must_use]
    pub fn reservations(&self, isbn: &str) -> Vec<MemberId> {
        self.reservations.get(isbn).map(|queue| queue.iter().copied().collect()).unwrap_or_default()
    }

    /// Loan state and queue of every catalogued book, ordered by ISBN
    #[must_use]
    pub fn shelf_report(&self) -> ShelfReport {
        let mut entries: Vec<ShelfEntry> = self
            .catalog
            .iter()
            .map(|book| ShelfEntry {
                isbn: book.isbn().clone(),
                title: book.title().to_string(),
                state: self
                    .holder_of(book.isbn().as_str())
                    .map_or(LoanState::Available, LoanState::CheckedOut),
                queue: self.reservations(book.isbn().as_str()),
            })
            .collect();
        entries.sort_by(|a, b| a.isbn.cmp(&b.isbn));
        ShelfReport { entries }
    }

    /// Check that both records exist, book first, and return the stored ISBN
    fn resolve(&self, member_id: MemberId, isbn: &str) -> Result<Isbn, CirculationError> {
        let book =
            self.catalog.find(isbn).ok_or_else(|| CirculationError::BookNotFound(isbn.into()))?;
        if !self.roster.contains(member_id) {
            return Err(CirculationError::MemberNotFound(member_id));
        }
        Ok(book.isbn().clone())
    }

    /// Hand `isbn` to `member_id`; returns `false` if either record is gone
    fn check_out(&mut self, member_id: MemberId, isbn: Isbn) -> bool {
        let (Some(member), Some(book)) =
            (self.roster.find_mut(member_id), self.catalog.find_mut(isbn.as_str()))
        else {
            return false;
        };

        let at = self.clock.now();
        book.set_available(false);
        member.start_loan(isbn.clone(), at);
        self.notify(&CirculationEvent::CheckedOut { isbn, member: member_id, at });
        true
    }

    /// Append `member_id` to the reservation queue of `isbn`
    fn enqueue(&mut self, member_id: MemberId, isbn: Isbn) {
        let queue = self.reservations.entry(isbn.clone()).or_default();
        queue.push_back(member_id);
        let position = queue.len();
        self.notify(&CirculationEvent::Reserved { isbn, member: member_id, position });
    }

    /// Pop the head of the reservation queue of `isbn`, dropping the queue
    /// once it is empty
    fn dequeue(&mut self, isbn: &Isbn) -> Option<MemberId> {
        let queue = self.reservations.get_mut(isbn)?;
        let next = queue.pop_front();
        if queue.is_empty() {
            self.reservations.remove(isbn);
        }
        next
    }

    /// Put `isbn` back on the shelf, then give it to the first queued member
    /// that still resolves
    ///
    /// Release and reassignment happen under the same `&mut self`, so the
    /// pair is a single step for any caller. Members that no longer resolve
    /// are dropped from the queue; if none is left the book stays Available.
    fn release_and_reassign(&mut self, from: MemberId, isbn: Isbn) -> Outcome {
        if let Some(book) = self.catalog.find_mut(isbn.as_str()) {
            book.set_available(true);
        }
        self.notify(&CirculationEvent::Returned { isbn: isbn.clone(), member: from });

        while let Some(next) = self.dequeue(&isbn) {
            if self.check_out(next, isbn.clone()) {
                self.notify(&CirculationEvent::Transferred { isbn, from, to: next });
                return Outcome::ReturnedAndTransferred(next);
            }
            self.notify(&CirculationEvent::ReservationSkipped { isbn: isbn.clone(), member: next });
        }

        Outcome::ReturnedSuccessfully
    }

    /// Notify all observers
    fn notify(&self, event: &CirculationEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}
