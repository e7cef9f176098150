use std::{fmt, sync::Arc};

use parking_lot::Mutex;

use crate::{
    book::{Book, BookView},
    clock::{Clock, SystemClock},
    desk::CirculationDesk,
    error::CirculationError,
    fine::Fine,
    ids::MemberId,
    member::Member,
    outcome::Outcome,
};

/// Cloneable, thread-safe handle to one circulation desk
///
/// Catalog, roster and reservation queues share a single lock, so a return
/// and the hand-off to the next queued member are seen as one step by every
/// other handle.
pub struct SharedDesk<C = SystemClock> {
    /// The guarded desk
    inner: Arc<Mutex<CirculationDesk<C>>>,
}

impl<C: Clock> fmt::Debug for SharedDesk<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedDesk").field("inner", &self.inner).finish()
    }
}

impl<C> Clone for SharedDesk<C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<C: Clock> From<CirculationDesk<C>> for SharedDesk<C> {
    fn from(desk: CirculationDesk<C>) -> Self {
        Self { inner: Arc::new(Mutex::new(desk)) }
    }
}

impl<C: Clock> SharedDesk<C> {
    /// Run `f` with exclusive access to the desk
    pub fn with<R>(&self, f: impl FnOnce(&mut CirculationDesk<C>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Add or replace a book under the lock
    pub fn add_book(&self, book: Book) -> Option<Book> {
        self.inner.lock().add_book(book)
    }

    /// Add or replace a member under the lock
    pub fn add_member(&self, member: Member) -> Option<Member> {
        self.inner.lock().add_member(member)
    }

    /// Search the catalog under the lock
    #[must_use]
    pub fn search_books(&self, query: &str) -> Vec<BookView> {
        self.inner.lock().search_books(query)
    }

    /// Borrow or queue for a book under the lock
    pub fn borrow(&self, member_id: MemberId, isbn: &str) -> Outcome {
        self.inner.lock().borrow(member_id, isbn)
    }

    /// Return a book and hand it off under the same lock
    pub fn return_book(&self, member_id: MemberId, isbn: &str) -> Outcome {
        self.inner.lock().return_book(member_id, isbn)
    }

    /// Fine owed by a member as of the desk's clock
    ///
    /// # Errors
    ///
    /// Returns [`CirculationError::MemberNotFound`] for an unknown ID.
    pub fn compute_fine(&self, member_id: MemberId) -> Result<Fine, CirculationError> {
        self.inner.lock().compute_fine(member_id)
    }
}
