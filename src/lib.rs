//! Library circulation desk: catalog, member roster, borrowing with
//! reservation queues, and overdue fines.
//!
//! The core is [`CirculationDesk`]. Each book is either available or held by
//! one member; asking for a held book queues the request, and returning it
//! hands the book to the first member in the queue in the same step.
//! [`SharedDesk`] wraps a desk for use from several threads and [`shell`]
//! provides a line-based front end.

pub mod book;
pub mod catalog;
pub mod clock;
pub mod desk;
pub mod error;
pub mod events;
pub mod fine;
pub mod ids;
pub mod loan_state;
pub mod member;
pub mod observers;
pub mod outcome;
pub mod report;
pub mod roster;
pub mod shared;
pub mod shell;

pub use book::{Book, BookView};
pub use catalog::Catalog;
pub use clock::{Clock, ManualClock, SystemClock};
pub use desk::CirculationDesk;
pub use error::CirculationError;
pub use events::CirculationEvent;
pub use fine::Fine;
pub use ids::{Isbn, MemberId};
pub use loan_state::LoanState;
pub use member::{Member, MemberView};
pub use observers::{CirculationObserver, TracingObserver};
pub use outcome::{EntityKind, Outcome};
pub use report::ShelfReport;
pub use roster::Roster;
pub use shared::SharedDesk;
