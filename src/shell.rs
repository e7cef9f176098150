use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

use crate::{
    book::{Book, BookView},
    clock::Clock,
    desk::CirculationDesk,
    fine::Fine,
    ids::{Isbn, MemberId},
    member::{Member, MemberView},
    outcome::Outcome,
    report::ShelfReport,
};

/// Usage text shown by `help`
pub const HELP: &str = "\
Commands:
  add-book Title|Author|ISBN|Category|Location
  add-member Name|Contact|ID
  search <title, author, ISBN or category>
  borrow <member-id> <isbn>
  return <member-id> <isbn>
  fine <member-id>
  member <member-id>
  status
  dot
  help
  quit";

/// Errors produced while parsing a command line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`; type `help` for a list")]
    Unknown(String),
    #[error("`{command}` needs {expected}")]
    MissingArgument { command: &'static str, expected: &'static str },
    #[error("`{0}` is not a valid member ID")]
    InvalidMemberId(String),
    #[error("`{command}` expects {expected} fields separated by `|`, got {found}")]
    FieldCount { command: &'static str, expected: usize, found: usize },
}

/// A parsed request, one per input line
///
/// [`execute`] runs it against a desk and produces a [`Response`] that renders
/// either as console text or as JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddBook(Book),
    AddMember(Member),
    Search(String),
    Borrow { member: MemberId, isbn: Isbn },
    Return { member: MemberId, isbn: Isbn },
    Fine(MemberId),
    Member(MemberId),
    Status,
    Dot,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match keyword {
            "" => Err(CommandError::Empty),
            "add-book" => {
                let [title, author, isbn, category, location] = fields::<5>("add-book", rest)?;
                Ok(Self::AddBook(Book::new(title, author, isbn, category, location)))
            }
            "add-member" => {
                let [name, contact, id] = fields::<3>("add-member", rest)?;
                Ok(Self::AddMember(Member::new(name, contact, parse_member_id(&id)?)))
            }
            "search" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "search",
                        expected: "a query",
                    });
                }
                Ok(Self::Search(rest.to_string()))
            }
            "borrow" => {
                let (member, isbn) = member_and_isbn("borrow", rest)?;
                Ok(Self::Borrow { member, isbn })
            }
            "return" => {
                let (member, isbn) = member_and_isbn("return", rest)?;
                Ok(Self::Return { member, isbn })
            }
            "fine" => Ok(Self::Fine(single_member_id("fine", rest)?)),
            "member" => Ok(Self::Member(single_member_id("member", rest)?)),
            "status" => Ok(Self::Status),
            "dot" => Ok(Self::Dot),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Split `rest` into exactly `N` trimmed `|`-separated fields
fn fields<const N: usize>(command: &'static str, rest: &str) -> Result<[String; N], CommandError> {
    let parts: Vec<String> = rest.split('|').map(|part| part.trim().to_string()).collect();
    let found = if rest.is_empty() { 0 } else { parts.len() };
    parts.try_into().map_err(|_| CommandError::FieldCount { command, expected: N, found })
}

/// Parse a member ID argument
fn parse_member_id(raw: &str) -> Result<MemberId, CommandError> {
    raw.trim()
        .parse::<i64>()
        .map(MemberId::new)
        .map_err(|_| CommandError::InvalidMemberId(raw.to_string()))
}

/// Parse `<member-id>` as the only argument
fn single_member_id(command: &'static str, rest: &str) -> Result<MemberId, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument { command, expected: "a member ID" });
    }
    parse_member_id(rest)
}

/// Parse `<member-id> <isbn>`
fn member_and_isbn(command: &'static str, rest: &str) -> Result<(MemberId, Isbn), CommandError> {
    let Some((id, isbn)) = rest.split_once(char::is_whitespace) else {
        return Err(CommandError::MissingArgument { command, expected: "a member ID and an ISBN" });
    };
    Ok((parse_member_id(id)?, Isbn::new(isbn.trim())))
}

/// What a command produced, ready to be rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    BookAdded { isbn: Isbn, replaced: bool },
    MemberAdded { id: MemberId, replaced: bool },
    SearchResults { query: String, books: Vec<BookView> },
    Circulation { outcome: Outcome, message: String },
    Fine { member: MemberId, amount: Fine },
    Member { member: MemberView },
    Status { report: ShelfReport },
    Dot { graph: String },
    Help { text: String },
    Error { message: String },
    Goodbye,
}

impl Response {
    /// Whether the shell should stop reading input
    #[must_use]
    pub fn is_goodbye(&self) -> bool {
        matches!(self, Self::Goodbye)
    }

    /// Whether the response reports a failure
    #[must_use]
    pub fn is_failure(&self) -> bool {
        match self {
            Self::Circulation { outcome, .. } => !outcome.is_success(),
            Self::Error { .. } => true,
            _ => false,
        }
    }

    /// Render as a single-line JSON document
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<Outcome> for Response {
    fn from(outcome: Outcome) -> Self {
        Self::Circulation { outcome, message: outcome.to_string() }
    }
}

impl From<CommandError> for Response {
    fn from(error: CommandError) -> Self {
        Self::Error { message: error.to_string() }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BookAdded { isbn, replaced: false } => write!(f, "Book {isbn} added."),
            Self::BookAdded { isbn, replaced: true } => write!(f, "Book {isbn} replaced."),
            Self::MemberAdded { id, replaced: false } => write!(f, "Member {id} added."),
            Self::MemberAdded { id, replaced: true } => write!(f, "Member {id} replaced."),
            Self::SearchResults { query, books } if books.is_empty() => {
                write!(f, "No books found matching the query: {query}")
            }
            Self::SearchResults { books, .. } => {
                let rendered: Vec<String> = books.iter().map(ToString::to_string).collect();
                f.write_str(&rendered.join("\n\n"))
            }
            Self::Circulation { message, .. } => f.write_str(message),
            Self::Fine { member, amount } => write!(f, "Total fine for member {member}: ${amount}"),
            Self::Member { member } => write!(f, "{member}"),
            Self::Status { report } => write!(f, "{report}"),
            Self::Dot { graph } => f.write_str(graph.trim_end()),
            Self::Help { text } => f.write_str(text),
            Self::Error { message } => f.write_str(message),
            Self::Goodbye => f.write_str("Exiting..."),
        }
    }
}

/// Run one command against the desk
pub fn execute<C: Clock>(desk: &mut CirculationDesk<C>, command: Command) -> Response {
    match command {
        Command::AddBook(book) => {
            let isbn = book.isbn().clone();
            let replaced = desk.add_book(book).is_some();
            Response::BookAdded { isbn, replaced }
        }
        Command::AddMember(member) => {
            let id = member.id();
            let replaced = desk.add_member(member).is_some();
            Response::MemberAdded { id, replaced }
        }
        Command::Search(query) => {
            let books = desk.search_books(&query);
            Response::SearchResults { query, books }
        }
        Command::Borrow { member, isbn } => desk.borrow(member, isbn.as_str()).into(),
        Command::Return { member, isbn } => desk.return_book(member, isbn.as_str()).into(),
        Command::Fine(member) => match desk.compute_fine(member) {
            Ok(amount) => Response::Fine { member, amount },
            Err(error) => Response::Error { message: error.to_string() },
        },
        Command::Member(member) => match desk.member_view(member) {
            Ok(member) => Response::Member { member },
            Err(error) => Response::Error { message: error.to_string() },
        },
        Command::Status => Response::Status { report: desk.shelf_report() },
        Command::Dot => Response::Dot { graph: desk.shelf_report().to_dot() },
        Command::Help => Response::Help { text: HELP.to_string() },
        Command::Quit => Response::Goodbye,
    }
}

/// Parse and run one input line
pub fn execute_line<C: Clock>(desk: &mut CirculationDesk<C>, line: &str) -> Response {
    match line.parse::<Command>() {
        Ok(command) => execute(desk, command),
        Err(error) => error.into(),
    }
}

/// Stock the desk with the two sample books and members the desk opens with
pub fn seed_sample_data<C: Clock>(desk: &mut CirculationDesk<C>) {
    desk.add_book(Book::new(
        "The Great Gatsby",
        "F. Scott Fitzgerald",
        "1234567890",
        "Fiction",
        "Shelf A1",
    ));
    desk.add_book(Book::new(
        "To Kill a Mockingbird",
        "Harper Lee",
        "0987654321",
        "Fiction",
        "Shelf B2",
    ));
    desk.add_member(Member::new("John Doe", "555-1234", MemberId::new(1)));
    desk.add_member(Member::new("Jane Smith", "555-5678", MemberId::new(2)));
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::clock::ManualClock;

    fn seeded_desk() -> (CirculationDesk<ManualClock>, ManualClock) {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).single().unwrap_or_default();
        let clock = ManualClock::new(start);
        let mut desk = CirculationDesk::with_clock(clock.clone());
        seed_sample_data(&mut desk);
        (desk, clock)
    }

    #[test]
    fn test_parse_add_book() {
        let command: Result<Command, _> =
            "add-book Dune | Frank Herbert | 5555 | Science Fiction | Shelf C3".parse();
        assert_eq!(
            command,
            Ok(Command::AddBook(Book::new(
                "Dune",
                "Frank Herbert",
                "5555",
                "Science Fiction",
                "Shelf C3"
            )))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!("lend 1 X".parse::<Command>(), Err(CommandError::Unknown("lend".to_string())));
        assert_eq!(
            "borrow abc X".parse::<Command>(),
            Err(CommandError::InvalidMemberId("abc".to_string()))
        );
        assert_eq!(
            "add-member Jane|555".parse::<Command>(),
            Err(CommandError::FieldCount { command: "add-member", expected: 3, found: 2 })
        );
        assert!(matches!(
            "borrow 1".parse::<Command>(),
            Err(CommandError::MissingArgument { command: "borrow", .. })
        ));
    }

    #[test]
    fn test_search_renders_book_blocks() {
        let (mut desk, _) = seeded_desk();
        let response = execute_line(&mut desk, "search Harper");
        assert_eq!(
            response.to_string(),
            "Title: To Kill a Mockingbird\nAuthor: Harper Lee\nISBN: 0987654321\n\
             Category: Fiction\nLocation: Shelf B2\nAvailability: Available"
        );

        let response = execute_line(&mut desk, "search Tolstoy");
        assert_eq!(response.to_string(), "No books found matching the query: Tolstoy");
    }

    #[test]
    fn test_borrow_queue_return_session() {
        let (mut desk, clock) = seeded_desk();

        let response = execute_line(&mut desk, "borrow 1 1234567890");
        assert_eq!(response.to_string(), "Book borrowed successfully.");

        let response = execute_line(&mut desk, "borrow 2 1234567890");
        assert!(matches!(
            response,
            Response::Circulation { outcome: Outcome::QueuedForReservation, .. }
        ));

        clock.advance_days(20);
        let response = execute_line(&mut desk, "fine 1");
        assert_eq!(response.to_string(), "Total fine for member 1: $3.00");

        let response = execute_line(&mut desk, "return 1 1234567890");
        assert_eq!(
            response,
            Response::from(Outcome::ReturnedAndTransferred(MemberId::new(2)))
        );
        assert_eq!(execute_line(&mut desk, "fine 1").to_string(), "Total fine for member 1: $0.00");
    }

    #[test]
    fn test_unknown_member_fine_is_failure() {
        let (mut desk, _) = seeded_desk();
        let response = execute_line(&mut desk, "fine 999");
        assert!(response.is_failure());
        assert_eq!(response.to_string(), "Member not found: 999");
    }

    #[test]
    fn test_json_rendering() {
        let (mut desk, _) = seeded_desk();
        let response = execute_line(&mut desk, "borrow 999 1234567890");
        let json = response.to_json().unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap_or_default();

        assert_eq!(value["kind"], "circulation");
        assert_eq!(value["outcome"]["NotFound"], "Member");
        assert_eq!(value["message"], "Member not found.");
    }

    #[test]
    fn test_json_fine_matches_text_rounding() {
        let (mut desk, clock) = seeded_desk();
        execute_line(&mut desk, "borrow 1 1234567890");
        clock.advance(chrono::TimeDelta::days(15) + chrono::TimeDelta::hours(13));

        let response = execute_line(&mut desk, "fine 1");
        assert_eq!(response.to_string(), "Total fine for member 1: $0.77");
        let json = response.to_json().unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(value["kind"], "fine");
        assert_eq!(value["amount"], 0.77);
    }

    #[test]
    fn test_quit_says_goodbye() {
        let (mut desk, _) = seeded_desk();
        assert!(execute_line(&mut desk, "quit").is_goodbye());
        assert!(execute_line(&mut desk, "add-member Ann|555-0001|3").to_string().ends_with("added."));
        assert!(execute_line(&mut desk, "add-member Ann|555-0002|3").to_string().ends_with("replaced."));
    }
}
