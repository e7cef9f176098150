use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::Isbn;

/// A book held by the library
///
/// Availability starts out `true` and is only flipped by the circulation
/// engine when the book is checked out or returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    /// Title of the book
    title: String,
    /// Author of the book
    author: String,
    /// Primary key within the catalog
    isbn: Isbn,
    /// Free-form category, e.g. "Fiction"
    category: String,
    /// Shelf location inside the library
    location: String,
    /// Whether nobody currently holds the book
    available: bool,
}

impl Book {
    /// Create a new, available book
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<Isbn>,
        category: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            category: category.into(),
            location: location.into(),
            available: true,
        }
    }

    /// Title of the book
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Author of the book
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Catalog key
    #[must_use]
    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    /// Free-form category
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Shelf location
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Whether the book is on the shelf
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Flip the availability flag; reserved for the circulation engine
    pub(crate) fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Whether this book matches a catalog search query
    ///
    /// Title, author and category match on a case-sensitive substring, the
    /// ISBN only on exact equality.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.title.contains(query)
            || self.author.contains(query)
            || self.isbn.as_str() == query
            || self.category.contains(query)
    }
}

/// Caller-facing snapshot of a book
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BookView {
    pub title: String,
    pub author: String,
    pub isbn: Isbn,
    pub category: String,
    pub location: String,
    pub available: bool,
}

impl From<&Book> for BookView {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            category: book.category.clone(),
            location: book.location.clone(),
            available: book.available,
        }
    }
}

impl fmt::Display for BookView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Author: {}", self.author)?;
        writeln!(f, "ISBN: {}", self.isbn)?;
        writeln!(f, "Category: {}", self.category)?;
        writeln!(f, "Location: {}", self.location)?;
        write!(f, "Availability: {}", if self.available { "Available" } else { "Checked Out" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gatsby() -> Book {
        Book::new("The Great Gatsby", "F. Scott Fitzgerald", "1234567890", "Fiction", "Shelf A1")
    }

    #[test]
    fn test_new_book_is_available() {
        assert!(gatsby().is_available());
    }

    #[test]
    fn test_matches_substrings_case_sensitively() {
        let book = gatsby();
        assert!(book.matches("Gatsby"));
        assert!(book.matches("Fitzgerald"));
        assert!(book.matches("Fict"));
        assert!(!book.matches("gatsby"));
    }

    #[test]
    fn test_isbn_matches_only_exactly() {
        let book = gatsby();
        assert!(book.matches("1234567890"));
        assert!(!book.matches("12345"));
    }

    #[test]
    fn test_view_renders_availability() {
        let mut book = gatsby();
        book.set_available(false);
        let rendered = BookView::from(&book).to_string();
        assert!(rendered.starts_with("Title: The Great Gatsby\n"));
        assert!(rendered.ends_with("Availability: Checked Out"));
    }
}
